//! Data façade consumed by the assignment engine.

use tracing::debug;

use crate::calculation::PlanningState;
use crate::error::{ConfigurationError, Result};
use crate::models::{ActivityId, Project, ResourceId, SpanSet};

/// Everything the greedy assignment loop needs to read and write.
///
/// Times are evaluated against the *current* partial assignment, so an
/// implementation must refresh them after every
/// [`assign_activity_to_resource`](AssignmentData::assign_activity_to_resource).
pub trait AssignmentData {
    /// All activities, in definition order.
    fn activities(&self) -> Vec<ActivityId>;
    /// Activities without any resource, in definition order.
    fn unassigned_activities(&self) -> Vec<ActivityId>;
    /// Every resource.
    fn resources(&self) -> Vec<ResourceId>;
    /// Resource type an activity requires, if any.
    fn resource_type(&self, activity: ActivityId) -> Result<Option<String>>;
    /// Earliest start under the current assignment.
    fn earliest_start(&self, activity: ActivityId) -> Result<i64>;
    /// Earliest finish under the current assignment.
    fn earliest_finish(&self, activity: ActivityId) -> Result<i64>;
    /// Total float under the current assignment.
    fn total_float(&self, activity: ActivityId) -> Result<i64>;
    /// Candidate resources of a type, most preferred first.
    fn resources_of_type(&self, resource_type: &str) -> Result<Vec<ResourceId>>;
    /// Time windows during which the resource is already busy.
    fn occupied_spans(&self, resource: &str) -> Result<SpanSet<ActivityId>>;
    /// Records one assignment and refreshes derived times.
    fn assign_activity_to_resource(&mut self, activity: ActivityId, resource: &str) -> Result<()>;
}

/// [`AssignmentData`] backed by a project's active plan.
#[derive(Debug)]
pub struct ProjectAssignmentData<'a> {
    project: &'a mut Project,
    state: PlanningState,
}

impl<'a> ProjectAssignmentData<'a> {
    /// Wraps a project, deriving its current planning state.
    pub fn new(project: &'a mut Project) -> Result<Self> {
        let state = PlanningState::derive(project)?;
        Ok(Self { project, state })
    }

    /// The planning state after the latest assignment.
    pub fn state(&self) -> &PlanningState {
        &self.state
    }
}

impl AssignmentData for ProjectAssignmentData<'_> {
    fn activities(&self) -> Vec<ActivityId> {
        self.project.activities().iter().map(|a| a.id).collect()
    }

    fn unassigned_activities(&self) -> Vec<ActivityId> {
        self.project.unassigned_activities()
    }

    fn resources(&self) -> Vec<ResourceId> {
        self.project.active_plan().resources.iter().cloned().collect()
    }

    fn resource_type(&self, activity: ActivityId) -> Result<Option<String>> {
        self.project.position(activity)?;
        Ok(self.project.resource_type_of(activity).map(String::from))
    }

    fn earliest_start(&self, activity: ActivityId) -> Result<i64> {
        self.state.times().earliest_start(activity)
    }

    fn earliest_finish(&self, activity: ActivityId) -> Result<i64> {
        self.state.times().earliest_finish(activity)
    }

    fn total_float(&self, activity: ActivityId) -> Result<i64> {
        self.state.times().total_float(activity)
    }

    fn resources_of_type(&self, resource_type: &str) -> Result<Vec<ResourceId>> {
        self.project
            .active_plan()
            .resource_type(resource_type)
            .map(|rt| rt.resources.clone())
            .ok_or_else(|| ConfigurationError::UnknownResourceType(resource_type.to_string()))
    }

    fn occupied_spans(&self, resource: &str) -> Result<SpanSet<ActivityId>> {
        self.state
            .occupied_spans(self.project.active_plan(), resource)
    }

    fn assign_activity_to_resource(&mut self, activity: ActivityId, resource: &str) -> Result<()> {
        if self.project.active_plan_mut().add_assignment(activity, resource) {
            self.state.refresh(self.project)?;
            debug!(
                activity,
                resource,
                edges = self.state.graph().edge_count(),
                "precedence refreshed"
            );
        }
        Ok(())
    }
}
