//! Greedy resource assignment run to a fixpoint.
//!
//! Each pass walks the pending activities from most to least urgent,
//! re-ranking after every commitment because a new assignment reshapes the
//! precedence relation and therefore every time bound.
//!
//! # Reference
//! Kolisch (1996), "Serial and parallel resource-constrained project
//! scheduling methods revisited"

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::AssignmentData;
use crate::error::{ConfigurationError, Result};
use crate::models::{ActivityId, ResourceId};

/// One committed activity→resource assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned activity.
    pub activity_id: ActivityId,
    /// Resource it was given.
    pub resource_id: ResourceId,
    /// Earliest start at the time of assignment.
    pub start: i64,
    /// Earliest finish at the time of assignment.
    pub end: i64,
}

/// Outcome of an automatic assignment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentReport {
    /// Assignments in commit order.
    pub assignments: Vec<Assignment>,
    /// Typed activities left without a resource because their type stayed saturated.
    pub unassigned: Vec<ActivityId>,
    /// Number of passes run.
    pub passes: usize,
}

impl AssignmentReport {
    /// Whether every typed activity got a resource.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }
}

/// Greedy fixpoint scheduler.
///
/// # Example
/// ```
/// use u_project::models::{Activity, Project, ResourceType};
///
/// let mut project = Project::new();
/// project.add_activity(Activity::new(1, "X", 5)).unwrap();
/// project.add_resource("Dev1");
/// project
///     .add_resource_type(ResourceType::new("Dev").with_resource("Dev1"))
///     .unwrap();
/// project.set_resource_type(1, "Dev").unwrap();
///
/// let report = project.assign_resources().unwrap();
/// assert!(report.is_complete());
/// assert_eq!(report.assignments[0].resource_id, "Dev1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssignmentEngine;

impl AssignmentEngine {
    /// Creates an engine.
    pub fn new() -> Self {
        Self
    }

    /// Assigns resources to every unassigned activity that requires a type.
    ///
    /// Activities whose type has no free candidate stay unassigned; that is
    /// reported, not raised.
    pub fn assign_resources<D: AssignmentData>(&self, data: &mut D) -> Result<AssignmentReport> {
        let mut pending = Vec::new();
        for activity in data.unassigned_activities() {
            if data.resource_type(activity)?.is_some() {
                pending.push(activity);
            }
        }

        let mut report = AssignmentReport::default();
        while !pending.is_empty() {
            report.passes += 1;
            let mut tried = BTreeSet::new();
            let mut progress = false;

            while let Some(activity) = self.select(data, &pending, &tried)? {
                tried.insert(activity);
                if let Some(assignment) = self.try_assign(data, activity)? {
                    pending.retain(|&a| a != activity);
                    report.assignments.push(assignment);
                    progress = true;
                }
            }

            if !progress {
                break;
            }
        }

        for &activity in &pending {
            warn!(activity, "no free resource; activity left unassigned");
        }
        info!(
            assigned = report.assignments.len(),
            unassigned = pending.len(),
            passes = report.passes,
            "resource assignment finished"
        );
        report.unassigned = pending;
        Ok(report)
    }

    /// Assigns a resource to an activity after checking both exist.
    ///
    /// Used to pre-seed fixed assignments before [`assign_resources`](Self::assign_resources).
    pub fn assign<D: AssignmentData>(&self, data: &mut D, resource: &str, activity: ActivityId) -> Result<()> {
        if !data.resources().iter().any(|r| r == resource) {
            return Err(ConfigurationError::UnknownResource(resource.to_string()));
        }
        if !data.activities().contains(&activity) {
            return Err(ConfigurationError::UnknownActivity(activity));
        }
        debug!(activity, resource, "manual assignment");
        data.assign_activity_to_resource(activity, resource)
    }

    /// Most urgent untried activity: minimal (ES, float), then definition order.
    fn select<D: AssignmentData>(
        &self,
        data: &D,
        pending: &[ActivityId],
        tried: &BTreeSet<ActivityId>,
    ) -> Result<Option<ActivityId>> {
        let mut best: Option<(i64, i64, ActivityId)> = None;
        for &activity in pending.iter().filter(|a| !tried.contains(a)) {
            let key = (data.earliest_start(activity)?, data.total_float(activity)?);
            if best.map_or(true, |(es, tf, _)| key < (es, tf)) {
                best = Some((key.0, key.1, activity));
            }
        }
        Ok(best.map(|(_, _, activity)| activity))
    }

    fn try_assign<D: AssignmentData>(&self, data: &mut D, activity: ActivityId) -> Result<Option<Assignment>> {
        let Some(resource_type) = data.resource_type(activity)? else {
            return Ok(None);
        };
        let start = data.earliest_start(activity)?;
        let end = data.earliest_finish(activity)?;

        for resource in data.resources_of_type(&resource_type)? {
            if data.occupied_spans(&resource)?.intersects(start, end) {
                debug!(activity, resource = %resource, start, end, "resource busy");
                continue;
            }
            data.assign_activity_to_resource(activity, &resource)?;
            debug!(activity, resource = %resource, start, end, "assigned");
            return Ok(Some(Assignment {
                activity_id: activity,
                resource_id: resource,
                start,
                end,
            }));
        }
        Ok(None)
    }
}
