//! Read-only capability for diagram renderers.
//!
//! A renderer sees activities through [`ActivityTimes`] and a project
//! through [`ProjectData`]; it never touches the planning model directly.
//! The view's precedence relation adds one kind of edge the scheduling
//! relation lacks: an unassigned activity whose resource type is saturated
//! at its earliest start waits for the activity that ends the saturation
//! window.
//!
//! Producing text or files from a diagram is up to the caller.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::calculation::{CriticalPath, PlanningState, PrecedenceGraph};
use crate::error::Result;
use crate::models::{ActivityData, ActivityId, Project, ResourceId, SpanSet};
use crate::network::{label_nodes, EdgeId, FloatCalculator, Network, NetworkBuilder};

/// Label and duration shown on an activity edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeProperties {
    pub label: String,
    pub duration: i64,
}

impl EdgeProperties {
    pub fn new(label: impl Into<String>, duration: i64) -> Self {
        Self {
            label: label.into(),
            duration,
        }
    }
}

/// Activity data plus its time bounds.
pub trait ActivityTimes: ActivityData {
    /// Earliest start time.
    fn earliest_start(&self) -> i64;
    /// Latest start time.
    fn latest_start(&self) -> i64;
    /// What to draw on the activity's edge.
    fn edge_properties(&self) -> EdgeProperties;

    /// Total float.
    fn total_float(&self) -> i64 {
        self.latest_start() - self.earliest_start()
    }
}

/// Project-level view handed to renderers.
pub trait ProjectData {
    type Activity: ActivityTimes;

    /// All activities, in definition order.
    fn activities(&self) -> &[Self::Activity];

    /// Saturation windows of one resource type.
    fn resource_type_occupied_spans(&self, resource_type: &str) -> Result<SpanSet<ActivityId>>;
}

/// Precomputed snapshot of one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityView {
    pub id: ActivityId,
    pub description: String,
    pub duration: i64,
    /// Explicit, resource-induced and saturation-induced prerequisites.
    pub prerequisites: Vec<ActivityId>,
    pub earliest_start: i64,
    pub latest_start: i64,
    pub resources: Vec<ResourceId>,
}

impl ActivityData for ActivityView {
    fn id(&self) -> ActivityId {
        self.id
    }

    fn duration(&self) -> i64 {
        self.duration
    }

    fn prerequisites(&self) -> Vec<ActivityId> {
        self.prerequisites.clone()
    }
}

impl ActivityTimes for ActivityView {
    fn earliest_start(&self) -> i64 {
        self.earliest_start
    }

    fn latest_start(&self) -> i64 {
        self.latest_start
    }

    fn edge_properties(&self) -> EdgeProperties {
        EdgeProperties::new(self.id.to_string(), self.duration)
    }
}

/// A simplified, labeled network with per-edge float.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowDiagram {
    pub network: Network,
    pub floats: BTreeMap<EdgeId, i64>,
}

/// [`ProjectData`] over a project's active plan.
#[derive(Debug, Clone)]
pub struct ProjectView<'a> {
    project: &'a Project,
    state: PlanningState,
    activities: Vec<ActivityView>,
}

impl<'a> ProjectView<'a> {
    /// Snapshots the project's current state.
    pub fn new(project: &'a Project) -> Result<Self> {
        let state = PlanningState::derive(project)?;
        let mut graph = state.graph().clone();
        let times = Self::wait_on_saturation(project, &state, &mut graph)?;

        let plan = project.active_plan();
        let activities = project
            .activities()
            .iter()
            .map(|a| -> Result<ActivityView> {
                Ok(ActivityView {
                    id: a.id,
                    description: a.description.clone(),
                    duration: a.duration,
                    prerequisites: graph.prerequisites(a.id)?.iter().copied().collect(),
                    earliest_start: times.earliest_start(a.id)?,
                    latest_start: times.latest_start(a.id)?,
                    resources: plan.resources_for(a.id).cloned().collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            project,
            state,
            activities,
        })
    }

    /// Orders each unassigned typed activity after the activity ending the
    /// saturation window its earliest start falls in (window ends inclusive).
    fn wait_on_saturation(
        project: &Project,
        state: &PlanningState,
        graph: &mut PrecedenceGraph,
    ) -> Result<CriticalPath> {
        let anchor = project.float_anchor();
        let plan = project.active_plan();
        let mut times = state.times().clone();

        let unassigned: BTreeSet<ActivityId> = project.unassigned_activities().into_iter().collect();
        for resource_type in plan.resource_types.keys() {
            let windows = state.saturation_windows(plan, resource_type)?;
            if windows.is_empty() {
                continue;
            }
            let waiting = project
                .activities()
                .iter()
                .filter(|a| unassigned.contains(&a.id))
                .filter(|a| project.resource_type_of(a.id) == Some(resource_type.as_str()));
            for activity in waiting {
                let es = times.earliest_start(activity.id)?;
                let Some(window) = windows.span_at(es) else {
                    continue;
                };
                if graph.add_ordering_edge(window.end_activity, activity.id)? {
                    debug!(
                        activity = activity.id,
                        after = window.end_activity,
                        resource_type = %resource_type,
                        "waiting on saturated resource type"
                    );
                    times = CriticalPath::compute_with(graph, anchor)?;
                }
            }
        }
        Ok(times)
    }

    /// The scheduling state the view was taken from.
    pub fn state(&self) -> &PlanningState {
        &self.state
    }

    /// Looks up one activity snapshot.
    pub fn activity(&self, id: ActivityId) -> Option<&ActivityView> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Builds, simplifies and labels the arrow diagram and overlays float.
    pub fn arrow_diagram(&self) -> Result<ArrowDiagram> {
        let mut network = NetworkBuilder::new().build_with(&self.activities, |a| a.edge_properties())?;
        let stats = network.simplify()?;
        label_nodes(&mut network)?;
        let floats = FloatCalculator::new(&network)?.edge_floats()?;

        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            dummies = network.dummy_count(),
            rounds = stats.rounds,
            "arrow diagram ready"
        );
        Ok(ArrowDiagram { network, floats })
    }
}

impl ProjectData for ProjectView<'_> {
    type Activity = ActivityView;

    fn activities(&self) -> &[ActivityView] {
        &self.activities
    }

    fn resource_type_occupied_spans(&self, resource_type: &str) -> Result<SpanSet<ActivityId>> {
        self.state
            .saturation_windows(self.project.active_plan(), resource_type)
    }
}

impl Project {
    /// Read-only view for renderers.
    pub fn view(&self) -> Result<ProjectView<'_>> {
        ProjectView::new(self)
    }

    /// Simplified, labeled arrow diagram of the active plan.
    pub fn arrow_diagram(&self) -> Result<ArrowDiagram> {
        self.view()?.arrow_diagram()
    }
}
