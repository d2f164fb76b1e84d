//! Critical path calculation over the current precedence relation.
//!
//! The precedence relation is a function of the explicit prerequisites and
//! of the active plan's assignments: activities sharing a resource are
//! chained in earliest-start order. [`PlanningState`] derives the relation
//! and its time table together and is refreshed after every assignment.
//!
//! # Usage
//!
//! ```
//! use u_project::models::{Activity, Project};
//!
//! let mut project = Project::new();
//! project.add_activity(Activity::new(1, "A", 5)).unwrap();
//! project.add_activity(Activity::new(2, "B", 10).with_prerequisite(1)).unwrap();
//!
//! let cp = project.critical_path().unwrap();
//! assert_eq!(cp.earliest_start(2).unwrap(), 5);
//! assert_eq!(cp.project_duration(), 15);
//! ```
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Moder, Phillips & Davis (1983), "Project Management with CPM, PERT and
//!   Precedence Diagramming"

mod critical_path;
mod precedence;

pub use critical_path::{CriticalPath, FloatAnchor};
pub use precedence::PrecedenceGraph;

use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{ConfigurationError, Result};
use crate::models::{ActivityId, Plan, Project, ResourceId, Span, SpanSet};

/// Precedence relation and time table for one state of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningState {
    graph: PrecedenceGraph,
    times: CriticalPath,
}

impl PlanningState {
    /// Derives the relation and times from the project's active plan.
    ///
    /// Explicit prerequisites come first. Then, for each assigned resource
    /// in sorted order, its activities are sorted by earliest start on the
    /// relation built so far (ties by definition order) and chained.
    /// Chain edges that would close a cycle are skipped.
    pub fn derive(project: &Project) -> Result<Self> {
        let anchor = project.float_anchor();
        let mut graph = PrecedenceGraph::from_activities(project.activities())?;
        let plan = project.active_plan();

        let resources: BTreeSet<&ResourceId> = plan.assignments.values().flatten().collect();
        for resource in resources {
            let times = CriticalPath::compute_with(&graph, anchor)?;
            let mut chain = plan
                .activities_for(resource)
                .into_iter()
                .map(|a| -> Result<(i64, usize, ActivityId)> {
                    Ok((times.earliest_start(a)?, project.position(a)?, a))
                })
                .collect::<Result<Vec<_>>>()?;
            chain.sort_unstable();

            for pair in chain.windows(2) {
                let (from, to) = (pair[0].2, pair[1].2);
                if graph.add_ordering_edge(from, to)? {
                    debug!(resource = %resource, from, to, "resource ordering edge");
                }
            }
        }

        let times = CriticalPath::compute_with(&graph, anchor)?;
        Ok(Self { graph, times })
    }

    /// Recomputes the state after the project changed.
    pub fn refresh(&mut self, project: &Project) -> Result<()> {
        *self = Self::derive(project)?;
        Ok(())
    }

    /// The precedence relation (explicit plus resource-induced).
    pub fn graph(&self) -> &PrecedenceGraph {
        &self.graph
    }

    /// The time table for the relation.
    pub fn times(&self) -> &CriticalPath {
        &self.times
    }

    /// Union of `[ES, EF)` over every activity assigned to the resource.
    pub fn occupied_spans(&self, plan: &Plan, resource: &str) -> Result<SpanSet<ActivityId>> {
        if !plan.has_resource(resource) {
            return Err(ConfigurationError::UnknownResource(resource.to_string()));
        }
        plan.activities_for(resource)
            .into_iter()
            .map(|a| -> Result<Span<ActivityId>> {
                Ok(Span::new(
                    self.times.earliest_start(a)?,
                    self.times.earliest_finish(a)?,
                    a,
                ))
            })
            .collect()
    }

    /// Windows during which every resource of the type is occupied.
    pub fn saturation_windows(&self, plan: &Plan, resource_type: &str) -> Result<SpanSet<ActivityId>> {
        let rt = plan
            .resource_type(resource_type)
            .ok_or_else(|| ConfigurationError::UnknownResourceType(resource_type.to_string()))?;
        let sets = rt
            .resources
            .iter()
            .map(|r| self.occupied_spans(plan, r))
            .collect::<Result<Vec<_>>>()?;
        Ok(SpanSet::intersect_all(sets))
    }
}

impl Project {
    /// Derives the current planning state from the active plan.
    pub fn planning_state(&self) -> Result<PlanningState> {
        PlanningState::derive(self)
    }

    /// Time table for the current precedence relation.
    pub fn critical_path(&self) -> Result<CriticalPath> {
        Ok(PlanningState::derive(self)?.times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, ResourceType};

    fn two_parallel() -> Project {
        let mut p = Project::new();
        p.add_activity(Activity::new(1, "A", 5)).unwrap();
        p.add_activity(Activity::new(2, "B", 3)).unwrap();
        p.add_activity(Activity::new(3, "C", 4).with_prerequisite(1))
            .unwrap();
        p.add_resource("Dev1");
        p.add_resource("Dev2");
        p.add_resource_type(ResourceType::new("Dev").with_resource("Dev1").with_resource("Dev2"))
            .unwrap();
        p
    }

    #[test]
    fn test_explicit_relation_only() {
        let p = two_parallel();
        let state = p.planning_state().unwrap();
        assert_eq!(state.graph().edge_count(), 1);
        assert_eq!(state.times().earliest_start(2).unwrap(), 0);
        assert_eq!(state.times().earliest_start(3).unwrap(), 5);
    }

    #[test]
    fn test_shared_resource_chains_activities() {
        let mut p = two_parallel();
        p.active_plan_mut().add_assignment(1, "Dev1");
        p.active_plan_mut().add_assignment(2, "Dev1");

        let state = p.planning_state().unwrap();
        // Both start at 0; definition order puts A before B.
        assert!(state.graph().prerequisites(2).unwrap().contains(&1));
        assert_eq!(state.times().earliest_start(2).unwrap(), 5);
        assert_eq!(state.times().earliest_finish(2).unwrap(), 8);

        let occupied = state.occupied_spans(p.active_plan(), "Dev1").unwrap();
        assert_eq!(occupied.spans(), &[Span::new(0, 8, 2)]);
    }

    #[test]
    fn test_chain_follows_earliest_start() {
        let mut p = two_parallel();
        // C starts at 5, B at 0: B is chained before C.
        p.active_plan_mut().add_assignment(3, "Dev2");
        p.active_plan_mut().add_assignment(2, "Dev2");

        let state = p.planning_state().unwrap();
        assert!(state.graph().prerequisites(3).unwrap().contains(&2));
        assert_eq!(state.times().earliest_start(3).unwrap(), 5);
    }

    #[test]
    fn test_saturation_windows() {
        let mut p = two_parallel();
        p.active_plan_mut().add_assignment(1, "Dev1");
        p.active_plan_mut().add_assignment(2, "Dev2");

        let state = p.planning_state().unwrap();
        let windows = state.saturation_windows(p.active_plan(), "Dev").unwrap();
        assert_eq!(windows.spans(), &[Span::new(0, 3, 2)]);

        assert_eq!(
            state.saturation_windows(p.active_plan(), "QA").unwrap_err(),
            ConfigurationError::UnknownResourceType("QA".into())
        );
        assert!(state.occupied_spans(p.active_plan(), "Nobody").is_err());
    }

    #[test]
    fn test_refresh_picks_up_changes() {
        let mut p = two_parallel();
        let mut state = p.planning_state().unwrap();
        p.set_duration(1, 7).unwrap();
        state.refresh(&p).unwrap();
        assert_eq!(state.times().earliest_start(3).unwrap(), 7);
        assert_eq!(p.critical_path().unwrap().project_duration(), 11);
    }
}
