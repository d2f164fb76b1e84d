//! Critical path time table.
//!
//! Computes earliest/latest start and finish and total float for every
//! activity in a [`PrecedenceGraph`]. The table is the memo: it is computed
//! once per relation and queried afterwards. Whenever the relation gains an
//! edge a new table must be computed.
//!
//! # Recurrences
//! - `ES(a) = max over prerequisites p of ES(p) + d(p)`, else 0
//! - `EF(a) = ES(a) + d(a)`
//! - `LS(a) = min over successors s of ES(s) − d(a)`, else `ES(a)`
//!   ([`FloatAnchor::ActivityFinish`]), or the classic backward pass
//!   against the project horizon ([`FloatAnchor::ProjectFinish`])
//! - `TF(a) = LS(a) − ES(a)`
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PrecedenceGraph;
use crate::error::{ConfigurationError, Result};
use crate::models::ActivityId;

/// How latest start times are anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatAnchor {
    /// Latest start derives from the earliest start of direct successors;
    /// activities without successors have zero float.
    #[default]
    ActivityFinish,
    /// Latest start derives from the latest start of direct successors;
    /// activities without successors finish at the project horizon.
    ProjectFinish,
}

/// Per-activity time bounds for one precedence relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPath {
    order: Vec<ActivityId>,
    durations: BTreeMap<ActivityId, i64>,
    earliest_start: BTreeMap<ActivityId, i64>,
    latest_start: BTreeMap<ActivityId, i64>,
    horizon: i64,
    anchor: FloatAnchor,
}

impl CriticalPath {
    /// Computes the table with the default anchor.
    pub fn compute(graph: &PrecedenceGraph) -> Result<Self> {
        Self::compute_with(graph, FloatAnchor::default())
    }

    /// Computes the table with an explicit anchor.
    pub fn compute_with(graph: &PrecedenceGraph, anchor: FloatAnchor) -> Result<Self> {
        let topo = graph.topological_order()?;

        let mut durations = BTreeMap::new();
        let mut earliest_start: BTreeMap<ActivityId, i64> = BTreeMap::new();
        for &a in &topo {
            let mut es = 0;
            for p in graph.prerequisites(a)? {
                let finish = earliest_start[p] + graph.duration(*p)?;
                es = es.max(finish);
            }
            earliest_start.insert(a, es);
            durations.insert(a, graph.duration(a)?);
        }

        let horizon = earliest_start
            .iter()
            .map(|(a, es)| es + durations[a])
            .max()
            .unwrap_or(0);

        let mut latest_start: BTreeMap<ActivityId, i64> = BTreeMap::new();
        for &a in topo.iter().rev() {
            let duration = durations[&a];
            let successors = graph.successors(a)?;
            let ls = match anchor {
                FloatAnchor::ActivityFinish => successors
                    .iter()
                    .map(|s| earliest_start[s] - duration)
                    .min()
                    .unwrap_or(earliest_start[&a]),
                FloatAnchor::ProjectFinish => successors
                    .iter()
                    .map(|s| latest_start[s] - duration)
                    .min()
                    .unwrap_or(horizon - duration),
            };
            latest_start.insert(a, ls);
        }

        Ok(Self {
            order: graph.activities().to_vec(),
            durations,
            earliest_start,
            latest_start,
            horizon,
            anchor,
        })
    }

    fn lookup(map: &BTreeMap<ActivityId, i64>, id: ActivityId) -> Result<i64> {
        map.get(&id)
            .copied()
            .ok_or(ConfigurationError::UnknownActivity(id))
    }

    /// The anchor used for latest start times.
    pub fn anchor(&self) -> FloatAnchor {
        self.anchor
    }

    /// Earliest start time.
    pub fn earliest_start(&self, id: ActivityId) -> Result<i64> {
        Self::lookup(&self.earliest_start, id)
    }

    /// Earliest finish time.
    pub fn earliest_finish(&self, id: ActivityId) -> Result<i64> {
        Ok(self.earliest_start(id)? + Self::lookup(&self.durations, id)?)
    }

    /// Latest start time.
    pub fn latest_start(&self, id: ActivityId) -> Result<i64> {
        Self::lookup(&self.latest_start, id)
    }

    /// Latest finish time.
    pub fn latest_finish(&self, id: ActivityId) -> Result<i64> {
        Ok(self.latest_start(id)? + Self::lookup(&self.durations, id)?)
    }

    /// Total float (slack).
    pub fn total_float(&self, id: ActivityId) -> Result<i64> {
        Ok(self.latest_start(id)? - self.earliest_start(id)?)
    }

    /// Project duration: latest earliest-finish over all activities.
    pub fn project_duration(&self) -> i64 {
        self.horizon
    }

    /// Activities with zero total float, in insertion order.
    pub fn critical_activities(&self) -> Vec<ActivityId> {
        self.order
            .iter()
            .copied()
            .filter(|&a| self.latest_start.get(&a) == self.earliest_start.get(&a))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;

    fn abc() -> PrecedenceGraph {
        PrecedenceGraph::from_activities(vec![
            Activity::new(1, "A", 5),
            Activity::new(2, "B", 10).with_prerequisite(1),
            Activity::new(3, "C", 3).with_prerequisite(1),
        ])
        .unwrap()
    }

    #[test]
    fn test_forward_pass() {
        let cp = CriticalPath::compute(&abc()).unwrap();
        assert_eq!(cp.earliest_start(1).unwrap(), 0);
        assert_eq!(cp.earliest_finish(1).unwrap(), 5);
        assert_eq!(cp.earliest_start(2).unwrap(), 5);
        assert_eq!(cp.earliest_finish(2).unwrap(), 15);
        assert_eq!(cp.earliest_start(3).unwrap(), 5);
        assert_eq!(cp.earliest_finish(3).unwrap(), 8);
        assert_eq!(cp.project_duration(), 15);
    }

    #[test]
    fn test_activity_finish_anchor() {
        let cp = CriticalPath::compute(&abc()).unwrap();
        assert_eq!(cp.anchor(), FloatAnchor::ActivityFinish);
        // Terminal activities anchor to their own finish.
        assert_eq!(cp.total_float(2).unwrap(), 0);
        assert_eq!(cp.total_float(3).unwrap(), 0);
        // A: min(ES(B), ES(C)) - 5 = 0.
        assert_eq!(cp.latest_start(1).unwrap(), 0);
    }

    #[test]
    fn test_project_finish_anchor() {
        let cp = CriticalPath::compute_with(&abc(), FloatAnchor::ProjectFinish).unwrap();
        assert_eq!(cp.total_float(2).unwrap(), 0);
        assert_eq!(cp.latest_start(3).unwrap(), 12);
        assert_eq!(cp.total_float(3).unwrap(), 7);
        assert_eq!(cp.latest_finish(3).unwrap(), 15);
        assert_eq!(cp.critical_activities(), vec![1, 2]);
    }

    #[test]
    fn test_free_float_from_successor_start() {
        // C (3) feeds D alongside B (10): C may slip until D's earliest start.
        let g = PrecedenceGraph::from_activities(vec![
            Activity::new(1, "A", 5),
            Activity::new(2, "B", 10).with_prerequisite(1),
            Activity::new(3, "C", 3).with_prerequisite(1),
            Activity::new(4, "D", 1).with_prerequisites([2, 3]),
        ])
        .unwrap();
        let cp = CriticalPath::compute(&g).unwrap();
        assert_eq!(cp.earliest_start(4).unwrap(), 15);
        assert_eq!(cp.latest_start(3).unwrap(), 12);
        assert_eq!(cp.total_float(3).unwrap(), 7);
        assert_eq!(cp.critical_activities(), vec![1, 2, 4]);
    }

    #[test]
    fn test_unknown_activity_lookup() {
        let cp = CriticalPath::compute(&abc()).unwrap();
        assert_eq!(
            cp.total_float(42).unwrap_err(),
            ConfigurationError::UnknownActivity(42)
        );
    }

    #[test]
    fn test_empty_relation() {
        let cp = CriticalPath::compute(&PrecedenceGraph::new()).unwrap();
        assert_eq!(cp.project_duration(), 0);
        assert!(cp.critical_activities().is_empty());
    }

    #[test]
    fn test_invariants_hold_on_wide_graph() {
        let mut activities = vec![Activity::new(1, "root", 2)];
        for id in 2..20u64 {
            activities.push(
                Activity::new(id, format!("a{id}"), (id % 7) as i64)
                    .with_prerequisites([id / 2, (id + 1) / 3].into_iter().filter(|&p| p >= 1 && p < id)),
            );
        }
        let g = PrecedenceGraph::from_activities(activities).unwrap();
        for anchor in [FloatAnchor::ActivityFinish, FloatAnchor::ProjectFinish] {
            let cp = CriticalPath::compute_with(&g, anchor).unwrap();
            for &a in g.activities() {
                let es = cp.earliest_start(a).unwrap();
                assert_eq!(cp.earliest_finish(a).unwrap(), es + g.duration(a).unwrap());
                assert!(cp.latest_start(a).unwrap() >= es);
                if anchor == FloatAnchor::ActivityFinish && g.successors(a).unwrap().is_empty() {
                    assert_eq!(cp.total_float(a).unwrap(), 0);
                }
            }
        }
    }
}
