//! Network construction from activity data.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{ActivityEdge, Network, NodeId, END_LABEL, START_LABEL};
use crate::error::{ConfigurationError, Result};
use crate::models::{ActivityData, ActivityId};
use crate::render::EdgeProperties;

/// Builds an unsimplified activity-on-arrow network.
///
/// Every activity gets a private `(from, to)` node pair joined by its
/// activity edge. A dummy links each prerequisite's `to` node to the
/// dependent's `from` node. A synthetic start node feeds the activities
/// without prerequisites and the ones without successors feed a synthetic
/// end node.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkBuilder;

impl NetworkBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds with the activity id as edge label.
    pub fn build<A: ActivityData>(&self, activities: &[A]) -> Result<Network> {
        self.build_with(activities, |a| EdgeProperties::new(a.id().to_string(), a.duration()))
    }

    /// Builds with caller-supplied edge properties.
    ///
    /// An empty activity list gives an empty network.
    pub fn build_with<A, F>(&self, activities: &[A], properties: F) -> Result<Network>
    where
        A: ActivityData,
        F: Fn(&A) -> EdgeProperties,
    {
        let mut network = Network::new();
        if activities.is_empty() {
            return Ok(network);
        }

        let start = network.add_node(START_LABEL);
        let end = network.add_node(END_LABEL);

        // Prerequisites may appear after their dependents (resource ordering
        // does not follow definition order), so create every pair first.
        let mut pairs: BTreeMap<ActivityId, (NodeId, NodeId)> = BTreeMap::new();
        for activity in activities {
            let id = activity.id();
            if pairs.contains_key(&id) {
                return Err(ConfigurationError::DuplicateActivity(id));
            }
            let from = Self::add_event(&mut network)?;
            let to = Self::add_event(&mut network)?;
            let EdgeProperties { label, duration } = properties(activity);
            network.add_edge(
                from,
                to,
                Some(ActivityEdge {
                    activity: id,
                    label,
                    duration,
                }),
            )?;
            pairs.insert(id, (from, to));
        }

        let mut has_successor = BTreeSet::new();
        for activity in activities {
            let id = activity.id();
            let from = pairs[&id].0;
            let prerequisites: BTreeSet<ActivityId> = activity.prerequisites().into_iter().collect();
            if prerequisites.is_empty() {
                network.add_dummy(start, from)?;
            }
            for p in prerequisites {
                let &(_, done) = pairs
                    .get(&p)
                    .ok_or(ConfigurationError::UnknownPrerequisite {
                        activity: id,
                        prerequisite: p,
                    })?;
                network.add_dummy(done, from)?;
                has_successor.insert(p);
            }
        }

        for activity in activities {
            if !has_successor.contains(&activity.id()) {
                network.add_dummy(pairs[&activity.id()].1, end)?;
            }
        }

        debug!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "network built"
        );
        Ok(network)
    }

    fn add_event(network: &mut Network) -> Result<NodeId> {
        let id = network.add_node(String::new());
        network.set_label(id, id.to_string())?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;

    fn diamond() -> Vec<Activity> {
        vec![
            Activity::new(1, "A", 5),
            Activity::new(2, "B", 10).with_prerequisite(1),
            Activity::new(3, "C", 3).with_prerequisite(1),
            Activity::new(4, "D", 2).with_prerequisites([2, 3]),
        ]
    }

    #[test]
    fn test_one_pair_per_activity() {
        let n = NetworkBuilder::new().build(&diamond()).unwrap();
        assert_eq!(n.node_count(), 2 + 2 * 4);
        // 4 activities, 1 start dummy, 4 prerequisite dummies, 1 end dummy.
        assert_eq!(n.edge_count(), 10);
        assert_eq!(n.dummy_count(), 6);
        assert_eq!(n.start_node().unwrap(), NodeId(0));
        assert_eq!(n.end_node().unwrap(), NodeId(1));
        assert_eq!(n.node(NodeId(0)).unwrap().label, "Start");
        assert_eq!(n.node(NodeId(4)).unwrap().label, "N4");

        let b = n.activity_edge(2).unwrap();
        assert_eq!(b.duration(), 10);
        assert_eq!(b.activity.as_ref().map(|a| a.label.as_str()), Some("2"));
    }

    #[test]
    fn test_custom_edge_properties() {
        let activities = diamond();
        let n = NetworkBuilder::new()
            .build_with(&activities, |a| EdgeProperties::new(a.description.clone(), a.duration))
            .unwrap();
        let label = n.activity_edge(4).and_then(|e| e.activity.as_ref()).map(|a| a.label.clone());
        assert_eq!(label.as_deref(), Some("D"));
    }

    #[test]
    fn test_forward_prerequisites_are_wired() {
        // The dependent is listed before its prerequisite.
        let activities = vec![
            Activity::new(2, "B", 1).with_prerequisite(1),
            Activity::new(1, "A", 1),
        ];
        let n = NetworkBuilder::new().build(&activities).unwrap();
        let a = n.activity_edge(1).unwrap();
        let b = n.activity_edge(2).unwrap();
        assert!(n.reaches(a.end, b.start).unwrap());
        assert!(n.start_node().is_ok());
        assert!(n.end_node().is_ok());
    }

    #[test]
    fn test_errors() {
        let unknown = vec![Activity::new(1, "A", 1).with_prerequisite(9)];
        assert_eq!(
            NetworkBuilder::new().build(&unknown).unwrap_err(),
            ConfigurationError::UnknownPrerequisite {
                activity: 1,
                prerequisite: 9
            }
        );

        let duplicate = vec![Activity::new(1, "A", 1), Activity::new(1, "A", 1)];
        assert!(NetworkBuilder::new().build(&duplicate).is_err());

        let empty: Vec<Activity> = Vec::new();
        assert_eq!(NetworkBuilder::new().build(&empty).unwrap().node_count(), 0);
    }
}
