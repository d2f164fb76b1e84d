//! Dummy-edge reduction.
//!
//! Repeats four rewrites until none applies:
//!
//! 1. drop a dummy whose endpoints stay connected without it;
//! 2. merge nodes preceded by exactly the same set of activities;
//! 3. point dummy-only fan-outs with identical targets at one representative;
//! 4. collapse one dummy that neither forms a triangle nor adds prerequisites.
//!
//! Rewrite 4 only runs once the first three are exhausted, so the dummy it
//! collapses is never redundant and merging its endpoints cannot close a
//! cycle. Every rewrite keeps the activity precedence closure intact.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{EdgeId, Network, NodeId};
use crate::error::Result;
use crate::models::ActivityId;

/// Counters for one [`Network::simplify`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyStats {
    /// Dummies removed because another path already implied them.
    pub redundant_dummies: usize,
    /// Nodes merged into an equivalent node.
    pub merged_nodes: usize,
    /// Fan-out nodes rerouted through a sibling.
    pub folded_fan_outs: usize,
    /// Dummies collapsed by merging their endpoints.
    pub collapsed_dummies: usize,
    /// Rewrite rounds, including the final no-op round.
    pub rounds: usize,
}

impl Network {
    /// Reduces dummies to a fixpoint.
    ///
    /// Fails unless the result has exactly one start node and one end node.
    pub fn simplify(&mut self) -> Result<SimplifyStats> {
        let mut stats = SimplifyStats::default();
        loop {
            stats.rounds += 1;
            let removed = self.remove_redundant_dummies()?;
            let merged = self.merge_equivalent_nodes()?;
            let folded = self.fold_fan_out_siblings()?;
            let rewired = removed + merged + folded;
            let collapsed = rewired == 0 && self.collapse_one_dummy()?;

            stats.redundant_dummies += removed;
            stats.merged_nodes += merged;
            stats.folded_fan_outs += folded;
            stats.collapsed_dummies += usize::from(collapsed);
            debug!(round = stats.rounds, removed, merged, folded, collapsed, "simplification round");

            if rewired == 0 && !collapsed {
                break;
            }
        }

        self.start_node()?;
        self.end_node()?;
        Ok(stats)
    }

    fn dummy_ids(&self) -> Vec<EdgeId> {
        self.edges().filter(|e| e.is_dummy()).map(|e| e.id).collect()
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id).collect()
    }

    fn remove_redundant_dummies(&mut self) -> Result<usize> {
        let mut removed = 0;
        for id in self.dummy_ids() {
            let edge = self.edge(id)?;
            let (start, end) = (edge.start, edge.end);
            if self.reaches_without(start, end, id)? {
                self.remove_edge(id)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn merge_equivalent_nodes(&mut self) -> Result<usize> {
        let mut groups: BTreeMap<BTreeSet<ActivityId>, Vec<NodeId>> = BTreeMap::new();
        for node in self.node_ids() {
            groups
                .entry(self.prerequisite_activities(node)?)
                .or_default()
                .push(node);
        }

        // Merging equivalent nodes leaves every other node's prerequisite
        // set unchanged, so the groups stay valid while we merge.
        let mut merged = 0;
        for group in groups.into_values() {
            let mut members = group.into_iter();
            let Some(keep) = members.next() else {
                continue;
            };
            for other in members {
                self.merge_nodes(other, keep)?;
                merged += 1;
            }
        }
        Ok(merged)
    }

    fn fold_fan_out_siblings(&mut self) -> Result<usize> {
        let mut groups: BTreeMap<BTreeSet<NodeId>, Vec<NodeId>> = BTreeMap::new();
        for node in self.node_ids() {
            let exits = self.outgoing(node)?;
            if exits.len() >= 2 && exits.iter().all(|e| e.is_dummy()) {
                let targets = exits.iter().map(|e| e.end).collect();
                groups.entry(targets).or_default().push(node);
            }
        }

        let mut folded = 0;
        for group in groups.into_values() {
            let mut members = group.into_iter();
            let Some(representative) = members.next() else {
                continue;
            };
            for other in members {
                let exits: Vec<EdgeId> = self.outgoing(other)?.iter().map(|e| e.id).collect();
                for id in exits {
                    self.remove_edge(id)?;
                }
                self.add_dummy(other, representative)?;
                folded += 1;
            }
        }
        Ok(folded)
    }

    fn collapse_one_dummy(&mut self) -> Result<bool> {
        for id in self.dummy_ids() {
            if self.is_collapsible(id)? {
                debug!(edge = %id, "collapsing dummy");
                self.collapse_edge(id)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn is_collapsible(&self, id: EdgeId) -> Result<bool> {
        let edge = self.edge(id)?;
        let (start, end) = (edge.start, edge.end);

        // A third node adjacent to both endpoints would end up with
        // coinciding edges.
        let around_start = self.neighbors(start)?;
        let around_end = self.neighbors(end)?;
        if around_start.intersection(&around_end).next().is_some() {
            return Ok(false);
        }

        if self.outgoing(start)?.len() == 1 {
            return Ok(true);
        }
        Ok(self
            .prerequisite_activities(end)?
            .is_subset(&self.prerequisite_activities(start)?))
    }
}
