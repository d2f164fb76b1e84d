//! Activity-on-arrow networks.
//!
//! Activities become edges between event nodes; dummy edges (no activity)
//! carry pure ordering. Nodes and edges live in an arena keyed by stable
//! integer ids. Adjacency is kept alongside and rebuilt after merges.
//!
//! # Pipeline
//!
//! 1. [`NetworkBuilder`] gives every activity a private node pair and wires
//!    prerequisites with dummies.
//! 2. [`Network::simplify`] removes and collapses dummies until a fixpoint.
//! 3. [`label_nodes`] names the nodes `Start`, `A`, `B`, …, `End`.
//! 4. [`FloatCalculator`] overlays per-edge float for rendering.
//!
//! # Reference
//! Fondahl (1961), "A Non-Computer Approach to the Critical Path Method for
//! the Construction Industry"

mod builder;
mod float;
mod label;
mod simplify;

pub use builder::NetworkBuilder;
pub use float::FloatCalculator;
pub use label::{label_nodes, node_label, LabelSequence, END_LABEL, START_LABEL};
pub use simplify::SimplifyStats;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{ConfigurationError, Result};
use crate::models::ActivityId;

/// Node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// An event in the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
}

/// Activity carried by a real edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEdge {
    /// Activity performed along the edge.
    pub activity: ActivityId,
    /// Display label.
    pub label: String,
    /// Edge duration.
    pub duration: i64,
}

/// A directed edge; `activity: None` marks a dummy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    pub activity: Option<ActivityEdge>,
}

impl Edge {
    /// Whether the edge carries no activity.
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.activity.is_none()
    }

    /// Duration of the edge (zero for dummies).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.activity.as_ref().map_or(0, |a| a.duration)
    }
}

/// Arena of nodes and edges with adjacency indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeId, Edge>,
    outgoing: BTreeMap<NodeId, BTreeSet<EdgeId>>,
    incoming: BTreeMap<NodeId, BTreeSet<EdgeId>>,
    next_node: u64,
    next_edge: u64,
}

impl Network {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                label: label.into(),
            },
        );
        self.outgoing.insert(id, BTreeSet::new());
        self.incoming.insert(id, BTreeSet::new());
        id
    }

    /// Adds an edge between two existing nodes.
    pub fn add_edge(&mut self, start: NodeId, end: NodeId, activity: Option<ActivityEdge>) -> Result<EdgeId> {
        self.ensure_node(start)?;
        self.ensure_node(end)?;

        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.insert(
            id,
            Edge {
                id,
                start,
                end,
                activity,
            },
        );
        self.outgoing.entry(start).or_default().insert(id);
        self.incoming.entry(end).or_default().insert(id);
        Ok(id)
    }

    /// Adds a dummy edge.
    pub fn add_dummy(&mut self, start: NodeId, end: NodeId) -> Result<EdgeId> {
        self.add_edge(start, end, None)
    }

    /// Removes an edge.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge> {
        let edge = self
            .edges
            .remove(&id)
            .ok_or(ConfigurationError::UnknownEdge(id))?;
        if let Some(out) = self.outgoing.get_mut(&edge.start) {
            out.remove(&id);
        }
        if let Some(inc) = self.incoming.get_mut(&edge.end) {
            inc.remove(&id);
        }
        Ok(edge)
    }

    fn ensure_node(&self, id: NodeId) -> Result<()> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownNode(id))
        }
    }

    /// Looks up a node.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(ConfigurationError::UnknownNode(id))
    }

    /// Replaces a node's label.
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(ConfigurationError::UnknownNode(id))?;
        node.label = label.into();
        Ok(())
    }

    /// Looks up an edge.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge> {
        self.edges.get(&id).ok_or(ConfigurationError::UnknownEdge(id))
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges in id order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of dummy edges.
    pub fn dummy_count(&self) -> usize {
        self.edges.values().filter(|e| e.is_dummy()).count()
    }

    /// The edge carrying an activity, if present.
    pub fn activity_edge(&self, activity: ActivityId) -> Option<&Edge> {
        self.edges
            .values()
            .find(|e| e.activity.as_ref().is_some_and(|a| a.activity == activity))
    }

    fn out_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.outgoing
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id))
    }

    fn in_edges(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.incoming
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id))
    }

    /// Edges leaving a node.
    pub fn outgoing(&self, node: NodeId) -> Result<Vec<&Edge>> {
        self.ensure_node(node)?;
        Ok(self.out_edges(node).collect())
    }

    /// Edges entering a node.
    pub fn incoming(&self, node: NodeId) -> Result<Vec<&Edge>> {
        self.ensure_node(node)?;
        Ok(self.in_edges(node).collect())
    }

    /// Nodes adjacent to `node` in either direction, excluding itself.
    pub fn neighbors(&self, node: NodeId) -> Result<BTreeSet<NodeId>> {
        self.ensure_node(node)?;
        Ok(self
            .out_edges(node)
            .map(|e| e.end)
            .chain(self.in_edges(node).map(|e| e.start))
            .filter(|&n| n != node)
            .collect())
    }

    /// Nodes without incoming edges.
    pub fn start_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .keys()
            .copied()
            .filter(|n| self.incoming.get(n).map_or(true, BTreeSet::is_empty))
            .collect()
    }

    /// Nodes without outgoing edges.
    pub fn end_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .keys()
            .copied()
            .filter(|n| self.outgoing.get(n).map_or(true, BTreeSet::is_empty))
            .collect()
    }

    /// The unique node without incoming edges.
    pub fn start_node(&self) -> Result<NodeId> {
        match self.start_nodes().as_slice() {
            [] => Err(ConfigurationError::NoStartNode),
            [single] => Ok(*single),
            many => Err(ConfigurationError::MultipleStartNodes(many.to_vec())),
        }
    }

    /// The unique node without outgoing edges.
    pub fn end_node(&self) -> Result<NodeId> {
        match self.end_nodes().as_slice() {
            [] => Err(ConfigurationError::NoEndNode),
            [single] => Ok(*single),
            many => Err(ConfigurationError::MultipleEndNodes(many.to_vec())),
        }
    }

    /// Whether `to` can be reached from `from`.
    pub fn reaches(&self, from: NodeId, to: NodeId) -> Result<bool> {
        self.search(from, to, None)
    }

    /// Whether `to` can be reached from `from` without using `skip`.
    pub fn reaches_without(&self, from: NodeId, to: NodeId, skip: EdgeId) -> Result<bool> {
        self.search(from, to, Some(skip))
    }

    fn search(&self, from: NodeId, to: NodeId, skip: Option<EdgeId>) -> Result<bool> {
        self.ensure_node(from)?;
        self.ensure_node(to)?;

        let mut seen = BTreeSet::from([from]);
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if node == to {
                return Ok(true);
            }
            for edge in self.out_edges(node) {
                if Some(edge.id) != skip && seen.insert(edge.end) {
                    stack.push(edge.end);
                }
            }
        }
        Ok(false)
    }

    /// Every node from which `node` can be reached, excluding itself.
    pub fn ancestors(&self, node: NodeId) -> Result<BTreeSet<NodeId>> {
        self.ensure_node(node)?;
        let mut seen = BTreeSet::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            for edge in self.in_edges(n) {
                if seen.insert(edge.start) {
                    stack.push(edge.start);
                }
            }
        }
        seen.remove(&node);
        Ok(seen)
    }

    /// Activities that must finish before the event `node` occurs.
    ///
    /// These are the activities on any path leading into the node.
    pub fn prerequisite_activities(&self, node: NodeId) -> Result<BTreeSet<ActivityId>> {
        let mut upstream = self.ancestors(node)?;
        upstream.insert(node);
        Ok(upstream
            .into_iter()
            .flat_map(|n| self.in_edges(n))
            .filter_map(|e| e.activity.as_ref().map(|a| a.activity))
            .collect())
    }

    /// Nodes ordered so that every edge points forward; ties by node id.
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        let mut remaining: BTreeMap<NodeId, usize> = self
            .nodes
            .keys()
            .map(|&n| (n, self.in_edges(n).count()))
            .collect();
        let mut ready: BTreeSet<NodeId> = remaining
            .iter()
            .filter(|&(_, &d)| d == 0)
            .map(|(&n, _)| n)
            .collect();

        let mut sorted = Vec::with_capacity(self.nodes.len());
        while let Some(node) = ready.pop_first() {
            sorted.push(node);
            for edge in self.out_edges(node) {
                if let Some(d) = remaining.get_mut(&edge.end) {
                    *d -= 1;
                    if *d == 0 {
                        ready.insert(edge.end);
                    }
                }
            }
        }

        if sorted.len() < self.nodes.len() {
            let stuck = remaining
                .iter()
                .find(|&(_, &d)| d > 0)
                .map(|(&n, _)| n)
                .unwrap_or(NodeId(0));
            return Err(ConfigurationError::CyclicNetwork(stuck));
        }
        Ok(sorted)
    }

    /// Every simple directed path from `from` to `to`, as edge-id lists.
    ///
    /// Exhaustive; meant for diagnostics on small networks.
    pub fn distinct_paths(&self, from: NodeId, to: NodeId) -> Result<Vec<Vec<EdgeId>>> {
        self.ensure_node(from)?;
        self.ensure_node(to)?;

        let mut paths = Vec::new();
        if from != to {
            let mut on_path = BTreeSet::from([from]);
            self.collect_paths(from, to, &mut Vec::new(), &mut on_path, &mut paths);
        }
        Ok(paths)
    }

    fn collect_paths(
        &self,
        at: NodeId,
        to: NodeId,
        path: &mut Vec<EdgeId>,
        on_path: &mut BTreeSet<NodeId>,
        paths: &mut Vec<Vec<EdgeId>>,
    ) {
        for edge in self.out_edges(at) {
            if on_path.contains(&edge.end) {
                continue;
            }
            path.push(edge.id);
            if edge.end == to {
                paths.push(path.clone());
            } else {
                on_path.insert(edge.end);
                self.collect_paths(edge.end, to, path, on_path, paths);
                on_path.remove(&edge.end);
            }
            path.pop();
        }
    }

    /// Merges `node` into `target`.
    ///
    /// Edges are redirected; dummy self-loops disappear and parallel dummies
    /// are dropped (in favor of a parallel activity edge, else the lowest
    /// id). Fails without changes if an activity edge would become a loop.
    pub fn merge_nodes(&mut self, node: NodeId, target: NodeId) -> Result<()> {
        self.ensure_node(node)?;
        self.ensure_node(target)?;
        if node == target {
            return Ok(());
        }

        let redirect = |n: NodeId| if n == node { target } else { n };
        let touching: BTreeSet<EdgeId> = self
            .out_edges(node)
            .chain(self.in_edges(node))
            .map(|e| e.id)
            .collect();

        for edge in touching.iter().filter_map(|id| self.edges.get(id)) {
            if let Some(activity) = &edge.activity {
                if redirect(edge.start) == redirect(edge.end) {
                    return Err(ConfigurationError::CollapseActivityEdge {
                        edge: edge.id,
                        activity: activity.activity,
                    });
                }
            }
        }

        for id in touching {
            let Some(edge) = self.edges.get_mut(&id) else {
                continue;
            };
            edge.start = redirect(edge.start);
            edge.end = redirect(edge.end);
            if edge.start == edge.end {
                self.edges.remove(&id);
            }
        }

        self.nodes.remove(&node);
        self.drop_parallel_dummies();
        self.reindex();
        Ok(())
    }

    /// Collapses a dummy edge by merging its start node into its end node.
    pub fn collapse_edge(&mut self, id: EdgeId) -> Result<()> {
        let edge = self.edge(id)?;
        if let Some(activity) = &edge.activity {
            return Err(ConfigurationError::CollapseActivityEdge {
                edge: id,
                activity: activity.activity,
            });
        }
        let (start, end) = (edge.start, edge.end);
        self.merge_nodes(start, end)
    }

    fn drop_parallel_dummies(&mut self) {
        let mut groups: BTreeMap<(NodeId, NodeId), Vec<&Edge>> = BTreeMap::new();
        for edge in self.edges.values() {
            groups.entry((edge.start, edge.end)).or_default().push(edge);
        }

        let mut redundant = Vec::new();
        for group in groups.into_values().filter(|g| g.len() > 1) {
            let keep_dummy = group.iter().all(|e| e.is_dummy());
            let mut dummies = group.into_iter().filter(|e| e.is_dummy()).map(|e| e.id);
            if keep_dummy {
                dummies.next();
            }
            redundant.extend(dummies);
        }

        for id in redundant {
            self.edges.remove(&id);
        }
    }

    fn reindex(&mut self) {
        self.outgoing = self.nodes.keys().map(|&n| (n, BTreeSet::new())).collect();
        self.incoming = self.nodes.keys().map(|&n| (n, BTreeSet::new())).collect();
        for edge in self.edges.values() {
            self.outgoing.entry(edge.start).or_default().insert(edge.id);
            self.incoming.entry(edge.end).or_default().insert(edge.id);
        }
    }
}
