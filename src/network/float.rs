//! Per-edge float on a (simplified) network.
//!
//! Uses the activity recurrences indexed by node instead of by activity,
//! since after simplification dummies no longer map one-to-one onto
//! activity relations:
//! - `ES(n) = max over incoming e of ES(start(e)) + d(e)`, else 0
//! - `LS(n) = min over outgoing e of LS(end(e)) − d(e)`, else `ES(n)`
//! - `float(e) = LS(end(e)) − (ES(start(e)) + d(e))`

use std::collections::BTreeMap;

use super::{EdgeId, Network, NodeId};
use crate::error::{ConfigurationError, Result};

/// Node times and edge float for one network.
#[derive(Debug, Clone)]
pub struct FloatCalculator<'a> {
    network: &'a Network,
    earliest: BTreeMap<NodeId, i64>,
    latest: BTreeMap<NodeId, i64>,
}

impl<'a> FloatCalculator<'a> {
    /// Computes node times; fails on a cyclic network.
    pub fn new(network: &'a Network) -> Result<Self> {
        let order = network.topological_order()?;

        let mut earliest = BTreeMap::new();
        for &node in &order {
            let es = network
                .incoming(node)?
                .iter()
                .filter_map(|e| earliest.get(&e.start).map(|s| s + e.duration()))
                .max()
                .unwrap_or(0);
            earliest.insert(node, es);
        }

        let mut latest = BTreeMap::new();
        for &node in order.iter().rev() {
            let fallback = earliest.get(&node).copied().unwrap_or(0);
            let ls = network
                .outgoing(node)?
                .iter()
                .filter_map(|e| latest.get(&e.end).map(|l| l - e.duration()))
                .min()
                .unwrap_or(fallback);
            latest.insert(node, ls);
        }

        Ok(Self {
            network,
            earliest,
            latest,
        })
    }

    /// Earliest time the event can occur.
    pub fn earliest_start(&self, node: NodeId) -> Result<i64> {
        self.earliest
            .get(&node)
            .copied()
            .ok_or(ConfigurationError::UnknownNode(node))
    }

    /// Latest time the event may occur without delaying its successors.
    pub fn latest_start(&self, node: NodeId) -> Result<i64> {
        self.latest
            .get(&node)
            .copied()
            .ok_or(ConfigurationError::UnknownNode(node))
    }

    /// Total float of an edge.
    pub fn total_float(&self, edge: EdgeId) -> Result<i64> {
        let e = self.network.edge(edge)?;
        Ok(self.latest_start(e.end)? - (self.earliest_start(e.start)? + e.duration()))
    }

    /// Float of every edge, by edge id.
    pub fn edge_floats(&self) -> Result<BTreeMap<EdgeId, i64>> {
        self.network
            .edges()
            .map(|e| -> Result<(EdgeId, i64)> { Ok((e.id, self.total_float(e.id)?)) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ActivityEdge;

    fn act(id: u64, duration: i64) -> Option<ActivityEdge> {
        Some(ActivityEdge {
            activity: id,
            label: id.to_string(),
            duration,
        })
    }

    #[test]
    fn test_edge_float() {
        // s -A5-> x -B10-> y -D2-> e, x -C3-> z ..> y
        let mut n = Network::new();
        let s = n.add_node("s");
        let x = n.add_node("x");
        let y = n.add_node("y");
        let z = n.add_node("z");
        let e = n.add_node("e");
        let a = n.add_edge(s, x, act(1, 5)).unwrap();
        let b = n.add_edge(x, y, act(2, 10)).unwrap();
        let c = n.add_edge(x, z, act(3, 3)).unwrap();
        let dummy = n.add_dummy(z, y).unwrap();
        let d = n.add_edge(y, e, act(4, 2)).unwrap();

        let calc = FloatCalculator::new(&n).unwrap();
        assert_eq!(calc.earliest_start(y).unwrap(), 15);
        assert_eq!(calc.earliest_start(e).unwrap(), 17);
        assert_eq!(calc.latest_start(e).unwrap(), 17);
        assert_eq!(calc.latest_start(z).unwrap(), 15);

        assert_eq!(calc.total_float(a).unwrap(), 0);
        assert_eq!(calc.total_float(b).unwrap(), 0);
        assert_eq!(calc.total_float(c).unwrap(), 7);
        assert_eq!(calc.total_float(dummy).unwrap(), 7);
        assert_eq!(calc.total_float(d).unwrap(), 0);

        let floats = calc.edge_floats().unwrap();
        assert_eq!(floats.len(), 5);
        assert_eq!(floats[&c], 7);
    }

    #[test]
    fn test_unknown_ids() {
        let mut n = Network::new();
        n.add_node("only");
        let calc = FloatCalculator::new(&n).unwrap();
        assert!(calc.earliest_start(NodeId(5)).is_err());
        assert!(calc.total_float(EdgeId(0)).is_err());
    }

    #[test]
    fn test_cycle_rejected() {
        let mut n = Network::new();
        let a = n.add_node("a");
        let b = n.add_node("b");
        n.add_dummy(a, b).unwrap();
        n.add_dummy(b, a).unwrap();
        assert!(FloatCalculator::new(&n).is_err());
    }
}
