//! Node labels for rendering.
//!
//! The start node is `Start`, the end node `End`. Every other node gets a
//! letter code in topological order: `A`…`Z`, `AA`, `AB`, … The letters
//! `I` and `O` are skipped so labels never read as digits.

use super::Network;
use crate::error::Result;

pub const START_LABEL: &str = "Start";
pub const END_LABEL: &str = "End";

const ALPHABET: [char; 24] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U',
    'V', 'W', 'X', 'Y', 'Z',
];

/// Label for the `index`-th node (zero-based), bijective base 24.
pub fn node_label(index: usize) -> String {
    let base = ALPHABET.len();
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(ALPHABET[n % base]);
        n /= base;
    }
    letters.iter().rev().collect()
}

/// Endless sequence `A`, `B`, …, `Z`, `AA`, …
#[derive(Debug, Clone, Default)]
pub struct LabelSequence {
    next: usize,
}

impl LabelSequence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for LabelSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let label = node_label(self.next);
        self.next += 1;
        Some(label)
    }
}

/// Labels every node of a network with a single start and end.
pub fn label_nodes(network: &mut Network) -> Result<()> {
    let start = network.start_node()?;
    let end = network.end_node()?;
    let order = network.topological_order()?;

    network.set_label(start, START_LABEL)?;
    network.set_label(end, END_LABEL)?;
    let inner = order.into_iter().filter(|&n| n != start && n != end);
    for (node, label) in inner.zip(LabelSequence::new()) {
        network.set_label(node, label)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;
    use crate::network::NetworkBuilder;

    #[test]
    fn test_label_sequence() {
        let labels: Vec<String> = LabelSequence::new().take(26).collect();
        assert_eq!(labels[0], "A");
        assert_eq!(labels[7], "H");
        assert_eq!(labels[8], "J");
        assert_eq!(labels[23], "Z");
        assert_eq!(labels[24], "AA");
        assert_eq!(labels[25], "AB");
        assert!(labels.iter().all(|l| !l.contains('I') && !l.contains('O')));
    }

    #[test]
    fn test_bijective_rollover() {
        assert_eq!(node_label(47), "AZ");
        assert_eq!(node_label(48), "BA");
        assert_eq!(node_label(24 + 24 * 24 - 1), "ZZ");
        assert_eq!(node_label(24 + 24 * 24), "AAA");
    }

    #[test]
    fn test_label_nodes_in_topological_order() {
        let mut n = NetworkBuilder::new()
            .build(&[
                Activity::new(1, "A", 1),
                Activity::new(2, "B", 1).with_prerequisite(1),
                Activity::new(3, "C", 1).with_prerequisite(2),
            ])
            .unwrap();
        n.simplify().unwrap();
        label_nodes(&mut n).unwrap();

        let a = n.activity_edge(1).unwrap();
        let c = n.activity_edge(3).unwrap();
        assert_eq!(n.node(a.start).unwrap().label, "Start");
        assert_eq!(n.node(a.end).unwrap().label, "A");
        assert_eq!(n.node(c.start).unwrap().label, "B");
        assert_eq!(n.node(c.end).unwrap().label, "End");
    }

    #[test]
    fn test_label_nodes_requires_single_start() {
        let mut n = crate::network::Network::new();
        n.add_node("a");
        n.add_node("b");
        assert!(label_nodes(&mut n).is_err());
    }
}
