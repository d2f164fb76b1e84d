//! Configuration error taxonomy.
//!
//! Every structural problem in a project definition or a working network is
//! reported as a [`ConfigurationError`]. These errors are fatal: the
//! operation that raised them is aborted and its partial results discarded.
//!
//! Resource saturation is deliberately absent from this list. An activity
//! whose resource type has no free candidate simply stays unassigned.

use thiserror::Error;

use crate::models::ActivityId;
use crate::network::{EdgeId, NodeId};

/// Fatal, non-retryable configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("duplicate activity id: {0}")]
    DuplicateActivity(ActivityId),

    #[error("unknown activity: {0}")]
    UnknownActivity(ActivityId),

    #[error("activity {activity} references unknown prerequisite {prerequisite}")]
    UnknownPrerequisite {
        activity: ActivityId,
        prerequisite: ActivityId,
    },

    #[error("activity {activity} has negative duration {duration}")]
    NegativeDuration { activity: ActivityId, duration: i64 },

    #[error("precedence relation contains a cycle through activity {0}")]
    CyclicPrecedence(ActivityId),

    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("unknown plan: {0}")]
    UnknownPlan(String),

    #[error("network does not contain node {0}")]
    UnknownNode(NodeId),

    #[error("network does not contain edge {0}")]
    UnknownEdge(EdgeId),

    #[error("could not find a starting node for the network")]
    NoStartNode,

    #[error("multiple start nodes found: {0:?}")]
    MultipleStartNodes(Vec<NodeId>),

    #[error("could not find an ending node for the network")]
    NoEndNode,

    #[error("multiple end nodes found: {0:?}")]
    MultipleEndNodes(Vec<NodeId>),

    #[error("cannot collapse edge {edge}: it carries activity {activity}")]
    CollapseActivityEdge { edge: EdgeId, activity: ActivityId },

    #[error("network contains a cycle through node {0}")]
    CyclicNetwork(NodeId),

    #[error("invalid project definition: {0}")]
    InvalidDefinition(String),
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(err: serde_json::Error) -> Self {
        ConfigurationError::InvalidDefinition(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_identifiers() {
        let err = ConfigurationError::UnknownPrerequisite {
            activity: 7,
            prerequisite: 3,
        };
        assert_eq!(err.to_string(), "activity 7 references unknown prerequisite 3");

        let err = ConfigurationError::UnknownResource("Dev9".into());
        assert!(err.to_string().contains("Dev9"));

        let err = ConfigurationError::MultipleStartNodes(vec![NodeId(1), NodeId(4)]);
        assert_eq!(
            err.to_string(),
            "multiple start nodes found: [NodeId(1), NodeId(4)]"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let err: ConfigurationError = parse.unwrap_err().into();
        assert!(matches!(err, ConfigurationError::InvalidDefinition(_)));
    }
}
