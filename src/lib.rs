//! Project planning: critical path, greedy resource assignment and arrow
//! diagrams.
//!
//! A [`Project`](models::Project) holds activities with durations and
//! prerequisites, the resource type each activity needs, and one or more
//! plans of resources and assignments. From that the crate derives:
//!
//! 1. the precedence relation (explicit prerequisites plus one chain per
//!    assigned resource),
//! 2. earliest/latest start times and total float over that relation,
//! 3. a greedy assignment of typed resources, most urgent activity first,
//! 4. an activity-on-arrow network, simplified to few dummies and labeled
//!    for rendering.
//!
//! # Modules
//!
//! - **`models`**: `Activity`, `ResourceType`, `Plan`, `Project`, `SpanSet`
//! - **`calculation`**: precedence relation, critical path, planning state
//! - **`assignment`**: manual and greedy resource assignment
//! - **`network`**: arrow network construction, simplification, labels, float
//! - **`render`**: read-only views for diagram renderers
//! - **`config`**: JSON project definitions
//! - **`validation`**: collect-all checks on project definitions
//! - **`error`**: the `ConfigurationError` taxonomy
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Fulkerson (1962), "Expected Critical Path Lengths in PERT Networks"
//! - Moder, Phillips & Davis (1983), "Project Management with CPM, PERT and
//!   Precedence Diagramming"

pub mod assignment;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod render;
pub mod validation;

pub use error::{ConfigurationError, Result};
