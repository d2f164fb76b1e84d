//! Project planning domain models.
//!
//! Provides the core data types for describing a project: activities with
//! durations and prerequisites, resources grouped into preference-ordered
//! types, plans holding assignments, and the span algebra used to reason
//! about resource occupancy.
//!
//! # Domain Mappings
//!
//! | u-project | Software | Construction | Events |
//! |-----------|----------|--------------|--------|
//! | Activity | Ticket | Work package | Session |
//! | Resource | Developer | Crew | Room |
//! | ResourceType | Role | Trade | Room size |
//! | Plan | Sprint staffing | Crew rota | Booking |

mod activity;
mod project;
mod resource;
pub mod span;

pub use activity::{Activity, ActivityData, ActivityId};
pub use project::{Project, DEFAULT_PLAN};
pub use resource::{Plan, ResourceId, ResourceType};
pub use span::{Span, SpanSet};
