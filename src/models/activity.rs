//! Activity model.
//!
//! An activity is the smallest plannable unit of work: it has a duration
//! and may depend on other activities finishing first. Activities are
//! identified by integer id; description and duration may change after
//! creation without affecting identity.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Activity identifier.
pub type ActivityId = u64;

/// Read-only structural view of an activity.
///
/// This is the capability the calculation engine and the network builder
/// consume: identity, duration and direct prerequisites. Implementors decide
/// which prerequisites are visible (explicit only, or explicit plus
/// resource-induced ordering).
pub trait ActivityData {
    /// Activity identifier.
    fn id(&self) -> ActivityId;
    /// Activity duration.
    fn duration(&self) -> i64;
    /// Direct prerequisites.
    fn prerequisites(&self) -> Vec<ActivityId>;
}

/// An activity to be planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier.
    pub id: ActivityId,
    /// Human-readable description.
    pub description: String,
    /// Time required to complete this activity.
    pub duration: i64,
    /// IDs of activities that must complete before this one starts.
    pub prerequisites: BTreeSet<ActivityId>,
}

impl Activity {
    /// Creates a new activity without prerequisites.
    pub fn new(id: ActivityId, description: impl Into<String>, duration: i64) -> Self {
        Self {
            id,
            description: description.into(),
            duration,
            prerequisites: BTreeSet::new(),
        }
    }

    /// Adds a prerequisite activity ID.
    pub fn with_prerequisite(mut self, prerequisite: ActivityId) -> Self {
        self.prerequisites.insert(prerequisite);
        self
    }

    /// Adds several prerequisite activity IDs.
    pub fn with_prerequisites(mut self, prerequisites: impl IntoIterator<Item = ActivityId>) -> Self {
        self.prerequisites.extend(prerequisites);
        self
    }

    /// Whether this activity has no prerequisites.
    pub fn is_root(&self) -> bool {
        self.prerequisites.is_empty()
    }
}

impl ActivityData for Activity {
    fn id(&self) -> ActivityId {
        self.id
    }

    fn duration(&self) -> i64 {
        self.duration
    }

    fn prerequisites(&self) -> Vec<ActivityId> {
        self.prerequisites.iter().copied().collect()
    }
}

impl<T: ActivityData + ?Sized> ActivityData for &T {
    fn id(&self) -> ActivityId {
        (**self).id()
    }

    fn duration(&self) -> i64 {
        (**self).duration()
    }

    fn prerequisites(&self) -> Vec<ActivityId> {
        (**self).prerequisites()
    }
}
