//! Resource and plan models.
//!
//! Resources are opaque identifiers (people, rigs, rooms). A resource type
//! names a category and lists the resources eligible for it in preference
//! order. A plan holds the resources, the resource types and the growing
//! activity→resource assignment map.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::ActivityId;

/// Resource identifier.
pub type ResourceId = String;

/// A named category of interchangeable resources.
///
/// `resources` is ordered by preference: the first entry is the most
/// preferred candidate. Duplicates are dropped on insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    /// Type name (e.g., "Dev", "QA").
    pub name: String,
    /// Candidate resources, most preferred first.
    pub resources: Vec<ResourceId>,
}

impl ResourceType {
    /// Creates an empty resource type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
        }
    }

    /// Appends a candidate resource (ignored if already listed).
    pub fn with_resource(mut self, resource: impl Into<ResourceId>) -> Self {
        let resource = resource.into();
        if !self.resources.contains(&resource) {
            self.resources.push(resource);
        }
        self
    }

    /// Whether a resource belongs to this type.
    pub fn contains(&self, resource: &str) -> bool {
        self.resources.iter().any(|r| r == resource)
    }
}

/// Resources, resource types and assignments for one planning scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Resources available to the plan.
    pub resources: BTreeSet<ResourceId>,
    /// Resource types by name.
    pub resource_types: BTreeMap<String, ResourceType>,
    /// Resources assigned to each activity.
    pub assignments: BTreeMap<ActivityId, BTreeSet<ResourceId>>,
}

impl Plan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the resource is defined in this plan.
    pub fn has_resource(&self, resource: &str) -> bool {
        self.resources.contains(resource)
    }

    /// Looks up a resource type by name.
    pub fn resource_type(&self, name: &str) -> Option<&ResourceType> {
        self.resource_types.get(name)
    }

    /// Records an assignment. Returns `false` if it was already present.
    ///
    /// No validation happens here; callers go through
    /// [`AssignmentEngine::assign`](crate::assignment::AssignmentEngine::assign).
    pub fn add_assignment(&mut self, activity: ActivityId, resource: impl Into<ResourceId>) -> bool {
        self.assignments
            .entry(activity)
            .or_default()
            .insert(resource.into())
    }

    /// Resources assigned to an activity.
    pub fn resources_for(&self, activity: ActivityId) -> impl Iterator<Item = &ResourceId> {
        self.assignments.get(&activity).into_iter().flatten()
    }

    /// Activities assigned to a resource, in activity-id order.
    pub fn activities_for(&self, resource: &str) -> Vec<ActivityId> {
        self.assignments
            .iter()
            .filter(|(_, rs)| rs.contains(resource))
            .map(|(&a, _)| a)
            .collect()
    }

    /// Whether an activity has at least one resource.
    pub fn is_assigned(&self, activity: ActivityId) -> bool {
        self.assignments
            .get(&activity)
            .is_some_and(|rs| !rs.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_preference_order() {
        let t = ResourceType::new("Dev")
            .with_resource("Dev2")
            .with_resource("Dev1")
            .with_resource("Dev2");

        assert_eq!(t.name, "Dev");
        assert_eq!(t.resources, vec!["Dev2", "Dev1"]);
        assert!(t.contains("Dev1"));
        assert!(!t.contains("QA1"));
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let mut plan = Plan::new();
        assert!(plan.add_assignment(1, "Dev1"));
        assert!(!plan.add_assignment(1, "Dev1"));
        assert!(plan.add_assignment(1, "QA1"));

        assert_eq!(plan.resources_for(1).count(), 2);
        assert!(plan.is_assigned(1));
        assert!(!plan.is_assigned(2));
    }

    #[test]
    fn test_activities_for_resource() {
        let mut plan = Plan::new();
        plan.add_assignment(4, "Dev1");
        plan.add_assignment(2, "Dev1");
        plan.add_assignment(3, "Dev2");

        assert_eq!(plan.activities_for("Dev1"), vec![2, 4]);
        assert_eq!(plan.activities_for("Dev2"), vec![3]);
        assert!(plan.activities_for("Dev3").is_empty());
    }
}
