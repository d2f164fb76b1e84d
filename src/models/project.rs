//! Project model.
//!
//! A project owns the activity list (in definition order), the resource type
//! each activity requires, and one or more named plans. Exactly one plan is
//! active at a time; assignment and calculation always read the active plan.

use std::collections::BTreeMap;

use super::{Activity, ActivityId, Plan, ResourceId, ResourceType};
use crate::calculation::FloatAnchor;
use crate::error::{ConfigurationError, Result};

/// Name of the plan every project starts with.
pub const DEFAULT_PLAN: &str = "default";

/// Activities, resource requirements and plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    activities: Vec<Activity>,
    activity_types: BTreeMap<ActivityId, String>,
    plans: BTreeMap<String, Plan>,
    active_plan: String,
    float_anchor: FloatAnchor,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// Creates an empty project with a single empty `"default"` plan.
    pub fn new() -> Self {
        let mut plans = BTreeMap::new();
        plans.insert(DEFAULT_PLAN.to_string(), Plan::new());
        Self {
            activities: Vec::new(),
            activity_types: BTreeMap::new(),
            plans,
            active_plan: DEFAULT_PLAN.to_string(),
            float_anchor: FloatAnchor::default(),
        }
    }

    /// Sets how latest start times are anchored.
    pub fn with_float_anchor(mut self, anchor: FloatAnchor) -> Self {
        self.float_anchor = anchor;
        self
    }

    /// The float anchor used by [`Project::critical_path`].
    pub fn float_anchor(&self) -> FloatAnchor {
        self.float_anchor
    }

    /// Changes the float anchor in place.
    pub fn set_float_anchor(&mut self, anchor: FloatAnchor) {
        self.float_anchor = anchor;
    }

    /// Adds an activity.
    ///
    /// Prerequisites must already be defined, so the precedence relation is
    /// acyclic by construction.
    pub fn add_activity(&mut self, activity: Activity) -> Result<&Activity> {
        if self.activities.iter().any(|a| a.id == activity.id) {
            return Err(ConfigurationError::DuplicateActivity(activity.id));
        }
        if activity.duration < 0 {
            return Err(ConfigurationError::NegativeDuration {
                activity: activity.id,
                duration: activity.duration,
            });
        }
        if let Some(&missing) = activity
            .prerequisites
            .iter()
            .find(|&&p| self.position(p).is_err())
        {
            return Err(ConfigurationError::UnknownPrerequisite {
                activity: activity.id,
                prerequisite: missing,
            });
        }

        self.activities.push(activity);
        let last = self.activities.len() - 1;
        Ok(&self.activities[last])
    }

    /// Looks up an activity.
    pub fn activity(&self, id: ActivityId) -> Result<&Activity> {
        self.activities
            .iter()
            .find(|a| a.id == id)
            .ok_or(ConfigurationError::UnknownActivity(id))
    }

    fn activity_mut(&mut self, id: ActivityId) -> Result<&mut Activity> {
        self.activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ConfigurationError::UnknownActivity(id))
    }

    /// Activities in definition order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Definition position of an activity.
    pub fn position(&self, id: ActivityId) -> Result<usize> {
        self.activities
            .iter()
            .position(|a| a.id == id)
            .ok_or(ConfigurationError::UnknownActivity(id))
    }

    /// Replaces an activity's description.
    pub fn set_description(&mut self, id: ActivityId, description: impl Into<String>) -> Result<()> {
        self.activity_mut(id)?.description = description.into();
        Ok(())
    }

    /// Replaces an activity's duration.
    pub fn set_duration(&mut self, id: ActivityId, duration: i64) -> Result<()> {
        if duration < 0 {
            return Err(ConfigurationError::NegativeDuration {
                activity: id,
                duration,
            });
        }
        self.activity_mut(id)?.duration = duration;
        Ok(())
    }

    /// Requires a resource type for an activity.
    ///
    /// The type must exist in the active plan.
    pub fn set_resource_type(&mut self, id: ActivityId, resource_type: impl Into<String>) -> Result<()> {
        let resource_type = resource_type.into();
        self.position(id)?;
        if self.active_plan().resource_type(&resource_type).is_none() {
            return Err(ConfigurationError::UnknownResourceType(resource_type));
        }
        self.activity_types.insert(id, resource_type);
        Ok(())
    }

    /// Resource type required by an activity, if any.
    pub fn resource_type_of(&self, id: ActivityId) -> Option<&str> {
        self.activity_types.get(&id).map(String::as_str)
    }

    /// Adds a resource to the active plan.
    pub fn add_resource(&mut self, resource: impl Into<ResourceId>) {
        self.active_plan_mut().resources.insert(resource.into());
    }

    /// Adds (or replaces) a resource type in the active plan.
    ///
    /// Every listed resource must already exist in the plan.
    pub fn add_resource_type(&mut self, resource_type: ResourceType) -> Result<()> {
        let plan = self.active_plan_mut();
        if let Some(missing) = resource_type
            .resources
            .iter()
            .find(|r| !plan.has_resource(r))
        {
            return Err(ConfigurationError::UnknownResource(missing.clone()));
        }
        plan.resource_types
            .insert(resource_type.name.clone(), resource_type);
        Ok(())
    }

    /// Adds an empty plan (or returns the existing one of that name).
    pub fn add_plan(&mut self, name: impl Into<String>) -> &mut Plan {
        self.plans.entry(name.into()).or_default()
    }

    /// Makes another plan active.
    pub fn set_active_plan(&mut self, name: &str) -> Result<()> {
        if !self.plans.contains_key(name) {
            return Err(ConfigurationError::UnknownPlan(name.to_string()));
        }
        self.active_plan = name.to_string();
        Ok(())
    }

    /// Name of the active plan.
    pub fn active_plan_name(&self) -> &str {
        &self.active_plan
    }

    /// Looks up a plan by name.
    pub fn plan(&self, name: &str) -> Result<&Plan> {
        self.plans
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownPlan(name.to_string()))
    }

    /// Names of every plan.
    pub fn plan_names(&self) -> impl Iterator<Item = &str> {
        self.plans.keys().map(String::as_str)
    }

    /// The active plan.
    pub fn active_plan(&self) -> &Plan {
        // The active name always refers to an existing plan.
        &self.plans[&self.active_plan]
    }

    pub(crate) fn active_plan_mut(&mut self) -> &mut Plan {
        self.plans.entry(self.active_plan.clone()).or_default()
    }

    /// Activities without any resource in the active plan, in definition order.
    pub fn unassigned_activities(&self) -> Vec<ActivityId> {
        let plan = self.active_plan();
        self.activities
            .iter()
            .map(|a| a.id)
            .filter(|&id| !plan.is_assigned(id))
            .collect()
    }
}
