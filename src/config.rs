//! Serializable project definitions.
//!
//! A [`ProjectDefinition`] is a setup document: activities, resources,
//! resource types, fixed assignments and the float anchor. It is loaded from
//! JSON and turned into a [`Project`] through the same checked operations a
//! caller would use by hand. Run [`validate_definition`] first to see every
//! problem at once; [`ProjectDefinition::into_project`] stops at the first.
//!
//! ```
//! use u_project::config::ProjectDefinition;
//!
//! let json = r#"{
//!     "activities": [
//!         { "id": 1, "description": "Design", "duration": 3, "resource_type": "Dev" },
//!         { "id": 2, "description": "Build", "duration": 5, "prerequisites": [1] }
//!     ],
//!     "resources": ["Dev1"],
//!     "resource_types": { "Dev": ["Dev1"] }
//! }"#;
//!
//! let project = ProjectDefinition::from_json(json).unwrap().into_project().unwrap();
//! assert_eq!(project.activities().len(), 2);
//! assert_eq!(project.resource_type_of(1), Some("Dev"));
//! ```
//!
//! [`validate_definition`]: crate::validation::validate_definition

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::calculation::FloatAnchor;
use crate::error::Result;
use crate::models::{Activity, ActivityId, Project, ResourceId, ResourceType};

/// One activity in a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDefinition {
    pub id: ActivityId,
    #[serde(default)]
    pub description: String,
    pub duration: i64,
    /// Required resource type, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Must reference activities listed earlier.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<ActivityId>,
}

/// A resource pinned to an activity before automatic assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAssignment {
    pub activity: ActivityId,
    pub resource: ResourceId,
}

/// Complete setup of a project's active plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDefinition {
    pub activities: Vec<ActivityDefinition>,
    #[serde(default)]
    pub resources: Vec<ResourceId>,
    /// Type name → candidate resources, most preferred first.
    #[serde(default)]
    pub resource_types: BTreeMap<String, Vec<ResourceId>>,
    #[serde(default)]
    pub assignments: Vec<FixedAssignment>,
    #[serde(default)]
    pub float_anchor: FloatAnchor,
}

impl ProjectDefinition {
    /// Parses a definition from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the definition as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Captures a project's activities and active plan.
    pub fn from_project(project: &Project) -> Self {
        let plan = project.active_plan();
        Self {
            activities: project
                .activities()
                .iter()
                .map(|a| ActivityDefinition {
                    id: a.id,
                    description: a.description.clone(),
                    duration: a.duration,
                    resource_type: project.resource_type_of(a.id).map(String::from),
                    prerequisites: a.prerequisites.iter().copied().collect(),
                })
                .collect(),
            resources: plan.resources.iter().cloned().collect(),
            resource_types: plan
                .resource_types
                .values()
                .map(|t| (t.name.clone(), t.resources.clone()))
                .collect(),
            assignments: plan
                .assignments
                .iter()
                .flat_map(|(&activity, resources)| {
                    resources.iter().map(move |r| FixedAssignment {
                        activity,
                        resource: r.clone(),
                    })
                })
                .collect(),
            float_anchor: project.float_anchor(),
        }
    }

    /// Builds the project, applying fixed assignments last.
    pub fn into_project(self) -> Result<Project> {
        let mut project = Project::new().with_float_anchor(self.float_anchor);

        for resource in self.resources {
            project.add_resource(resource);
        }
        for (name, candidates) in self.resource_types {
            let resource_type = candidates
                .into_iter()
                .fold(ResourceType::new(name), ResourceType::with_resource);
            project.add_resource_type(resource_type)?;
        }
        for def in self.activities {
            project.add_activity(
                Activity::new(def.id, def.description, def.duration).with_prerequisites(def.prerequisites),
            )?;
            if let Some(resource_type) = def.resource_type {
                project.set_resource_type(def.id, resource_type)?;
            }
        }
        for fixed in &self.assignments {
            project.assign(&fixed.resource, fixed.activity)?;
        }

        info!(
            activities = project.activities().len(),
            resources = project.active_plan().resources.len(),
            fixed = self.assignments.len(),
            "project loaded"
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;

    const SAMPLE: &str = r#"{
        "activities": [
            { "id": 1, "description": "Requirements", "duration": 5 },
            { "id": 2, "description": "Backend", "duration": 10, "resource_type": "Dev", "prerequisites": [1] },
            { "id": 3, "description": "Frontend", "duration": 3, "resource_type": "Dev", "prerequisites": [1] }
        ],
        "resources": ["Dev1", "Dev2"],
        "resource_types": { "Dev": ["Dev2", "Dev1"] },
        "assignments": [ { "activity": 3, "resource": "Dev1" } ],
        "float_anchor": "project_finish"
    }"#;

    #[test]
    fn test_load_sample() {
        let def = ProjectDefinition::from_json(SAMPLE).unwrap();
        assert_eq!(def.activities.len(), 3);
        assert_eq!(def.float_anchor, FloatAnchor::ProjectFinish);

        let project = def.into_project().unwrap();
        assert_eq!(project.float_anchor(), FloatAnchor::ProjectFinish);
        assert_eq!(
            project.active_plan().resource_type("Dev").map(|t| t.resources.clone()),
            Some(vec!["Dev2".to_string(), "Dev1".to_string()])
        );
        assert!(project.active_plan().is_assigned(3));
        assert_eq!(project.unassigned_activities(), vec![1, 2]);
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let def = ProjectDefinition::from_json(r#"{ "activities": [ { "id": 7, "duration": 2 } ] }"#)
            .unwrap();
        assert_eq!(def.float_anchor, FloatAnchor::ActivityFinish);
        assert!(def.resources.is_empty());
        let project = def.into_project().unwrap();
        assert_eq!(project.activity(7).unwrap().description, "");
    }

    #[test]
    fn test_round_trip_through_project() {
        let project = ProjectDefinition::from_json(SAMPLE).unwrap().into_project().unwrap();
        let exported = ProjectDefinition::from_project(&project);
        let json = exported.to_json().unwrap();
        let reloaded = ProjectDefinition::from_json(&json).unwrap();
        assert_eq!(reloaded, exported);
        assert_eq!(reloaded.into_project().unwrap(), project);
    }

    #[test]
    fn test_malformed_json() {
        let err = ProjectDefinition::from_json("{ \"activities\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidDefinition(_)));
    }

    #[test]
    fn test_first_error_stops_loading() {
        let def = ProjectDefinition::from_json(
            r#"{ "activities": [ { "id": 1, "duration": 1, "prerequisites": [2] } ] }"#,
        )
        .unwrap();
        assert_eq!(
            def.into_project().unwrap_err(),
            ConfigurationError::UnknownPrerequisite {
                activity: 1,
                prerequisite: 2
            }
        );

        let def = ProjectDefinition::from_json(
            r#"{ "activities": [ { "id": 1, "duration": 1 } ], "resources": ["Dev1"],
                 "assignments": [ { "activity": 1, "resource": "Dev9" } ] }"#,
        )
        .unwrap();
        assert_eq!(
            def.into_project().unwrap_err(),
            ConfigurationError::UnknownResource("Dev9".into())
        );
    }
}
