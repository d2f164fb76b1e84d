//! Greedy resource assignment.
//!
//! Assigns typed resources to activities, most urgent first, checking each
//! candidate resource's occupied spans against the activity's earliest
//! window. Every commitment adds resource ordering to the precedence
//! relation and the time table is recomputed before the next decision.
//!
//! # Usage
//!
//! ```
//! use u_project::models::{Activity, Project, ResourceType};
//!
//! let mut project = Project::new();
//! project.add_activity(Activity::new(1, "Design", 3)).unwrap();
//! project.add_activity(Activity::new(2, "Build", 5)).unwrap();
//! project.add_resource("Dev1");
//! project
//!     .add_resource_type(ResourceType::new("Dev").with_resource("Dev1"))
//!     .unwrap();
//! project.set_resource_type(1, "Dev").unwrap();
//! project.set_resource_type(2, "Dev").unwrap();
//!
//! // Pin Build to Dev1, then let the engine place the rest.
//! project.assign("Dev1", 2).unwrap();
//! let report = project.assign_resources().unwrap();
//! assert_eq!(report.unassigned, vec![1]);
//! ```

mod context;
mod engine;

pub use context::{AssignmentData, ProjectAssignmentData};
pub use engine::{Assignment, AssignmentEngine, AssignmentReport};

use crate::error::Result;
use crate::models::{ActivityId, Project};

impl Project {
    /// Assigns a resource to an activity in the active plan.
    pub fn assign(&mut self, resource: &str, activity: ActivityId) -> Result<()> {
        let mut data = ProjectAssignmentData::new(self)?;
        AssignmentEngine::new().assign(&mut data, resource, activity)
    }

    /// Runs greedy assignment over the active plan.
    pub fn assign_resources(&mut self) -> Result<AssignmentReport> {
        let mut data = ProjectAssignmentData::new(self)?;
        AssignmentEngine::new().assign_resources(&mut data)
    }
}
