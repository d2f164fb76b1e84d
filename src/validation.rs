//! Validation of project definitions.
//!
//! Checks a [`ProjectDefinition`] before it is loaded and reports every
//! problem found, not just the first:
//! - Duplicate activity or resource ids
//! - Negative durations
//! - Prerequisites that are unknown or defined later
//! - Circular precedence dependencies
//! - Resource types listing unknown resources
//! - Activities requiring unknown resource types
//! - Fixed assignments naming unknown activities or resources
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ProjectDefinition;
use crate::error::ConfigurationError;
use crate::models::ActivityId;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ConfigurationError>>;

/// Validates a project definition.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues in
/// the order listed above.
pub fn validate_definition(def: &ProjectDefinition) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resources = BTreeSet::new();
    for r in &def.resources {
        if !resources.insert(r.as_str()) {
            errors.push(ConfigurationError::InvalidDefinition(format!(
                "duplicate resource: {r}"
            )));
        }
    }

    for candidates in def.resource_types.values() {
        for r in candidates {
            if !resources.contains(r.as_str()) {
                errors.push(ConfigurationError::UnknownResource(r.clone()));
            }
        }
    }

    // Prerequisites must point backwards in definition order.
    let mut defined = BTreeSet::new();
    for a in &def.activities {
        if defined.contains(&a.id) {
            errors.push(ConfigurationError::DuplicateActivity(a.id));
        }
        if a.duration < 0 {
            errors.push(ConfigurationError::NegativeDuration {
                activity: a.id,
                duration: a.duration,
            });
        }
        if let Some(rt) = &a.resource_type {
            if !def.resource_types.contains_key(rt) {
                errors.push(ConfigurationError::UnknownResourceType(rt.clone()));
            }
        }
        for &p in &a.prerequisites {
            if !defined.contains(&p) {
                errors.push(ConfigurationError::UnknownPrerequisite {
                    activity: a.id,
                    prerequisite: p,
                });
            }
        }
        defined.insert(a.id);
    }

    for fixed in &def.assignments {
        if !defined.contains(&fixed.activity) {
            errors.push(ConfigurationError::UnknownActivity(fixed.activity));
        }
        if !resources.contains(fixed.resource.as_str()) {
            errors.push(ConfigurationError::UnknownResource(fixed.resource.clone()));
        }
    }

    if let Some(activity) = detect_cycle(def) {
        errors.push(ConfigurationError::CyclicPrecedence(activity));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Returns an activity on a precedence cycle, if any.
fn detect_cycle(def: &ProjectDefinition) -> Option<ActivityId> {
    let ids: BTreeSet<ActivityId> = def.activities.iter().map(|a| a.id).collect();

    // prerequisite → successors, ignoring unknown ids
    let mut adj: BTreeMap<ActivityId, Vec<ActivityId>> = BTreeMap::new();
    for a in &def.activities {
        for p in a.prerequisites.iter().filter(|p| ids.contains(p)) {
            adj.entry(*p).or_default().push(a.id);
        }
    }

    let mut visited = BTreeSet::new();
    let mut in_stack = BTreeSet::new();
    ids.iter()
        .find_map(|&id| {
            if visited.contains(&id) {
                None
            } else {
                cycle_dfs(id, &adj, &mut visited, &mut in_stack)
            }
        })
}

fn cycle_dfs(
    node: ActivityId,
    adj: &BTreeMap<ActivityId, Vec<ActivityId>>,
    visited: &mut BTreeSet<ActivityId>,
    in_stack: &mut BTreeSet<ActivityId>,
) -> Option<ActivityId> {
    visited.insert(node);
    in_stack.insert(node);

    for &next in adj.get(&node).into_iter().flatten() {
        if in_stack.contains(&next) {
            return Some(next); // back edge
        }
        if !visited.contains(&next) {
            if let Some(found) = cycle_dfs(next, adj, visited, in_stack) {
                return Some(found);
            }
        }
    }

    in_stack.remove(&node);
    None
}
