//! Precedence relation between activities.
//!
//! The relation stores direct prerequisites and direct successors for every
//! activity, plus the activity durations. Explicit prerequisites enter when
//! the relation is built; resource-induced ordering edges are added later
//! with [`PrecedenceGraph::add_ordering_edge`], which refuses edges that
//! would close a cycle.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ConfigurationError, Result};
use crate::models::{ActivityData, ActivityId};

/// Direct prerequisite/successor relation over a set of activities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecedenceGraph {
    order: Vec<ActivityId>,
    durations: BTreeMap<ActivityId, i64>,
    prerequisites: BTreeMap<ActivityId, BTreeSet<ActivityId>>,
    successors: BTreeMap<ActivityId, BTreeSet<ActivityId>>,
}

impl PrecedenceGraph {
    /// Creates an empty relation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the relation from activities and their direct prerequisites.
    ///
    /// Activities may be given in any order, but every prerequisite must be
    /// among them and the result must be acyclic.
    pub fn from_activities<A, I>(activities: I) -> Result<Self>
    where
        A: ActivityData,
        I: IntoIterator<Item = A>,
    {
        let activities: Vec<A> = activities.into_iter().collect();
        let mut graph = Self::new();

        for a in &activities {
            graph.add_activity(a.id(), a.duration())?;
        }

        for a in &activities {
            for p in a.prerequisites() {
                if !graph.contains(p) {
                    return Err(ConfigurationError::UnknownPrerequisite {
                        activity: a.id(),
                        prerequisite: p,
                    });
                }
                graph.insert_edge(p, a.id());
            }
        }

        graph.topological_order()?;
        Ok(graph)
    }

    /// Adds an activity with no relations.
    pub fn add_activity(&mut self, id: ActivityId, duration: i64) -> Result<()> {
        if self.durations.contains_key(&id) {
            return Err(ConfigurationError::DuplicateActivity(id));
        }
        self.order.push(id);
        self.durations.insert(id, duration);
        self.prerequisites.insert(id, BTreeSet::new());
        self.successors.insert(id, BTreeSet::new());
        Ok(())
    }

    /// Adds `from → to` unless it already holds or would close a cycle.
    ///
    /// Returns whether a new edge was inserted.
    pub fn add_ordering_edge(&mut self, from: ActivityId, to: ActivityId) -> Result<bool> {
        self.ensure(from)?;
        self.ensure(to)?;

        if from == to || self.depends_on(from, to)? {
            return Ok(false);
        }
        Ok(self.insert_edge(from, to))
    }

    fn insert_edge(&mut self, from: ActivityId, to: ActivityId) -> bool {
        let inserted = self.prerequisites.entry(to).or_default().insert(from);
        self.successors.entry(from).or_default().insert(to);
        inserted
    }

    fn ensure(&self, id: ActivityId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownActivity(id))
        }
    }

    /// Whether the activity is part of the relation.
    pub fn contains(&self, id: ActivityId) -> bool {
        self.durations.contains_key(&id)
    }

    /// Activities in insertion order.
    pub fn activities(&self) -> &[ActivityId] {
        &self.order
    }

    /// Number of activities.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the relation has no activities.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Duration of an activity.
    pub fn duration(&self, id: ActivityId) -> Result<i64> {
        self.durations
            .get(&id)
            .copied()
            .ok_or(ConfigurationError::UnknownActivity(id))
    }

    /// Direct prerequisites of an activity.
    pub fn prerequisites(&self, id: ActivityId) -> Result<&BTreeSet<ActivityId>> {
        self.prerequisites
            .get(&id)
            .ok_or(ConfigurationError::UnknownActivity(id))
    }

    /// Direct successors of an activity.
    pub fn successors(&self, id: ActivityId) -> Result<&BTreeSet<ActivityId>> {
        self.successors
            .get(&id)
            .ok_or(ConfigurationError::UnknownActivity(id))
    }

    /// Whether `activity` transitively depends on `ancestor`.
    pub fn depends_on(&self, activity: ActivityId, ancestor: ActivityId) -> Result<bool> {
        Ok(self.ancestors(activity)?.contains(&ancestor))
    }

    /// All transitive prerequisites of an activity.
    pub fn ancestors(&self, id: ActivityId) -> Result<BTreeSet<ActivityId>> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<ActivityId> = self.prerequisites(id)?.iter().copied().collect();
        while let Some(next) = stack.pop() {
            if seen.insert(next) {
                stack.extend(self.prerequisites(next)?.iter().copied());
            }
        }
        Ok(seen)
    }

    /// Number of direct edges in the relation.
    pub fn edge_count(&self) -> usize {
        self.prerequisites.values().map(BTreeSet::len).sum()
    }

    /// Activities ordered so that every prerequisite comes first.
    ///
    /// Ties are broken by insertion order.
    pub fn topological_order(&self) -> Result<Vec<ActivityId>> {
        let position: BTreeMap<ActivityId, usize> =
            self.order.iter().enumerate().map(|(i, &a)| (a, i)).collect();
        let mut remaining: BTreeMap<ActivityId, usize> = self
            .prerequisites
            .iter()
            .map(|(&a, ps)| (a, ps.len()))
            .collect();

        let mut ready: BTreeSet<(usize, ActivityId)> = remaining
            .iter()
            .filter(|&(_, &n)| n == 0)
            .map(|(&a, _)| (position[&a], a))
            .collect();

        let mut sorted = Vec::with_capacity(self.order.len());
        while let Some((_, a)) = ready.pop_first() {
            sorted.push(a);
            for s in self.successors(a)? {
                if let Some(n) = remaining.get_mut(s) {
                    *n -= 1;
                    if *n == 0 {
                        ready.insert((position[s], *s));
                    }
                }
            }
        }

        if sorted.len() < self.order.len() {
            let stuck = remaining
                .iter()
                .find(|&(_, &n)| n > 0)
                .map(|(&a, _)| a)
                .unwrap_or_default();
            return Err(ConfigurationError::CyclicPrecedence(stuck));
        }
        Ok(sorted)
    }
}
