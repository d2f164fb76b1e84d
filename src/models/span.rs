//! Span and span set algebra.
//!
//! A [`Span`] is a half-open interval `[start, end)` tagged with the
//! activity that produced its end boundary. A [`SpanSet`] keeps spans in
//! canonical form: sorted by start, with no two spans overlapping or
//! touching. Every mutation re-establishes that form.
//!
//! Span sets describe when a resource is occupied (union of the windows of
//! its assigned activities) and when a whole resource type is saturated
//! (intersection across every resource of the type).

use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)` ending with `end_activity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span<A> {
    /// Interval start (inclusive).
    pub start: i64,
    /// Interval end (exclusive).
    pub end: i64,
    /// Activity that concludes the span.
    pub end_activity: A,
}

impl<A> Span<A> {
    /// Creates a new span.
    pub fn new(start: i64, end: i64, end_activity: A) -> Self {
        Self {
            start,
            end,
            end_activity,
        }
    }

    /// Length of the span (zero for empty spans).
    #[inline]
    pub fn len(&self) -> i64 {
        (self.end - self.start).max(0)
    }

    /// Whether the span covers no time at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether the span shares at least one instant with `[start, end)`.
    #[inline]
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        self.start < end && start < self.end
    }
}

/// Sorted, non-overlapping, non-adjacent list of spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSet<A> {
    spans: Vec<Span<A>>,
}

impl<A> Default for SpanSet<A> {
    fn default() -> Self {
        Self { spans: Vec::new() }
    }
}

impl<A> SpanSet<A> {
    /// Creates an empty span set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The spans in canonical order.
    pub fn spans(&self) -> &[Span<A>] {
        &self.spans
    }

    /// Whether the set covers no time.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of disjoint spans.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Total time covered by the set.
    pub fn covered(&self) -> i64 {
        self.spans.iter().map(Span::len).sum()
    }

    /// Inserts one span, merging it with every span it overlaps or touches.
    ///
    /// The merged span keeps the end activity of whichever span ends
    /// latest; on ties the span already in the set wins. Empty spans are
    /// ignored.
    pub fn union_span(&mut self, span: Span<A>) {
        if span.is_empty() {
            return;
        }

        let mut spans = std::mem::take(&mut self.spans);
        spans.push(span);
        // Stable: existing spans stay ahead of the newcomer on equal starts.
        spans.sort_by_key(|s| s.start);

        let mut merged: Vec<Span<A>> = Vec::with_capacity(spans.len());
        for s in spans {
            match merged.last_mut() {
                Some(current) if s.start <= current.end => {
                    if s.end > current.end {
                        current.end = s.end;
                        current.end_activity = s.end_activity;
                    }
                }
                _ => merged.push(s),
            }
        }

        self.spans = merged;
    }

    /// Folds every span of `other` into this set.
    pub fn union_set(&mut self, other: SpanSet<A>) {
        for span in other.spans {
            self.union_span(span);
        }
    }

    /// Spans overlapping the query window `[start, end)`.
    ///
    /// An empty window overlaps nothing.
    pub fn overlapping(&self, start: i64, end: i64) -> Vec<&Span<A>> {
        self.spans.iter().filter(|s| s.overlaps(start, end)).collect()
    }

    /// Whether any span overlaps `[start, end)`.
    pub fn intersects(&self, start: i64, end: i64) -> bool {
        self.spans.iter().any(|s| s.overlaps(start, end))
    }

    /// The span containing `time`, treating span ends as inclusive.
    pub fn span_at(&self, time: i64) -> Option<&Span<A>> {
        self.spans.iter().find(|s| s.start <= time && time <= s.end)
    }
}

impl<A: Clone + Ord> SpanSet<A> {
    /// Intersects two canonical sets with a two-pointer sweep.
    ///
    /// Each emitted span takes its payload from the input span whose end
    /// equals the overlap end; when both do, the smaller payload is kept.
    pub fn intersection(&self, other: &SpanSet<A>) -> SpanSet<A> {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < self.spans.len() && j < other.spans.len() {
            let a = &self.spans[i];
            let b = &other.spans[j];

            let start = a.start.max(b.start);
            let end = a.end.min(b.end);

            if start < end {
                let activity = match (a.end == end, b.end == end) {
                    (true, true) => a.end_activity.clone().min(b.end_activity.clone()),
                    (true, false) => a.end_activity.clone(),
                    _ => b.end_activity.clone(),
                };
                out.push(Span::new(start, end, activity));
            }

            if a.end == end {
                i += 1;
            }
            if b.end == end {
                j += 1;
            }
        }

        // Inputs are canonical, so the output is already sorted and disjoint.
        SpanSet { spans: out }
    }

    /// Intersects any number of sets. The intersection of no sets is empty.
    pub fn intersect_all<I>(sets: I) -> SpanSet<A>
    where
        I: IntoIterator<Item = SpanSet<A>>,
    {
        let mut sets = sets.into_iter();
        let Some(first) = sets.next() else {
            return SpanSet::new();
        };
        sets.fold(first, |acc, s| acc.intersection(&s))
    }
}

impl<A> FromIterator<Span<A>> for SpanSet<A> {
    fn from_iter<I: IntoIterator<Item = Span<A>>>(iter: I) -> Self {
        let mut set = SpanSet::new();
        for span in iter {
            set.union_span(span);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(spans: &[(i64, i64, u64)]) -> SpanSet<u64> {
        spans
            .iter()
            .map(|&(s, e, a)| Span::new(s, e, a))
            .collect()
    }

    fn bounds(set: &SpanSet<u64>) -> Vec<(i64, i64)> {
        set.spans().iter().map(|s| (s.start, s.end)).collect()
    }

    fn is_canonical(set: &SpanSet<u64>) -> bool {
        set.spans().iter().all(|s| s.start < s.end)
            && set.spans().windows(2).all(|w| w[0].end < w[1].start)
    }

    #[test]
    fn test_union_bridges_gap() {
        let mut s = set(&[(0, 5, 1), (10, 15, 2)]);
        s.union_span(Span::new(4, 11, 3));
        assert_eq!(s.spans(), &[Span::new(0, 15, 2)]);
    }

    #[test]
    fn test_union_touching_spans_merge() {
        let s = set(&[(0, 5, 1), (5, 8, 2)]);
        assert_eq!(s.spans(), &[Span::new(0, 8, 2)]);
    }

    #[test]
    fn test_union_keeps_latest_end_activity() {
        let s = set(&[(0, 10, 1), (2, 4, 2)]);
        assert_eq!(s.spans(), &[Span::new(0, 10, 1)]);

        // Equal ends: the span already present keeps the payload.
        let s = set(&[(0, 10, 1), (3, 10, 2)]);
        assert_eq!(s.spans(), &[Span::new(0, 10, 1)]);
    }

    #[test]
    fn test_union_ignores_empty_spans() {
        let s = set(&[(3, 3, 1), (5, 2, 2)]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_union_sorts_out_of_order_input() {
        let s = set(&[(20, 25, 3), (0, 5, 1), (10, 12, 2)]);
        assert_eq!(bounds(&s), vec![(0, 5), (10, 12), (20, 25)]);
        assert_eq!(s.covered(), 12);
    }

    #[test]
    fn test_union_set() {
        let mut a = set(&[(0, 5, 1)]);
        a.union_set(set(&[(5, 7, 2), (9, 10, 3)]));
        assert_eq!(bounds(&a), vec![(0, 7), (9, 10)]);
    }

    #[test]
    fn test_intersection_payload_from_ending_span() {
        let a = set(&[(0, 10, 1)]);
        let b = set(&[(2, 4, 2), (8, 12, 3)]);
        let i = a.intersection(&b);
        assert_eq!(i.spans(), &[Span::new(2, 4, 2), Span::new(8, 10, 1)]);
    }

    #[test]
    fn test_intersection_disjoint_is_empty() {
        let a = set(&[(0, 5, 1)]);
        let b = set(&[(5, 9, 2)]);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn test_intersect_all() {
        let sets = vec![
            set(&[(0, 10, 1)]),
            set(&[(3, 20, 2)]),
            set(&[(0, 4, 3), (6, 8, 4)]),
        ];
        let i = SpanSet::intersect_all(sets);
        assert_eq!(bounds(&i), vec![(3, 4), (6, 8)]);
        assert!(SpanSet::<u64>::intersect_all(Vec::new()).is_empty());
    }

    #[test]
    fn test_overlapping_query() {
        let s = set(&[(0, 5, 1), (10, 15, 2)]);
        assert_eq!(s.overlapping(3, 8).len(), 1);
        assert_eq!(s.overlapping(5, 10).len(), 0);
        assert_eq!(s.overlapping(4, 11).len(), 2);
        assert!(!s.intersects(7, 7));
        assert!(s.intersects(14, 20));
    }

    #[test]
    fn test_span_at_inclusive_end() {
        let s = set(&[(0, 5, 1), (10, 15, 2)]);
        assert_eq!(s.span_at(5).map(|s| s.end_activity), Some(1));
        assert_eq!(s.span_at(10).map(|s| s.end_activity), Some(2));
        assert!(s.span_at(7).is_none());
    }

    fn arb_spans() -> impl Strategy<Value = Vec<(i64, i64, u64)>> {
        prop::collection::vec((0i64..50, 0i64..15, 0u64..6), 0..12)
            .prop_map(|v| v.into_iter().map(|(s, l, a)| (s, s + l, a)).collect())
    }

    proptest! {
        #[test]
        fn prop_union_is_canonical(spans in arb_spans()) {
            let s = set(&spans);
            prop_assert!(is_canonical(&s));
        }

        #[test]
        fn prop_union_idempotent(spans in arb_spans(), extra in (0i64..50, 1i64..10, 0u64..6)) {
            let mut once = set(&spans);
            once.union_span(Span::new(extra.0, extra.0 + extra.1, extra.2));
            let mut twice = once.clone();
            twice.union_span(Span::new(extra.0, extra.0 + extra.1, extra.2));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_intersection_commutative(a in arb_spans(), b in arb_spans()) {
            let a = set(&a);
            let b = set(&b);
            prop_assert_eq!(a.intersection(&b), b.intersection(&a));
        }

        #[test]
        fn prop_self_intersection_is_identity(a in arb_spans()) {
            let a = set(&a);
            prop_assert_eq!(a.intersection(&a), a);
        }

        #[test]
        fn prop_intersection_is_canonical(a in arb_spans(), b in arb_spans()) {
            let i = set(&a).intersection(&set(&b));
            prop_assert!(is_canonical(&i));
        }
    }
}
