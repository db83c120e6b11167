use flicker_service::domain::models::{
    ComponentMatcher, Entity, Rect, Region, Snapshot, TimeRange, Trace, TraceKind,
};
use flicker_service::ChainBuilder;
use proptest::prelude::*;

fn trace_from(mut timestamps: Vec<i64>) -> Trace {
    timestamps.sort_unstable();
    timestamps.dedup();
    let snapshots = timestamps
        .into_iter()
        .map(|ts| Snapshot::new(ts, TraceKind::Layer, vec![]))
        .collect();
    Trace::new(TraceKind::Layer, snapshots).unwrap()
}

fn rect() -> impl Strategy<Value = Rect> {
    (0i32..50, 0i32..50, 1i32..50, 1i32..50).prop_map(|(l, t, w, h)| Rect::new(l, t, l + w, t + h))
}

proptest! {
    /// Property: a slice keeps exactly the snapshots inside the half-open range, in order
    #[test]
    fn prop_slice_is_exact_subsequence(
        timestamps in prop::collection::vec(0i64..1_000, 0..40),
        start in 0i64..1_000,
        len in 0i64..500,
    ) {
        let trace = trace_from(timestamps);
        let range = TimeRange { start, end: start + len };
        let slice = trace.slice(range);

        let expected: Vec<i64> = trace
            .snapshots()
            .iter()
            .map(|s| s.timestamp)
            .filter(|ts| range.contains(*ts))
            .collect();
        let actual: Vec<i64> = slice.snapshots().iter().map(|s| s.timestamp).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(slice.kind(), trace.kind());
    }

    /// Property: slicing to [a, b) then to a sub-range equals slicing to the sub-range directly
    #[test]
    fn prop_slice_composes(
        timestamps in prop::collection::vec(0i64..1_000, 0..40),
        a in 0i64..1_000,
        outer in 0i64..500,
        offset in 0i64..500,
        inner in 0i64..500,
    ) {
        let trace = trace_from(timestamps);
        let outer_range = TimeRange { start: a, end: a + outer };
        let inner_start = (a + offset).min(outer_range.end);
        let inner_range = TimeRange { start: inner_start, end: (inner_start + inner).min(outer_range.end) };

        prop_assert_eq!(trace.slice(outer_range).slice(inner_range), trace.slice(inner_range));
    }

    /// Property: visible-then-invisible passes iff the sequence is some visible entries followed by some invisible ones
    #[test]
    fn prop_visible_then_invisible_accepts_exactly_monotone_sequences(
        visibility in prop::collection::vec(any::<bool>(), 0..12),
    ) {
        let snapshots: Vec<Snapshot> = visibility
            .iter()
            .zip(0i64..)
            .map(|(visible, ts)| {
                Snapshot::new(ts, TraceKind::Layer, vec![Entity::new(7, "App#7").with_visibility(*visible)])
            })
            .collect();
        let trace = Trace::new(TraceKind::Layer, snapshots).unwrap();
        let app = ComponentMatcher::exact_id(7, 7);
        let chain = ChainBuilder::new("VisibleThenInvisible", TraceKind::Layer)
            .is_visible(app.clone())
            .then()
            .is_invisible(app)
            .build()
            .unwrap();

        let switch = visibility.iter().position(|v| !v).unwrap_or(visibility.len());
        let expected = switch > 0
            && switch < visibility.len()
            && visibility[switch..].iter().all(|v| !v);
        prop_assert_eq!(chain.evaluate(&trace).is_ok(), expected);
    }

    /// Property: slicing by the trace's own range is the identity
    #[test]
    fn prop_slice_full_range_is_identity(timestamps in prop::collection::vec(0i64..1_000, 1..40)) {
        let trace = trace_from(timestamps);
        let range = trace.time_range().unwrap();
        prop_assert_eq!(trace.slice(range), trace);
    }

    /// Property: entry_at returns the latest snapshot not after the timestamp
    #[test]
    fn prop_entry_at_is_latest_not_after(
        timestamps in prop::collection::vec(0i64..1_000, 0..40),
        at in -10i64..1_100,
    ) {
        let trace = trace_from(timestamps);
        let expected = trace.snapshots().iter().rev().find(|s| s.timestamp <= at);
        prop_assert_eq!(trace.entry_at(at), expected);
    }

    /// Property: a region minus another never overlaps it, and adding it back covers the original
    #[test]
    fn prop_region_subtract_partitions(a in prop::collection::vec(rect(), 1..4), b in prop::collection::vec(rect(), 1..4)) {
        let a = Region::new(a);
        let b = Region::new(b);
        let rest = a.subtract(&b);

        prop_assert!(!rest.overlaps(&b));
        prop_assert!(rest.union(&b).covers(&a));
        prop_assert_eq!(rest.area() + a.intersection(&b).area(), a.area());
    }
}
