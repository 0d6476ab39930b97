// Slot conversions, labels and range arithmetic with random inputs

use proptest::prelude::*;

use slot_grid::grid::drag::{move_range, resize_left, resize_right};
use slot_grid::models::slot::{
    format_range, range_from_labels, to_slot_index, to_wall_clock, SlotRange,
};

fn any_range() -> impl Strategy<Value = SlotRange> {
    (0..96i64, 0..96i64).prop_map(|(a, b)| SlotRange::from_indices(a.min(b), a.max(b)).unwrap())
}

proptest! {
    /// Property: every slot survives slot -> wall clock -> slot
    #[test]
    fn prop_slot_wall_clock_round_trip(idx in 0..96i64) {
        let (hour, minute) = to_wall_clock(idx).unwrap();
        prop_assert_eq!(to_slot_index(hour, minute).unwrap().as_i64(), idx);
    }

    /// Property: wall clock -> slot floors the minute to the quarter hour
    #[test]
    fn prop_wall_clock_floors_to_quarter(hour in 0..24u32, minute in 0..60u32) {
        let slot = to_slot_index(hour, minute).unwrap();
        prop_assert_eq!(slot.wall_clock(), (hour, minute - minute % 15));
    }

    /// Property: the end label names the boundary after the last slot
    #[test]
    fn prop_end_label_is_exclusive_boundary(start in 0..96i64, len in 0..96i64) {
        let end = (start + len).min(95);
        let label = format_range(start, end).unwrap();
        let boundary = (end + 1) % 96;
        let expected_end = format!("{:02}:{:02}", boundary / 4, (boundary % 4) * 15);
        prop_assert!(label.ends_with(&expected_end), "{} should end with {}", label, expected_end);
    }

    /// Property: a range's own label parses back to the same range
    #[test]
    fn prop_label_parses_back(range in any_range()) {
        let label = range.label();
        let (start, end) = label.split_once('〜').unwrap();
        prop_assert_eq!(range_from_labels(start, end).unwrap(), range);
    }

    /// Property: moving keeps the span and stays inside the day
    #[test]
    fn prop_move_preserves_span(range in any_range(), delta in -200..200i64) {
        let moved = move_range(range, delta);
        prop_assert_eq!(moved.span(), range.span());
        prop_assert!(moved.end().as_i64() <= 95);
    }

    /// Property: resizing never inverts a range and leaves the other edge alone
    #[test]
    fn prop_resize_never_inverts(range in any_range(), delta in -200..200i64) {
        let left = resize_left(range, delta);
        prop_assert!(left.start() <= left.end());
        prop_assert_eq!(left.end(), range.end());

        let right = resize_right(range, delta);
        prop_assert!(right.start() <= right.end());
        prop_assert_eq!(right.start(), range.start());
    }

    /// Property: closed-interval intersection is symmetric
    #[test]
    fn prop_intersection_symmetric(a in any_range(), b in any_range()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }
}
