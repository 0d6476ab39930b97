// Overlap and gesture invariants with random placements

use proptest::prelude::*;

use crate::fixtures::*;
use slot_grid::grid::overlap::{is_overlapping, overlapping_ids, OverlapCandidate};
use slot_grid::grid::GestureOutcome;
use slot_grid::models::event::OwnerKey;
use slot_grid::services::store::InMemoryEventStore;

/// One user action thrown at the grid.
#[derive(Debug, Clone)]
enum Attempt {
    Create { row: usize, start: i64, len: i64 },
    Drag { row: usize, slot: i64, to_row: usize, to_slot: i64 },
    Paste { row: usize, slot: i64, armed: bool },
}

fn attempt() -> impl Strategy<Value = Attempt> {
    prop_oneof![
        (0..3usize, 0..96i64, 0..12i64)
            .prop_map(|(row, start, len)| Attempt::Create { row, start, len }),
        (0..3usize, 0..96i64, 0..3usize, 0..96i64).prop_map(|(row, slot, to_row, to_slot)| {
            Attempt::Drag { row, slot, to_row, to_slot }
        }),
        (0..3usize, 0..96i64, any::<bool>())
            .prop_map(|(row, slot, armed)| Attempt::Paste { row, slot, armed }),
    ]
}

proptest! {
    /// Property: overlap between two same-owner events is symmetric
    #[test]
    fn prop_overlap_symmetric(a in (0..96i64, 0..8i64), b in (0..96i64, 0..8i64)) {
        let first = event(1, "u0", a.0, (a.0 + a.1).min(95), "A", "#000000");
        let second = event(2, "u0", b.0, (b.0 + b.1).min(95), "B", "#000000");

        let first_hits = is_overlapping(
            &OverlapCandidate::new(first.owner.clone(), first.range),
            [&second],
        );
        let second_hits = is_overlapping(
            &OverlapCandidate::new(second.owner.clone(), second.range),
            [&first],
        );
        prop_assert_eq!(first_hits, second_hits);
    }

    /// Property: another owner never conflicts
    #[test]
    fn prop_other_owner_never_overlaps(start in 0..96i64) {
        let existing = event(1, "u0", start, start, "A", "#000000");
        let candidate = OverlapCandidate::new(OwnerKey::new("u1", day()), existing.range);
        prop_assert!(!is_overlapping(&candidate, [&existing]));
    }

    /// Property: whatever the engine lets through, committed events never overlap
    #[test]
    fn prop_committed_events_never_overlap(
        attempts in prop::collection::vec(attempt(), 1..30)
    ) {
        let mut controller = day_controller(InMemoryEventStore::new(), 3);
        for attempt in attempts {
            match attempt {
                Attempt::Create { row, start, len } => {
                    let end = (start + len).min(95);
                    if controller.begin_new_entry(row, range(start, end)).is_ok() {
                        controller.choose_new().unwrap();
                        let _ = controller.save_new_entry("Block", "#1976d2", range(start, end));
                    }
                }
                Attempt::Drag { row, slot, to_row, to_slot } => {
                    if controller.pointer_down(at(row, slot)).is_ok() {
                        controller.pointer_move(at(to_row, to_slot));
                        let _ = controller.pointer_up(at(to_row, to_slot));
                    }
                }
                Attempt::Paste { row, slot, armed } => {
                    if controller.clipboard().is_none() {
                        if let Some(id) = controller.events().first().map(|e| e.id) {
                            controller.copy_event(id).unwrap();
                        }
                    }
                    if armed {
                        if controller.arm_paste().is_ok() {
                            controller.pointer_move(at(row, slot));
                            let _ = controller.pointer_down(at(row, slot));
                            let _ = controller.pointer_up(at(row, slot));
                        }
                    } else if controller.pointer_down(at(row, slot)).is_ok() {
                        let _ = controller.pointer_up(at(row, slot));
                        let _ = controller.paste_shortcut();
                    }
                }
            }
            controller.cancel();
            let _ = controller.drain_notices();
        }
        prop_assert!(overlapping_ids(controller.events()).is_empty());
        prop_assert!(overlapping_ids(&controller.store().all()).is_empty());
    }

    /// Property: a press and release on the same spot of a bar never writes
    #[test]
    fn prop_release_in_place_is_idempotent(start in 0..90i64, len in 2..6i64) {
        let end = (start + len).min(95);
        let existing = event(1, "u0", start, end, "Fixed", "#43a047");
        let mut controller = day_controller(RecordingStore::with_events(vec![existing]), 1);

        let mid = at(0, (start + end) / 2);
        controller.pointer_down(mid).unwrap();
        controller.pointer_move(mid);
        let outcome = controller.pointer_up(mid).unwrap();

        prop_assert_eq!(outcome, GestureOutcome::EventClicked(1));
        prop_assert!(controller.store().calls.is_empty());
    }
}
