use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::*;
use crate::grid::interaction::EditStep;
use crate::grid::drag::PointerPos;
use crate::models::event::{EventDraft, OwnerKey};
use crate::models::template::Template;
use crate::services::store::{InMemoryEventStore, MockEventStore, StoreError};

const SLOT_W: f32 = 10.0;
const ROW_H: f32 = 30.0;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn users() -> Vec<User> {
    vec![
        User::new("u1", "Alice", 1),
        User::new("u2", "Bob", 2),
        User::new("u3", "Carol", 3),
    ]
}

fn range(start: i64, end: i64) -> SlotRange {
    SlotRange::from_indices(start, end).unwrap()
}

fn event(id: EventId, user: &str, start: i64, end: i64, title: &str) -> Event {
    EventDraft::new(OwnerKey::new(user, date()), range(start, end), title, "#43a047")
        .into_event(id, 1)
}

/// Pointer at the middle of a cell.
fn at(row: usize, slot: i64) -> PointerPos {
    PointerPos::new(slot as f32 * SLOT_W + SLOT_W / 2.0, row as f32 * ROW_H + ROW_H / 2.0)
}

fn controller_with<S: EventStore>(store: S) -> GridController<S> {
    GridController::new(
        store,
        ViewBinder::day(users(), date()),
        GridMetrics::new(SLOT_W, ROW_H, 0),
    )
    .unwrap()
}

fn memory_controller(events: Vec<Event>) -> GridController<InMemoryEventStore> {
    controller_with(InMemoryEventStore::with_events(events))
}

/// Mock whose subscriptions start with `events`.
fn mock_with(events: Vec<Event>) -> MockEventStore {
    let mut store = MockEventStore::new();
    store.expect_subscribe().returning(move |filter| {
        let (sender, subscription) = Subscription::channel(filter);
        let _ = sender.send(events.clone());
        Ok(subscription)
    });
    store
}

fn drag(controller: &mut GridController<impl EventStore>, from: PointerPos, to: PointerPos) -> GridResult<GestureOutcome> {
    controller.pointer_down(from)?;
    controller.pointer_move(to);
    controller.pointer_up(to)
}

#[test]
fn test_initial_subscription_loads_view() {
    let controller = memory_controller(vec![event(1, "u2", 10, 13, "Review")]);
    assert_eq!(controller.events().len(), 1);
    assert_eq!(controller.metrics().row_count, 3);

    let bars = controller.bars();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].row, 1);
    assert_eq!(bars[0].caption(), "02:30〜03:30 Review");
}

#[test]
fn test_move_across_rows_commits_one_update() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);

    let outcome = drag(&mut controller, at(0, 11), at(1, 19)).unwrap();
    assert_eq!(outcome, GestureOutcome::Committed(1));

    let stored = controller.store().get(1).unwrap();
    assert_eq!(stored.owner, OwnerKey::new("u2", date()));
    assert_eq!(stored.range, range(18, 21));
    assert_eq!(controller.events()[0].range, range(18, 21));
    assert_eq!(controller.interaction(), &InteractionState::Idle);
}

#[test]
fn test_resize_right_grows_only_the_end() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);

    // Right handle of a bar spanning x 100..140.
    let handle = PointerPos::new(138.0, 15.0);
    let outcome = drag(&mut controller, handle, PointerPos::new(178.0, 80.0)).unwrap();
    assert_eq!(outcome, GestureOutcome::Committed(1));

    let stored = controller.store().get(1).unwrap();
    assert_eq!(stored.range, range(10, 17));
    assert_eq!(stored.owner.user_id, "u1");
}

#[test]
fn test_release_at_origin_makes_no_store_call() {
    let mut store = mock_with(vec![event(1, "u1", 10, 13, "Review")]);
    store.expect_update().never();
    let mut controller = controller_with(store);

    controller.pointer_down(at(0, 11)).unwrap();
    controller.pointer_move(at(0, 15));
    controller.pointer_move(at(0, 11));
    let outcome = controller.pointer_up(at(0, 11)).unwrap();

    assert_eq!(outcome, GestureOutcome::Unchanged(1));
    assert_eq!(controller.interaction(), &InteractionState::Idle);
}

#[test]
fn test_release_outside_grid_aborts_drag() {
    let mut store = mock_with(vec![event(1, "u1", 10, 13, "Review")]);
    store.expect_update().never();
    let mut controller = controller_with(store);

    controller.pointer_down(at(0, 11)).unwrap();
    controller.pointer_move(at(0, 30));
    assert_eq!(controller.ghost().unwrap().range, range(29, 32));

    let outside = PointerPos::new(5000.0, 900.0);
    assert!(controller.metrics().cell_at(outside).is_none());
    let outcome = controller.pointer_up(outside).unwrap();

    assert_eq!(outcome, GestureOutcome::Unchanged(1));
    assert_eq!(controller.interaction(), &InteractionState::Idle);
    assert!(controller.ghost().is_none());
    assert_eq!(controller.events()[0].range, range(10, 13));
}

#[test]
fn test_conflicting_move_is_rejected_before_the_store() {
    let mut store = mock_with(vec![
        event(1, "u1", 10, 13, "Review"),
        event(2, "u2", 20, 23, "Lunch"),
    ]);
    store.expect_update().never();
    let mut controller = controller_with(store);

    // Lands on u2 at 18..=21, touching Lunch at 20.
    let result = drag(&mut controller, at(0, 11), at(1, 19));
    assert!(matches!(result, Err(GridError::Conflict)));

    let notices = controller.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(controller.events()[0].range, range(10, 13));
    assert_eq!(controller.interaction(), &InteractionState::Idle);
}

#[test]
fn test_ghost_follows_drag_and_flags_block() {
    let mut controller = memory_controller(vec![
        event(1, "u1", 10, 13, "Review"),
        event(2, "u2", 20, 23, "Lunch"),
    ]);

    controller.pointer_down(at(0, 11)).unwrap();
    assert!(controller.ghost().is_none(), "no ghost below the threshold");

    controller.pointer_move(at(1, 19));
    let ghost = controller.ghost().unwrap();
    assert_eq!((ghost.row, ghost.range), (1, range(18, 21)));
    assert!(ghost.blocked);
    assert!(controller.bars().iter().any(|bar| bar.id == 1 && bar.dragging));

    controller.pointer_move(at(2, 19));
    assert!(!controller.ghost().unwrap().blocked);
}

#[test]
fn test_click_on_event_opens_edit() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);

    controller.pointer_down(at(0, 11)).unwrap();
    let outcome = controller.pointer_up(at(0, 11)).unwrap();

    assert_eq!(outcome, GestureOutcome::EventClicked(1));
    assert_eq!(controller.selected_event(), Some(1));
    assert_eq!(
        controller.interaction().edit_step(),
        Some(&EditStep::EditExisting { event_id: 1 })
    );
}

#[test]
fn test_second_pointer_down_is_rejected() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);
    controller.pointer_down(at(0, 11)).unwrap();

    assert!(matches!(
        controller.pointer_down(at(2, 40)),
        Err(GridError::GestureInProgress)
    ));
    assert!(controller.interaction().drag().is_some());
    // Only logged; the live gesture carries on without a toast.
    assert!(controller.drain_notices().is_empty());
}

#[test]
fn test_range_selection_then_new_entry() {
    let mut controller = memory_controller(vec![]);

    let outcome = drag(&mut controller, at(1, 39), at(1, 36)).unwrap();
    let expected = SelectionRange { row: 1, range: range(36, 39) };
    assert_eq!(outcome, GestureOutcome::SelectionMenu(expected));
    assert!(controller.is_cell_selected(1, SlotIndex::new(37).unwrap()));

    controller.choose_new().unwrap();
    let id = controller.save_new_entry("  Standup ", "#1976d2", range(36, 39)).unwrap();

    let stored = controller.store().get(id).unwrap();
    assert_eq!(stored.title, "Standup");
    assert_eq!(stored.owner, OwnerKey::new("u2", date()));
    assert_eq!(controller.interaction(), &InteractionState::Idle);
    assert!(controller.selection().is_none());
}

#[test]
fn test_selection_stays_in_origin_row() {
    let mut controller = memory_controller(vec![]);
    let outcome = drag(&mut controller, at(0, 4), at(2, 8)).unwrap();
    assert_eq!(
        outcome,
        GestureOutcome::SelectionMenu(SelectionRange { row: 0, range: range(4, 8) })
    );
}

#[test]
fn test_template_prefills_form() {
    let mut controller = memory_controller(vec![]);
    drag(&mut controller, at(0, 4), at(0, 7)).unwrap();

    controller
        .choose_template(&Template::new("Meeting", "#e53935"))
        .unwrap();
    match controller.interaction().edit_step() {
        Some(EditStep::NewEntry { title, color, range: r, .. }) => {
            assert_eq!(title, "Meeting");
            assert_eq!(color, "#e53935");
            assert_eq!(*r, range(4, 7));
        }
        other => panic!("unexpected step {:?}", other),
    }
}

#[test]
fn test_choose_outside_menu_is_stale() {
    let mut controller = memory_controller(vec![]);
    assert!(matches!(controller.choose_new(), Err(GridError::StaleView)));
}

#[test]
fn test_new_entry_overlap_never_reaches_store() {
    let mut store = mock_with(vec![event(1, "u1", 10, 13, "Review")]);
    store.expect_create().never();
    let mut controller = controller_with(store);

    controller.begin_new_entry(0, range(12, 16)).unwrap();
    controller.choose_new().unwrap();
    assert!(matches!(
        controller.save_new_entry("Clash", "#000000", range(12, 16)),
        Err(GridError::Conflict)
    ));
}

#[test]
fn test_invalid_draft_is_reported() {
    let mut store = mock_with(vec![]);
    store.expect_create().never();
    let mut controller = controller_with(store);

    controller.begin_direct_entry(0, SlotIndex::new(3).unwrap()).unwrap();
    let err = controller
        .save_new_entry("   ", "#000000", range(3, 3))
        .unwrap_err();
    assert!(matches!(err, GridError::InvalidDraft(_)));
    assert_eq!(controller.drain_notices().len(), 1);
}

#[test]
fn test_store_failure_becomes_error_notice() {
    let mut store = mock_with(vec![]);
    store
        .expect_create()
        .times(1)
        .returning(|_| Err(StoreError::Backend(anyhow::anyhow!("disk full"))));
    let mut controller = controller_with(store);

    controller.begin_direct_entry(0, SlotIndex::new(3).unwrap()).unwrap();
    let err = controller
        .save_new_entry("Call", "#000000", range(3, 5))
        .unwrap_err();
    assert!(matches!(err, GridError::Store(_)));

    let notices = controller.drain_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("disk full"));
}

#[test]
fn test_unchanged_edit_makes_no_store_call() {
    let mut store = mock_with(vec![event(1, "u1", 10, 13, "Review")]);
    store.expect_update().never();
    let mut controller = controller_with(store);

    controller.open_edit(1).unwrap();
    let saved = controller
        .save_edit(1, "Review ", "#43a047", range(10, 13))
        .unwrap();
    assert_eq!(saved, None);
    assert_eq!(controller.interaction(), &InteractionState::Idle);
}

#[test]
fn test_edit_sends_only_changed_fields() {
    let mut store = mock_with(vec![event(1, "u1", 10, 13, "Review")]);
    store
        .expect_update()
        .withf(|id, patch| {
            *id == 1
                && patch.title.as_deref() == Some("Design review")
                && patch.color.is_none()
                && patch.range.is_none()
                && patch.owner.is_none()
        })
        .times(1)
        .returning(|_, _| Ok(7));
    let mut controller = controller_with(store);

    controller.open_edit(1).unwrap();
    let saved = controller
        .save_edit(1, "Design review", "#43a047", range(10, 13))
        .unwrap();
    assert_eq!(saved, Some(7));
}

#[test]
fn test_delete_requires_confirmation() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);

    assert!(!controller.request_delete().unwrap(), "nothing selected");
    controller.open_edit(1).unwrap();
    assert!(controller.request_delete().unwrap());
    assert_eq!(controller.store().len(), 1);

    assert_eq!(controller.confirm_delete().unwrap(), 1);
    assert!(controller.store().is_empty());
    assert!(controller.events().is_empty());
    assert_eq!(controller.selected_event(), None);
}

#[test]
fn test_copy_then_keyboard_paste() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);

    assert!(matches!(
        controller.paste_shortcut(),
        Err(GridError::EmptyClipboard)
    ));
    controller.drain_notices();

    controller.open_edit(1).unwrap();
    assert!(controller.copy_selected().unwrap());
    assert!(controller.take_history_dirty());
    assert_eq!(controller.history().count("Review", "#43a047"), 1);
    controller.close_dialog();

    // A single-cell click selects the paste target.
    controller.pointer_down(at(2, 40)).unwrap();
    let outcome = controller.pointer_up(at(2, 40)).unwrap();
    assert_eq!(
        outcome,
        GestureOutcome::DirectEntry { row: 2, slot: SlotIndex::new(40).unwrap() }
    );

    let id = controller.paste_shortcut().unwrap().unwrap();
    let pasted = controller.store().get(id).unwrap();
    assert_eq!(pasted.owner.user_id, "u3");
    assert_eq!(pasted.range, range(40, 43));
    assert_eq!(pasted.title, "Review");
}

#[test]
fn test_paste_mode_places_on_click() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);
    assert!(matches!(controller.arm_paste(), Err(GridError::EmptyClipboard)));

    controller.copy_event(1).unwrap();
    controller.arm_paste().unwrap();
    assert!(controller.is_paste_armed());

    controller.pointer_move(at(0, 12));
    let ghost = controller.ghost().unwrap();
    assert_eq!(ghost.source, GhostSource::Paste);
    assert!(ghost.blocked);

    controller.pointer_move(at(0, 94));
    let ghost = controller.ghost().unwrap();
    assert_eq!(ghost.range, range(94, 95), "cut at end of day");
    assert!(!ghost.blocked);

    controller.pointer_down(at(0, 94)).unwrap();
    assert!(!controller.is_paste_armed());
    assert_eq!(controller.store().len(), 2);
}

#[test]
fn test_keyboard_paste_onto_taken_slots_is_rejected() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);
    controller.copy_event(1).unwrap();

    controller.pointer_down(at(0, 8)).unwrap();
    controller.pointer_up(at(0, 8)).unwrap();
    controller.drain_notices();

    assert!(matches!(controller.paste_shortcut(), Err(GridError::Conflict)));
    assert_eq!(controller.store().len(), 1);
    assert_eq!(controller.events().len(), 1);
    assert_eq!(controller.drain_notices()[0].level, NoticeLevel::Warning);
}

#[test]
fn test_conflicting_paste_click_still_leaves_paste_mode() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);
    controller.copy_event(1).unwrap();
    controller.arm_paste().unwrap();

    controller.pointer_move(at(0, 12));
    assert!(controller.ghost().unwrap().blocked);

    assert!(matches!(
        controller.pointer_down(at(0, 12)),
        Err(GridError::Conflict)
    ));
    assert!(!controller.is_paste_armed());
    assert_eq!(controller.interaction(), &InteractionState::Idle);
    assert_eq!(controller.store().len(), 1);
}

#[test]
fn test_escape_leaves_paste_mode() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);
    controller.copy_event(1).unwrap();
    controller.arm_paste().unwrap();
    controller.cancel();
    assert_eq!(controller.interaction(), &InteractionState::Idle);
    assert_eq!(controller.store().len(), 1);
}

#[test]
fn test_candidate_creates_in_selected_range() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);
    controller.copy_event(1).unwrap();

    drag(&mut controller, at(1, 50), at(1, 53)).unwrap();
    let candidate = controller.paste_candidates().remove(0);
    let id = controller.choose_candidate(&candidate).unwrap();

    let created = controller.store().get(id).unwrap();
    assert_eq!(created.range, range(50, 53));
    assert_eq!(created.owner.user_id, "u2");
}

#[test]
fn test_view_change_discards_live_drag() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);
    controller.pointer_down(at(0, 11)).unwrap();
    controller.pointer_move(at(1, 20));

    controller.next_page().unwrap();
    assert_eq!(controller.interaction(), &InteractionState::Idle);
    assert!(controller.events().is_empty());
    assert_eq!(
        controller.pointer_up(at(1, 20)).unwrap(),
        GestureOutcome::None
    );
    assert_eq!(controller.store().get(1).unwrap().range, range(10, 13));
}

#[test]
fn test_month_view_rows_are_days() {
    let store = InMemoryEventStore::with_events(vec![event(1, "u1", 10, 13, "Review")]);
    let mut controller = GridController::new(
        store,
        ViewBinder::month("u1", date()),
        GridMetrics::new(SLOT_W, ROW_H, 0),
    )
    .unwrap();
    assert_eq!(controller.metrics().row_count, 31);
    assert_eq!(controller.bars()[0].row, 13);

    // Moving down one row moves the event to the next day.
    drag(&mut controller, at(13, 11), at(14, 11)).unwrap();
    assert_eq!(
        controller.store().get(1).unwrap().owner,
        OwnerKey::new("u1", NaiveDate::from_ymd_opt(2025, 3, 15).unwrap())
    );
}

#[test]
fn test_external_overlap_is_flagged() {
    let controller = memory_controller(vec![
        event(1, "u1", 10, 13, "Review"),
        event(2, "u1", 13, 15, "Sync"),
        event(3, "u2", 10, 13, "Other"),
    ]);
    let conflicting: Vec<EventId> = controller
        .bars()
        .into_iter()
        .filter(|bar| bar.conflicting)
        .map(|bar| bar.id)
        .collect();
    assert_eq!(conflicting, vec![1, 2]);
}

#[test]
fn test_stale_emission_after_commit_is_dropped() {
    let senders: Arc<Mutex<Vec<Sender<Vec<Event>>>>> = Arc::default();
    let initial = vec![event(1, "u1", 10, 13, "Review")];

    let mut store = MockEventStore::new();
    let captured = Arc::clone(&senders);
    let first = initial.clone();
    store.expect_subscribe().returning(move |filter| {
        let (sender, subscription) = Subscription::channel(filter);
        let _ = sender.send(first.clone());
        captured.lock().unwrap().push(sender);
        Ok(subscription)
    });
    store.expect_update().times(1).returning(|_, _| Ok(5));
    let mut controller = controller_with(store);

    drag(&mut controller, at(0, 11), at(0, 21)).unwrap();
    let sender = senders.lock().unwrap()[0].clone();

    // A late emission from before the commit.
    sender.send(initial.clone()).unwrap();
    assert!(!controller.refresh());
    assert_eq!(controller.events()[0].range, range(10, 13));

    let mut moved = event(1, "u1", 20, 23, "Review");
    moved.revision = 5;
    sender.send(vec![moved]).unwrap();
    assert!(controller.refresh());
    assert_eq!(controller.events()[0].range, range(20, 23));
}

#[test]
fn test_click_away_clears_selection() {
    let mut controller = memory_controller(vec![event(1, "u1", 10, 13, "Review")]);
    controller.open_edit(1).unwrap();
    controller.close_dialog();

    controller.pointer_down(PointerPos::new(-5.0, 5.0)).unwrap();
    assert_eq!(controller.selected_event(), None);
    assert!(controller.selection().is_none());
}
