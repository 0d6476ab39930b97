// Test fixtures - reusable grid data
// Provides consistent users, events and a call-recording store across test files

#![allow(dead_code)]

use chrono::NaiveDate;

use slot_grid::grid::{GridController, GridMetrics, PointerPos, ViewBinder};
use slot_grid::models::event::{Event, EventDraft, EventId, EventPatch, OwnerKey, Revision};
use slot_grid::models::row::User;
use slot_grid::models::slot::SlotRange;
use slot_grid::services::store::{
    EventFilter, EventStore, InMemoryEventStore, StoreError, Subscription,
};

pub const SLOT_W: f32 = 10.0;
pub const ROW_H: f32 = 30.0;

/// Friday, March 14 2025
pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

pub fn users(count: usize) -> Vec<User> {
    (0..count)
        .map(|i| User::new(format!("u{}", i), format!("User {}", i), i as i64))
        .collect()
}

pub fn range(start: i64, end: i64) -> SlotRange {
    SlotRange::from_indices(start, end).unwrap()
}

pub fn event(id: EventId, user: &str, start: i64, end: i64, title: &str, color: &str) -> Event {
    EventDraft::new(OwnerKey::new(user, day()), range(start, end), title, color).into_event(id, 1)
}

/// Pointer at the middle of a cell, in grid-body coordinates.
pub fn at(row: usize, slot: i64) -> PointerPos {
    PointerPos::new(
        slot as f32 * SLOT_W + SLOT_W / 2.0,
        row as f32 * ROW_H + ROW_H / 2.0,
    )
}

pub fn day_controller<S: EventStore>(store: S, user_count: usize) -> GridController<S> {
    GridController::new(
        store,
        ViewBinder::day(users(user_count), day()),
        GridMetrics::new(SLOT_W, ROW_H, 0),
    )
    .unwrap()
}

/// One mutation the grid proposed to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Create(EventDraft),
    Update(EventId, EventPatch),
    Delete(EventId),
}

/// In-memory store that records every mutation it receives.
#[derive(Default)]
pub struct RecordingStore {
    pub inner: InMemoryEventStore,
    pub calls: Vec<StoreCall>,
}

impl RecordingStore {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            inner: InMemoryEventStore::with_events(events),
            calls: Vec::new(),
        }
    }

    pub fn creates(&self) -> Vec<&EventDraft> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Create(draft) => Some(draft),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<(EventId, &EventPatch)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Update(id, patch) => Some((*id, patch)),
                _ => None,
            })
            .collect()
    }
}

impl EventStore for RecordingStore {
    fn subscribe(&mut self, filter: EventFilter) -> Result<Subscription, StoreError> {
        self.inner.subscribe(filter)
    }

    fn create(&mut self, draft: EventDraft) -> Result<EventId, StoreError> {
        self.calls.push(StoreCall::Create(draft.clone()));
        self.inner.create(draft)
    }

    fn update(&mut self, id: EventId, patch: EventPatch) -> Result<Revision, StoreError> {
        self.calls.push(StoreCall::Update(id, patch.clone()));
        self.inner.update(id, patch)
    }

    fn delete(&mut self, id: EventId) -> Result<(), StoreError> {
        self.calls.push(StoreCall::Delete(id));
        self.inner.delete(id)
    }
}
