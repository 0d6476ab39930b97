//! Grid controller.
//!
//! Owns the interaction state of one grid and is the only path from a
//! gesture to the [`EventStore`]. The authoritative event list is whatever
//! the subscription last delivered; commits never edit it locally.

mod entry;
mod gestures;

use std::collections::{BTreeSet, HashMap};

use chrono::Local;

use crate::error::{GridError, GridResult};
use crate::grid::binder::ViewBinder;
use crate::grid::clipboard::{Clipboard, PasteEntry, PasteHistory};
use crate::grid::drag::GridMetrics;
use crate::grid::ghost::{EventBar, GhostPreview, GhostSource};
use crate::grid::interaction::InteractionState;
use crate::grid::overlap::{is_overlapping, overlapping_ids, OverlapCandidate};
use crate::grid::selection::{SelectionEngine, SelectionRange};
use crate::models::event::{Event, EventId, Revision, UserId};
use crate::models::row::User;
use crate::models::slot::{now_slot, SlotIndex, SlotRange};
use crate::services::store::{EventStore, Subscription};

pub use gestures::GestureOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the renderer to show once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct GridController<S: EventStore> {
    store: S,
    binder: ViewBinder,
    metrics: GridMetrics,
    subscription: Option<Subscription>,
    events: Vec<Event>,
    conflicts: BTreeSet<EventId>,
    state: InteractionState,
    selection: SelectionEngine,
    selected_event: Option<EventId>,
    clipboard: Option<Clipboard>,
    history: PasteHistory,
    history_dirty: bool,
    /// Revisions our own commits produced; older emissions are dropped.
    own_revisions: HashMap<EventId, Revision>,
    notices: Vec<Notice>,
}

impl<S: EventStore> GridController<S> {
    /// Bind a store to a view and subscribe to what it shows.
    pub fn new(store: S, binder: ViewBinder, metrics: GridMetrics) -> GridResult<Self> {
        let mut controller = Self {
            store,
            binder,
            metrics,
            subscription: None,
            events: Vec::new(),
            conflicts: BTreeSet::new(),
            state: InteractionState::Idle,
            selection: SelectionEngine::new(),
            selected_event: None,
            clipboard: None,
            history: PasteHistory::new(),
            history_dirty: false,
            own_revisions: HashMap::new(),
            notices: Vec::new(),
        };
        controller.resubscribe()?;
        Ok(controller)
    }

    /// Start from a previously saved paste history.
    pub fn with_history(mut self, history: PasteHistory) -> Self {
        self.history = history;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn binder(&self) -> &ViewBinder {
        &self.binder
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    /// Replace the pixel geometry; the row count always follows the view.
    pub fn set_metrics(&mut self, metrics: GridMetrics) {
        self.metrics = GridMetrics {
            row_count: self.binder.row_count(),
            ..metrics
        };
    }

    /// The canonical event set of the current view.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.state
    }

    pub fn selected_event(&self) -> Option<EventId> {
        self.selected_event
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    pub fn history(&self) -> &PasteHistory {
        &self.history
    }

    /// Whether the history changed since the last call.
    pub fn take_history_dirty(&mut self) -> bool {
        std::mem::take(&mut self.history_dirty)
    }

    /// Ranked quick-create candidates.
    pub fn paste_candidates(&self) -> Vec<PasteEntry> {
        self.history.top()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Pull the newest emission from the store.
    ///
    /// An emission that still shows one of our own commits at an older
    /// revision is dropped. Returns whether the event set changed.
    pub fn refresh(&mut self) -> bool {
        let Some(emission) = self.subscription.as_ref().and_then(Subscription::latest) else {
            return false;
        };

        let stale = emission.iter().find(|event| {
            self.own_revisions
                .get(&event.id)
                .is_some_and(|expected| event.revision < *expected)
        });
        if let Some(event) = stale {
            log::warn!(
                "Dropping stale emission: event {} at revision {} predates our commit",
                event.id,
                event.revision
            );
            return false;
        }

        self.own_revisions.clear();
        self.apply_events(emission);
        true
    }

    fn apply_events(&mut self, events: Vec<Event>) {
        self.conflicts = overlapping_ids(&events);
        if !self.conflicts.is_empty() {
            log::warn!("{} events overlap in the current view", self.conflicts.len());
        }
        self.events = events;

        if let Some(id) = self.selected_event {
            if self.event(id).is_none() {
                self.selected_event = None;
            }
        }
        if let Some(session) = self.state.drag() {
            if self.event(session.target).is_none() {
                log::warn!("Event {} disappeared during a drag", session.target);
                self.state.reset();
                self.notices
                    .push(Notice::warning("The entry was removed by someone else"));
            }
        }
    }

    fn resubscribe(&mut self) -> GridResult<()> {
        self.metrics.row_count = self.binder.row_count();
        // Close the old channel before opening the new one.
        self.subscription = None;
        self.events.clear();
        self.conflicts.clear();

        let filter = self.binder.filter();
        log::debug!("Subscribing to {:?}", filter.scope);
        let subscription = match self.store.subscribe(filter) {
            Ok(subscription) => subscription,
            Err(err) => return Err(self.fail(err.into())),
        };
        self.subscription = Some(subscription);
        self.refresh();
        Ok(())
    }

    /// Record a recoverable failure as a notice and hand it back.
    fn fail(&mut self, err: GridError) -> GridError {
        let notice = match &err {
            GridError::Conflict => {
                log::warn!("Rejected placement: {}", err);
                Notice::warning(err.to_string())
            }
            GridError::Store(store_err) => {
                log::error!("Store call failed: {:#}", store_err);
                Notice::error(format!("Could not save: {}", store_err))
            }
            GridError::EmptyClipboard | GridError::InvalidDraft(_) => {
                Notice::warning(err.to_string())
            }
            _ => {
                log::debug!("Gesture rejected: {}", err);
                Notice::warning(err.to_string())
            }
        };
        self.notices.push(notice);
        err
    }

    fn is_blocked(&self, candidate: &OverlapCandidate) -> bool {
        is_overlapping(candidate, &self.events)
    }

    // View changes. Any of them drops live gestures and selections because
    // their row indices would point at different owners afterwards.

    fn apply_view_change(&mut self, changed: bool) -> GridResult<()> {
        if !changed {
            return Ok(());
        }
        self.state.reset();
        self.selection.clear();
        self.selected_event = None;
        self.resubscribe()
    }

    pub fn set_date(&mut self, date: chrono::NaiveDate) -> GridResult<()> {
        let changed = self.binder.set_date(date);
        self.apply_view_change(changed)
    }

    pub fn set_users(&mut self, users: Vec<User>) -> GridResult<()> {
        let changed = self.binder.set_users(users);
        self.apply_view_change(changed)
    }

    pub fn set_month_user(&mut self, user_id: impl Into<UserId>) -> GridResult<()> {
        let changed = self.binder.set_month_user(user_id);
        self.apply_view_change(changed)
    }

    pub fn switch_to_day(&mut self, users: Vec<User>) -> GridResult<()> {
        let changed = self.binder.switch_to_day(users);
        self.apply_view_change(changed)
    }

    pub fn switch_to_month(&mut self, user_id: impl Into<UserId>) -> GridResult<()> {
        let changed = self.binder.switch_to_month(user_id);
        self.apply_view_change(changed)
    }

    pub fn previous_page(&mut self) -> GridResult<()> {
        let changed = self.binder.previous();
        self.apply_view_change(changed)
    }

    pub fn next_page(&mut self) -> GridResult<()> {
        let changed = self.binder.next();
        self.apply_view_change(changed)
    }

    pub fn today(&mut self) -> GridResult<()> {
        let changed = self.binder.today();
        self.apply_view_change(changed)
    }

    // Render projections.

    /// Every event that maps onto a visible row.
    pub fn bars(&self) -> Vec<EventBar> {
        let dragging = self
            .state
            .drag()
            .filter(|session| session.is_active())
            .map(|session| session.target);

        self.events
            .iter()
            .filter_map(|event| {
                let row = self.binder.row_for_event(event)?;
                Some(EventBar {
                    id: event.id,
                    row,
                    range: event.range,
                    title: event.title.clone(),
                    color: event.color.clone(),
                    selected: self.selected_event == Some(event.id),
                    conflicting: self.conflicts.contains(&event.id),
                    dragging: dragging == Some(event.id),
                })
            })
            .collect()
    }

    /// Candidate placement of the live drag or of paste mode.
    pub fn ghost(&self) -> Option<GhostPreview> {
        match &self.state {
            InteractionState::Dragging(session) if session.is_active() => {
                let event = self.event(session.target)?;
                let owner = self.binder.owner_for_row(session.current_row).ok()?;
                let candidate =
                    OverlapCandidate::new(owner, session.current).excluding(session.target);
                Some(GhostPreview {
                    row: session.current_row,
                    range: session.current,
                    title: event.title.clone(),
                    color: event.color.clone(),
                    source: GhostSource::Drag(session.target),
                    blocked: self.is_blocked(&candidate),
                })
            }
            InteractionState::PasteArmed {
                hover: Some((row, slot)),
            } => {
                let clipboard = self.clipboard.as_ref()?;
                let range = clipboard.range_at(*slot);
                let owner = self.binder.owner_for_row(*row).ok()?;
                Some(GhostPreview {
                    row: *row,
                    range,
                    title: clipboard.title.clone(),
                    color: clipboard.color.clone(),
                    source: GhostSource::Paste,
                    blocked: self.is_blocked(&OverlapCandidate::new(owner, range)),
                })
            }
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<SelectionRange> {
        self.selection.current()
    }

    pub fn is_cell_selected(&self, row: usize, slot: SlotIndex) -> bool {
        self.selection.contains(row, slot)
    }

    /// Current-time slot if `row` shows today.
    pub fn now_slot(&self, row: usize) -> Option<SlotIndex> {
        let owner = self.binder.owner_for_row(row).ok()?;
        (owner.date == Local::now().date_naive()).then(now_slot)
    }

    /// Time range label of an event for tooltips.
    pub fn range_label(&self, id: EventId) -> Option<String> {
        self.event(id).map(|event| event.range.label())
    }

    fn event_range(&self, id: EventId) -> GridResult<SlotRange> {
        self.event(id)
            .map(|event| event.range)
            .ok_or(GridError::UnknownEvent(id))
    }
}

#[cfg(test)]
mod tests;
