//! Event store contract.
//!
//! The grid never owns the authoritative event list. It proposes drafts and
//! patches through [`EventStore`] and reads the canonical set back from the
//! [`Subscription`] handed out by `subscribe`.

mod memory;
mod sqlite;

use std::sync::mpsc::{self, Receiver, Sender};

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::models::event::{month_key, Event, EventDraft, EventId, EventPatch, Revision, UserId};

pub use memory::InMemoryEventStore;
pub use sqlite::SqliteEventStore;

/// Owner ids per backend query.
pub const OWNER_BATCH_SIZE: usize = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event {0} does not exist")]
    NotFound(EventId),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Date part of a subscription filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
}

impl FilterScope {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            FilterScope::Day(day) => day == date,
            FilterScope::Month { year, month } => date.year() == year && date.month() == month,
        }
    }

    /// `YYYY-MM` of the scope.
    pub fn month_key(&self) -> String {
        match *self {
            FilterScope::Day(day) => month_key(day),
            FilterScope::Month { year, month } => format!("{:04}-{:02}", year, month),
        }
    }
}

/// Which events a subscription follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub owner_ids: Vec<UserId>,
    pub scope: FilterScope,
}

impl EventFilter {
    pub fn day(owner_ids: Vec<UserId>, date: NaiveDate) -> Self {
        Self {
            owner_ids,
            scope: FilterScope::Day(date),
        }
    }

    pub fn month(owner_id: UserId, year: i32, month: u32) -> Self {
        Self {
            owner_ids: vec![owner_id],
            scope: FilterScope::Month { year, month },
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.scope.contains(event.date()) && self.owner_ids.iter().any(|id| id == event.user_id())
    }

    /// Owner ids split into bounded chunks for backends with query limits.
    pub fn owner_batches(&self, size: usize) -> impl Iterator<Item = &[UserId]> {
        self.owner_ids.chunks(size.max(1))
    }
}

/// Receiving end of a store subscription.
///
/// Each emission is the full event set matching the filter.
pub struct Subscription {
    filter: EventFilter,
    receiver: Receiver<Vec<Event>>,
}

impl Subscription {
    /// A subscription and the sender a store pushes emissions into.
    pub fn channel(filter: EventFilter) -> (Sender<Vec<Event>>, Subscription) {
        let (sender, receiver) = mpsc::channel();
        (sender, Subscription { filter, receiver })
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Drain pending emissions and keep only the newest.
    pub fn latest(&self) -> Option<Vec<Event>> {
        self.receiver.try_iter().last()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// Persistence the grid engine consumes.
#[cfg_attr(test, mockall::automock)]
pub trait EventStore {
    /// Follow the events matching `filter`. The current set is emitted
    /// immediately, then again after every mutation that touches it.
    fn subscribe(&mut self, filter: EventFilter) -> Result<Subscription, StoreError>;

    fn create(&mut self, draft: EventDraft) -> Result<EventId, StoreError>;

    /// Partial update; returns the revision the event now carries.
    fn update(&mut self, id: EventId, patch: EventPatch) -> Result<Revision, StoreError>;

    fn delete(&mut self, id: EventId) -> Result<(), StoreError>;
}

/// Open subscriptions of a store adapter.
#[derive(Default)]
pub(crate) struct Subscribers {
    entries: Vec<(EventFilter, Sender<Vec<Event>>)>,
}

impl Subscribers {
    /// Add a subscriber, sending it `initial` straight away.
    pub(crate) fn register(&mut self, filter: EventFilter, initial: Vec<Event>) -> Subscription {
        let (sender, subscription) = Subscription::channel(filter.clone());
        // The receiver is alive, so the first send cannot fail.
        let _ = sender.send(initial);
        self.entries.push((filter, sender));
        subscription
    }

    /// Send a fresh emission to every subscriber; closed ones are dropped.
    /// A `None` from `events_for` skips that subscriber for this round.
    pub(crate) fn publish<F>(&mut self, mut events_for: F)
    where
        F: FnMut(&EventFilter) -> Option<Vec<Event>>,
    {
        self.entries.retain(|(filter, sender)| {
            let Some(events) = events_for(filter) else {
                return true;
            };
            let alive = sender.send(events).is_ok();
            if !alive {
                log::debug!("Dropping closed subscription for {:?}", filter.scope);
            }
            alive
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::OwnerKey;
    use crate::models::slot::SlotRange;

    fn event(id: EventId, user: &str, date: NaiveDate) -> Event {
        EventDraft::new(
            OwnerKey::new(user, date),
            SlotRange::from_indices(0, 1).unwrap(),
            "x",
            "#000",
        )
        .into_event(id, 1)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_filter_matches_owner_and_date() {
        let filter = EventFilter::day(vec!["a".into(), "b".into()], ymd(2025, 3, 14));
        assert!(filter.matches(&event(1, "a", ymd(2025, 3, 14))));
        assert!(!filter.matches(&event(2, "c", ymd(2025, 3, 14))));
        assert!(!filter.matches(&event(3, "a", ymd(2025, 3, 15))));
    }

    #[test]
    fn test_month_filter_matches_whole_month() {
        let filter = EventFilter::month("a".into(), 2025, 3);
        assert!(filter.matches(&event(1, "a", ymd(2025, 3, 1))));
        assert!(filter.matches(&event(2, "a", ymd(2025, 3, 31))));
        assert!(!filter.matches(&event(3, "a", ymd(2025, 4, 1))));
        assert_eq!(filter.scope.month_key(), "2025-03");
    }

    #[test]
    fn test_owner_batches_chunk_by_size() {
        let owners: Vec<UserId> = (0..23).map(|i| format!("u{i}")).collect();
        let filter = EventFilter::day(owners, ymd(2025, 1, 1));
        let sizes: Vec<usize> = filter.owner_batches(OWNER_BATCH_SIZE).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![10, 10, 3]);
    }

    #[test]
    fn test_subscription_latest_keeps_newest() {
        let filter = EventFilter::day(vec!["a".into()], ymd(2025, 1, 1));
        let (sender, subscription) = Subscription::channel(filter);
        assert!(subscription.latest().is_none());

        sender.send(vec![]).unwrap();
        sender.send(vec![event(1, "a", ymd(2025, 1, 1))]).unwrap();
        let latest = subscription.latest().unwrap();
        assert_eq!(latest.len(), 1);
        assert!(subscription.latest().is_none());
    }

    #[test]
    fn test_publish_drops_closed_subscribers() {
        let mut subscribers = Subscribers::default();
        let filter = EventFilter::day(vec!["a".into()], ymd(2025, 1, 1));
        let kept = subscribers.register(filter.clone(), Vec::new());
        let dropped = subscribers.register(filter, Vec::new());
        drop(dropped);

        subscribers.publish(|_| Some(Vec::new()));
        assert_eq!(subscribers.len(), 1);
        assert!(kept.latest().is_some());
    }
}
