// In-memory event store
// Backs tests and the demo data set; emissions are delivered synchronously

use std::collections::BTreeMap;

use super::{EventFilter, EventStore, StoreError, Subscribers, Subscription};
use crate::models::event::{Event, EventDraft, EventId, EventPatch, Revision};

#[derive(Default)]
pub struct InMemoryEventStore {
    events: BTreeMap<EventId, Event>,
    next_id: EventId,
    revision: Revision,
    subscribers: Subscribers,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with already-persisted events, keeping their ids.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut store = Self::new();
        for event in events {
            store.next_id = store.next_id.max(event.id);
            store.revision = store.revision.max(event.revision);
            store.events.insert(event.id, event);
        }
        store
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    /// Every stored event ordered by id.
    pub fn all(&self) -> Vec<Event> {
        self.events.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn matching(&self, filter: &EventFilter) -> Vec<Event> {
        self.events
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect()
    }

    fn bump_revision(&mut self) -> Revision {
        self.revision += 1;
        self.revision
    }

    fn publish(&mut self) {
        let events = &self.events;
        self.subscribers.publish(|filter| {
            Some(
                events
                    .values()
                    .filter(|event| filter.matches(event))
                    .cloned()
                    .collect(),
            )
        });
    }
}

impl EventStore for InMemoryEventStore {
    fn subscribe(&mut self, filter: EventFilter) -> Result<Subscription, StoreError> {
        let initial = self.matching(&filter);
        Ok(self.subscribers.register(filter, initial))
    }

    fn create(&mut self, draft: EventDraft) -> Result<EventId, StoreError> {
        draft.validate().map_err(StoreError::Rejected)?;

        self.next_id += 1;
        let id = self.next_id;
        let revision = self.bump_revision();
        self.events.insert(id, draft.into_event(id, revision));
        log::debug!("Created event {} at revision {}", id, revision);

        self.publish();
        Ok(id)
    }

    fn update(&mut self, id: EventId, patch: EventPatch) -> Result<Revision, StoreError> {
        patch.validate().map_err(StoreError::Rejected)?;
        if !self.events.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }

        let revision = self.bump_revision();
        if let Some(event) = self.events.get_mut(&id) {
            let mut patched = patch.apply_to(event);
            patched.revision = revision;
            *event = patched;
        }
        log::debug!("Updated event {} to revision {}", id, revision);

        self.publish();
        Ok(revision)
    }

    fn delete(&mut self, id: EventId) -> Result<(), StoreError> {
        if self.events.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        self.bump_revision();
        log::debug!("Deleted event {}", id);

        self.publish();
        Ok(())
    }
}
