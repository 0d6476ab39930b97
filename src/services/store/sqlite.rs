// SQLite event store
// Events persisted with their derived month/day columns; owner ids are
// queried in bounded batches

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use rusqlite::{params, params_from_iter, OptionalExtension};

use super::{
    EventFilter, EventStore, FilterScope, StoreError, Subscribers, Subscription, OWNER_BATCH_SIZE,
};
use crate::models::event::{month_key, Event, EventDraft, EventId, EventPatch, OwnerKey, Revision};
use crate::models::slot::SlotRange;
use crate::services::database::Database;

const EVENT_COLUMNS: &str = "id, user_id, date, start_idx, end_idx, title, color, revision";

pub struct SqliteEventStore {
    db: Database,
    batch_size: usize,
    revision: Revision,
    subscribers: Subscribers,
}

/// Raw column values before range validation.
struct EventRow {
    id: EventId,
    user_id: String,
    date: NaiveDate,
    start_idx: i64,
    end_idx: i64,
    title: String,
    color: String,
    revision: i64,
}

impl EventRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: row.get(2)?,
            start_idx: row.get(3)?,
            end_idx: row.get(4)?,
            title: row.get(5)?,
            color: row.get(6)?,
            revision: row.get(7)?,
        })
    }

    fn into_event(self) -> Result<Event> {
        let range = SlotRange::from_indices(self.start_idx, self.end_idx)
            .with_context(|| format!("Event {} has an invalid slot range", self.id))?;
        Ok(Event {
            id: self.id,
            owner: OwnerKey::new(self.user_id, self.date),
            range,
            title: self.title,
            color: self.color,
            revision: self.revision.max(0) as Revision,
        })
    }
}

impl SqliteEventStore {
    /// Wrap an open database, creating the schema if needed.
    pub fn new(db: Database) -> Result<Self> {
        db.initialize_schema()?;
        let revision: i64 = db
            .connection()
            .query_row("SELECT COALESCE(MAX(revision), 0) FROM events", [], |row| {
                row.get(0)
            })
            .context("Failed to read the current revision")?;

        Ok(Self {
            db,
            batch_size: OWNER_BATCH_SIZE,
            revision: revision.max(0) as Revision,
            subscribers: Subscribers::default(),
        })
    }

    pub fn open(path: &str) -> Result<Self> {
        Self::new(Database::new(path)?)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Get an event by ID
    pub fn get(&self, id: EventId) -> Result<Option<Event>> {
        load_event(&self.db, id)
    }

    /// Events matching the filter, one query per owner batch.
    pub fn query(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        query_events(&self.db, self.batch_size, filter)
    }

    fn next_revision(&mut self) -> Revision {
        self.revision += 1;
        self.revision
    }

    fn publish(&mut self) {
        let db = &self.db;
        let batch_size = self.batch_size;
        self.subscribers.publish(|filter| {
            query_events(db, batch_size, filter)
                .map_err(|err| log::error!("Failed to refresh subscription: {:#}", err))
                .ok()
        });
    }

    fn insert(&mut self, draft: &EventDraft) -> Result<EventId> {
        let revision = self.next_revision();
        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let date = draft.owner.date;

        self.db
            .connection()
            .execute(
                "INSERT INTO events (user_id, date, month, day, start_idx, end_idx, title, color,
                 revision, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
                params![
                    draft.owner.user_id,
                    date,
                    month_key(date),
                    date.day(),
                    draft.range.start().get(),
                    draft.range.end().get(),
                    draft.title.trim(),
                    draft.color,
                    revision as i64,
                    now,
                ],
            )
            .context("Failed to insert event")?;

        Ok(self.db.connection().last_insert_rowid())
    }

    fn write_patch(&mut self, id: EventId, patch: &EventPatch) -> Result<Option<Revision>> {
        let Some(current) = load_event(&self.db, id)? else {
            return Ok(None);
        };

        let mut patched = patch.apply_to(&current);
        patched.revision = self.next_revision();
        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let date = patched.date();

        self.db
            .connection()
            .execute(
                "UPDATE events SET
                 user_id = ?1, date = ?2, month = ?3, day = ?4, start_idx = ?5, end_idx = ?6,
                 title = ?7, color = ?8, revision = ?9, updated_at = ?10
                 WHERE id = ?11",
                params![
                    patched.owner.user_id,
                    date,
                    month_key(date),
                    date.day(),
                    patched.range.start().get(),
                    patched.range.end().get(),
                    patched.title,
                    patched.color,
                    patched.revision as i64,
                    now,
                    id,
                ],
            )
            .context("Failed to update event")?;

        Ok(Some(patched.revision))
    }
}

impl EventStore for SqliteEventStore {
    fn subscribe(&mut self, filter: EventFilter) -> Result<Subscription, StoreError> {
        let initial = self.query(&filter)?;
        Ok(self.subscribers.register(filter, initial))
    }

    fn create(&mut self, draft: EventDraft) -> Result<EventId, StoreError> {
        draft.validate().map_err(StoreError::Rejected)?;
        let id = self.insert(&draft)?;
        log::debug!("Inserted event {} for {}", id, draft.owner.user_id);

        self.publish();
        Ok(id)
    }

    fn update(&mut self, id: EventId, patch: EventPatch) -> Result<Revision, StoreError> {
        patch.validate().map_err(StoreError::Rejected)?;
        let revision = self
            .write_patch(id, &patch)?
            .ok_or(StoreError::NotFound(id))?;
        log::debug!("Updated event {} to revision {}", id, revision);

        self.publish();
        Ok(revision)
    }

    fn delete(&mut self, id: EventId) -> Result<(), StoreError> {
        let removed = self
            .db
            .connection()
            .execute("DELETE FROM events WHERE id = ?1", params![id])
            .context("Failed to delete event")?;
        if removed == 0 {
            return Err(StoreError::NotFound(id));
        }
        self.next_revision();

        self.publish();
        Ok(())
    }
}

fn load_event(db: &Database, id: EventId) -> Result<Option<Event>> {
    let sql = format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLUMNS);
    let row = db
        .connection()
        .query_row(&sql, params![id], EventRow::from_row)
        .optional()
        .context("Failed to load event")?;
    row.map(EventRow::into_event).transpose()
}

fn query_events(db: &Database, batch_size: usize, filter: &EventFilter) -> Result<Vec<Event>> {
    let (scope_column, scope_value) = match filter.scope {
        FilterScope::Day(date) => ("date", date.format("%Y-%m-%d").to_string()),
        FilterScope::Month { .. } => ("month", filter.scope.month_key()),
    };

    let mut events = Vec::new();
    for batch in filter.owner_batches(batch_size) {
        let placeholders = vec!["?"; batch.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM events WHERE {} = ? AND user_id IN ({})",
            EVENT_COLUMNS, scope_column, placeholders
        );
        let mut stmt = db
            .connection()
            .prepare(&sql)
            .context("Failed to prepare event query")?;

        let values = std::iter::once(scope_value.clone()).chain(batch.iter().cloned());
        let rows = stmt
            .query_map(params_from_iter(values), EventRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to fetch events")?;

        for row in rows {
            events.push(row.into_event()?);
        }
    }

    events.sort_by(|a, b| {
        (a.date(), a.user_id(), a.range.start()).cmp(&(b.date(), b.user_id(), b.range.start()))
    });
    Ok(events)
}
