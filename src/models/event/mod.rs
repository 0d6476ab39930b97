// Event module
// Slot-placed events and the payloads proposed to the event store

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::slot::SlotRange;

/// Store-assigned event identity.
pub type EventId = i64;
/// Identity of a person owning events.
pub type UserId = String;
/// Store-assigned, monotonically increasing mutation counter.
pub type Revision = u64;

/// The `(row identity, date)` pair events are partitioned and overlap-checked by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerKey {
    pub user_id: UserId,
    pub date: NaiveDate,
}

impl OwnerKey {
    pub fn new(user_id: impl Into<UserId>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            date,
        }
    }
}

/// A persisted, time-bound entry on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub owner: OwnerKey,
    pub range: SlotRange,
    pub title: String,
    pub color: String,
    pub revision: Revision,
}

impl Event {
    pub fn user_id(&self) -> &str {
        &self.owner.user_id
    }

    pub fn date(&self) -> NaiveDate {
        self.owner.date
    }

    /// `YYYY-MM`, stored alongside the date for month queries.
    pub fn month(&self) -> String {
        month_key(self.owner.date)
    }

    pub fn day(&self) -> u32 {
        self.owner.date.day()
    }

    /// Same owner and same date.
    pub fn shares_owner(&self, owner: &OwnerKey) -> bool {
        self.owner == *owner
    }
}

/// `YYYY-MM` key for a date.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// A new event proposed by the engine; the store assigns its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub owner: OwnerKey,
    pub range: SlotRange,
    pub title: String,
    pub color: String,
}

impl EventDraft {
    pub fn new(
        owner: OwnerKey,
        range: SlotRange,
        title: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            range,
            title: title.into(),
            color: color.into(),
        }
    }

    /// Validate the draft
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        validate_color(&self.color)?;
        if self.owner.user_id.trim().is_empty() {
            return Err("Event owner is required".to_string());
        }
        Ok(())
    }

    /// Materialize the event a store would hold for this draft.
    pub fn into_event(self, id: EventId, revision: Revision) -> Event {
        Event {
            id,
            owner: self.owner,
            range: self.range,
            title: self.title.trim().to_string(),
            color: self.color,
            revision,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub owner: Option<OwnerKey>,
    pub range: Option<SlotRange>,
    pub title: Option<String>,
    pub color: Option<String>,
}

impl EventPatch {
    /// Create a builder-style empty patch
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(mut self, owner: OwnerKey) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn range(mut self, range: SlotRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.range.is_none() && self.title.is_none() && self.color.is_none()
    }

    /// Validate only the fields that are present
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref title) = self.title {
            validate_title(title)?;
        }
        if let Some(ref color) = self.color {
            validate_color(color)?;
        }
        Ok(())
    }

    /// Apply onto an event, returning the patched copy.
    pub fn apply_to(&self, event: &Event) -> Event {
        let mut patched = event.clone();
        if let Some(ref owner) = self.owner {
            patched.owner = owner.clone();
        }
        if let Some(range) = self.range {
            patched.range = range;
        }
        if let Some(ref title) = self.title {
            patched.title = title.trim().to_string();
        }
        if let Some(ref color) = self.color {
            patched.color = color.clone();
        }
        patched
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Event title cannot be empty".to_string());
    }
    Ok(())
}

/// Hex color check shared by events and templates.
pub fn validate_color(color: &str) -> Result<(), String> {
    let valid = color.starts_with('#')
        && (color.len() == 7 || color.len() == 4)
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
    }
    Ok(())
}
