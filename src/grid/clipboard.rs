//! Single-slot copy buffer and the frequency-ranked paste history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::event::Event;
use crate::models::slot::{SlotIndex, SlotRange};

/// Number of ranked candidates offered for quick creation.
pub const RANKED_CANDIDATES: usize = 10;

/// What an explicit copy captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipboard {
    pub title: String,
    pub color: String,
    /// `end - start` of the copied event.
    pub duration_slots: u8,
}

impl Clipboard {
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            color: event.color.clone(),
            duration_slots: event.range.span(),
        }
    }

    /// Range a paste anchored at `start` covers, cut at the end of the day.
    pub fn range_at(&self, start: SlotIndex) -> SlotRange {
        SlotRange::anchored(start, self.duration_slots)
    }
}

/// One `(title, color)` key and how often it was copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteEntry {
    pub title: String,
    pub color: String,
    pub count: u32,
}

/// Occurrence counts of copied `(title, color)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteHistory {
    counts: BTreeMap<(String, String), u32>,
}

impl PasteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = PasteEntry>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            if entry.count == 0 {
                continue;
            }
            *history
                .counts
                .entry((entry.title, entry.color))
                .or_insert(0) += entry.count;
        }
        history
    }

    pub fn record(&mut self, title: &str, color: &str) {
        let count = self
            .counts
            .entry((title.to_string(), color.to_string()))
            .or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn count(&self, title: &str, color: &str) -> u32 {
        self.counts
            .get(&(title.to_string(), color.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries by descending count; ties by title, then color.
    pub fn ranked(&self, limit: usize) -> Vec<PasteEntry> {
        let mut entries = self.entries();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.color.cmp(&b.color))
        });
        entries.truncate(limit);
        entries
    }

    /// Top candidates shown in the selection menu.
    pub fn top(&self) -> Vec<PasteEntry> {
        self.ranked(RANKED_CANDIDATES)
    }

    pub fn entries(&self) -> Vec<PasteEntry> {
        self.counts
            .iter()
            .map(|((title, color), count)| PasteEntry {
                title: title.clone(),
                color: color.clone(),
                count: *count,
            })
            .collect()
    }
}
