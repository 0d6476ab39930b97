//! Render projections. Nothing here is stored; the controller derives it
//! on demand from the event set and the interaction state.

use crate::models::event::EventId;
use crate::models::slot::SlotRange;

/// Where the ghost comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostSource {
    Drag(EventId),
    Paste,
}

/// Candidate placement of the live gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostPreview {
    pub row: usize,
    pub range: SlotRange,
    pub title: String,
    pub color: String,
    pub source: GhostSource,
    /// The placement would be rejected by the overlap check.
    pub blocked: bool,
}

/// One event mapped onto a visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBar {
    pub id: EventId,
    pub row: usize,
    pub range: SlotRange,
    pub title: String,
    pub color: String,
    pub selected: bool,
    /// Intersects another event of the same owner.
    pub conflicting: bool,
    /// Being moved or resized; the ghost shows where it goes.
    pub dragging: bool,
}

impl EventBar {
    /// `HH:MM〜HH:MM` plus title.
    pub fn caption(&self) -> String {
        format!("{} {}", self.range.label(), self.title)
    }
}
