//! Error taxonomy for the grid engine.
//!
//! Every variant is scoped to a single gesture or a single store call; none
//! of them is fatal to the process.

use thiserror::Error;

use crate::models::event::EventId;
use crate::services::store::StoreError;

#[derive(Debug, Error)]
pub enum GridError {
    /// Wall-clock input outside 00:00..=23:59.
    #[error("invalid time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    /// Slot index outside [0,95] or an inverted range.
    #[error("invalid slot range {start}..={end}")]
    InvalidRange { start: i64, end: i64 },

    /// The candidate placement intersects an existing entry.
    #[error("overlaps an existing entry")]
    Conflict,

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A gesture or selection referred to rows of a view that has changed.
    #[error("the view changed while the gesture was in progress")]
    StaleView,

    /// A pointer-down arrived while another gesture still owns the pointer.
    #[error("another gesture is already in progress")]
    GestureInProgress,

    #[error("nothing has been copied yet")]
    EmptyClipboard,

    #[error("{0}")]
    InvalidDraft(String),

    #[error("row {0} is not part of the current view")]
    UnknownRow(usize),

    #[error("event {0} is not part of the current view")]
    UnknownEvent(EventId),
}

pub type GridResult<T> = Result<T, GridError>;

impl GridError {
    pub(crate) fn invalid_range(start: impl Into<i64>, end: impl Into<i64>) -> Self {
        GridError::InvalidRange {
            start: start.into(),
            end: end.into(),
        }
    }
}
