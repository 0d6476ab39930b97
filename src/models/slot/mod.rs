// Slot/Time model
// Conversion between wall-clock time and the 96-slot index space

use std::fmt;

use chrono::{Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// Number of slots in a day.
pub const SLOTS_PER_DAY: u8 = 96;
/// Length of a single slot in minutes.
pub const SLOT_MINUTES: u32 = 15;
/// Slots per hour.
pub const SLOTS_PER_HOUR: u8 = 4;

/// One quarter-hour slot of a day, always within `0..=95`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlotIndex(u8);

impl SlotIndex {
    pub const FIRST: SlotIndex = SlotIndex(0);
    pub const LAST: SlotIndex = SlotIndex(SLOTS_PER_DAY - 1);

    /// Validate a raw index.
    ///
    /// # Examples
    /// ```
    /// use slot_grid::models::slot::SlotIndex;
    ///
    /// assert_eq!(SlotIndex::new(36).unwrap().get(), 36);
    /// assert!(SlotIndex::new(96).is_err());
    /// ```
    pub fn new(idx: i64) -> GridResult<Self> {
        if (0..SLOTS_PER_DAY as i64).contains(&idx) {
            Ok(Self(idx as u8))
        } else {
            Err(GridError::invalid_range(idx, idx))
        }
    }

    /// Clamp any integer into the valid slot space.
    pub fn clamped(idx: i64) -> Self {
        Self(idx.clamp(0, Self::LAST.0 as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }

    /// `hour * 4 + minute / 15`
    pub fn from_wall_clock(hour: u32, minute: u32) -> GridResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(GridError::InvalidTime { hour, minute });
        }
        Ok(Self((hour * SLOTS_PER_HOUR as u32 + minute / SLOT_MINUTES) as u8))
    }

    /// Start of the slot as `(hour, minute)`.
    pub fn wall_clock(self) -> (u32, u32) {
        boundary_wall_clock(self.0 as u32)
    }

    /// Slot containing the given time of day.
    pub fn from_time(time: NaiveTime) -> Self {
        Self((time.hour() * SLOTS_PER_HOUR as u32 + time.minute() / SLOT_MINUTES) as u8)
    }

    pub fn start_time(self) -> NaiveTime {
        let (hour, minute) = self.wall_clock();
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// `HH:MM` label of the slot start.
    pub fn label(self) -> String {
        boundary_label(self.0 as u32)
    }

    /// Iterate over every slot of the day.
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..SLOTS_PER_DAY).map(SlotIndex)
    }

    pub fn is_hour_start(self) -> bool {
        self.0 % SLOTS_PER_HOUR == 0
    }
}

impl TryFrom<u8> for SlotIndex {
    type Error = GridError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SlotIndex::new(value as i64)
    }
}

impl From<SlotIndex> for u8 {
    fn from(value: SlotIndex) -> Self {
        value.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive slot range; `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRange {
    start: SlotIndex,
    end: SlotIndex,
}

impl SlotRange {
    pub fn new(start: SlotIndex, end: SlotIndex) -> GridResult<Self> {
        if start > end {
            return Err(GridError::invalid_range(start.as_i64(), end.as_i64()));
        }
        Ok(Self { start, end })
    }

    /// Build from raw indices, validating both bounds and the order.
    pub fn from_indices(start: i64, end: i64) -> GridResult<Self> {
        if start > end {
            return Err(GridError::invalid_range(start, end));
        }
        Self::new(SlotIndex::new(start)?, SlotIndex::new(end)?)
    }

    /// Order two slots into a range.
    pub fn spanning(a: SlotIndex, b: SlotIndex) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn single(slot: SlotIndex) -> Self {
        Self {
            start: slot,
            end: slot,
        }
    }

    /// Range starting at `start` covering `duration_slots` more slots,
    /// cut off at the end of the day.
    pub fn anchored(start: SlotIndex, duration_slots: u8) -> Self {
        Self {
            start,
            end: SlotIndex::clamped(start.as_i64() + duration_slots as i64),
        }
    }

    pub fn start(&self) -> SlotIndex {
        self.start
    }

    pub fn end(&self) -> SlotIndex {
        self.end
    }

    /// `end - start`, the duration the clipboard remembers.
    pub fn span(&self) -> u8 {
        self.end.0 - self.start.0
    }

    /// Number of slots covered.
    pub fn len(&self) -> usize {
        self.span() as usize + 1
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, slot: SlotIndex) -> bool {
        self.start <= slot && slot <= self.end
    }

    /// Closed-interval intersection.
    pub fn intersects(&self, other: &SlotRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// `HH:MM〜HH:MM` with an exclusive end label.
    pub fn label(&self) -> String {
        format!(
            "{}〜{}",
            boundary_label(self.start.0 as u32),
            boundary_label(self.end.0 as u32 + 1)
        )
    }

    pub fn duration_minutes(&self) -> u32 {
        self.len() as u32 * SLOT_MINUTES
    }
}

impl fmt::Display for SlotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// `hour * 4 + floor(minute / 15)`
pub fn to_slot_index(hour: u32, minute: u32) -> GridResult<SlotIndex> {
    SlotIndex::from_wall_clock(hour, minute)
}

/// Start of slot `idx` as `(hour, minute)`.
pub fn to_wall_clock(idx: i64) -> GridResult<(u32, u32)> {
    Ok(SlotIndex::new(idx)?.wall_clock())
}

/// Display label for an inclusive range. The end label names the exclusive
/// boundary, so slot 95 ends at `00:00`.
pub fn format_range(start: i64, end: i64) -> GridResult<String> {
    Ok(SlotRange::from_indices(start, end)?.label())
}

/// Parse an `HH:MM` label into a slot boundary in `0..=96`.
/// `24:00` is accepted as the end-of-day boundary.
pub fn parse_time_label(label: &str) -> GridResult<u32> {
    let invalid = || GridError::InvalidTime {
        hour: u32::MAX,
        minute: u32::MAX,
    };
    let (hour, minute) = label.trim().split_once(':').ok_or_else(invalid)?;
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;

    if hour == 24 && minute == 0 {
        return Ok(SLOTS_PER_DAY as u32);
    }
    Ok(to_slot_index(hour, minute)?.get() as u32)
}

/// Turn a start label and an exclusive end label into a slot range.
///
/// An end of `00:00` is read as the end of the day. A reversed pair is
/// swapped rather than rejected.
pub fn range_from_labels(start: &str, end: &str) -> GridResult<SlotRange> {
    let start_boundary = parse_time_label(start)?;
    let mut end_boundary = parse_time_label(end)?;
    if end_boundary == 0 {
        end_boundary = SLOTS_PER_DAY as u32;
    }

    let first = SlotIndex::clamped(start_boundary as i64);
    let last = SlotIndex::clamped(end_boundary as i64 - 1);
    Ok(SlotRange::spanning(first, last))
}

/// Slot containing the current local time.
pub fn now_slot() -> SlotIndex {
    SlotIndex::from_time(Local::now().time())
}

fn boundary_wall_clock(boundary: u32) -> (u32, u32) {
    let boundary = boundary % SLOTS_PER_DAY as u32;
    (
        boundary / SLOTS_PER_HOUR as u32,
        (boundary % SLOTS_PER_HOUR as u32) * SLOT_MINUTES,
    )
}

/// `HH:MM` for a boundary in `0..=96`; 96 wraps to `00:00`.
fn boundary_label(boundary: u32) -> String {
    let (hour, minute) = boundary_wall_clock(boundary);
    format!("{:02}:{:02}", hour, minute)
}
