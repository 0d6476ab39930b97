//! Move and resize gestures.
//!
//! A session starts on pointer-down over an event bar and evolves purely
//! from pointer displacement. The stored event is never touched until the
//! controller commits the session on release.

use crate::models::event::EventId;
use crate::models::slot::{SlotIndex, SlotRange, SLOTS_PER_DAY};

const LAST_SLOT: i64 = SLOTS_PER_DAY as i64 - 1;

/// What a pointer-down started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Range selection over empty cells, handled by the selection engine.
    Select,
    Move,
    ResizeLeft,
    ResizeRight,
}

/// Pointer position in grid-body coordinates (origin at slot 0 of row 0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Logical geometry the renderer shares with the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub slot_width: f32,
    pub row_height: f32,
    pub row_count: usize,
    pub drag_threshold: f32,
    pub handle_width: f32,
}

impl GridMetrics {
    pub fn new(slot_width: f32, row_height: f32, row_count: usize) -> Self {
        Self {
            slot_width,
            row_height,
            row_count,
            drag_threshold: 4.0,
            handle_width: 9.0,
        }
    }

    pub fn with_drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    pub fn with_handle_width(mut self, width: f32) -> Self {
        self.handle_width = width;
        self
    }

    /// Cell under the pointer, `None` outside the grid.
    pub fn cell_at(&self, pos: PointerPos) -> Option<(usize, SlotIndex)> {
        if pos.x < 0.0 || pos.y < 0.0 || self.slot_width <= 0.0 || self.row_height <= 0.0 {
            return None;
        }
        let row = (pos.y / self.row_height).floor() as usize;
        let slot = (pos.x / self.slot_width).floor() as i64;
        if row >= self.row_count {
            return None;
        }
        SlotIndex::new(slot).ok().map(|slot| (row, slot))
    }

    /// Nearest cell, pulling positions outside the grid back onto its edge.
    pub fn cell_clamped(&self, pos: PointerPos) -> Option<(usize, SlotIndex)> {
        if self.row_count == 0 || self.slot_width <= 0.0 || self.row_height <= 0.0 {
            return None;
        }
        let row = ((pos.y / self.row_height).floor() as i64).clamp(0, self.row_count as i64 - 1);
        let slot = SlotIndex::clamped((pos.x / self.slot_width).floor() as i64);
        Some((row as usize, slot))
    }

    /// Left edge of a slot in grid-body coordinates.
    pub fn slot_x(&self, slot: SlotIndex) -> f32 {
        slot.get() as f32 * self.slot_width
    }

    /// Top edge of a row.
    pub fn row_y(&self, row: usize) -> f32 {
        row as f32 * self.row_height
    }
}

/// `round(dx / slot_width)`
pub fn slot_delta(dx: f32, slot_width: f32) -> i64 {
    if slot_width <= 0.0 {
        return 0;
    }
    (dx / slot_width).round() as i64
}

/// Shift both ends by `delta`, keeping the whole span inside the day.
pub fn move_range(origin: SlotRange, delta: i64) -> SlotRange {
    let mut start = origin.start().as_i64() + delta;
    let mut end = origin.end().as_i64() + delta;
    if start < 0 {
        end -= start;
        start = 0;
    }
    if end > LAST_SLOT {
        start -= end - LAST_SLOT;
        end = LAST_SLOT;
    }
    SlotRange::spanning(SlotIndex::clamped(start), SlotIndex::clamped(end))
}

/// `start = clamp(origin_start + delta, 0, origin_end)`
pub fn resize_left(origin: SlotRange, delta: i64) -> SlotRange {
    let start = (origin.start().as_i64() + delta).clamp(0, origin.end().as_i64());
    SlotRange::spanning(SlotIndex::clamped(start), origin.end())
}

/// `end = clamp(origin_end + delta, origin_start, 95)`
pub fn resize_right(origin: SlotRange, delta: i64) -> SlotRange {
    let end = (origin.end().as_i64() + delta).clamp(origin.start().as_i64(), LAST_SLOT);
    SlotRange::spanning(origin.start(), SlotIndex::clamped(end))
}

/// `clamp(round(dy / row_height) + origin_row, 0, row_count - 1)`
pub fn move_row(origin_row: usize, dy: f32, row_height: f32, row_count: usize) -> usize {
    if row_count == 0 || row_height <= 0.0 {
        return origin_row;
    }
    let delta = (dy / row_height).round() as i64;
    (origin_row as i64 + delta).clamp(0, row_count as i64 - 1) as usize
}

/// Click versus drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pressed, not yet past the movement threshold.
    Pending,
    /// Past the threshold; the ghost follows the pointer.
    Active,
}

/// The one live manipulation gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub mode: DragMode,
    pub target: EventId,
    pub origin_row: usize,
    pub origin: SlotRange,
    pub pointer_origin: PointerPos,
    pub current_row: usize,
    pub current: SlotRange,
    pub phase: DragPhase,
}

impl DragSession {
    pub fn begin(
        mode: DragMode,
        target: EventId,
        row: usize,
        range: SlotRange,
        pointer: PointerPos,
    ) -> Self {
        log::debug!("drag: {:?} on event {} from row {} {}", mode, target, row, range);
        Self {
            mode,
            target,
            origin_row: row,
            origin: range,
            pointer_origin: pointer,
            current_row: row,
            current: range,
            phase: DragPhase::Pending,
        }
    }

    /// Recompute the candidate placement from the pointer position.
    pub fn update(&mut self, pointer: PointerPos, metrics: &GridMetrics) {
        let dx = pointer.x - self.pointer_origin.x;
        let dy = pointer.y - self.pointer_origin.y;

        if self.phase == DragPhase::Pending {
            if dx.abs() < metrics.drag_threshold && dy.abs() < metrics.drag_threshold {
                return;
            }
            log::debug!("drag: threshold passed for event {}", self.target);
            self.phase = DragPhase::Active;
        }

        let delta = slot_delta(dx, metrics.slot_width);
        match self.mode {
            DragMode::Move => {
                self.current = move_range(self.origin, delta);
                self.current_row =
                    move_row(self.origin_row, dy, metrics.row_height, metrics.row_count);
            }
            DragMode::ResizeLeft => self.current = resize_left(self.origin, delta),
            DragMode::ResizeRight => self.current = resize_right(self.origin, delta),
            DragMode::Select => {}
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == DragPhase::Active
    }

    /// Released before the threshold: a click on the event.
    pub fn is_click(&self) -> bool {
        self.phase == DragPhase::Pending
    }

    /// Current placement differs from the origin.
    pub fn has_changed(&self) -> bool {
        self.current_row != self.origin_row || self.current != self.origin
    }

    /// Snap back to the origin placement.
    pub fn revert(&mut self) {
        self.current_row = self.origin_row;
        self.current = self.origin;
    }
}

/// Which end of a bar a handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Result of a pointer-down hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Cell { row: usize, slot: SlotIndex },
    EventBody { event_id: EventId, row: usize },
    EventHandle { event_id: EventId, row: usize, edge: Edge },
}

impl HitTarget {
    pub fn mode(&self) -> DragMode {
        match self {
            HitTarget::Cell { .. } => DragMode::Select,
            HitTarget::EventBody { .. } => DragMode::Move,
            HitTarget::EventHandle { edge: Edge::Left, .. } => DragMode::ResizeLeft,
            HitTarget::EventHandle { edge: Edge::Right, .. } => DragMode::ResizeRight,
        }
    }
}

/// Find what lies under the pointer. Bars are `(id, row, range)`; later
/// entries win where they overlap.
pub fn hit_test(
    pos: PointerPos,
    metrics: &GridMetrics,
    bars: &[(EventId, usize, SlotRange)],
) -> Option<HitTarget> {
    let (row, slot) = metrics.cell_at(pos)?;

    for &(event_id, bar_row, range) in bars.iter().rev() {
        if bar_row != row || !range.contains(slot) {
            continue;
        }
        let left = metrics.slot_x(range.start());
        let right = left + range.len() as f32 * metrics.slot_width;
        // Handles shrink on narrow bars so the body stays grabbable.
        let handle = metrics.handle_width.min((right - left) / 3.0);

        let target = if pos.x - left < handle {
            HitTarget::EventHandle { event_id, row, edge: Edge::Left }
        } else if right - pos.x < handle {
            HitTarget::EventHandle { event_id, row, edge: Edge::Right }
        } else {
            HitTarget::EventBody { event_id, row }
        };
        return Some(target);
    }

    Some(HitTarget::Cell { row, slot })
}
