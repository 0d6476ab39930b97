//! Range selection within a single row.

use crate::models::slot::{SlotIndex, SlotRange};

/// A selected span of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub row: usize,
    pub range: SlotRange,
}

impl SelectionRange {
    pub fn contains(&self, row: usize, slot: SlotIndex) -> bool {
        self.row == row && self.range.contains(slot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    /// Pointer held: `anchor` is where the press happened, `head` follows it.
    Selecting {
        row: usize,
        anchor: SlotIndex,
        head: SlotIndex,
    },
    Selected(SelectionRange),
}

/// What a release asks the caller to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Nothing was being selected.
    None,
    /// Zero-width selection: open direct entry for this cell.
    SingleCell { row: usize, slot: SlotIndex },
    /// Open the new / template / paste menu for the range.
    OpenSelectionMenu(SelectionRange),
}

#[derive(Debug, Default)]
pub struct SelectionEngine {
    state: SelectionState,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, SelectionState::Selecting { .. })
    }

    /// Pointer-down on an empty cell.
    pub fn press(&mut self, row: usize, slot: SlotIndex) {
        log::debug!("selection: press at row {} slot {}", row, slot);
        self.state = SelectionState::Selecting {
            row,
            anchor: slot,
            head: slot,
        };
    }

    /// Pointer-move while held. The hovered row is ignored; selections never
    /// leave the row they started on.
    pub fn hover(&mut self, _row: usize, slot: SlotIndex) {
        if let SelectionState::Selecting { head, .. } = &mut self.state {
            *head = slot;
        }
    }

    pub fn release(&mut self) -> SelectionOutcome {
        let SelectionState::Selecting { row, anchor, head } = self.state else {
            return SelectionOutcome::None;
        };

        if anchor == head {
            self.state = SelectionState::Empty;
            return SelectionOutcome::SingleCell { row, slot: anchor };
        }

        let selection = SelectionRange {
            row,
            range: SlotRange::spanning(anchor, head),
        };
        self.state = SelectionState::Selected(selection);
        SelectionOutcome::OpenSelectionMenu(selection)
    }

    /// Select one cell outright, as a keyboard paste target.
    pub fn select_cell(&mut self, row: usize, slot: SlotIndex) {
        self.state = SelectionState::Selected(SelectionRange {
            row,
            range: SlotRange::single(slot),
        });
    }

    /// Click-away or explicit cancel.
    pub fn clear(&mut self) {
        if self.state != SelectionState::Empty {
            log::debug!("selection: cleared");
        }
        self.state = SelectionState::Empty;
    }

    /// The live or settled range, for highlighting.
    pub fn current(&self) -> Option<SelectionRange> {
        match self.state {
            SelectionState::Empty => None,
            SelectionState::Selecting { row, anchor, head } => Some(SelectionRange {
                row,
                range: SlotRange::spanning(anchor, head),
            }),
            SelectionState::Selected(selection) => Some(selection),
        }
    }

    /// A settled single cell, the target of a keyboard paste.
    pub fn selected_cell(&self) -> Option<(usize, SlotIndex)> {
        match self.state {
            SelectionState::Selected(selection) if selection.range.is_single() => {
                Some((selection.row, selection.range.start()))
            }
            _ => None,
        }
    }

    pub fn contains(&self, row: usize, slot: SlotIndex) -> bool {
        self.current()
            .map(|selection| selection.contains(row, slot))
            .unwrap_or(false)
    }
}
