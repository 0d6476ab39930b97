//! The single interaction state of a grid.
//!
//! Every mode the grid can be in is one variant, and transitions are
//! checked here rather than by scattered flags.

use crate::error::{GridError, GridResult};
use crate::grid::drag::DragSession;
use crate::models::event::EventId;
use crate::models::slot::{SlotIndex, SlotRange};

/// Steps of the entry and edit dialogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStep {
    /// Menu for a fresh selection: new, template or paste candidate.
    ChooseAction { row: usize, range: SlotRange },
    /// Form for a new entry.
    NewEntry {
        row: usize,
        range: SlotRange,
        title: String,
        color: String,
    },
    /// Edit or copy an existing entry.
    EditExisting { event_id: EventId },
    ConfirmDelete { event_id: EventId },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Drag-select in progress; the selection engine holds the range.
    Selecting,
    Dragging(DragSession),
    /// Paste mode: the next click places the clipboard.
    PasteArmed { hover: Option<(usize, SlotIndex)> },
    EditingEvent(EditStep),
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Selecting => "selecting",
            InteractionState::Dragging(_) => "dragging",
            InteractionState::PasteArmed { .. } => "paste-armed",
            InteractionState::EditingEvent(_) => "editing",
        }
    }

    /// A pointer button is held by a gesture.
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            InteractionState::Selecting | InteractionState::Dragging(_)
        )
    }

    pub fn drag(&self) -> Option<&DragSession> {
        match self {
            InteractionState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn edit_step(&self) -> Option<&EditStep> {
        match self {
            InteractionState::EditingEvent(step) => Some(step),
            _ => None,
        }
    }

    /// Check and perform a transition.
    ///
    /// While a gesture holds the pointer only its own continuation or a
    /// return to `Idle` is allowed, so a second gesture can never start.
    pub fn transition(&mut self, next: InteractionState) -> GridResult<()> {
        let allowed = match (&*self, &next) {
            (_, InteractionState::Idle) => true,
            (InteractionState::Dragging(_), InteractionState::Dragging(_)) => true,
            (InteractionState::Selecting, InteractionState::Selecting) => true,
            (current, _) if current.is_gesture() => false,
            // Paste mode stays armed through hovers and only yields to idle.
            (InteractionState::PasteArmed { .. }, InteractionState::PasteArmed { .. }) => true,
            (InteractionState::PasteArmed { .. }, _) => false,
            _ => true,
        };

        if !allowed {
            log::debug!("interaction: {} -> {} rejected", self.name(), next.name());
            return Err(GridError::GestureInProgress);
        }
        if self.name() != next.name() {
            log::debug!("interaction: {} -> {}", self.name(), next.name());
        }
        *self = next;
        Ok(())
    }

    /// Drop whatever is in progress.
    pub fn reset(&mut self) {
        if !matches!(self, InteractionState::Idle) {
            log::debug!("interaction: {} discarded", self.name());
        }
        *self = InteractionState::Idle;
    }
}
