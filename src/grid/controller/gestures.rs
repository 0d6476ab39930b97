//! Pointer gestures: select, move, resize, paste placement.

use crate::error::{GridError, GridResult};
use crate::grid::drag::{hit_test, DragSession, HitTarget, PointerPos};
use crate::grid::interaction::{EditStep, InteractionState};
use crate::grid::overlap::OverlapCandidate;
use crate::grid::selection::{SelectionOutcome, SelectionRange};
use crate::models::event::{EventId, EventPatch};
use crate::models::slot::SlotIndex;
use crate::services::store::EventStore;

use super::GridController;

/// What a pointer release produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    None,
    /// A single empty cell was clicked.
    DirectEntry { row: usize, slot: SlotIndex },
    /// A range was selected; the action menu is open.
    SelectionMenu(SelectionRange),
    /// An event was clicked without dragging it.
    EventClicked(EventId),
    /// A drag ended where it began; nothing was written.
    Unchanged(EventId),
    Committed(EventId),
    Pasted(EventId),
}

impl<S: EventStore> GridController<S> {
    fn bar_hits(&self) -> Vec<(EventId, usize, crate::models::slot::SlotRange)> {
        self.events
            .iter()
            .filter_map(|event| {
                self.binder
                    .row_for_event(event)
                    .map(|row| (event.id, row, event.range))
            })
            .collect()
    }

    pub fn pointer_down(&mut self, pos: PointerPos) -> GridResult<()> {
        if self.state.is_gesture() {
            return Err(GridError::GestureInProgress);
        }

        if matches!(self.state, InteractionState::PasteArmed { .. }) {
            let cell = self.metrics.cell_at(pos);
            self.state.reset();
            return match cell {
                Some((row, slot)) => self.paste_at(row, slot).map(|_| ()),
                None => Ok(()),
            };
        }

        match hit_test(pos, &self.metrics, &self.bar_hits()) {
            Some(HitTarget::Cell { row, slot }) => {
                self.state.transition(InteractionState::Selecting)?;
                self.selected_event = None;
                self.selection.press(row, slot);
            }
            Some(target @ (HitTarget::EventBody { event_id, row }
            | HitTarget::EventHandle { event_id, row, .. })) => {
                let range = self.event_range(event_id)?;
                let session = DragSession::begin(target.mode(), event_id, row, range, pos);
                self.state.transition(InteractionState::Dragging(session))?;
                self.selection.clear();
            }
            None => {
                // Click-away.
                self.state.reset();
                self.selection.clear();
                self.selected_event = None;
            }
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, pos: PointerPos) {
        let metrics = self.metrics;
        match &mut self.state {
            InteractionState::Dragging(session) => session.update(pos, &metrics),
            InteractionState::Selecting => {
                if let Some((row, slot)) = metrics.cell_clamped(pos) {
                    self.selection.hover(row, slot);
                }
            }
            InteractionState::PasteArmed { hover } => *hover = metrics.cell_at(pos),
            _ => {}
        }
    }

    /// Finish the live gesture. The state is `Idle` or a dialog step
    /// afterwards, whatever the result.
    pub fn pointer_up(&mut self, pos: PointerPos) -> GridResult<GestureOutcome> {
        match std::mem::take(&mut self.state) {
            InteractionState::Selecting => {
                if let Some((row, slot)) = self.metrics.cell_clamped(pos) {
                    self.selection.hover(row, slot);
                }
                Ok(self.finish_selection())
            }
            InteractionState::Dragging(mut session) => {
                // Released outside the grid: abort, nothing is written.
                if self.metrics.cell_at(pos).is_none() {
                    session.revert();
                    log::debug!("drag: event {} released outside the grid", session.target);
                    return Ok(GestureOutcome::Unchanged(session.target));
                }
                session.update(pos, &self.metrics);
                self.finish_drag(session)
            }
            other => {
                self.state = other;
                Ok(GestureOutcome::None)
            }
        }
    }

    fn finish_selection(&mut self) -> GestureOutcome {
        match self.selection.release() {
            SelectionOutcome::None => GestureOutcome::None,
            SelectionOutcome::SingleCell { row, slot } => {
                self.selection.select_cell(row, slot);
                GestureOutcome::DirectEntry { row, slot }
            }
            SelectionOutcome::OpenSelectionMenu(selection) => {
                self.state = InteractionState::EditingEvent(EditStep::ChooseAction {
                    row: selection.row,
                    range: selection.range,
                });
                GestureOutcome::SelectionMenu(selection)
            }
        }
    }

    fn finish_drag(&mut self, session: DragSession) -> GridResult<GestureOutcome> {
        let id = session.target;
        if session.is_click() {
            self.selected_event = Some(id);
            self.state = InteractionState::EditingEvent(EditStep::EditExisting { event_id: id });
            return Ok(GestureOutcome::EventClicked(id));
        }
        if !session.has_changed() {
            log::debug!("drag: event {} released at its origin", id);
            return Ok(GestureOutcome::Unchanged(id));
        }
        if self.event(id).is_none() {
            return Err(self.fail(GridError::UnknownEvent(id)));
        }

        let owner = match self.binder.owner_for_row(session.current_row) {
            Ok(owner) => owner,
            Err(_) => return Err(self.fail(GridError::StaleView)),
        };
        let candidate = OverlapCandidate::new(owner.clone(), session.current).excluding(id);
        if self.is_blocked(&candidate) {
            return Err(self.fail(GridError::Conflict));
        }

        let patch = EventPatch::new().owner(owner).range(session.current);
        match self.store.update(id, patch) {
            Ok(revision) => {
                log::info!("Moved event {} to {} (revision {})", id, session.current, revision);
                self.own_revisions.insert(id, revision);
                self.selected_event = Some(id);
                self.refresh();
                Ok(GestureOutcome::Committed(id))
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Escape: abandon the gesture, dialog or paste mode.
    pub fn cancel(&mut self) {
        if let InteractionState::Dragging(session) = &mut self.state {
            session.revert();
        }
        self.state.reset();
        self.selection.clear();
    }
}
