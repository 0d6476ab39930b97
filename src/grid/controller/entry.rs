//! Entry dialogs, copy and paste.

use crate::error::{GridError, GridResult};
use crate::grid::clipboard::{Clipboard, PasteEntry};
use crate::grid::interaction::{EditStep, InteractionState};
use crate::grid::overlap::OverlapCandidate;
use crate::models::event::{EventDraft, EventId, EventPatch, Revision};
use crate::models::slot::{SlotIndex, SlotRange};
use crate::models::template::{Template, DEFAULT_COLOR};
use crate::services::store::EventStore;

use super::{GridController, Notice};

impl<S: EventStore> GridController<S> {
    // Copy and paste

    /// Copy the selected event. Returns whether anything was copied.
    pub fn copy_selected(&mut self) -> GridResult<bool> {
        match self.selected_event {
            Some(id) => self.copy_event(id).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn copy_event(&mut self, id: EventId) -> GridResult<()> {
        let Some(event) = self.event(id) else {
            return Err(GridError::UnknownEvent(id));
        };
        let clipboard = Clipboard::from_event(event);
        self.history.record(&clipboard.title, &clipboard.color);
        self.history_dirty = true;
        log::debug!("Copied \"{}\" ({} slots)", clipboard.title, clipboard.duration_slots);
        self.notices
            .push(Notice::info(format!("Copied \"{}\"", clipboard.title)));
        self.clipboard = Some(clipboard);
        Ok(())
    }

    /// Keyboard paste into the selected single cell.
    pub fn paste_shortcut(&mut self) -> GridResult<Option<EventId>> {
        if self.clipboard.is_none() {
            return Err(self.fail(GridError::EmptyClipboard));
        }
        match self.selection.selected_cell() {
            Some((row, slot)) => self.paste_at(row, slot).map(Some),
            None => Ok(None),
        }
    }

    /// Enter paste mode; the next grid click places the clipboard.
    pub fn arm_paste(&mut self) -> GridResult<()> {
        if self.clipboard.is_none() {
            return Err(self.fail(GridError::EmptyClipboard));
        }
        self.state
            .transition(InteractionState::PasteArmed { hover: None })?;
        self.selection.clear();
        Ok(())
    }

    pub fn is_paste_armed(&self) -> bool {
        matches!(self.state, InteractionState::PasteArmed { .. })
    }

    pub(super) fn paste_at(&mut self, row: usize, slot: SlotIndex) -> GridResult<EventId> {
        let Some(clipboard) = self.clipboard.clone() else {
            return Err(self.fail(GridError::EmptyClipboard));
        };
        let range = clipboard.range_at(slot);
        let id = self.create_checked(row, range, &clipboard.title, &clipboard.color)?;
        self.selection.clear();
        Ok(id)
    }

    // Entry flow

    /// Open the action menu for a range, as a completed selection does.
    pub fn begin_new_entry(&mut self, row: usize, range: SlotRange) -> GridResult<()> {
        self.binder.owner_for_row(row)?;
        self.state
            .transition(InteractionState::EditingEvent(EditStep::ChooseAction { row, range }))
    }

    /// Direct entry for a single clicked cell.
    pub fn begin_direct_entry(&mut self, row: usize, slot: SlotIndex) -> GridResult<()> {
        self.binder.owner_for_row(row)?;
        self.state
            .transition(InteractionState::EditingEvent(EditStep::NewEntry {
                row,
                range: SlotRange::single(slot),
                title: String::new(),
                color: DEFAULT_COLOR.to_string(),
            }))
    }

    fn chosen_range(&self) -> GridResult<(usize, SlotRange)> {
        match self.state.edit_step() {
            Some(EditStep::ChooseAction { row, range }) => Ok((*row, *range)),
            _ => Err(GridError::StaleView),
        }
    }

    fn open_form(&mut self, title: &str, color: &str) -> GridResult<()> {
        let (row, range) = self.chosen_range()?;
        self.state
            .transition(InteractionState::EditingEvent(EditStep::NewEntry {
                row,
                range,
                title: title.to_string(),
                color: color.to_string(),
            }))
    }

    /// Blank form for the chosen range.
    pub fn choose_new(&mut self) -> GridResult<()> {
        self.open_form("", DEFAULT_COLOR)
    }

    /// Form prefilled from a template.
    pub fn choose_template(&mut self, template: &Template) -> GridResult<()> {
        self.open_form(&template.title, &template.color)
    }

    /// Create straight from a ranked paste candidate.
    pub fn choose_candidate(&mut self, entry: &PasteEntry) -> GridResult<EventId> {
        let (row, range) = self.chosen_range()?;
        let id = self.create_checked(row, range, &entry.title, &entry.color)?;
        self.close_dialog();
        Ok(id)
    }

    /// Save the new-entry form.
    pub fn save_new_entry(&mut self, title: &str, color: &str, range: SlotRange) -> GridResult<EventId> {
        let row = match self.state.edit_step() {
            Some(EditStep::NewEntry { row, .. }) => *row,
            _ => return Err(GridError::StaleView),
        };
        let id = self.create_checked(row, range, title, color)?;
        self.close_dialog();
        Ok(id)
    }

    fn create_checked(
        &mut self,
        row: usize,
        range: SlotRange,
        title: &str,
        color: &str,
    ) -> GridResult<EventId> {
        let owner = match self.binder.owner_for_row(row) {
            Ok(owner) => owner,
            Err(_) => return Err(self.fail(GridError::StaleView)),
        };
        let draft = EventDraft::new(owner.clone(), range, title.trim(), color);
        if let Err(message) = draft.validate() {
            return Err(self.fail(GridError::InvalidDraft(message)));
        }
        if self.is_blocked(&OverlapCandidate::new(owner, range)) {
            return Err(self.fail(GridError::Conflict));
        }

        match self.store.create(draft) {
            Ok(id) => {
                log::info!("Created event {} at row {} {}", id, row, range);
                self.selected_event = Some(id);
                self.refresh();
                Ok(id)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Open the edit dialog of an event.
    pub fn open_edit(&mut self, id: EventId) -> GridResult<()> {
        self.event_range(id)?;
        self.state
            .transition(InteractionState::EditingEvent(EditStep::EditExisting { event_id: id }))?;
        self.selected_event = Some(id);
        Ok(())
    }

    /// Save the edit dialog. Only changed fields are sent; an unchanged
    /// form makes no store call and returns `None`.
    pub fn save_edit(
        &mut self,
        id: EventId,
        title: &str,
        color: &str,
        range: SlotRange,
    ) -> GridResult<Option<Revision>> {
        let Some(event) = self.event(id) else {
            return Err(self.fail(GridError::UnknownEvent(id)));
        };

        let title = title.trim();
        let mut patch = EventPatch::new();
        if title != event.title {
            patch = patch.title(title);
        }
        if color != event.color {
            patch = patch.color(color);
        }
        if range != event.range {
            patch = patch.range(range);
        }
        let owner = event.owner.clone();

        if patch.is_empty() {
            log::debug!("Edit of event {} changed nothing", id);
            self.close_dialog();
            return Ok(None);
        }
        if let Err(message) = patch.validate() {
            return Err(self.fail(GridError::InvalidDraft(message)));
        }
        if patch.range.is_some()
            && self.is_blocked(&OverlapCandidate::new(owner, range).excluding(id))
        {
            return Err(self.fail(GridError::Conflict));
        }

        match self.store.update(id, patch) {
            Ok(revision) => {
                log::info!("Updated event {} (revision {})", id, revision);
                self.own_revisions.insert(id, revision);
                self.close_dialog();
                self.refresh();
                Ok(Some(revision))
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Ask for confirmation before deleting the selected event.
    pub fn request_delete(&mut self) -> GridResult<bool> {
        let Some(id) = self.selected_event else {
            return Ok(false);
        };
        self.state
            .transition(InteractionState::EditingEvent(EditStep::ConfirmDelete { event_id: id }))?;
        Ok(true)
    }

    pub fn confirm_delete(&mut self) -> GridResult<EventId> {
        let id = match self.state.edit_step() {
            Some(EditStep::ConfirmDelete { event_id }) => *event_id,
            _ => return Err(GridError::StaleView),
        };

        match self.store.delete(id) {
            Ok(()) => {
                log::info!("Deleted event {}", id);
                // Any emission still carrying the event is older than the delete.
                self.own_revisions.insert(id, Revision::MAX);
                self.selected_event = None;
                self.close_dialog();
                self.refresh();
                Ok(id)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Close whatever dialog is open; selections made for it are dropped.
    pub fn close_dialog(&mut self) {
        if self.state.edit_step().is_some() {
            self.state.reset();
            if !matches!(self.selection.current(), Some(sel) if sel.range.is_single()) {
                self.selection.clear();
            }
        }
    }
}
