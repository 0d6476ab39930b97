// Entry Dialog
// Selection menu, new-entry form, edit form and delete confirmation

use egui::{Color32, RichText, Stroke, Vec2};

use crate::grid::{EditStep, PasteEntry};
use crate::models::event::{Event, EventId};
use crate::models::slot::{range_from_labels, SlotRange};
use crate::models::template::{Template, PALETTE};
use crate::ui_egui::views::{contrast_text, parse_color};

/// What the user asked for this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryDialogAction {
    None,
    Close,
    ChooseNew,
    ChooseTemplate(Template),
    ChooseCandidate(PasteEntry),
    SaveNew {
        title: String,
        color: String,
        range: SlotRange,
    },
    SaveEdit {
        id: EventId,
        title: String,
        color: String,
        range: SlotRange,
    },
    Copy(EventId),
    RequestDelete,
    ConfirmDelete,
}

/// Form fields, reloaded whenever the dialog step changes.
#[derive(Default)]
pub struct EntryDialogState {
    step: Option<EditStep>,
    pub title: String,
    pub color: String,
    pub start_label: String,
    pub end_label: String,
    pub error: Option<String>,
}

/// `(start label, exclusive end label)` as shown in the form.
fn range_labels(range: SlotRange) -> (String, String) {
    let label = range.label();
    match label.split_once('〜') {
        Some((start, end)) => (start.to_string(), end.to_string()),
        None => (label, String::new()),
    }
}

impl EntryDialogState {
    /// Reload the fields if the controller moved to another step.
    pub fn sync(&mut self, step: Option<&EditStep>, event: Option<&Event>) {
        if self.step.as_ref() == step {
            return;
        }
        self.step = step.cloned();
        self.error = None;

        match step {
            Some(EditStep::NewEntry { range, title, color, .. }) => {
                self.title = title.clone();
                self.color = color.clone();
                (self.start_label, self.end_label) = range_labels(*range);
            }
            Some(EditStep::EditExisting { .. }) => {
                if let Some(event) = event {
                    self.title = event.title.clone();
                    self.color = event.color.clone();
                    (self.start_label, self.end_label) = range_labels(event.range);
                }
            }
            _ => {}
        }
    }

    fn parsed_range(&mut self) -> Option<SlotRange> {
        match range_from_labels(&self.start_label, &self.end_label) {
            Ok(range) => Some(range),
            Err(_) => {
                self.error = Some("Times must look like 09:15".to_string());
                None
            }
        }
    }
}

pub fn render_entry_dialog(
    ctx: &egui::Context,
    state: &mut EntryDialogState,
    step: &EditStep,
    event: Option<&Event>,
    templates: &[Template],
    candidates: &[PasteEntry],
) -> EntryDialogAction {
    let mut action = EntryDialogAction::None;
    let mut open = true;

    let title = match step {
        EditStep::ChooseAction { .. } => "New entry",
        EditStep::NewEntry { .. } => "Entry",
        EditStep::EditExisting { .. } => "Edit entry",
        EditStep::ConfirmDelete { .. } => "Delete entry",
    };

    egui::Window::new(title)
        .id(egui::Id::new("entry_dialog"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            action = match step {
                EditStep::ChooseAction { range, .. } => {
                    render_choose_action(ui, *range, templates, candidates)
                }
                EditStep::NewEntry { .. } => render_form(ui, state, None),
                EditStep::EditExisting { event_id } => match event {
                    Some(event) => {
                        let form = render_form(ui, state, Some(*event_id));
                        let extras = render_edit_extras(ui, event);
                        if form == EntryDialogAction::None {
                            extras
                        } else {
                            form
                        }
                    }
                    None => {
                        ui.label("This entry no longer exists.");
                        EntryDialogAction::None
                    }
                },
                EditStep::ConfirmDelete { .. } => render_confirm_delete(ui, event),
            };
        });

    if !open {
        return EntryDialogAction::Close;
    }
    action
}

fn render_choose_action(
    ui: &mut egui::Ui,
    range: SlotRange,
    templates: &[Template],
    candidates: &[PasteEntry],
) -> EntryDialogAction {
    let mut action = EntryDialogAction::None;
    ui.label(RichText::new(range.label()).strong());
    ui.separator();

    if ui.button("➕ New entry…").clicked() {
        action = EntryDialogAction::ChooseNew;
    }

    if !templates.is_empty() {
        ui.add_space(6.0);
        ui.label(RichText::new("Templates").small().weak());
        ui.horizontal_wrapped(|ui| {
            for template in templates {
                if color_chip_button(ui, &template.title, &template.color).clicked() {
                    action = EntryDialogAction::ChooseTemplate(template.clone());
                }
            }
        });
    }

    if !candidates.is_empty() {
        ui.add_space(6.0);
        ui.label(RichText::new("Paste").small().weak());
        ui.horizontal_wrapped(|ui| {
            for candidate in candidates {
                let label = format!("{} ×{}", candidate.title, candidate.count);
                if color_chip_button(ui, &label, &candidate.color).clicked() {
                    action = EntryDialogAction::ChooseCandidate(candidate.clone());
                }
            }
        });
    }

    ui.add_space(6.0);
    if ui.button("Cancel").clicked() {
        action = EntryDialogAction::Close;
    }
    action
}

fn render_form(
    ui: &mut egui::Ui,
    state: &mut EntryDialogState,
    editing: Option<EventId>,
) -> EntryDialogAction {
    let mut action = EntryDialogAction::None;

    egui::Grid::new("entry_form")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Title:");
            ui.text_edit_singleline(&mut state.title);
            ui.end_row();

            ui.label("Time:");
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut state.start_label).desired_width(48.0));
                ui.label("〜");
                ui.add(egui::TextEdit::singleline(&mut state.end_label).desired_width(48.0));
            });
            ui.end_row();
        });

    ui.add_space(4.0);
    render_palette(ui, &mut state.color);

    if let Some(error) = &state.error {
        ui.colored_label(Color32::from_rgb(200, 50, 50), error);
    }

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            if let Some(range) = state.parsed_range() {
                action = match editing {
                    Some(id) => EntryDialogAction::SaveEdit {
                        id,
                        title: state.title.clone(),
                        color: state.color.clone(),
                        range,
                    },
                    None => EntryDialogAction::SaveNew {
                        title: state.title.clone(),
                        color: state.color.clone(),
                        range,
                    },
                };
            }
        }
        if ui.button("Cancel").clicked() {
            action = EntryDialogAction::Close;
        }
    });
    action
}

fn render_edit_extras(ui: &mut egui::Ui, event: &Event) -> EntryDialogAction {
    let mut action = EntryDialogAction::None;
    ui.horizontal(|ui| {
        if ui.button("📋 Copy").clicked() {
            action = EntryDialogAction::Copy(event.id);
        }
        if ui.button("🗑 Delete").clicked() {
            action = EntryDialogAction::RequestDelete;
        }
    });
    action
}

fn render_confirm_delete(ui: &mut egui::Ui, event: Option<&Event>) -> EntryDialogAction {
    let mut action = EntryDialogAction::None;
    match event {
        Some(event) => {
            ui.label(format!("Delete \"{}\" ({})?", event.title, event.range.label()));
        }
        None => {
            ui.label("This entry no longer exists.");
        }
    }
    ui.horizontal(|ui| {
        if event.is_some() && ui.button("Delete").clicked() {
            action = EntryDialogAction::ConfirmDelete;
        }
        if ui.button("Cancel").clicked() {
            action = EntryDialogAction::Close;
        }
    });
    action
}

pub(super) fn render_palette(ui: &mut egui::Ui, selected: &mut String) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = Vec2::splat(3.0);
        for hex in PALETTE {
            let color = parse_color(hex).unwrap_or(Color32::GRAY);
            let is_selected = selected.eq_ignore_ascii_case(hex);
            let (rect, response) = ui.allocate_exact_size(Vec2::splat(18.0), egui::Sense::click());
            ui.painter().rect_filled(rect, 3.0, color);
            if is_selected {
                ui.painter()
                    .rect_stroke(rect.expand(1.5), 3.0, Stroke::new(2.0, ui.visuals().text_color()));
            }
            if response.on_hover_text(hex).clicked() {
                *selected = hex.to_string();
            }
        }
    });
}

fn color_chip_button(ui: &mut egui::Ui, label: &str, color: &str) -> egui::Response {
    let fill = parse_color(color).unwrap_or(Color32::GRAY);
    ui.add(
        egui::Button::new(RichText::new(label).color(contrast_text(fill))).fill(fill),
    )
}
