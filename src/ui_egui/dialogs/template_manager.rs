// Template Manager Dialog
// UI for managing entry templates (create, delete)

use egui::{Color32, RichText};

use super::entry_dialog::render_palette;
use crate::models::template::{Template, DEFAULT_COLOR};
use crate::services::database::Database;
use crate::services::template::TemplateService;
use crate::ui_egui::views::parse_color;

/// State for the template manager dialog
#[derive(Default)]
pub struct TemplateManagerState {
    pub is_open: bool,
    pub templates: Vec<Template>,
    pub editing_template: Option<TemplateEditState>,
    pub error_message: Option<String>,
    pub needs_refresh: bool,
}

/// State for the new-template form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEditState {
    pub title: String,
    pub color: String,
}

impl TemplateEditState {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            color: DEFAULT_COLOR.to_string(),
        }
    }

    pub fn to_template(&self) -> Result<Template, String> {
        Template::builder()
            .title(self.title.trim())
            .color(self.color.clone())
            .build()
    }
}

impl Default for TemplateEditState {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateManagerState {
    pub fn open(&mut self, database: &Database) {
        self.is_open = true;
        self.refresh_templates(database);
        self.editing_template = None;
        self.error_message = None;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.editing_template = None;
        self.error_message = None;
    }

    pub fn refresh_templates(&mut self, database: &Database) {
        let service = TemplateService::new(database.connection());
        match service.list_all() {
            Ok(templates) => {
                self.templates = templates;
                self.needs_refresh = false;
            }
            Err(e) => {
                log::error!("Failed to load templates: {}", e);
                self.error_message = Some(format!("Failed to load templates: {}", e));
            }
        }
    }

    pub fn start_new_template(&mut self) {
        self.editing_template = Some(TemplateEditState::new());
        self.error_message = None;
    }

    /// Store the form as a new template. Returns true when the list changed.
    pub fn save_editing(&mut self, database: &Database) -> bool {
        let Some(editing) = self.editing_template.as_ref() else {
            return false;
        };

        let template = match editing.to_template() {
            Ok(template) => template,
            Err(e) => {
                self.error_message = Some(e);
                return false;
            }
        };

        match TemplateService::new(database.connection()).create(template) {
            Ok(created) => {
                log::info!("Created template '{}'", created.title);
                self.editing_template = None;
                self.error_message = None;
                self.refresh_templates(database);
                true
            }
            Err(e) => {
                self.error_message = Some(format!("Save failed: {}", e));
                false
            }
        }
    }

    /// Returns true when the list changed.
    pub fn delete_template(&mut self, database: &Database, id: i64) -> bool {
        match TemplateService::new(database.connection()).delete(id) {
            Ok(()) => {
                self.refresh_templates(database);
                true
            }
            Err(e) => {
                self.error_message = Some(format!("Delete failed: {}", e));
                false
            }
        }
    }
}

/// Draw the manager window. Returns true when templates were created or
/// deleted this frame.
pub fn render_template_manager_dialog(
    ctx: &egui::Context,
    state: &mut TemplateManagerState,
    database: &Database,
) -> bool {
    if !state.is_open {
        return false;
    }

    if state.needs_refresh {
        state.refresh_templates(database);
    }

    let mut dialog_open = state.is_open;
    let mut changed = false;

    egui::Window::new("📋 Manage Templates")
        .open(&mut dialog_open)
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .default_height(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if state.editing_template.is_some() {
                changed = render_edit_form(ui, state, database);
            } else {
                changed = render_template_list(ui, state, database);
            }
        });

    if !dialog_open {
        state.close();
    }
    changed
}

fn render_template_list(
    ui: &mut egui::Ui,
    state: &mut TemplateManagerState,
    database: &Database,
) -> bool {
    if let Some(ref error) = state.error_message {
        ui.colored_label(Color32::RED, error);
        ui.add_space(8.0);
    }

    if ui.button("➕ New Template").clicked() {
        state.start_new_template();
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    if state.templates.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(RichText::new("No templates yet").weak());
            ui.add_space(8.0);
            ui.label("Templates show up in the menu after selecting a range.");
            ui.add_space(40.0);
        });
        return false;
    }

    let mut delete_id = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for template in &state.templates {
                ui.horizontal(|ui| {
                    let fill = parse_color(&template.color).unwrap_or(Color32::GRAY);
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(4.0, 20.0), egui::Sense::hover());
                    ui.painter().rect_filled(rect, 2.0, fill);
                    ui.add_space(8.0);
                    ui.label(RichText::new(&template.title).strong());
                    ui.label(RichText::new(&template.color).weak().small());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🗑").on_hover_text("Delete").clicked() {
                            delete_id = template.id;
                        }
                    });
                });
            }
        });

    match delete_id {
        Some(id) => state.delete_template(database, id),
        None => false,
    }
}

fn render_edit_form(
    ui: &mut egui::Ui,
    state: &mut TemplateManagerState,
    database: &Database,
) -> bool {
    ui.heading("New Template");
    ui.add_space(8.0);

    if let Some(ref error) = state.error_message {
        ui.colored_label(Color32::RED, error);
        ui.add_space(8.0);
    }

    let Some(editing) = state.editing_template.as_mut() else {
        return false;
    };

    ui.horizontal(|ui| {
        ui.label("Title:");
        ui.text_edit_singleline(&mut editing.title);
    });
    ui.add_space(4.0);
    ui.label("Color:");
    render_palette(ui, &mut editing.color);

    ui.add_space(8.0);
    ui.separator();

    let mut save = false;
    ui.horizontal(|ui| {
        if ui.button("Create").clicked() {
            save = true;
        }
        if ui.button("Cancel").clicked() {
            state.editing_template = None;
            state.error_message = None;
        }
    });

    save && state.save_editing(database)
}
