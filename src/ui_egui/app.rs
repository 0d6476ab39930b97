mod lifecycle;
mod navigation;
mod shortcuts;
mod toast;

use std::path::PathBuf;

use self::toast::ToastManager;
use crate::grid::GridController;
use crate::models::row::User;
use crate::models::settings::GridConfig;
use crate::models::template::Template;
use crate::services::store::SqliteEventStore;
use crate::ui_egui::dialogs::{EntryDialogState, TemplateManagerState};

pub struct SchedulerApp {
    controller: GridController<SqliteEventStore>,
    config: GridConfig,
    /// Rows of the day view, in display order
    users: Vec<User>,
    templates: Vec<Template>,
    history_path: PathBuf,
    /// User whose month the month view shows
    month_user: String,
    entry_dialog: EntryDialogState,
    template_manager: TemplateManagerState,
    toast_manager: ToastManager,
}

impl eframe::App for SchedulerApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_update(ctx, frame);
    }

    fn on_exit(&mut self, gl: Option<&eframe::glow::Context>) {
        self.handle_exit(gl);
    }
}
