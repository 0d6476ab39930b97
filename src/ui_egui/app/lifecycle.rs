use super::toast::ToastManager;
use super::SchedulerApp;
use crate::grid::{EditStep, GridController, GridMetrics, PasteHistory, ViewBinder};
use crate::models::event::EventId;
use crate::models::row::User;
use crate::models::settings::GridConfig;
use crate::models::template::Template;
use crate::services::config::{self, DATABASE_FILE};
use crate::services::database::Database;
use crate::services::paste_history::{self, PASTE_HISTORY_FILE};
use crate::services::store::SqliteEventStore;
use crate::services::template::{TemplateProvider, TemplateService};
use crate::services::user::UserService;
use crate::ui_egui::dialogs::{
    render_entry_dialog, render_template_manager_dialog, EntryDialogAction, EntryDialogState,
    TemplateManagerState,
};
use crate::ui_egui::views::{render_grid, CanvasRequest, GridPalette};
use crate::GridResult;
use anyhow::{Context, Result};
use chrono::Local;

impl SchedulerApp {
    /// Open storage and restore users, templates and paste history.
    pub fn bootstrap(config: GridConfig) -> Result<Self> {
        let db_path = config::data_path_or(config.database_path.as_deref(), DATABASE_FILE)?;
        let history_path =
            config::data_path_or(config.paste_history_path.as_deref(), PASTE_HISTORY_FILE)?;

        let store = SqliteEventStore::open(&db_path.to_string_lossy())
            .with_context(|| format!("failed to open event store at {}", db_path.display()))?
            .with_batch_size(config.owner_batch_size);
        log::info!("Using database {}", db_path.display());

        let users = load_or_seed_users(store.database())?;
        let templates = load_templates(store.database());
        let history = load_history_or_default(&history_path);

        let month_user = config
            .default_user
            .clone()
            .filter(|id| users.iter().any(|user| &user.id == id))
            .or_else(|| users.first().map(|user| user.id.clone()))
            .unwrap_or_default();

        let metrics = GridMetrics::new(config.slot_width, config.row_height, users.len())
            .with_drag_threshold(config.drag_threshold_px)
            .with_handle_width(config.handle_width);
        let binder = ViewBinder::day(users.clone(), Local::now().date_naive());
        let controller = GridController::new(store, binder, metrics)?.with_history(history);

        Ok(Self {
            controller,
            config,
            users,
            templates,
            history_path,
            month_user,
            entry_dialog: EntryDialogState::default(),
            template_manager: TemplateManagerState::default(),
            toast_manager: ToastManager::new(),
        })
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pick up changes other sessions wrote since the last frame
        self.controller.refresh();

        self.handle_keyboard_shortcuts(ctx);
        self.render_toolbar(ctx);

        let palette = GridPalette::from_visuals(&ctx.style().visuals);
        let header_width = self.config.header_width;
        let mut request = CanvasRequest::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both()
                .auto_shrink([false, false])
                .drag_to_scroll(false)
                .show(ui, |ui| {
                    request = render_grid(ui, &mut self.controller, header_width, &palette);
                });
        });

        if let CanvasRequest::DirectEntry { row, slot } = request {
            if let Err(err) = self.controller.begin_direct_entry(row, slot) {
                log::debug!("Direct entry not opened: {}", err);
            }
        }

        self.handle_entry_dialog(ctx);
        self.handle_template_manager(ctx);

        self.toast_manager.extend(self.controller.drain_notices());
        self.toast_manager.render(ctx, ctx.style().visuals.dark_mode);

        self.persist_history_if_needed();
    }

    pub(super) fn handle_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.persist_history_if_needed();
    }

    fn handle_entry_dialog(&mut self, ctx: &egui::Context) {
        let step = self.controller.interaction().edit_step().cloned();
        let event = step.as_ref().and_then(|step| match step {
            EditStep::EditExisting { event_id } | EditStep::ConfirmDelete { event_id } => {
                self.controller.event(*event_id).cloned()
            }
            _ => None,
        });
        self.entry_dialog.sync(step.as_ref(), event.as_ref());

        let Some(step) = step else {
            return;
        };
        let candidates = self.controller.paste_candidates();
        let action = render_entry_dialog(
            ctx,
            &mut self.entry_dialog,
            &step,
            event.as_ref(),
            &self.templates,
            &candidates,
        );
        self.apply_dialog_action(ctx, action);
    }

    fn handle_template_manager(&mut self, ctx: &egui::Context) {
        let changed = render_template_manager_dialog(
            ctx,
            &mut self.template_manager,
            self.controller.store().database(),
        );
        if changed {
            self.templates = self.template_manager.templates.clone();
        }
    }

    fn apply_dialog_action(&mut self, ctx: &egui::Context, action: EntryDialogAction) {
        let result = match action {
            EntryDialogAction::None => return,
            EntryDialogAction::Close => {
                self.controller.close_dialog();
                Ok(())
            }
            EntryDialogAction::ChooseNew => self.controller.choose_new(),
            EntryDialogAction::ChooseTemplate(template) => self.controller.choose_template(&template),
            EntryDialogAction::ChooseCandidate(candidate) => {
                self.controller.choose_candidate(&candidate).map(|_| ())
            }
            EntryDialogAction::SaveNew { title, color, range } => self
                .controller
                .save_new_entry(&title, &color, range)
                .map(|_| self.toast_manager.success("Entry saved")),
            EntryDialogAction::SaveEdit { id, title, color, range } => self
                .controller
                .save_edit(id, &title, &color, range)
                .map(|_| ()),
            EntryDialogAction::Copy(id) => self.copy_event(ctx, id),
            EntryDialogAction::RequestDelete => self.controller.request_delete().map(|_| ()),
            EntryDialogAction::ConfirmDelete => self.controller.confirm_delete().map(|_| ()),
        };

        if let Err(err) = result {
            self.entry_dialog.error = Some(err.to_string());
        }
    }

    /// Copy an event into the grid clipboard and mirror its title to the
    /// system clipboard, which keeps the platform paste shortcut live.
    pub(super) fn copy_event(&mut self, ctx: &egui::Context, id: EventId) -> GridResult<()> {
        self.controller.copy_event(id)?;
        if let Some(clipboard) = self.controller.clipboard() {
            let text = clipboard.title.clone();
            ctx.output_mut(|o| o.copied_text = text);
        }
        self.controller.close_dialog();
        Ok(())
    }

    pub(super) fn persist_history_if_needed(&mut self) {
        if !self.controller.take_history_dirty() {
            return;
        }

        if let Err(err) = paste_history::save_history(&self.history_path, self.controller.history()) {
            log::error!("Failed to persist paste history: {err:?}");
            self.toast_manager.error("Could not save paste history");
        }
    }
}

fn load_or_seed_users(database: &Database) -> Result<Vec<User>> {
    let service = UserService::new(database.connection());
    if service.count()? == 0 {
        let default_user = User::new("me", "Me", 0);
        service.upsert(&default_user)?;
        log::info!("No users found, created '{}'", default_user.id);
    }
    service.list_ordered()
}

fn load_templates(database: &Database) -> Vec<Template> {
    match TemplateService::new(database.connection()).templates() {
        Ok(templates) => templates,
        Err(e) => {
            log::warn!("Failed to load templates: {}, continuing without", e);
            Vec::new()
        }
    }
}

fn load_history_or_default(path: &std::path::Path) -> PasteHistory {
    match paste_history::load_history(path) {
        Ok(history) => history,
        Err(err) => {
            log::warn!("Failed to load paste history: {err:?}");
            PasteHistory::new()
        }
    }
}
