use super::SchedulerApp;
use crate::grid::{GridController, ViewKind};
use crate::services::store::SqliteEventStore;
use crate::GridResult;
use egui::RichText;
use egui_extras::DatePickerButton;

impl SchedulerApp {
    pub(super) fn render_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("grid_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let kind = self.controller.binder().kind();
                if ui.selectable_label(kind == ViewKind::Day, "Day").clicked() {
                    self.show_day_view();
                }
                if ui.selectable_label(kind == ViewKind::Month, "Month").clicked() {
                    self.show_month_view();
                }
                ui.separator();

                if ui.button("◀").on_hover_text("Previous").clicked() {
                    self.navigate(GridController::previous_page);
                }
                if ui.button("Today").on_hover_text("Ctrl+T").clicked() {
                    self.jump_to_today();
                }
                if ui.button("▶").on_hover_text("Next").clicked() {
                    self.navigate(GridController::next_page);
                }

                let mut date = self.controller.binder().date();
                if ui
                    .add(DatePickerButton::new(&mut date).id_source("grid_date_picker"))
                    .changed()
                {
                    self.navigate(|controller| controller.set_date(date));
                }

                if kind == ViewKind::Month {
                    self.render_user_picker(ui);
                }

                ui.separator();
                if ui.button("📋 Templates").clicked() {
                    self.template_manager.open(self.controller.store().database());
                }

                ui.separator();
                ui.label(RichText::new(self.controller.binder().title()).strong());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.controller.is_paste_armed() {
                        ui.label(RichText::new("Paste mode: click a cell (Esc to cancel)").italics());
                    } else if let Some(clipboard) = self.controller.clipboard() {
                        ui.label(RichText::new(format!("📋 {}", clipboard.title)).weak());
                    }
                });
            });
        });
    }

    fn render_user_picker(&mut self, ui: &mut egui::Ui) {
        let selected_name = self
            .users
            .iter()
            .find(|user| user.id == self.month_user)
            .map(|user| user.name.clone())
            .unwrap_or_default();

        let mut chosen = self.month_user.clone();
        egui::ComboBox::from_id_source("month_user_picker")
            .selected_text(selected_name)
            .show_ui(ui, |ui| {
                for user in &self.users {
                    ui.selectable_value(&mut chosen, user.id.clone(), user.name.as_str());
                }
            });

        if chosen != self.month_user {
            self.month_user = chosen.clone();
            self.navigate(|controller| controller.set_month_user(chosen));
        }
    }

    pub(super) fn show_day_view(&mut self) {
        let users = self.users.clone();
        self.navigate(|controller| controller.switch_to_day(users));
    }

    pub(super) fn show_month_view(&mut self) {
        if self.month_user.is_empty() {
            self.toast_manager.error("No user to show a month for");
            return;
        }
        let user_id = self.month_user.clone();
        self.navigate(|controller| controller.switch_to_month(user_id));
    }

    pub(super) fn jump_to_today(&mut self) {
        self.navigate(GridController::today);
    }

    fn navigate(
        &mut self,
        change: impl FnOnce(&mut GridController<SqliteEventStore>) -> GridResult<()>,
    ) {
        if let Err(err) = change(&mut self.controller) {
            log::error!("Failed to load grid: {}", err);
            self.toast_manager.error(format!("Could not load entries: {}", err));
        }
    }
}
