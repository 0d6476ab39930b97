use super::SchedulerApp;

/// Keys read in one pass over the frame input.
#[derive(Default)]
struct GridKeys {
    escape: bool,
    copy: bool,
    paste: bool,
    arm_paste: bool,
    delete: bool,
    today: bool,
}

impl SchedulerApp {
    pub(super) fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let keys = ctx.input(|i| {
            // The platform layer turns Ctrl+C / Ctrl+V into clipboard events
            let copy_event = i.events.iter().any(|e| matches!(e, egui::Event::Copy));
            let paste_event = i.events.iter().any(|e| matches!(e, egui::Event::Paste(_)));
            let paste = paste_event || (i.modifiers.command && i.key_pressed(egui::Key::V));

            GridKeys {
                escape: i.key_pressed(egui::Key::Escape),
                copy: copy_event || (i.modifiers.command && i.key_pressed(egui::Key::C)),
                paste: paste && !i.modifiers.shift,
                arm_paste: paste && i.modifiers.shift,
                delete: i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                today: i.modifiers.ctrl && i.key_pressed(egui::Key::T),
            }
        });

        if keys.escape {
            self.controller.cancel();
            return;
        }

        // A focused text field owns the keyboard
        if ctx.wants_keyboard_input() {
            return;
        }

        if keys.copy {
            self.copy_selected(ctx);
        }
        if keys.paste {
            self.paste_into_selection();
        }
        if keys.arm_paste {
            if let Err(err) = self.controller.arm_paste() {
                log::debug!("Paste mode not entered: {}", err);
            }
        }
        if keys.delete {
            if let Err(err) = self.controller.request_delete() {
                log::debug!("Delete not requested: {}", err);
            }
        }
        if keys.today {
            self.jump_to_today();
        }
    }

    fn copy_selected(&mut self, ctx: &egui::Context) {
        match self.controller.selected_event() {
            Some(id) => {
                if let Err(err) = self.copy_event(ctx, id) {
                    log::debug!("Copy failed: {}", err);
                }
            }
            None => log::debug!("Copy ignored, no event selected"),
        }
    }

    /// Paste at the selected cell, or fall back to paste mode when no cell is selected.
    fn paste_into_selection(&mut self) {
        let result = match self.controller.paste_shortcut() {
            Ok(Some(_)) => Ok(()),
            Ok(None) => self.controller.arm_paste(),
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            log::debug!("Paste failed: {}", err);
        }
    }
}
