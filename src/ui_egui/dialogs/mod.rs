pub mod entry_dialog;
pub mod template_manager;

pub use entry_dialog::{render_entry_dialog, EntryDialogAction, EntryDialogState};
pub use template_manager::{render_template_manager_dialog, TemplateManagerState};
