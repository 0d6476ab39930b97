// Module exports for models

pub mod event;
pub mod row;
pub mod settings;
pub mod slot;
pub mod template;
