// Service module exports

pub mod config;
pub mod database;
pub mod paste_history;
pub mod store;
pub mod template;
pub mod user;
