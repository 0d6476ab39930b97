// Property-based tests for the slot model and grid gestures

#[path = "../fixtures/mod.rs"]
mod fixtures;

mod grid_properties;
mod slot_properties;
