//! Grid interaction engine: rows x 96 quarter-hour slots.
//!
//! Everything in here is renderer-agnostic. The egui front end feeds pointer
//! positions in grid-body coordinates and draws the projections it gets back.

pub mod binder;
pub mod clipboard;
pub mod controller;
pub mod drag;
pub mod ghost;
pub mod interaction;
pub mod overlap;
pub mod selection;

pub use binder::{ViewBinder, ViewKind};
pub use clipboard::{Clipboard, PasteEntry, PasteHistory};
pub use controller::{GestureOutcome, GridController, Notice, NoticeLevel};
pub use drag::{GridMetrics, PointerPos};
pub use ghost::{EventBar, GhostPreview, GhostSource};
pub use interaction::{EditStep, InteractionState};
