pub mod grid_canvas;
mod palette;

pub(crate) use grid_canvas::{render_grid, CanvasRequest};
pub(crate) use palette::{contrast_text, parse_color, GridPalette};
