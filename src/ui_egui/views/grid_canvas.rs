//! Slot grid rendering.
//!
//! Paints rows x 96 slots with the egui painter and routes the primary
//! pointer into the controller. Positions are handed over relative to the
//! top-left corner of slot 0 of row 0.

use egui::{Align2, CursorIcon, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, Vec2};

use super::palette::{contrast_text, parse_color, GridPalette};
use crate::grid::drag::{hit_test, HitTarget};
use crate::grid::{EventBar, GestureOutcome, GhostPreview, GridController, GridMetrics, PointerPos};
use crate::models::slot::{SlotIndex, SlotRange, SLOTS_PER_DAY, SLOTS_PER_HOUR};
use crate::services::store::EventStore;

pub const HOUR_HEADER_HEIGHT: f32 = 20.0;
const BAR_INSET: f32 = 3.0;

/// Something the canvas wants the app to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasRequest {
    None,
    DirectEntry { row: usize, slot: SlotIndex },
}

/// Maps grid-body coordinates to screen space.
#[derive(Clone, Copy)]
struct BodyGeometry {
    body: Rect,
    metrics: GridMetrics,
}

impl BodyGeometry {
    fn to_grid(&self, pos: Pos2) -> PointerPos {
        PointerPos::new(pos.x - self.body.min.x, pos.y - self.body.min.y)
    }

    fn row_rect(&self, row: usize) -> Rect {
        let top = self.body.min.y + self.metrics.row_y(row);
        Rect::from_min_max(
            Pos2::new(self.body.min.x, top),
            Pos2::new(self.body.max.x, top + self.metrics.row_height),
        )
    }

    fn range_rect(&self, row: usize, range: SlotRange) -> Rect {
        let row_rect = self.row_rect(row);
        let left = self.body.min.x + self.metrics.slot_x(range.start());
        let width = range.len() as f32 * self.metrics.slot_width;
        Rect::from_min_max(
            Pos2::new(left, row_rect.top()),
            Pos2::new(left + width, row_rect.bottom()),
        )
    }

    fn slot_line_x(&self, slot: usize) -> f32 {
        self.body.min.x + slot as f32 * self.metrics.slot_width
    }
}

pub(crate) fn render_grid<S: EventStore>(
    ui: &mut egui::Ui,
    controller: &mut GridController<S>,
    header_width: f32,
    palette: &GridPalette,
) -> CanvasRequest {
    let metrics = *controller.metrics();
    let row_labels: Vec<String> = controller
        .binder()
        .rows()
        .iter()
        .map(|row| row.label())
        .collect();

    let body_size = Vec2::new(
        SLOTS_PER_DAY as f32 * metrics.slot_width,
        row_labels.len() as f32 * metrics.row_height,
    );
    let size = Vec2::new(header_width, HOUR_HEADER_HEIGHT) + body_size;
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
    let geometry = BodyGeometry {
        body: Rect::from_min_size(rect.min + Vec2::new(header_width, HOUR_HEADER_HEIGHT), body_size),
        metrics,
    };

    let request = route_pointer(ui, controller, &response, &geometry);

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, palette.background);
    paint_rows(&painter, controller, &geometry, &row_labels, header_width, palette);
    paint_hour_header(&painter, &geometry, palette);

    if let Some(selection) = controller.selection() {
        painter.rect_filled(
            geometry.range_rect(selection.row, selection.range),
            2.0,
            palette.selection,
        );
    }

    let bars = controller.bars();
    for bar in &bars {
        paint_bar(&painter, bar, &geometry, palette);
    }
    if let Some(ghost) = controller.ghost() {
        paint_ghost(&painter, &ghost, &geometry, palette);
    }
    paint_now_marker(&painter, controller, &geometry, palette);

    show_hover_feedback(ui, controller, response, &geometry, &bars);
    request
}

fn route_pointer<S: EventStore>(
    ui: &egui::Ui,
    controller: &mut GridController<S>,
    response: &Response,
    geometry: &BodyGeometry,
) -> CanvasRequest {
    let (pressed, released, pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.interact_pos(),
        )
    });
    let Some(pos) = pos else {
        return CanvasRequest::None;
    };
    let grid_pos = geometry.to_grid(pos);

    // Placement conflicts and store failures reach the user as notices;
    // a press during a live gesture is only logged.
    if pressed && response.hovered() {
        if let Err(err) = controller.pointer_down(grid_pos) {
            log::debug!("pointer-down rejected: {}", err);
        }
    }

    controller.pointer_move(grid_pos);

    if !released {
        return CanvasRequest::None;
    }
    match controller.pointer_up(grid_pos) {
        Ok(GestureOutcome::DirectEntry { row, slot }) if response.double_clicked() => {
            CanvasRequest::DirectEntry { row, slot }
        }
        Ok(outcome) => {
            if outcome != GestureOutcome::None {
                log::debug!("gesture finished: {:?}", outcome);
            }
            CanvasRequest::None
        }
        Err(err) => {
            log::debug!("gesture failed: {}", err);
            CanvasRequest::None
        }
    }
}

fn paint_hour_header(painter: &egui::Painter, geometry: &BodyGeometry, palette: &GridPalette) {
    let header = Rect::from_min_max(
        Pos2::new(geometry.body.min.x, geometry.body.min.y - HOUR_HEADER_HEIGHT),
        Pos2::new(geometry.body.max.x, geometry.body.min.y),
    );
    painter.rect_filled(header, 0.0, palette.header_bg);

    let slots_per_hour = SLOTS_PER_HOUR as usize;
    for hour in 0..24 {
        let x = geometry.slot_line_x(hour * slots_per_hour);
        painter.text(
            Pos2::new(x + 3.0, header.center().y),
            Align2::LEFT_CENTER,
            format!("{:02}", hour),
            FontId::proportional(11.0),
            palette.header_text,
        );
    }
}

fn paint_rows<S: EventStore>(
    painter: &egui::Painter,
    controller: &GridController<S>,
    geometry: &BodyGeometry,
    labels: &[String],
    header_width: f32,
    palette: &GridPalette,
) {
    let slots_per_hour = SLOTS_PER_HOUR as usize;

    for (row, label) in labels.iter().enumerate() {
        let row_rect = geometry.row_rect(row);
        let background = if controller.now_slot(row).is_some() {
            palette.today_bg
        } else if row % 2 == 1 {
            palette.row_alt_bg
        } else {
            palette.row_bg
        };
        painter.rect_filled(row_rect, 0.0, background);

        let header = Rect::from_min_max(
            Pos2::new(row_rect.left() - header_width, row_rect.top()),
            Pos2::new(row_rect.left(), row_rect.bottom()),
        );
        painter.rect_filled(header, 0.0, palette.header_bg);
        painter.text(
            Pos2::new(header.left() + 6.0, header.center().y),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(13.0),
            palette.header_text,
        );

        painter.line_segment(
            [
                Pos2::new(header.left(), row_rect.bottom()),
                Pos2::new(row_rect.right(), row_rect.bottom()),
            ],
            Stroke::new(1.0, palette.hour_line),
        );
    }

    for slot in 0..=SLOTS_PER_DAY as usize {
        let x = geometry.slot_line_x(slot);
        let color = if slot % slots_per_hour == 0 {
            palette.hour_line
        } else {
            palette.slot_line
        };
        painter.line_segment(
            [Pos2::new(x, geometry.body.top()), Pos2::new(x, geometry.body.bottom())],
            Stroke::new(1.0, color),
        );
    }
}

fn paint_bar(painter: &egui::Painter, bar: &EventBar, geometry: &BodyGeometry, palette: &GridPalette) {
    let rect = geometry
        .range_rect(bar.row, bar.range)
        .shrink2(Vec2::new(1.0, BAR_INSET));
    let base = parse_color(&bar.color).unwrap_or(palette.fallback_bar);
    let fill = if bar.dragging { base.gamma_multiply(0.35) } else { base };
    painter.rect_filled(rect, 3.0, fill);

    if bar.conflicting {
        painter.rect_stroke(rect, 3.0, Stroke::new(2.0, palette.conflict));
    } else if bar.selected {
        painter.rect_stroke(rect, 3.0, Stroke::new(2.0, palette.selected_outline));
    }

    // Edge handles
    let handle = geometry.metrics.handle_width.min(rect.width() / 3.0);
    let grip = contrast_text(base).gamma_multiply(0.35);
    for x in [rect.left() + handle / 2.0, rect.right() - handle / 2.0] {
        painter.line_segment(
            [Pos2::new(x, rect.top() + 5.0), Pos2::new(x, rect.bottom() - 5.0)],
            Stroke::new(1.5, grip),
        );
    }

    painter.with_clip_rect(rect.shrink2(Vec2::new(handle, 0.0))).text(
        Pos2::new(rect.left() + handle + 2.0, rect.center().y),
        Align2::LEFT_CENTER,
        &bar.title,
        FontId::proportional(12.0),
        contrast_text(base),
    );
}

fn paint_ghost(
    painter: &egui::Painter,
    ghost: &GhostPreview,
    geometry: &BodyGeometry,
    palette: &GridPalette,
) {
    let rect = geometry
        .range_rect(ghost.row, ghost.range)
        .shrink2(Vec2::new(1.0, BAR_INSET));
    let base = parse_color(&ghost.color).unwrap_or(palette.fallback_bar);
    painter.rect_filled(rect, 3.0, base.gamma_multiply(0.45));

    let outline = if ghost.blocked {
        palette.conflict
    } else {
        contrast_text(palette.row_bg)
    };
    let path = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    painter.extend(Shape::dashed_line(&path, Stroke::new(1.5, outline), 5.0, 3.0));

    painter.with_clip_rect(rect).text(
        Pos2::new(rect.left() + 4.0, rect.center().y),
        Align2::LEFT_CENTER,
        ghost.range.label(),
        FontId::proportional(11.0),
        outline,
    );
}

fn paint_now_marker<S: EventStore>(
    painter: &egui::Painter,
    controller: &GridController<S>,
    geometry: &BodyGeometry,
    palette: &GridPalette,
) {
    for row in 0..geometry.metrics.row_count {
        if let Some(slot) = controller.now_slot(row) {
            let row_rect = geometry.row_rect(row);
            let x = geometry.slot_line_x(slot.get() as usize) + geometry.metrics.slot_width / 2.0;
            painter.line_segment(
                [Pos2::new(x, row_rect.top()), Pos2::new(x, row_rect.bottom())],
                Stroke::new(2.0, palette.now_line),
            );
        }
    }
}

fn show_hover_feedback<S: EventStore>(
    ui: &egui::Ui,
    controller: &GridController<S>,
    response: Response,
    geometry: &BodyGeometry,
    bars: &[EventBar],
) {
    if controller.interaction().drag().is_some_and(|session| session.is_active()) {
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        return;
    }
    if controller.is_paste_armed() {
        ui.ctx().set_cursor_icon(CursorIcon::Copy);
        return;
    }

    let Some(pos) = response.hover_pos() else {
        return;
    };
    let hits: Vec<_> = bars.iter().map(|bar| (bar.id, bar.row, bar.range)).collect();
    match hit_test(geometry.to_grid(pos), &geometry.metrics, &hits) {
        Some(HitTarget::EventHandle { .. }) => {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        }
        Some(HitTarget::EventBody { event_id, .. }) => {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
            if let Some(bar) = bars.iter().find(|bar| bar.id == event_id) {
                response.on_hover_text_at_pointer(bar.caption());
            }
        }
        _ => {}
    }
}
