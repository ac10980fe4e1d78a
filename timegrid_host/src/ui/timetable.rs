//! egui adapter for the table engine: draws the grid, headers, cells and
//! markers, and translates pointer input into engine calls.

use eframe::egui;

use timegrid_core::geometry::Rect as GridRect;
use timegrid_core::{CellData, CellIndex, TimeTable};

use crate::ui::theme::THEME;

const RESIZE_HANDLE_WIDTH: f32 = 10.0;
const MARKER_LINE_WIDTH: f32 = 1.5;

/// One grid line kind: visibility, width and color.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub show: bool,
    pub width: f32,
    pub color: egui::Color32,
}

impl LineStyle {
    const fn new(width: f32, color: egui::Color32) -> Self {
        Self {
            show: true,
            width,
            color,
        }
    }
}

/// Per-kind grid styling. Each kind toggles independently; the engine-level
/// `shows_grid` switch still hides all of them at once.
#[derive(Debug, Clone, Copy)]
pub struct GridStyle {
    pub rows: LineStyle,
    pub bars: LineStyle,
    pub beats: LineStyle,
    pub subbeats: LineStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            rows: LineStyle::new(1.0, THEME.row_line),
            bars: LineStyle::new(1.0, THEME.bar_line),
            beats: LineStyle::new(0.5, THEME.beat_line),
            subbeats: LineStyle::new(0.5, THEME.subbeat_line),
        }
    }
}

/// Per-widget state the host keeps between frames.
#[derive(Debug, Default)]
pub struct TimeTableUiState {
    pub scroll: egui::Vec2,
    pub grid: GridStyle,
    marquee_tracking: bool,
}

/// Shows the table in the available rect. The host passes a cell painter so
/// payload rendering stays on its side of the fence.
pub fn show_time_table<T: Clone>(
    ui: &mut egui::Ui,
    table: &mut TimeTable<T>,
    state: &mut TimeTableUiState,
    draw_cell: &dyn Fn(&egui::Painter, egui::Rect, &CellData<T>, bool),
) {
    let widget_rect = ui.available_rect_before_wrap();
    let now = ui.input(|i| i.time);

    // ========================================================================
    // SCROLL + ZOOM INPUT
    // ========================================================================

    if !table.scroll_frozen() {
        let scroll_delta = ui.input(|i| i.raw_scroll_delta);
        state.scroll -= scroll_delta;
    }

    if ui.rect_contains_pointer(widget_rect) {
        let zoom = ui.input(|i| i.zoom_delta());
        if zoom != 1.0 {
            table.pinch(zoom);
        }
    }

    table.layout(GridRect::new(
        state.scroll.x,
        state.scroll.y,
        widget_rect.width(),
        widget_rect.height(),
    ));

    let content_size = table.content_size();
    state.scroll.x = state
        .scroll
        .x
        .clamp(0.0, (content_size.0 - widget_rect.width()).max(0.0));
    state.scroll.y = state
        .scroll
        .y
        .clamp(0.0, (content_size.1 - widget_rect.height()).max(0.0));

    // Copied so the auto-scroll tick below can move the live offset; the
    // frame keeps drawing against the offset it was laid out with.
    let scroll = state.scroll;
    let to_screen = move |frame: &GridRect| -> egui::Rect {
        egui::Rect::from_min_size(
            widget_rect.min + egui::vec2(frame.x - scroll.x, frame.y - scroll.y),
            egui::vec2(frame.w, frame.h),
        )
    };
    let to_content = move |pos: egui::Pos2| -> (f32, f32) {
        (
            pos.x - widget_rect.min.x + scroll.x,
            pos.y - widget_rect.min.y + scroll.y,
        )
    };

    // ========================================================================
    // CELL + MARKER INTERACTION
    // ========================================================================

    let frames = table.cell_frames().to_vec();
    let playhead_hit = table.config().shows_playhead.then(|| table.playhead_frame());
    let range_head_hit = table
        .config()
        .shows_range_head
        .then(|| table.range_head_frame());

    for (row, row_frames) in frames.iter().enumerate() {
        for (index, frame) in row_frames.iter().enumerate() {
            let cell_rect = to_screen(frame);
            if !cell_rect.intersects(widget_rect) {
                continue;
            }
            let index = CellIndex::new(row, index);

            let body = ui.allocate_rect(cell_rect, egui::Sense::click_and_drag());
            if body.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            }
            if body.clicked() {
                let additive = ui.input(|i| i.modifiers.ctrl || i.modifiers.command);
                table.select_cell(index, !additive);
            }
            if body.drag_started() {
                table.begin_cell_move(index);
            }
            if body.dragged() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
                let delta = body.drag_delta();
                table.drag_cell((delta.x, delta.y));
            }
            if body.drag_stopped() {
                table.end_cell_drag();
            }

            let handle_rect = egui::Rect::from_min_max(
                egui::pos2(cell_rect.max.x - RESIZE_HANDLE_WIDTH, cell_rect.min.y),
                cell_rect.max,
            );
            let handle = ui.allocate_rect(handle_rect, egui::Sense::drag());
            if handle.hovered() || handle.dragged() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
            }
            if handle.drag_started() {
                table.begin_cell_resize(index);
            }
            if handle.dragged() {
                table.drag_cell((handle.drag_delta().x, 0.0));
            }
            if handle.drag_stopped() {
                table.end_cell_drag();
            }
        }
    }

    let mut marker_hovered = false;
    if let Some(frame) = playhead_hit {
        let marker = ui.allocate_rect(to_screen(&frame), egui::Sense::drag());
        marker_hovered |= marker.hovered() || marker.dragged();
        if marker.drag_started() {
            table.begin_playhead_drag();
        }
        if marker.dragged() {
            table.drag_playhead(marker.drag_delta().x);
        }
        if marker.drag_stopped() {
            table.end_playhead_drag();
        }
    }
    if let Some(frame) = range_head_hit {
        let marker = ui.allocate_rect(to_screen(&frame), egui::Sense::drag());
        marker_hovered |= marker.hovered() || marker.dragged();
        if marker.drag_started() {
            table.begin_range_head_drag();
        }
        if marker.dragged() {
            table.drag_range_head(marker.drag_delta().x);
        }
        if marker.drag_stopped() {
            table.end_range_head_drag();
        }
    }

    // ========================================================================
    // MARQUEE + KEYS
    // ========================================================================

    let pointer_pos = ui.input(|i| i.pointer.interact_pos());
    if let Some(pos) = pointer_pos {
        let content_pos = to_content(pos);
        if ui.input(|i| i.pointer.primary_pressed())
            && widget_rect.contains(pos)
            && table.cell_at(content_pos).is_none()
            && !marker_hovered
            && !table.is_editing()
        {
            state.marquee_tracking = true;
            table.pointer_down(content_pos, now);
        }
        if state.marquee_tracking && ui.input(|i| i.pointer.primary_down()) {
            table.pointer_moved(content_pos, now);
        }
    }
    if state.marquee_tracking && ui.input(|i| i.pointer.primary_released()) {
        state.marquee_tracking = false;
        table.pointer_up();
    }

    if state.marquee_tracking {
        // The arm delay and auto-scroll run on time, not on input events.
        ui.ctx().request_repaint();
    }
    if let Some((dx, dy)) = table.tick(now) {
        state.scroll += egui::vec2(dx, dy);
    }

    if ui.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
        table.request_delete_selected();
    }

    // ========================================================================
    // DRAWING
    // ========================================================================

    let painter = ui.painter_at(widget_rect);
    painter.rect_filled(widget_rect, 0.0, THEME.bg_dark);

    let params = table.params();
    let content_size = table.content_size();
    let config = table.config().clone();
    let content_top = to_screen(&GridRect::new(0.0, params.measure_height, 0.0, 0.0))
        .min
        .y;
    let content_bottom = to_screen(&GridRect::new(0.0, content_size.1, 0.0, 0.0)).min.y;

    if config.shows_grid {
        if state.grid.rows.show {
            for row in 0..=table.rows().len() {
                let y = to_screen(&GridRect::new(
                    0.0,
                    params.measure_height + row as f32 * params.row_height,
                    0.0,
                    0.0,
                ))
                .min
                .y;
                painter.line_segment(
                    [
                        egui::pos2(widget_rect.min.x, y),
                        egui::pos2(widget_rect.max.x, y),
                    ],
                    (state.grid.rows.width, state.grid.rows.color),
                );
            }
        }
        let beats = params.beats_per_bar.max(1);
        for bar in 0..table.bar_count() {
            for beat in 0..beats {
                for subbeat in 0..4 {
                    let style = if beat == 0 && subbeat == 0 {
                        state.grid.bars
                    } else if subbeat == 0 {
                        state.grid.beats
                    } else {
                        state.grid.subbeats
                    };
                    if !style.show {
                        continue;
                    }
                    let x_content = params.header_width
                        + bar as f32 * params.measure_width
                        + beat as f32 * params.beat_width()
                        + subbeat as f32 * params.subbeat_width();
                    let x = to_screen(&GridRect::new(x_content, 0.0, 0.0, 0.0)).min.x;
                    if x < widget_rect.min.x || x > widget_rect.max.x {
                        continue;
                    }
                    painter.line_segment(
                        [egui::pos2(x, content_top), egui::pos2(x, content_bottom)],
                        (style.width, style.color),
                    );
                }
            }
        }
    }

    if config.shows_measure {
        let strip = to_screen(&GridRect::new(
            0.0,
            0.0,
            content_size.0,
            params.measure_height,
        ));
        painter.rect_filled(strip.intersect(widget_rect), 0.0, THEME.bg_measure);
        for bar in 0..table.bar_count() {
            let x_content = params.header_width + bar as f32 * params.measure_width;
            let pos = to_screen(&GridRect::new(x_content, 0.0, 0.0, 0.0)).min
                + egui::vec2(4.0, params.measure_height / 2.0);
            painter.text(
                pos,
                egui::Align2::LEFT_CENTER,
                format!("{}", bar + 1),
                egui::FontId::proportional(11.0),
                THEME.text_secondary,
            );
        }
    }

    if config.shows_headers {
        for (row, frame) in table.header_frames().iter().enumerate() {
            let header_rect = to_screen(frame);
            if !header_rect.intersects(widget_rect) {
                continue;
            }
            painter.rect(
                header_rect,
                0.0,
                THEME.bg_header,
                egui::Stroke::new(1.0, THEME.row_line),
                egui::StrokeKind::Middle,
            );
            if let Some(data) = table.rows().get(row) {
                painter.text(
                    header_rect.left_center() + egui::vec2(8.0, 0.0),
                    egui::Align2::LEFT_CENTER,
                    &data.header,
                    egui::FontId::proportional(13.0),
                    THEME.text_primary,
                );
            }
        }
    }

    for (row, row_frames) in table.cell_frames().iter().enumerate() {
        for (index, frame) in row_frames.iter().enumerate() {
            let cell_rect = to_screen(frame);
            if !cell_rect.intersects(widget_rect) {
                continue;
            }
            let index = CellIndex::new(row, index);
            if let Some(cell) = table.rows().get(row).and_then(|r| r.cells.get(index.index)) {
                draw_cell(&painter, cell_rect, cell, table.is_selected(index));
            }
            if table.is_selected(index) {
                painter.rect_stroke(
                    cell_rect,
                    2.0,
                    egui::Stroke::new(2.0, THEME.selected_border),
                    egui::StrokeKind::Middle,
                );
            }
        }
    }

    if let Some(band) = table.marquee_band() {
        let band_rect = to_screen(&band);
        painter.rect(
            band_rect,
            0.0,
            THEME.band_fill,
            egui::Stroke::new(1.0, THEME.band_border),
            egui::StrokeKind::Middle,
        );
    }

    if config.shows_range_head {
        draw_marker(
            &painter,
            to_screen(&table.range_head_frame()),
            THEME.range_head,
            None,
        );
    }
    if config.shows_playhead {
        draw_marker(
            &painter,
            to_screen(&table.playhead_frame()),
            THEME.playhead,
            Some(content_bottom),
        );
    }
}

/// Downward triangle in the measure strip, with an optional line dropped
/// through the content area.
fn draw_marker(
    painter: &egui::Painter,
    rect: egui::Rect,
    color: egui::Color32,
    line_to: Option<f32>,
) {
    let points = vec![
        rect.left_top(),
        rect.right_top(),
        rect.center_bottom(),
    ];
    painter.add(egui::Shape::convex_polygon(
        points,
        color,
        egui::Stroke::NONE,
    ));
    if let Some(bottom) = line_to {
        let x = rect.center().x;
        painter.line_segment(
            [egui::pos2(x, rect.max.y), egui::pos2(x, bottom)],
            (MARKER_LINE_WIDTH, color),
        );
    }
}
