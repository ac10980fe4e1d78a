//! The table engine: owns the per-reload model copy, the on-screen frames,
//! selection, history and the gesture controllers, and reconciles gesture
//! outcomes back into logical edits for the host.

use crossbeam_channel::Sender;

use crate::edit::{CellEditController, EditKind};
use crate::events::TimeTableEvent;
use crate::geometry::{self, LayoutParams, Rect};
use crate::history::{HistoryLog, DEFAULT_HISTORY_LIMIT};
use crate::model::{CellIndex, HistoryItem, RowData, TimeSignature};
use crate::playhead::{CommitPolicy, PlayheadController};
use crate::select::MarqueeController;
use crate::zoom::{self, ZoomSettings};

/// Pull interface the host implements to populate the table.
pub trait TimeTableDataSource<T> {
    /// Number of rows to populate.
    fn row_count(&self) -> usize;
    /// Time signature for this reload cycle.
    fn time_signature(&self) -> TimeSignature;
    /// Row data for one row. `None` rows are skipped with a warning rather
    /// than failing the whole reload.
    fn row_at(&self, index: usize) -> Option<RowData<T>>;
}

/// Table configuration with the documented defaults. Hiding the measure
/// strip or the header column collapses its extent to zero.
#[derive(Debug, Clone)]
pub struct TimeTableConfig {
    pub shows_measure: bool,
    pub shows_headers: bool,
    pub shows_grid: bool,
    pub shows_playhead: bool,
    pub shows_range_head: bool,
    /// Whether every host-confirmed reload is snapshotted for undo/redo.
    pub holds_history: bool,
    pub history_limit: usize,
    pub row_height: f32,
    pub measure_height: f32,
    pub header_width: f32,
    /// Initial measure width; the live value is owned by the table and
    /// mutated by pinch zoom.
    pub measure_width: f32,
    pub zoom: ZoomSettings,
    pub playhead_commit: CommitPolicy,
}

impl Default for TimeTableConfig {
    fn default() -> Self {
        Self {
            shows_measure: true,
            shows_headers: true,
            shows_grid: true,
            shows_playhead: true,
            shows_range_head: true,
            holds_history: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
            row_height: 60.0,
            measure_height: 30.0,
            header_width: 120.0,
            measure_width: 200.0,
            zoom: ZoomSettings::default(),
            playhead_commit: CommitPolicy::default(),
        }
    }
}

/// The editable time table. One instance per widget; the host owns the
/// source-of-truth model and this engine owns a transient copy per reload.
pub struct TimeTable<T> {
    config: TimeTableConfig,
    rows: Vec<RowData<T>>,
    time_signature: TimeSignature,
    measure_width: f32,

    cell_frames: Vec<Vec<Rect>>,
    header_frames: Vec<Rect>,
    selected: Vec<Vec<bool>>,
    bar_count: usize,
    content_size: (f32, f32),
    viewport: Rect,

    history: HistoryLog<T>,
    marquee: MarqueeController,
    edit: CellEditController,
    playhead: PlayheadController,
    range_head: PlayheadController,

    events: Sender<TimeTableEvent<T>>,
}

impl<T: Clone> TimeTable<T> {
    pub fn new(events: Sender<TimeTableEvent<T>>, config: TimeTableConfig) -> Self {
        Self {
            measure_width: config.measure_width,
            history: HistoryLog::new(config.history_limit),
            playhead: PlayheadController::new(config.playhead_commit),
            range_head: PlayheadController::new(config.playhead_commit),
            config,
            rows: Vec::new(),
            time_signature: TimeSignature::default(),
            cell_frames: Vec::new(),
            header_frames: Vec::new(),
            selected: Vec::new(),
            bar_count: 1,
            content_size: (0.0, 0.0),
            viewport: Rect::default(),
            marquee: MarqueeController::default(),
            edit: CellEditController::default(),
            events,
        }
    }

    // ========================================================================
    // STATE ACCESS (for the widget adapter)
    // ========================================================================

    pub fn config(&self) -> &TimeTableConfig {
        &self.config
    }

    pub fn rows(&self) -> &[RowData<T>] {
        &self.rows
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    /// Geometry for the current layout pass, honoring hidden measure/headers.
    pub fn params(&self) -> LayoutParams {
        LayoutParams {
            measure_width: self.measure_width,
            row_height: self.config.row_height,
            measure_height: if self.config.shows_measure {
                self.config.measure_height
            } else {
                0.0
            },
            header_width: if self.config.shows_headers {
                self.config.header_width
            } else {
                0.0
            },
            beats_per_bar: self.time_signature.beats,
        }
    }

    pub fn cell_frames(&self) -> &[Vec<Rect>] {
        &self.cell_frames
    }

    pub fn header_frames(&self) -> &[Rect] {
        &self.header_frames
    }

    pub fn is_selected(&self, index: CellIndex) -> bool {
        self.selected
            .get(index.row)
            .and_then(|row| row.get(index.index))
            .copied()
            .unwrap_or(false)
    }

    pub fn selected_indices(&self) -> Vec<CellIndex> {
        let mut indices = Vec::new();
        for (row, flags) in self.selected.iter().enumerate() {
            for (index, &selected) in flags.iter().enumerate() {
                if selected {
                    indices.push(CellIndex::new(row, index));
                }
            }
        }
        indices
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    pub fn content_size(&self) -> (f32, f32) {
        self.content_size
    }

    pub fn marquee_band(&self) -> Option<Rect> {
        self.marquee.band()
    }

    /// True while a marquee drag has the viewport frozen.
    pub fn scroll_frozen(&self) -> bool {
        self.marquee.scroll_frozen()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    pub fn playhead_position(&self) -> f64 {
        self.playhead.position()
    }

    pub fn range_head_position(&self) -> f64 {
        self.range_head.position()
    }

    pub fn set_playhead_position(&mut self, position: f64) {
        self.playhead.set_position(position);
    }

    pub fn set_range_head_position(&mut self, position: f64) {
        self.range_head.set_position(position);
        self.relayout();
    }

    /// Marker frame in the measure strip, for hit-testing and drawing.
    pub fn playhead_frame(&self) -> Rect {
        self.marker_frame(self.playhead.position())
    }

    pub fn range_head_frame(&self) -> Rect {
        self.marker_frame(self.range_head.position())
    }

    fn marker_frame(&self, position: f64) -> Rect {
        let params = self.params();
        let size = self.config.measure_height;
        Rect::new(
            geometry::pixel_x(position, &params) - size / 2.0,
            0.0,
            size,
            size,
        )
    }

    /// Hit test against current cell frames.
    pub fn cell_at(&self, position: (f32, f32)) -> Option<CellIndex> {
        for (row, frames) in self.cell_frames.iter().enumerate() {
            for (index, frame) in frames.iter().enumerate() {
                if frame.contains(position) {
                    return Some(CellIndex::new(row, index));
                }
            }
        }
        None
    }

    // ========================================================================
    // RELOAD + LAYOUT
    // ========================================================================

    /// Pulls the whole model from the data source and rebuilds every frame.
    /// Appends a history snapshot unless history is disabled.
    pub fn reload_data(&mut self, source: &dyn TimeTableDataSource<T>) {
        self.time_signature = source.time_signature();
        let count = source.row_count();
        self.rows.clear();
        for i in 0..count {
            match source.row_at(i) {
                Some(row) => self.rows.push(row),
                None => log::warn!(
                    "data source returned no row at index {i} after claiming {count} rows; skipping"
                ),
            }
        }
        self.rebuild_view_state();
        if self.config.holds_history {
            self.history.append(self.rows.clone());
        }
    }

    /// Replays a history snapshot. Never appends back to history, which
    /// would duplicate items and loop on every undo.
    fn reload_from_item(&mut self, item: HistoryItem<T>) {
        self.rows = item;
        self.rebuild_view_state();
    }

    fn rebuild_view_state(&mut self) {
        // In-flight gestures refer to handles the reload just invalidated.
        self.edit = CellEditController::default();
        self.marquee = MarqueeController::default();
        self.selected = self
            .rows
            .iter()
            .map(|row| vec![false; row.cells.len()])
            .collect();
        self.relayout();
    }

    /// Per-frame layout pass. Skipped while a move/resize drag is live, when
    /// the transient frames are the temporary source of truth.
    pub fn layout(&mut self, viewport: Rect) {
        self.viewport = viewport;
        if self.edit.is_editing() {
            return;
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        let params = self.params();
        let max_duration = self
            .rows
            .iter()
            .map(RowData::duration)
            .fold(0.0, f64::max);
        let range = self
            .config
            .shows_range_head
            .then(|| self.range_head.position());
        self.bar_count =
            geometry::required_bar_count(max_duration, self.viewport.w, range, &params);
        self.content_size = geometry::content_size(self.rows.len(), self.bar_count, &params);
        self.header_frames = (0..self.rows.len())
            .map(|row| geometry::header_frame(row, &params))
            .collect();
        self.cell_frames = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, data)| {
                data.cells
                    .iter()
                    .map(|cell| geometry::cell_frame(cell.position, cell.duration, row, &params))
                    .collect()
            })
            .collect();
    }

    // ========================================================================
    // HISTORY
    // ========================================================================

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) {
        if !self.config.holds_history {
            return;
        }
        if let Some(item) = self.history.undo() {
            self.reload_from_item(item.clone());
            let _ = self.events.send(TimeTableEvent::HistoryChanged(item));
        }
    }

    pub fn redo(&mut self) {
        if !self.config.holds_history {
            return;
        }
        if let Some(item) = self.history.redo() {
            self.reload_from_item(item.clone());
            let _ = self.events.send(TimeTableEvent::HistoryChanged(item));
        }
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        if let Some(item) = self.history.set_limit(limit) {
            self.reload_from_item(item.clone());
            let _ = self.events.send(TimeTableEvent::HistoryChanged(item));
        }
    }

    // ========================================================================
    // SELECTION + MARQUEE
    // ========================================================================

    pub fn select_cell(&mut self, index: CellIndex, exclusive: bool) {
        if exclusive {
            self.unselect_all_cells();
        }
        if let Some(flag) = self
            .selected
            .get_mut(index.row)
            .and_then(|row| row.get_mut(index.index))
        {
            *flag = true;
        }
    }

    pub fn unselect_all_cells(&mut self) {
        for row in &mut self.selected {
            row.fill(false);
        }
    }

    /// Background pointer down in content coordinates.
    pub fn pointer_down(&mut self, position: (f32, f32), now: f64) {
        self.marquee.pointer_down(position, now);
    }

    pub fn pointer_moved(&mut self, position: (f32, f32), now: f64) {
        if self
            .marquee
            .pointer_moved(position, now, self.viewport, self.content_size)
        {
            self.apply_marquee();
        }
    }

    /// A plain tap on empty space clears the selection; ending an active
    /// band keeps whatever it selected.
    pub fn pointer_up(&mut self) {
        if self.marquee.pointer_up() {
            self.unselect_all_cells();
        }
    }

    /// Drives the deferred-band arm and auto-scrolling. Returns a viewport
    /// scroll request the owner must apply, if one is due.
    pub fn tick(&mut self, now: f64) -> Option<(f32, f32)> {
        if self.marquee.tick(now) {
            self.apply_marquee();
        }
        let step = self.marquee.auto_scroll_tick(now)?;
        // A clamped viewport moves less than the step; the band must track
        // the real pointer, not the requested one.
        let applied = self.scroll_viewport(step);
        if let Some(pointer) = self.marquee.auto_scroll_applied(applied) {
            self.marquee
                .pointer_moved(pointer, now, self.viewport, self.content_size);
            self.apply_marquee();
        }
        Some(applied)
    }

    fn scroll_viewport(&mut self, step: (f32, f32)) -> (f32, f32) {
        let max_x = (self.content_size.0 - self.viewport.w).max(0.0);
        let max_y = (self.content_size.1 - self.viewport.h).max(0.0);
        let old = (self.viewport.x, self.viewport.y);
        self.viewport.x = (self.viewport.x + step.0).clamp(0.0, max_x);
        self.viewport.y = (self.viewport.y + step.1).clamp(0.0, max_y);
        (self.viewport.x - old.0, self.viewport.y - old.1)
    }

    /// Selection is a pure function of band ∩ cell frame.
    fn apply_marquee(&mut self) {
        let Some(band) = self.marquee.band() else {
            return;
        };
        for (row, frames) in self.cell_frames.iter().enumerate() {
            for (index, frame) in frames.iter().enumerate() {
                self.selected[row][index] = band.intersects(frame);
            }
        }
    }

    // ========================================================================
    // CELL EDITING
    // ========================================================================

    pub fn begin_cell_move(&mut self, index: CellIndex) {
        self.begin_cell_edit(EditKind::Move, index);
    }

    pub fn begin_cell_resize(&mut self, index: CellIndex) {
        self.begin_cell_edit(EditKind::Resize, index);
    }

    fn begin_cell_edit(&mut self, kind: EditKind, index: CellIndex) {
        if self
            .cell_frames
            .get(index.row)
            .and_then(|row| row.get(index.index))
            .is_none()
        {
            log::warn!(
                "edit began on stale cell handle {:?}; {} rows on screen",
                index,
                self.cell_frames.len()
            );
            return;
        }
        self.select_cell(index, false);
        self.edit.begin(kind, self.selected_indices());
    }

    pub fn drag_cell(&mut self, delta: (f32, f32)) {
        let params = self.params();
        self.edit.drag(
            delta,
            &mut self.cell_frames,
            &params,
            self.content_size,
            self.rows.len(),
        );
    }

    /// Ends (or cancels) the drag and emits one batched edit notification.
    pub fn end_cell_drag(&mut self) {
        let params = self.params();
        let edits = self.edit.end(&self.cell_frames, &params);
        if !edits.is_empty() {
            let _ = self.events.send(TimeTableEvent::CellsEdited(edits));
        }
    }

    /// Signals the host to delete the selected cells. The host owns the
    /// confirmation UI and the actual removal.
    pub fn request_delete_selected(&mut self) {
        let indices = self.selected_indices();
        if !indices.is_empty() {
            let _ = self
                .events
                .send(TimeTableEvent::CellsDeleteRequested(indices));
        }
    }

    // ========================================================================
    // PLAYHEAD + RANGE HEAD + ZOOM
    // ========================================================================

    pub fn begin_playhead_drag(&mut self) {
        self.playhead.begin_drag();
    }

    pub fn drag_playhead(&mut self, delta_x: f32) {
        let params = self.params();
        if let Some(position) = self.playhead.drag(delta_x, &params, self.content_size.0) {
            let _ = self.events.send(TimeTableEvent::PlayheadMoved(position));
        }
    }

    pub fn end_playhead_drag(&mut self) {
        if let Some(position) = self.playhead.end_drag() {
            let _ = self.events.send(TimeTableEvent::PlayheadMoved(position));
        }
    }

    pub fn begin_range_head_drag(&mut self) {
        self.range_head.begin_drag();
    }

    pub fn drag_range_head(&mut self, delta_x: f32) {
        let params = self.params();
        if let Some(position) = self.range_head.drag(delta_x, &params, self.content_size.0) {
            let _ = self.events.send(TimeTableEvent::RangeHeadMoved(position));
        }
    }

    pub fn end_range_head_drag(&mut self) {
        if let Some(position) = self.range_head.end_drag() {
            let _ = self.events.send(TimeTableEvent::RangeHeadMoved(position));
        }
        // The range head feeds the bar count.
        self.relayout();
    }

    /// One pinch tick. The new measure width feeds all subsequent geometry
    /// and quantization immediately.
    pub fn pinch(&mut self, raw_scale: f32) {
        self.measure_width = zoom::apply_pinch(self.measure_width, raw_scale, &self.config.zoom);
        if !self.edit.is_editing() {
            self.relayout();
        }
    }
}
