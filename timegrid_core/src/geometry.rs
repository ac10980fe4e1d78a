//! Pure conversions between the logical beat model and pixel coordinates.
//!
//! All functions take a `LayoutParams` value recomputed once per layout pass
//! and passed explicitly, so collaborators never read shared mutable fields.

use serde::{Deserialize, Serialize};

/// Geometry parameters for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Width of one measure bar in pixels. Mutated only by the zoom gesture.
    pub measure_width: f32,
    /// Height of one row in pixels.
    pub row_height: f32,
    /// Height of the measure strip above the rows. 0 when hidden.
    pub measure_height: f32,
    /// Width of the row header column. 0 when hidden.
    pub header_width: f32,
    /// Beats per bar from the current time signature.
    pub beats_per_bar: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            measure_width: 200.0,
            row_height: 60.0,
            measure_height: 30.0,
            header_width: 120.0,
            beats_per_bar: 4,
        }
    }
}

impl LayoutParams {
    /// Width of one beat in pixels.
    pub fn beat_width(&self) -> f32 {
        self.measure_width / self.beats_per_bar.max(1) as f32
    }

    /// Width of the drag quantization unit: a quarter of a beat, regardless
    /// of the time signature's note value.
    pub fn subbeat_width(&self) -> f32 {
        self.beat_width() / 4.0
    }
}

/// Minimal axis-aligned rectangle so the engine stays free of GUI types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Normalized rect spanning two corner points, whatever quadrant the
    /// second point lies in relative to the first.
    pub fn from_corners(a: (f32, f32), b: (f32, f32)) -> Self {
        let x = a.0.min(b.0);
        let y = a.1.min(b.1);
        Self {
            x,
            y,
            w: (a.0 - b.0).abs(),
            h: (a.1 - b.1).abs(),
        }
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.w
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.h
    }

    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.min_x()
            && point.0 <= self.max_x()
            && point.1 >= self.min_y()
            && point.1 <= self.max_y()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() <= other.max_x()
            && other.min_x() <= self.max_x()
            && self.min_y() <= other.max_y()
            && other.min_y() <= self.max_y()
    }
}

/// X pixel of a beat position.
pub fn pixel_x(beat_position: f64, params: &LayoutParams) -> f32 {
    params.header_width + beat_position as f32 * params.beat_width()
}

/// Pixel width of a beat duration.
pub fn pixel_width(beat_duration: f64, params: &LayoutParams) -> f32 {
    beat_duration as f32 * params.beat_width()
}

/// Beat position of an x pixel.
pub fn beat_position(pixel_x: f32, params: &LayoutParams) -> f64 {
    ((pixel_x - params.header_width) / params.beat_width()) as f64
}

/// Row index under a y pixel. Does not range-check against the row count;
/// callers must, and the result is negative above the first row.
pub fn row_index_from_y(pixel_y: f32, params: &LayoutParams) -> i32 {
    ((pixel_y - params.measure_height) / params.row_height).floor() as i32
}

/// Number of measure bars the grid must span: enough for the longest row
/// plus one spare bar, enough to fill the viewport even with sparse data,
/// and enough to reach the range head plus one when it is shown.
pub fn required_bar_count(
    max_row_duration: f64,
    viewport_width: f32,
    range_head: Option<f64>,
    params: &LayoutParams,
) -> usize {
    let beats = params.beats_per_bar.max(1) as f64;
    let min_bars = (viewport_width / params.measure_width).ceil() as usize;
    let mut bars = (max_row_duration / beats).ceil() as usize + 1;
    bars = bars.max(min_bars);
    if let Some(position) = range_head {
        let ranged = (position.max(0.0) / beats).ceil() as usize + 1;
        bars = bars.max(ranged);
    }
    bars.max(1)
}

/// On-screen frame of a cell at `position`/`duration` beats in a row.
pub fn cell_frame(position: f64, duration: f64, row: usize, params: &LayoutParams) -> Rect {
    Rect::new(
        pixel_x(position, params),
        params.measure_height + row as f32 * params.row_height,
        pixel_width(duration, params),
        params.row_height,
    )
}

/// On-screen frame of a row header.
pub fn header_frame(row: usize, params: &LayoutParams) -> Rect {
    Rect::new(
        0.0,
        params.measure_height + row as f32 * params.row_height,
        params.header_width,
        params.row_height,
    )
}

/// Logical content size of the whole table for a row/bar count.
pub fn content_size(row_count: usize, bar_count: usize, params: &LayoutParams) -> (f32, f32) {
    (
        params.header_width + bar_count as f32 * params.measure_width,
        params.measure_height + row_count as f32 * params.row_height,
    )
}
