//! Per-cell move/resize gesture sessions over the selected set.
//!
//! The on-screen frames are the source of truth while a session is live;
//! the owner suppresses layout recomputation until the session ends, then
//! translates the final frames back to logical coordinates in one batch.

use crate::geometry::{self, LayoutParams, Rect};
use crate::model::CellIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Move,
    Resize,
}

/// Outcome for one cell of an edit batch: its handle before the edit and
/// its recomputed logical placement after it.
#[derive(Debug, Clone, PartialEq)]
pub struct EditedCell {
    pub index: CellIndex,
    pub new_row: usize,
    pub new_position: f64,
    pub new_duration: f64,
}

#[derive(Debug)]
struct EditSession {
    kind: EditKind,
    batch: Vec<CellIndex>,
    accumulated_x: f32,
    accumulated_y: f32,
}

/// State machine for cell editing: idle -> dragging -> idle.
///
/// Raw gesture translation accumulates and is spent in whole sub-beat or
/// whole row-height steps, so motion is quantized rather than proportional.
#[derive(Debug, Default)]
pub struct CellEditController {
    session: Option<EditSession>,
}

impl CellEditController {
    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn kind(&self) -> Option<EditKind> {
        self.session.as_ref().map(|s| s.kind)
    }

    /// Starts a session over a snapshot of the selected cells' handles.
    pub fn begin(&mut self, kind: EditKind, batch: Vec<CellIndex>) {
        self.session = Some(EditSession {
            kind,
            batch,
            accumulated_x: 0.0,
            accumulated_y: 0.0,
        });
    }

    /// Applies a gesture delta to the batch's frames.
    ///
    /// Horizontal steps are rejected per cell at the row-header boundary and
    /// the content right edge. Vertical steps are clamped as a group: the
    /// whole selection shifts a row only when its topmost (up) or bottommost
    /// (down) member can legally shift, so the block never splits. Resize is
    /// x-only and floors at one sub-beat of width.
    pub fn drag(
        &mut self,
        delta: (f32, f32),
        frames: &mut [Vec<Rect>],
        params: &LayoutParams,
        content_size: (f32, f32),
        row_count: usize,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.accumulated_x += delta.0;
        session.accumulated_y += delta.1;
        let subbeat = params.subbeat_width();

        match session.kind {
            EditKind::Move => {
                while session.accumulated_x >= subbeat {
                    for_each_frame(&session.batch, frames, |frame| {
                        if frame.max_x() + subbeat <= content_size.0 {
                            frame.x += subbeat;
                        }
                    });
                    session.accumulated_x -= subbeat;
                }
                while session.accumulated_x <= -subbeat {
                    for_each_frame(&session.batch, frames, |frame| {
                        if frame.min_x() - subbeat >= params.header_width {
                            frame.x -= subbeat;
                        }
                    });
                    session.accumulated_x += subbeat;
                }

                let row_height = params.row_height;
                let bottom = params.measure_height + row_count as f32 * row_height;
                while session.accumulated_y >= row_height {
                    let lowest = batch_extent(&session.batch, frames, |f| f.max_y(), f32::max);
                    if lowest + row_height <= bottom {
                        for_each_frame(&session.batch, frames, |frame| frame.y += row_height);
                    }
                    session.accumulated_y -= row_height;
                }
                while session.accumulated_y <= -row_height {
                    let highest = batch_extent(&session.batch, frames, |f| f.min_y(), f32::min);
                    if highest - row_height >= params.measure_height {
                        for_each_frame(&session.batch, frames, |frame| frame.y -= row_height);
                    }
                    session.accumulated_y += row_height;
                }
            }
            EditKind::Resize => {
                while session.accumulated_x >= subbeat {
                    for_each_frame(&session.batch, frames, |frame| {
                        if frame.max_x() + subbeat <= content_size.0 {
                            frame.w += subbeat;
                        }
                    });
                    session.accumulated_x -= subbeat;
                }
                while session.accumulated_x <= -subbeat {
                    for_each_frame(&session.batch, frames, |frame| {
                        if frame.w - subbeat >= subbeat {
                            frame.w -= subbeat;
                        }
                    });
                    session.accumulated_x += subbeat;
                }
            }
        }
    }

    /// Ends the session and recomputes every batch member's logical
    /// placement from its final frame. A cancelled gesture goes through the
    /// same path: whatever partial state was reached is committed.
    pub fn end(&mut self, frames: &[Vec<Rect>], params: &LayoutParams) -> Vec<EditedCell> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        session
            .batch
            .iter()
            .filter_map(|index| {
                let frame = frames.get(index.row)?.get(index.index)?;
                Some(EditedCell {
                    index: *index,
                    new_row: geometry::row_index_from_y(frame.y, params).max(0) as usize,
                    new_position: geometry::beat_position(frame.x, params),
                    new_duration: (frame.w / params.beat_width()) as f64,
                })
            })
            .collect()
    }
}

fn for_each_frame(
    batch: &[CellIndex],
    frames: &mut [Vec<Rect>],
    mut apply: impl FnMut(&mut Rect),
) {
    for index in batch {
        if let Some(frame) = frames
            .get_mut(index.row)
            .and_then(|row| row.get_mut(index.index))
        {
            apply(frame);
        }
    }
}

fn batch_extent(
    batch: &[CellIndex],
    frames: &[Vec<Rect>],
    value: impl Fn(&Rect) -> f32,
    fold: impl Fn(f32, f32) -> f32,
) -> f32 {
    batch
        .iter()
        .filter_map(|index| frames.get(index.row)?.get(index.index).map(&value))
        .reduce(|a, b| fold(a, b))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Default params: beat width 50, subbeat width 12.5, rows at y 30 + 60*i.
    fn params() -> LayoutParams {
        LayoutParams::default()
    }

    fn frames_for(rows: &[&[(f64, f64)]]) -> Vec<Vec<Rect>> {
        let params = params();
        rows.iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .map(|&(position, duration)| {
                        geometry::cell_frame(position, duration, row, &params)
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn move_quantizes_to_subbeat_steps() {
        let params = params();
        let mut frames = frames_for(&[&[(0.0, 1.0)]]);
        let mut edit = CellEditController::default();
        edit.begin(EditKind::Move, vec![CellIndex::new(0, 0)]);

        edit.drag((13.0, 0.0), &mut frames, &params, (2000.0, 90.0), 1);
        let edits = edit.end(&frames, &params);
        assert_eq!(edits.len(), 1);
        assert!((edits[0].new_position - 0.25).abs() < 1e-4);
        assert!((edits[0].new_duration - 1.0).abs() < 1e-4);
    }

    #[test]
    fn four_crossings_make_one_beat() {
        let params = params();
        let mut frames = frames_for(&[&[(0.0, 1.0)]]);
        let mut edit = CellEditController::default();
        edit.begin(EditKind::Move, vec![CellIndex::new(0, 0)]);

        edit.drag((2.0 * params.subbeat_width(), 0.0), &mut frames, &params, (2000.0, 90.0), 1);
        edit.drag((2.0 * params.subbeat_width(), 0.0), &mut frames, &params, (2000.0, 90.0), 1);
        let edits = edit.end(&frames, &params);
        assert!((edits[0].new_position - 1.0).abs() < 1e-4);
    }

    #[test]
    fn sub_threshold_motion_does_nothing() {
        let params = params();
        let mut frames = frames_for(&[&[(0.0, 1.0)]]);
        let before = frames[0][0];
        let mut edit = CellEditController::default();
        edit.begin(EditKind::Move, vec![CellIndex::new(0, 0)]);
        edit.drag((10.0, 10.0), &mut frames, &params, (2000.0, 90.0), 1);
        assert_eq!(frames[0][0], before);
    }

    #[test]
    fn move_stops_at_header_boundary() {
        let params = params();
        let mut frames = frames_for(&[&[(0.0, 1.0)]]);
        let mut edit = CellEditController::default();
        edit.begin(EditKind::Move, vec![CellIndex::new(0, 0)]);
        edit.drag((-500.0, 0.0), &mut frames, &params, (2000.0, 90.0), 1);
        let edits = edit.end(&frames, &params);
        assert_eq!(edits[0].new_position, 0.0);
    }

    #[test]
    fn group_move_down_is_clamped_by_bottommost_member() {
        let params = params();
        // Two selected cells in rows 0 and 1 of a 2-row table: the block
        // cannot move down because row 1 is already the last row.
        let mut frames = frames_for(&[&[(0.0, 1.0)], &[(2.0, 1.0)]]);
        let mut edit = CellEditController::default();
        edit.begin(
            EditKind::Move,
            vec![CellIndex::new(0, 0), CellIndex::new(1, 0)],
        );
        edit.drag((0.0, 200.0), &mut frames, &params, (2000.0, 150.0), 2);
        let edits = edit.end(&frames, &params);
        assert_eq!(edits[0].new_row, 0);
        assert_eq!(edits[1].new_row, 1);
    }

    #[test]
    fn single_cell_row_jump() {
        let params = params();
        let mut frames = frames_for(&[&[(0.0, 4.0)], &[]]);
        let mut edit = CellEditController::default();
        edit.begin(EditKind::Move, vec![CellIndex::new(0, 0)]);
        edit.drag((0.0, 65.0), &mut frames, &params, (2000.0, 150.0), 2);
        let edits = edit.end(&frames, &params);
        assert_eq!(edits[0].new_row, 1);
        assert_eq!(edits[0].new_position, 0.0);
    }

    #[test]
    fn resize_floors_at_one_subbeat() {
        let params = params();
        let mut frames = frames_for(&[&[(0.0, 1.0)]]);
        let mut edit = CellEditController::default();
        edit.begin(EditKind::Resize, vec![CellIndex::new(0, 0)]);
        // Five shrink crossings on a 4-subbeat cell: the 4th and 5th are
        // rejected, duration floors at 0.25.
        edit.drag((-5.0 * params.subbeat_width(), 0.0), &mut frames, &params, (2000.0, 90.0), 1);
        let edits = edit.end(&frames, &params);
        assert!((edits[0].new_duration - 0.25).abs() < 1e-4);
        assert_eq!(edits[0].new_position, 0.0);
    }

    #[test]
    fn resize_respects_content_right_edge() {
        let params = params();
        let mut frames = frames_for(&[&[(0.0, 1.0)]]);
        let mut edit = CellEditController::default();
        edit.begin(EditKind::Resize, vec![CellIndex::new(0, 0)]);
        // Content ends at 120 + 200 px; the cell can grow to 4 beats only.
        edit.drag((1000.0, 0.0), &mut frames, &params, (320.0, 90.0), 1);
        let edits = edit.end(&frames, &params);
        assert!((edits[0].new_duration - 4.0).abs() < 1e-4);
    }

    #[test]
    fn end_without_session_is_empty() {
        let params = params();
        let mut edit = CellEditController::default();
        assert!(edit.end(&[], &params).is_empty());
        assert!(!edit.is_editing());
    }
}
