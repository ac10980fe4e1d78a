use thiserror::Error;

/// Contract errors for structural edits. These indicate a desynchronized
/// handle (e.g. a `CellIndex` used after a reload invalidated it), so they
/// are reported instead of clamped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeTableError {
    #[error("row index {row} out of bounds ({rows} rows)")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("cell index {index} out of bounds in row {row} ({cells} cells)")]
    CellOutOfBounds {
        row: usize,
        index: usize,
        cells: usize,
    },
}
