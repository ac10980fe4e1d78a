//! Notifications pushed from the engine to the host.

use crate::model::{CellIndex, HistoryItem};

pub use crate::edit::EditedCell;

/// Everything the table tells its host. The host applies these to its own
/// source-of-truth model and calls `reload_data` again.
#[derive(Debug, Clone)]
pub enum TimeTableEvent<T> {
    /// A move/resize gesture ended; one batch covering every edited cell.
    CellsEdited(Vec<EditedCell>),
    /// The user asked to delete the selected cells.
    CellsDeleteRequested(Vec<CellIndex>),
    /// The playhead was dragged to a new beat position.
    PlayheadMoved(f64),
    /// The range head was dragged to a new beat position.
    RangeHeadMoved(f64),
    /// Undo/redo replayed a snapshot; replace the model with it and reload
    /// without appending to history.
    HistoryChanged(HistoryItem<T>),
}
