pub mod directory;
pub mod edit;
pub mod error;
pub mod events;
pub mod geometry;
pub mod history;
pub mod model;
pub mod playhead;
pub mod select;
pub mod table;
pub mod zoom;

// Re-exports
pub use error::TimeTableError;
pub use events::{EditedCell, TimeTableEvent};
pub use model::{CellData, CellIndex, HistoryItem, NoteValue, RowData, TimeSignature};
pub use table::{TimeTable, TimeTableConfig, TimeTableDataSource};
