use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Note value of a beat, as the denominator of the time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteValue {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    Thirtysecond,
    Sixtyfourth,
}

impl NoteValue {
    /// The fractional value of the note (4 for a quarter note).
    pub fn denominator(&self) -> u32 {
        match self {
            Self::Whole => 1,
            Self::Half => 2,
            Self::Quarter => 4,
            Self::Eighth => 8,
            Self::Sixteenth => 16,
            Self::Thirtysecond => 32,
            Self::Sixtyfourth => 64,
        }
    }
}

/// Time signature of the table. Immutable for one reload cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    /// Number of beats in a measure.
    pub beats: u32,
    /// Note value of each beat.
    pub note_value: NoteValue,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            beats: 4,
            note_value: NoteValue::Quarter,
        }
    }
}

/// One time-positioned event in a row. Position and duration are in beats;
/// the payload is host data the engine never inspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellData<T> {
    pub payload: T,
    pub position: f64,
    pub duration: f64,
}

impl<T> CellData<T> {
    pub fn new(payload: T, position: f64, duration: f64) -> Self {
        Self {
            payload,
            position,
            duration,
        }
    }

    /// End time of the cell in beats.
    pub fn end(&self) -> f64 {
        self.position + self.duration
    }
}

/// One horizontal lane of cells with a header label and a stable identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowData<T> {
    pub id: Uuid,
    pub header: String,
    pub cells: Vec<CellData<T>>,
}

impl<T> RowData<T> {
    pub fn new(header: impl Into<String>, cells: Vec<CellData<T>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            header: header.into(),
            cells,
        }
    }

    /// Duration of the row in beats: the largest cell end time, 0 if empty.
    pub fn duration(&self) -> f64 {
        self.cells.iter().map(CellData::end).fold(0.0, f64::max)
    }
}

/// Identifies a cell by its row and its offset within that row's cell list.
/// Valid as a handle for one edit batch only; any structural edit
/// (remove/append) invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    pub row: usize,
    pub index: usize,
}

impl CellIndex {
    pub fn new(row: usize, index: usize) -> Self {
        Self { row, index }
    }
}

/// One undo/redo unit: a deep snapshot of the whole row/cell model.
pub type HistoryItem<T> = Vec<RowData<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_duration_is_max_cell_end() {
        let row = RowData::new(
            "Chords",
            vec![
                CellData::new("C7", 0.0, 4.0),
                CellData::new("Dm7", 4.0, 4.0),
                CellData::new("G7b5", 8.0, 4.0),
            ],
        );
        assert_eq!(row.duration(), 12.0);
    }

    #[test]
    fn empty_row_duration_is_zero() {
        let row: RowData<()> = RowData::new("Empty", Vec::new());
        assert_eq!(row.duration(), 0.0);
    }
}
