//! Safe bulk structural edits on the row/cell model.
//!
//! Removal works on original offsets in one filter pass per row, never by
//! repeated single removal, so a batch cannot corrupt the indices it was
//! built from. Combined with [`append_cell`] this is the building block for
//! moving a cell to another row: capture the cell data, append it to the
//! target row, then remove the stale offsets.

use std::collections::{HashMap, HashSet};

use crate::error::TimeTableError;
use crate::model::{CellData, CellIndex, RowData};

/// Removes every referenced cell. The whole batch is validated up front;
/// nothing is removed if any index is out of bounds.
pub fn remove_cells<T>(
    rows: &mut [RowData<T>],
    indices: &[CellIndex],
) -> Result<(), TimeTableError> {
    for index in indices {
        let row = rows
            .get(index.row)
            .ok_or(TimeTableError::RowOutOfBounds {
                row: index.row,
                rows: rows.len(),
            })?;
        if index.index >= row.cells.len() {
            return Err(TimeTableError::CellOutOfBounds {
                row: index.row,
                index: index.index,
                cells: row.cells.len(),
            });
        }
    }

    let mut by_row: HashMap<usize, HashSet<usize>> = HashMap::new();
    for index in indices {
        by_row.entry(index.row).or_default().insert(index.index);
    }

    for (row, offsets) in by_row {
        let mut offset = 0;
        rows[row].cells.retain(|_| {
            let keep = !offsets.contains(&offset);
            offset += 1;
            keep
        });
    }
    Ok(())
}

/// Appends a cell to the end of the target row's cell list.
pub fn append_cell<T>(
    rows: &mut [RowData<T>],
    cell: CellData<T>,
    row: usize,
) -> Result<(), TimeTableError> {
    let rows_len = rows.len();
    rows.get_mut(row)
        .ok_or(TimeTableError::RowOutOfBounds {
            row,
            rows: rows_len,
        })?
        .cells
        .push(cell);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RowData<String> {
        RowData::new(
            "row",
            cells
                .iter()
                .enumerate()
                .map(|(i, s)| CellData::new(s.to_string(), i as f64, 1.0))
                .collect(),
        )
    }

    #[test]
    fn removes_by_original_offset_in_one_pass() {
        let mut rows = vec![row(&["a", "b", "c"])];
        remove_cells(
            &mut rows,
            &[CellIndex::new(0, 0), CellIndex::new(0, 2)],
        )
        .unwrap();
        let left: Vec<_> = rows[0].cells.iter().map(|c| c.payload.as_str()).collect();
        assert_eq!(left, vec!["b"]);
    }

    #[test]
    fn removal_spans_rows_without_shifting() {
        let mut rows = vec![row(&["a", "b"]), row(&["c", "d", "e"])];
        remove_cells(
            &mut rows,
            &[
                CellIndex::new(1, 1),
                CellIndex::new(0, 0),
                CellIndex::new(1, 2),
            ],
        )
        .unwrap();
        assert_eq!(rows[0].cells[0].payload, "b");
        assert_eq!(rows[1].cells.len(), 1);
        assert_eq!(rows[1].cells[0].payload, "c");
    }

    #[test]
    fn bad_row_fails_whole_batch() {
        let mut rows = vec![row(&["a", "b"])];
        let err = remove_cells(
            &mut rows,
            &[CellIndex::new(0, 0), CellIndex::new(3, 0)],
        )
        .unwrap_err();
        assert_eq!(err, TimeTableError::RowOutOfBounds { row: 3, rows: 1 });
        assert_eq!(rows[0].cells.len(), 2);
    }

    #[test]
    fn bad_cell_offset_is_reported() {
        let mut rows = vec![row(&["a"])];
        let err = remove_cells(&mut rows, &[CellIndex::new(0, 5)]).unwrap_err();
        assert_eq!(
            err,
            TimeTableError::CellOutOfBounds {
                row: 0,
                index: 5,
                cells: 1
            }
        );
    }

    #[test]
    fn append_targets_row_end() {
        let mut rows = vec![row(&["a"]), row(&[])];
        append_cell(&mut rows, CellData::new("x".to_string(), 2.0, 1.0), 1).unwrap();
        assert_eq!(rows[1].cells[0].payload, "x");

        let err = append_cell(&mut rows, CellData::new("y".to_string(), 0.0, 1.0), 9).unwrap_err();
        assert_eq!(err, TimeTableError::RowOutOfBounds { row: 9, rows: 2 });
    }
}
