//! Sparse cell storage for the in-memory host
//!
//! Only cells carrying a value, a formula, or a style are stored, in a
//! row-based `BTreeMap` so iteration is row-major without sorting.

use std::collections::BTreeMap;

use crate::cell::CellValue;
use crate::range::RangeBound;
use crate::style::CellStyle;

/// Complete data for a single cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellData {
    /// Literal value, or the cached result of the formula
    pub value: CellValue,
    /// Formula text (including the leading `=`)
    pub formula: Option<String>,
    /// Non-default style
    pub style: Option<CellStyle>,
}

impl CellData {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Check if this cell is effectively empty (no value, no formula, default style)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.formula.is_none() && self.style.is_none()
    }
}

/// Sparse row-based storage for sheet cells
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, CellData>>`
#[derive(Debug, Clone, Default)]
pub struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u32, CellData>>,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u32) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Apply `edit` to a cell, creating it if needed and dropping it if it
    /// ends up empty
    pub fn update<F>(&mut self, row: u32, col: u32, edit: F)
    where
        F: FnOnce(&mut CellData),
    {
        let row_map = self.rows.entry(row).or_default();
        let cell = row_map.entry(col).or_default();
        edit(cell);
        if cell.is_empty() {
            row_map.remove(&col);
            if row_map.is_empty() {
                self.rows.remove(&row);
            }
        }
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u32) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let result = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        result
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bounds of every cell with a value or formula
    ///
    /// Styled-but-blank cells do not extend the used range.
    pub fn used_bounds(&self) -> Option<RangeBound> {
        let mut bounds: Option<RangeBound> = None;
        for (row, col, data) in self.iter() {
            if data.value.is_empty() && data.formula.is_none() {
                continue;
            }
            bounds = Some(match bounds {
                None => RangeBound::single(row, col),
                Some(b) => RangeBound {
                    start_row: b.start_row.min(row),
                    start_col: b.start_col.min(col),
                    end_row: b.end_row.max(row),
                    end_col: b.end_col.max(col),
                },
            });
        }
        bounds
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, data)| (row, col, data)))
    }

    /// Iterate over cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u32, &CellData)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, data)| (col, data)))
    }

    /// Iterate over the cells of one column, top to bottom
    pub fn iter_column(&self, col: u32) -> impl Iterator<Item = (u32, &CellData)> {
        self.rows
            .iter()
            .filter_map(move |(&row, cols)| cols.get(&col).map(|data| (row, data)))
    }

    /// Open a gap of `count` rows at `at`, moving later rows down
    pub fn insert_rows(&mut self, at: u32, count: u32) {
        shift_keys_insert(&mut self.rows, at, count);
    }

    /// Drop rows `at..at + count`, moving later rows up
    pub fn delete_rows(&mut self, at: u32, count: u32) {
        shift_keys_delete(&mut self.rows, at, count);
    }

    /// Open a gap of `count` columns at `at`, moving later columns right
    pub fn insert_columns(&mut self, at: u32, count: u32) {
        for row_map in self.rows.values_mut() {
            shift_keys_insert(row_map, at, count);
        }
    }

    /// Drop columns `at..at + count`, moving later columns left
    pub fn delete_columns(&mut self, at: u32, count: u32) {
        for row_map in self.rows.values_mut() {
            shift_keys_delete(row_map, at, count);
        }
        self.rows.retain(|_, cols| !cols.is_empty());
    }
}

/// Move every key `>= at` up by `count`
pub(crate) fn shift_keys_insert<V>(map: &mut BTreeMap<u32, V>, at: u32, count: u32) {
    if count == 0 {
        return;
    }
    let moved = map.split_off(&at);
    map.extend(
        moved
            .into_iter()
            .filter_map(|(k, v)| k.checked_add(count).map(|k| (k, v))),
    );
}

/// Drop keys in `at..at + count` and move later keys down by `count`
pub(crate) fn shift_keys_delete<V>(map: &mut BTreeMap<u32, V>, at: u32, count: u32) {
    if count == 0 {
        return;
    }
    let mut tail = map.split_off(&at);
    let Some(end) = at.checked_add(count) else {
        return;
    };
    let kept = tail.split_off(&end);
    map.extend(kept.into_iter().map(|(k, v)| (k - count, v)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(storage: &CellStorage, row: u32, col: u32) -> Option<f64> {
        storage.get(row, col).and_then(|c| c.value.as_number())
    }

    #[test]
    fn test_basic_operations() {
        let mut storage = CellStorage::new();

        storage.update(0, 0, |c| c.value = CellValue::Number(42.0));
        assert_eq!(num(&storage, 0, 0), Some(42.0));
        assert!(storage.get(1, 1).is_none());
    }

    #[test]
    fn test_empty_cells_not_stored() {
        let mut storage = CellStorage::new();

        storage.update(0, 0, |c| c.value = CellValue::Number(42.0));
        assert_eq!(storage.cell_count(), 1);

        storage.update(0, 0, |c| c.value = CellValue::Empty);
        assert_eq!(storage.cell_count(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_used_bounds_ignores_style_only_cells() {
        let mut storage = CellStorage::new();
        assert!(storage.used_bounds().is_none());

        storage.update(5, 3, |c| c.value = CellValue::Number(1.0));
        storage.update(10, 7, |c| c.formula = Some("=A1".into()));
        storage.update(2, 1, |c| c.value = CellValue::Number(3.0));
        storage.update(50, 50, |c| c.style = Some(CellStyle::new().bold()));

        assert_eq!(storage.used_bounds(), Some(RangeBound::new(2, 1, 10, 7)));
    }

    #[test]
    fn test_row_shifting() {
        let mut storage = CellStorage::new();
        for row in 0..4 {
            storage.update(row, 0, |c| c.value = CellValue::Number(row as f64));
        }

        storage.insert_rows(1, 2);
        assert_eq!(num(&storage, 0, 0), Some(0.0));
        assert!(storage.get(1, 0).is_none());
        assert_eq!(num(&storage, 3, 0), Some(1.0));
        assert_eq!(num(&storage, 5, 0), Some(3.0));

        storage.delete_rows(1, 3);
        assert_eq!(num(&storage, 1, 0), Some(2.0));
        assert_eq!(num(&storage, 2, 0), Some(3.0));
        assert_eq!(storage.cell_count(), 3);
    }

    #[test]
    fn test_column_shifting() {
        let mut storage = CellStorage::new();
        storage.update(0, 0, |c| c.value = CellValue::from("a"));
        storage.update(0, 1, |c| c.value = CellValue::from("b"));
        storage.update(1, 1, |c| c.value = CellValue::from("c"));

        storage.delete_columns(1, 1);
        assert_eq!(storage.cell_count(), 1);
        assert!(storage.iter_row(1).next().is_none());

        storage.insert_columns(0, 3);
        assert_eq!(
            storage.get(0, 3).map(|c| c.value.clone()),
            Some(CellValue::from("a"))
        );
    }

    #[test]
    fn test_iteration_is_row_major() {
        let mut storage = CellStorage::new();
        storage.update(1, 0, |c| c.value = CellValue::Number(3.0));
        storage.update(0, 1, |c| c.value = CellValue::Number(2.0));
        storage.update(0, 0, |c| c.value = CellValue::Number(1.0));

        let order: Vec<_> = storage.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(storage.iter_column(0).count(), 2);
    }
}
