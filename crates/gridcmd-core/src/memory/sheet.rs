//! In-memory sheet

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::storage::{shift_keys_delete, shift_keys_insert, CellData, CellStorage};
use super::workbook::validate_sheet_name;
use super::FormulaEvaluator;
use crate::cell::{CellAddress, CellValue};
use crate::error::{Error, Result};
use crate::host::HostSheet;
use crate::range::RangeBound;
use crate::style::CellStyle;

/// Rows a new sheet exposes
pub const DEFAULT_ROW_COUNT: u32 = 1000;

/// Columns a new sheet exposes
pub const DEFAULT_COLUMN_COUNT: u32 = 26;

/// Row height in points when not customized
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;

/// Column width in points when not customized
pub const DEFAULT_COLUMN_WIDTH: f64 = 64.0;

// Rough per-character advance used by auto-fit
const CHAR_WIDTH: f64 = 7.0;
const CELL_PADDING: f64 = 8.0;

/// A sheet held entirely in memory
///
/// The grid grows when a write lands outside the current extent, so batch
/// edits and copies never fail on size alone. Structural edits (insert,
/// delete, freeze, hide) are checked against the current extent.
#[derive(Clone)]
pub struct MemorySheet {
    name: String,
    cells: CellStorage,
    row_count: u32,
    column_count: u32,
    frozen_rows: u32,
    frozen_columns: u32,
    hidden_rows: BTreeMap<u32, bool>,
    hidden_columns: BTreeMap<u32, bool>,
    row_heights: BTreeMap<u32, f64>,
    column_widths: BTreeMap<u32, f64>,
    selection: RangeBound,
    paint_suspended: u32,
    evaluator: Option<Arc<dyn FormulaEvaluator>>,
}

impl MemorySheet {
    /// Create a new sheet with the default 1000 x 26 extent
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_dimensions(name, DEFAULT_ROW_COUNT, DEFAULT_COLUMN_COUNT)
    }

    /// Create a new sheet with the given extent
    pub fn with_dimensions<S: Into<String>>(name: S, rows: u32, columns: u32) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            row_count: rows,
            column_count: columns,
            frozen_rows: 0,
            frozen_columns: 0,
            hidden_rows: BTreeMap::new(),
            hidden_columns: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            column_widths: BTreeMap::new(),
            selection: RangeBound::single(0, 0),
            paint_suspended: 0,
            evaluator: None,
        }
    }

    /// Use `evaluator` to compute the value of formulas written from now on
    pub fn set_evaluator(&mut self, evaluator: Option<Arc<dyn FormulaEvaluator>>) {
        self.evaluator = evaluator;
    }

    // === Cell Access ===

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get cell value by address string (e.g., "A1")
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.value(addr.row, addr.col))
    }

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_value(addr.row, addr.col, value.into())
    }

    /// Set a cell formula by address string
    pub fn set_cell_formula(&mut self, address: &str, formula: &str) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_formula(addr.row, addr.col, Some(formula))
    }

    /// Iterate over stored cells in row order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, &CellData)> {
        self.cells.iter()
    }

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    /// Whether the sheet stores no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Re-evaluate every formula cell with the current evaluator
    pub fn recalculate(&mut self) {
        let formulas: Vec<(u32, u32, String)> = self
            .cells
            .iter()
            .filter_map(|(row, col, data)| data.formula.clone().map(|f| (row, col, f)))
            .collect();
        for (row, col, formula) in formulas {
            let value = self.evaluate(&formula);
            self.cells.update(row, col, |cell| cell.value = value);
        }
    }

    // === Row/Column Properties ===

    /// Row height in points
    pub fn row_height(&self, row: u32) -> f64 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    /// Column width in points
    pub fn column_width(&self, col: u32) -> f64 {
        self.column_widths
            .get(&col)
            .copied()
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Check if row is hidden
    pub fn is_row_hidden(&self, row: u32) -> bool {
        self.hidden_rows.get(&row).copied().unwrap_or(false)
    }

    /// Check if column is hidden
    pub fn is_column_hidden(&self, col: u32) -> bool {
        self.hidden_columns.get(&col).copied().unwrap_or(false)
    }

    /// Current selection
    pub fn selection(&self) -> RangeBound {
        self.selection
    }

    /// Whether at least one paint suspension is outstanding
    pub fn is_paint_suspended(&self) -> bool {
        self.paint_suspended > 0
    }

    // === Internal ===

    fn evaluate(&self, formula: &str) -> CellValue {
        match &self.evaluator {
            Some(evaluator) => evaluator.evaluate(self, formula),
            None => CellValue::Empty,
        }
    }

    fn grow_to(&mut self, row: u32, col: u32) {
        self.row_count = self.row_count.max(row.saturating_add(1));
        self.column_count = self.column_count.max(col.saturating_add(1));
    }

    fn check_row(&self, row: u32) -> Result<()> {
        if row >= self.row_count {
            return Err(Error::host(format!(
                "Row {} is outside the sheet ({} rows)",
                row + 1,
                self.row_count
            )));
        }
        Ok(())
    }

    fn check_column(&self, col: u32) -> Result<()> {
        if col >= self.column_count {
            return Err(Error::host(format!(
                "Column {} is outside the sheet ({} columns)",
                CellAddress::column_to_letters(col),
                self.column_count
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for MemorySheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySheet")
            .field("name", &self.name)
            .field("cells", &self.cells.cell_count())
            .field("row_count", &self.row_count)
            .field("column_count", &self.column_count)
            .field("frozen_rows", &self.frozen_rows)
            .field("frozen_columns", &self.frozen_columns)
            .finish_non_exhaustive()
    }
}

impl HostSheet for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) -> Result<()> {
        validate_sheet_name(name)?;
        self.name = name.to_string();
        Ok(())
    }

    fn used_range(&self) -> Option<RangeBound> {
        self.cells.used_bounds()
    }

    fn row_count(&self) -> u32 {
        self.row_count
    }

    fn column_count(&self) -> u32 {
        self.column_count
    }

    fn value(&self, row: u32, col: u32) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, row: u32, col: u32, value: CellValue) -> Result<()> {
        self.grow_to(row, col);
        self.cells.update(row, col, |cell| {
            cell.value = value;
            cell.formula = None;
        });
        Ok(())
    }

    fn formula(&self, row: u32, col: u32) -> Option<String> {
        self.cells.get(row, col).and_then(|c| c.formula.clone())
    }

    fn set_formula(&mut self, row: u32, col: u32, formula: Option<&str>) -> Result<()> {
        self.grow_to(row, col);
        match formula {
            Some(text) => {
                let value = self.evaluate(text);
                self.cells.update(row, col, |cell| {
                    cell.formula = Some(text.to_string());
                    cell.value = value;
                });
            }
            None => self.cells.update(row, col, |cell| cell.formula = None),
        }
        Ok(())
    }

    fn style(&self, row: u32, col: u32) -> Option<CellStyle> {
        self.cells.get(row, col).and_then(|c| c.style.clone())
    }

    fn set_style(&mut self, row: u32, col: u32, style: Option<CellStyle>) -> Result<()> {
        self.grow_to(row, col);
        let style = style.filter(|s| !s.is_default());
        self.cells.update(row, col, |cell| cell.style = style);
        Ok(())
    }

    fn add_rows(&mut self, row: u32, count: u32) -> Result<()> {
        if row > self.row_count {
            return Err(Error::host(format!(
                "Cannot insert rows at {}, the sheet has {} rows",
                row + 1,
                self.row_count
            )));
        }
        self.cells.insert_rows(row, count);
        shift_keys_insert(&mut self.hidden_rows, row, count);
        shift_keys_insert(&mut self.row_heights, row, count);
        self.row_count = self.row_count.saturating_add(count);
        if row < self.frozen_rows {
            self.frozen_rows = self.frozen_rows.saturating_add(count);
        }
        tracing::trace!(sheet = %self.name, row, count, "rows inserted");
        Ok(())
    }

    fn delete_rows(&mut self, row: u32, count: u32) -> Result<()> {
        self.check_row(row)?;
        let count = count.min(self.row_count - row);
        self.cells.delete_rows(row, count);
        shift_keys_delete(&mut self.hidden_rows, row, count);
        shift_keys_delete(&mut self.row_heights, row, count);
        self.row_count -= count;
        if row < self.frozen_rows {
            self.frozen_rows -= count.min(self.frozen_rows - row);
        }
        tracing::trace!(sheet = %self.name, row, count, "rows deleted");
        Ok(())
    }

    fn add_columns(&mut self, col: u32, count: u32) -> Result<()> {
        if col > self.column_count {
            return Err(Error::host(format!(
                "Cannot insert columns at {}, the sheet has {} columns",
                CellAddress::column_to_letters(col),
                self.column_count
            )));
        }
        self.cells.insert_columns(col, count);
        shift_keys_insert(&mut self.hidden_columns, col, count);
        shift_keys_insert(&mut self.column_widths, col, count);
        self.column_count = self.column_count.saturating_add(count);
        if col < self.frozen_columns {
            self.frozen_columns = self.frozen_columns.saturating_add(count);
        }
        tracing::trace!(sheet = %self.name, col, count, "columns inserted");
        Ok(())
    }

    fn delete_columns(&mut self, col: u32, count: u32) -> Result<()> {
        self.check_column(col)?;
        let count = count.min(self.column_count - col);
        self.cells.delete_columns(col, count);
        shift_keys_delete(&mut self.hidden_columns, col, count);
        shift_keys_delete(&mut self.column_widths, col, count);
        self.column_count -= count;
        if col < self.frozen_columns {
            self.frozen_columns -= count.min(self.frozen_columns - col);
        }
        tracing::trace!(sheet = %self.name, col, count, "columns deleted");
        Ok(())
    }

    fn frozen_row_count(&self) -> u32 {
        self.frozen_rows
    }

    fn set_frozen_row_count(&mut self, count: u32) -> Result<()> {
        if count > self.row_count {
            return Err(Error::host(format!(
                "Cannot freeze {} rows of a {}-row sheet",
                count, self.row_count
            )));
        }
        self.frozen_rows = count;
        Ok(())
    }

    fn frozen_column_count(&self) -> u32 {
        self.frozen_columns
    }

    fn set_frozen_column_count(&mut self, count: u32) -> Result<()> {
        if count > self.column_count {
            return Err(Error::host(format!(
                "Cannot freeze {} columns of a {}-column sheet",
                count, self.column_count
            )));
        }
        self.frozen_columns = count;
        Ok(())
    }

    fn set_row_visible(&mut self, row: u32, visible: bool) -> Result<()> {
        self.check_row(row)?;
        if visible {
            self.hidden_rows.remove(&row);
        } else {
            self.hidden_rows.insert(row, true);
        }
        Ok(())
    }

    fn set_column_visible(&mut self, col: u32, visible: bool) -> Result<()> {
        self.check_column(col)?;
        if visible {
            self.hidden_columns.remove(&col);
        } else {
            self.hidden_columns.insert(col, true);
        }
        Ok(())
    }

    fn auto_fit_row(&mut self, row: u32) -> Result<()> {
        self.check_row(row)?;
        let lines = self
            .cells
            .iter_row(row)
            .map(|(_, data)| data.value.to_string().lines().count().max(1))
            .max();
        match lines {
            Some(lines) => self.set_row_height(row, DEFAULT_ROW_HEIGHT * lines as f64),
            None => {
                self.row_heights.remove(&row);
                Ok(())
            }
        }
    }

    fn auto_fit_column(&mut self, col: u32) -> Result<()> {
        self.check_column(col)?;
        let chars = self
            .cells
            .iter_column(col)
            .map(|(_, data)| {
                data.value
                    .to_string()
                    .lines()
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .max();
        match chars {
            Some(chars) if chars > 0 => {
                self.set_column_width(col, chars as f64 * CHAR_WIDTH + CELL_PADDING)
            }
            _ => {
                self.column_widths.remove(&col);
                Ok(())
            }
        }
    }

    fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        if !height.is_finite() || height < 0.0 {
            return Err(Error::InvalidArgument(format!("row height {height}")));
        }
        self.grow_to(row, 0);
        self.row_heights.insert(row, height);
        Ok(())
    }

    fn set_column_width(&mut self, col: u32, width: f64) -> Result<()> {
        if !width.is_finite() || width < 0.0 {
            return Err(Error::InvalidArgument(format!("column width {width}")));
        }
        self.grow_to(0, col);
        self.column_widths.insert(col, width);
        Ok(())
    }

    fn set_selection(&mut self, range: RangeBound) -> Result<()> {
        self.grow_to(range.end_row, range.end_col);
        self.selection = range;
        Ok(())
    }

    fn suspend_paint(&mut self) {
        self.paint_suspended += 1;
    }

    fn resume_paint(&mut self) {
        self.paint_suspended = self.paint_suspended.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_sheet() {
        let ws = MemorySheet::new("Test");
        assert_eq!(ws.name(), "Test");
        assert!(ws.is_empty());
        assert_eq!(ws.row_count(), 1000);
        assert_eq!(ws.column_count(), 26);
        assert!(ws.used_range().is_none());
    }

    #[test]
    fn test_set_cell_values() {
        let mut ws = MemorySheet::new("Test");

        ws.set_cell_value("A1", "Hello").unwrap();
        ws.set_cell_value("B1", 42.0).unwrap();
        ws.set_cell_value("C1", true).unwrap();

        assert_eq!(ws.get_value("A1").unwrap().as_string(), Some("Hello"));
        assert_eq!(ws.get_value("B1").unwrap().as_number(), Some(42.0));
        assert_eq!(ws.get_value("C1").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_value_write_replaces_formula() {
        let mut ws = MemorySheet::new("Test");
        ws.set_cell_formula("A1", "=1+1").unwrap();
        assert_eq!(ws.formula(0, 0).as_deref(), Some("=1+1"));
        assert_eq!(ws.value(0, 0), CellValue::Empty);

        ws.set_value(0, 0, CellValue::from(3.0)).unwrap();
        assert_eq!(ws.formula(0, 0), None);
        assert_eq!(ws.value(0, 0), CellValue::Number(3.0));
    }

    #[test]
    fn test_formula_uses_evaluator() {
        let mut ws = MemorySheet::new("Test");
        ws.set_cell_value("A1", 4.0).unwrap();
        let doubler = |sheet: &MemorySheet, formula: &str| -> CellValue {
            match formula {
                "=A1*2" => CellValue::Number(sheet.value(0, 0).as_number().unwrap_or(0.0) * 2.0),
                _ => CellValue::string("#NAME?"),
            }
        };
        ws.set_evaluator(Some(Arc::new(doubler)));

        ws.set_cell_formula("B1", "=A1*2").unwrap();
        assert_eq!(ws.value(0, 1), CellValue::Number(8.0));

        ws.set_cell_value("A1", 10.0).unwrap();
        ws.recalculate();
        assert_eq!(ws.value(0, 1), CellValue::Number(20.0));
    }

    #[test]
    fn test_writes_grow_the_grid() {
        let mut ws = MemorySheet::with_dimensions("Test", 10, 5);
        ws.set_value(20, 7, CellValue::from(1.0)).unwrap();
        assert_eq!(ws.row_count(), 21);
        assert_eq!(ws.column_count(), 8);
        assert_eq!(ws.used_range(), Some(RangeBound::single(20, 7)));
    }

    #[test]
    fn test_style_round_trip_and_reset() {
        let mut ws = MemorySheet::new("Test");
        ws.set_style(1, 1, Some(CellStyle::new().bold())).unwrap();
        assert_eq!(
            ws.style(1, 1).and_then(|s| s.font),
            Some("bold 11pt Calibri".to_string())
        );
        assert!(ws.used_range().is_none());

        ws.set_style(1, 1, None).unwrap();
        assert!(ws.is_empty());
    }

    #[test]
    fn test_insert_and_delete_rows_shift_content() {
        let mut ws = MemorySheet::new("Test");
        ws.set_cell_value("A1", "top").unwrap();
        ws.set_cell_value("A2", "moved").unwrap();
        ws.set_row_visible(1, false).unwrap();

        ws.add_rows(1, 2).unwrap();
        assert_eq!(ws.row_count(), 1002);
        assert_eq!(ws.get_value("A4").unwrap().as_string(), Some("moved"));
        assert!(ws.is_row_hidden(3));
        assert!(!ws.is_row_hidden(1));

        ws.delete_rows(0, 3).unwrap();
        assert_eq!(ws.row_count(), 999);
        assert_eq!(ws.get_value("A1").unwrap().as_string(), Some("moved"));
    }

    #[test]
    fn test_insert_and_delete_columns_shift_content() {
        let mut ws = MemorySheet::new("Test");
        ws.set_cell_value("A1", "a").unwrap();
        ws.set_cell_value("B1", "b").unwrap();

        ws.add_columns(0, 1).unwrap();
        assert_eq!(ws.get_value("C1").unwrap().as_string(), Some("b"));
        assert_eq!(ws.column_count(), 27);

        ws.delete_columns(1, 1).unwrap();
        assert_eq!(ws.get_value("B1").unwrap().as_string(), Some("b"));
        assert_eq!(ws.column_count(), 26);
    }

    #[test]
    fn test_delete_rows_clips_to_extent() {
        let mut ws = MemorySheet::with_dimensions("Test", 5, 5);
        ws.delete_rows(3, 10).unwrap();
        assert_eq!(ws.row_count(), 3);
        assert!(ws.delete_rows(3, 1).is_err());
    }

    #[test]
    fn test_freeze_follows_structure() {
        let mut ws = MemorySheet::new("Test");
        ws.set_frozen_row_count(2).unwrap();
        ws.add_rows(0, 1).unwrap();
        assert_eq!(ws.frozen_row_count(), 3);
        ws.delete_rows(0, 2).unwrap();
        assert_eq!(ws.frozen_row_count(), 1);
        assert!(ws.set_frozen_column_count(27).is_err());
    }

    #[test]
    fn test_visibility_bounds() {
        let mut ws = MemorySheet::with_dimensions("Test", 3, 3);
        ws.set_column_visible(2, false).unwrap();
        assert!(ws.is_column_hidden(2));
        ws.set_column_visible(2, true).unwrap();
        assert!(!ws.is_column_hidden(2));
        assert!(ws.set_row_visible(3, false).is_err());
    }

    #[test]
    fn test_auto_fit() {
        let mut ws = MemorySheet::new("Test");
        ws.set_cell_value("A1", "abcdefghij").unwrap();
        ws.set_cell_value("A2", "line\nbreak").unwrap();

        ws.auto_fit_column(0).unwrap();
        assert_eq!(ws.column_width(0), 10.0 * CHAR_WIDTH + CELL_PADDING);

        ws.auto_fit_row(1).unwrap();
        assert_eq!(ws.row_height(1), 2.0 * DEFAULT_ROW_HEIGHT);

        ws.set_column_width(1, 30.0).unwrap();
        ws.auto_fit_column(1).unwrap();
        assert_eq!(ws.column_width(1), DEFAULT_COLUMN_WIDTH);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let mut ws = MemorySheet::new("Test");
        assert!(ws.set_row_height(0, -1.0).is_err());
        assert!(ws.set_column_width(0, f64::NAN).is_err());
    }

    #[test]
    fn test_rename_validates() {
        let mut ws = MemorySheet::new("Test");
        assert!(ws.set_name("Bad/Name").is_err());
        ws.set_name("Good").unwrap();
        assert_eq!(ws.name(), "Good");
    }
}
