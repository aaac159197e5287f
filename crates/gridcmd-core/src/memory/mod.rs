//! In-memory host grid
//!
//! [`MemoryWorkbook`] and [`MemorySheet`] implement the host capability
//! traits over plain sparse storage. They back the test suites and the CLI,
//! and serve as the reference for what a host is expected to do.
//!
//! ## Example
//!
//! ```rust
//! use gridcmd_core::{HostSheet, HostWorkbook, MemoryWorkbook};
//!
//! let mut workbook = MemoryWorkbook::new();
//! let sheet = workbook.sheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", "Hello").unwrap();
//! sheet.set_cell_value("B1", 42.0).unwrap();
//! assert_eq!(sheet.used_range().unwrap().to_string(), "A1:B1");
//! ```

mod sheet;
mod storage;
mod workbook;

pub use sheet::{
    MemorySheet, DEFAULT_COLUMN_COUNT, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_COUNT,
    DEFAULT_ROW_HEIGHT,
};
pub use storage::{CellData, CellStorage};
pub use workbook::{MemoryWorkbook, MAX_SHEET_NAME_LEN};

use crate::cell::CellValue;

/// Computes the value shown for a formula cell
///
/// The memory host does not evaluate formulas itself. Without an evaluator a
/// formula cell reads back as [`CellValue::Empty`]. Any
/// `Fn(&MemorySheet, &str) -> CellValue` closure is an evaluator.
pub trait FormulaEvaluator: Send + Sync {
    /// Evaluate `formula` (including its leading `=`) against `sheet`
    fn evaluate(&self, sheet: &MemorySheet, formula: &str) -> CellValue;
}

impl<F> FormulaEvaluator for F
where
    F: Fn(&MemorySheet, &str) -> CellValue + Send + Sync,
{
    fn evaluate(&self, sheet: &MemorySheet, formula: &str) -> CellValue {
        self(sheet, formula)
    }
}
