//! Host grid capability surface
//!
//! The engine never owns cell data. Everything it reads or writes goes through
//! a host implementing [`HostWorkbook`] and [`HostSheet`]: a live spreadsheet
//! widget, a remote document, or the in-memory [`crate::memory`] host.
//!
//! Readers are infallible and return owned values; mutators return
//! [`Result`] so a host can reject an edit (a protected sheet, a duplicate
//! name, an out-of-bounds insert).

use std::ops::{Deref, DerefMut};

use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::range::RangeBound;
use crate::style::CellStyle;

/// Zero-based sheet position within a workbook
pub type SheetId = usize;

/// A single sheet of a host grid
pub trait HostSheet {
    /// Sheet name
    fn name(&self) -> &str;

    /// Rename the sheet
    fn set_name(&mut self, name: &str) -> Result<()>;

    /// Smallest rectangle containing every non-empty cell, `None` when blank
    fn used_range(&self) -> Option<RangeBound>;

    /// Number of rows the grid currently exposes
    fn row_count(&self) -> u32;

    /// Number of columns the grid currently exposes
    fn column_count(&self) -> u32;

    /// Current value of a cell (the cached result for formula cells)
    fn value(&self, row: u32, col: u32) -> CellValue;

    /// Write a literal value, replacing any formula in the cell
    fn set_value(&mut self, row: u32, col: u32, value: CellValue) -> Result<()>;

    /// Formula text of a cell, if it holds one
    fn formula(&self, row: u32, col: u32) -> Option<String>;

    /// Write (or with `None`, remove) a cell's formula
    fn set_formula(&mut self, row: u32, col: u32, formula: Option<&str>) -> Result<()>;

    /// Style of a cell, `None` when it has the host default
    fn style(&self, row: u32, col: u32) -> Option<CellStyle>;

    /// Replace (or with `None`, reset) a cell's style
    fn set_style(&mut self, row: u32, col: u32, style: Option<CellStyle>) -> Result<()>;

    /// Insert `count` rows before `row`
    fn add_rows(&mut self, row: u32, count: u32) -> Result<()>;

    /// Delete `count` rows starting at `row`
    fn delete_rows(&mut self, row: u32, count: u32) -> Result<()>;

    /// Insert `count` columns before `col`
    fn add_columns(&mut self, col: u32, count: u32) -> Result<()>;

    /// Delete `count` columns starting at `col`
    fn delete_columns(&mut self, col: u32, count: u32) -> Result<()>;

    /// Number of rows frozen at the top
    fn frozen_row_count(&self) -> u32;

    /// Freeze the first `count` rows (0 unfreezes)
    fn set_frozen_row_count(&mut self, count: u32) -> Result<()>;

    /// Number of columns frozen at the left
    fn frozen_column_count(&self) -> u32;

    /// Freeze the first `count` columns (0 unfreezes)
    fn set_frozen_column_count(&mut self, count: u32) -> Result<()>;

    /// Show or hide a row
    fn set_row_visible(&mut self, row: u32, visible: bool) -> Result<()>;

    /// Show or hide a column
    fn set_column_visible(&mut self, col: u32, visible: bool) -> Result<()>;

    /// Size a row to fit its content
    fn auto_fit_row(&mut self, row: u32) -> Result<()>;

    /// Size a column to fit its content
    fn auto_fit_column(&mut self, col: u32) -> Result<()>;

    /// Set a row height in points
    fn set_row_height(&mut self, row: u32, height: f64) -> Result<()>;

    /// Set a column width in points
    fn set_column_width(&mut self, col: u32, width: f64) -> Result<()>;

    /// Move the selection to `range`
    fn set_selection(&mut self, range: RangeBound) -> Result<()>;

    /// Stop repainting until the matching [`resume_paint`](Self::resume_paint)
    fn suspend_paint(&mut self);

    /// Resume repainting
    fn resume_paint(&mut self);
}

/// Whether two sheet names collide; names compare case-insensitively
pub fn sheet_names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A workbook of sheets addressed by [`SheetId`]
pub trait HostWorkbook {
    /// The sheet type this host hands out
    type Sheet: HostSheet;

    /// Number of sheets
    fn sheet_count(&self) -> usize;

    /// Sheet at `id`
    fn sheet(&self, id: SheetId) -> Option<&Self::Sheet>;

    /// Mutable sheet at `id`
    fn sheet_mut(&mut self, id: SheetId) -> Option<&mut Self::Sheet>;

    /// Position of the sheet called `name`
    fn sheet_index(&self, name: &str) -> Option<SheetId> {
        (0..self.sheet_count()).find(|&id| self.sheet(id).is_some_and(|s| s.name() == name))
    }

    /// Position of the sheet whose name equals `name` ignoring case
    ///
    /// Sheet names must be unique under this comparison.
    fn sheet_index_ignore_case(&self, name: &str) -> Option<SheetId> {
        (0..self.sheet_count())
            .find(|&id| self.sheet(id).is_some_and(|s| sheet_names_match(s.name(), name)))
    }

    /// Insert a blank sheet called `name` at `index`
    fn add_sheet(&mut self, index: SheetId, name: &str) -> Result<()>;

    /// Remove the sheet at `id`
    fn remove_sheet(&mut self, id: SheetId) -> Result<()>;

    /// Currently active sheet
    fn active_sheet_index(&self) -> SheetId;

    /// Make the sheet at `id` active
    fn set_active_sheet_index(&mut self, id: SheetId) -> Result<()>;

    /// Sheet at `id`, or [`Error::SheetNotFound`]
    fn require_sheet(&self, id: SheetId) -> Result<&Self::Sheet> {
        self.sheet(id).ok_or(Error::SheetNotFound(id))
    }

    /// Mutable sheet at `id`, or [`Error::SheetNotFound`]
    fn require_sheet_mut(&mut self, id: SheetId) -> Result<&mut Self::Sheet> {
        self.sheet_mut(id).ok_or(Error::SheetNotFound(id))
    }
}

/// Paint suspension scoped to a borrow of a sheet
///
/// Creating the guard suspends painting; dropping it resumes, including when a
/// batch bails out early with `?`.
///
/// ```
/// use gridcmd_core::{CellValue, HostSheet, MemorySheet, PaintGuard};
///
/// let mut sheet = MemorySheet::new("Sheet1");
/// {
///     let mut guard = PaintGuard::new(&mut sheet);
///     assert!(guard.is_paint_suspended());
///     guard.set_value(0, 0, CellValue::from(1.0)).unwrap();
/// }
/// assert!(!sheet.is_paint_suspended());
/// ```
pub struct PaintGuard<'a, S: HostSheet + ?Sized> {
    sheet: &'a mut S,
}

impl<'a, S: HostSheet + ?Sized> PaintGuard<'a, S> {
    /// Suspend painting on `sheet` for the lifetime of the guard
    pub fn new(sheet: &'a mut S) -> Self {
        sheet.suspend_paint();
        Self { sheet }
    }
}

impl<S: HostSheet + ?Sized> Deref for PaintGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.sheet
    }
}

impl<S: HostSheet + ?Sized> DerefMut for PaintGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.sheet
    }
}

impl<S: HostSheet + ?Sized> Drop for PaintGuard<'_, S> {
    fn drop(&mut self) {
        self.sheet.resume_paint();
    }
}
