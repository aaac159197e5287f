//! In-memory workbook

use std::fmt;
use std::sync::Arc;

use super::sheet::MemorySheet;
use super::FormulaEvaluator;
use crate::error::{Error, Result};
use crate::host::{sheet_names_match, HostSheet, HostWorkbook, SheetId};

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// A workbook held entirely in memory
#[derive(Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
    active_sheet: SheetId,
    evaluator: Option<Arc<dyn FormulaEvaluator>>,
}

impl MemoryWorkbook {
    /// Create a new workbook with one empty sheet called "Sheet1"
    pub fn new() -> Self {
        Self {
            sheets: vec![MemorySheet::new("Sheet1")],
            ..Self::default()
        }
    }

    /// Create an empty workbook with no sheets
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a workbook with one empty sheet per name
    pub fn with_sheets(names: &[&str]) -> Result<Self> {
        let mut wb = Self::empty();
        for name in names {
            wb.push_sheet(MemorySheet::new(*name))?;
        }
        Ok(wb)
    }

    /// Use `evaluator` for formulas written to every sheet, current and future
    pub fn set_evaluator(&mut self, evaluator: Option<Arc<dyn FormulaEvaluator>>) {
        for sheet in &mut self.sheets {
            sheet.set_evaluator(evaluator.clone());
        }
        self.evaluator = evaluator;
    }

    /// Append an existing sheet, returning its id
    pub fn push_sheet(&mut self, mut sheet: MemorySheet) -> Result<SheetId> {
        self.validate_new_name(sheet.name())?;
        sheet.set_evaluator(self.evaluator.clone());
        self.sheets.push(sheet);
        Ok(self.sheets.len() - 1)
    }

    /// Iterate over all sheets
    pub fn sheets(&self) -> impl Iterator<Item = &MemorySheet> {
        self.sheets.iter()
    }

    /// Check if the workbook has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get a sheet by name
    pub fn sheet_by_name(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|ws| ws.name() == name)
    }

    /// Validate the name of a sheet about to be added
    fn validate_new_name(&self, name: &str) -> Result<()> {
        validate_sheet_name(name)?;

        if self.sheets.iter().any(|ws| sheet_names_match(ws.name(), name)) {
            return Err(Error::InvalidArgument(format!(
                "A sheet named '{}' already exists",
                name
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for MemoryWorkbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryWorkbook")
            .field("sheets", &self.sheets)
            .field("active_sheet", &self.active_sheet)
            .field("evaluator", &self.evaluator.is_some())
            .finish()
    }
}

/// Check the rules every sheet name must follow on its own
pub(crate) fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument("Sheet name cannot be empty".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidArgument(format!(
            "Sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }

    const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(Error::InvalidArgument(format!(
            "Sheet name cannot contain '{}'",
            c
        )));
    }

    Ok(())
}

impl HostWorkbook for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn sheet(&self, id: SheetId) -> Option<&MemorySheet> {
        self.sheets.get(id)
    }

    fn sheet_mut(&mut self, id: SheetId) -> Option<&mut MemorySheet> {
        self.sheets.get_mut(id)
    }

    fn add_sheet(&mut self, index: SheetId, name: &str) -> Result<()> {
        if index > self.sheets.len() {
            return Err(Error::host(format!(
                "Cannot insert a sheet at {} in a workbook of {}",
                index,
                self.sheets.len()
            )));
        }
        self.validate_new_name(name)?;

        let mut sheet = MemorySheet::new(name);
        sheet.set_evaluator(self.evaluator.clone());
        self.sheets.insert(index, sheet);

        // Keep the same sheet active
        if self.sheets.len() > 1 && self.active_sheet >= index {
            self.active_sheet += 1;
        }
        Ok(())
    }

    fn remove_sheet(&mut self, id: SheetId) -> Result<()> {
        if id >= self.sheets.len() {
            return Err(Error::SheetNotFound(id));
        }
        self.sheets.remove(id);

        if self.active_sheet > id || self.active_sheet >= self.sheets.len() {
            self.active_sheet = self.active_sheet.saturating_sub(1);
        }
        Ok(())
    }

    fn active_sheet_index(&self) -> SheetId {
        self.active_sheet
    }

    fn set_active_sheet_index(&mut self, id: SheetId) -> Result<()> {
        if id >= self.sheets.len() {
            return Err(Error::SheetNotFound(id));
        }
        self.active_sheet = id;
        Ok(())
    }
}
