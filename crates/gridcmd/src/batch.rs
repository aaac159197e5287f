//! Batch cell mutation
//!
//! `setCellRange` and the region commands that share its machinery: copying a
//! block, clearing a block, and resizing rows and columns. Every batch runs
//! with painting suspended on the host sheet, and every range argument is
//! parsed before the first cell is touched.

use std::collections::BTreeMap;

use gridcmd_core::{
    format_address, CellStyle, CellValue, Error, HostSheet, PaintGuard, RangeBound, Result,
    SheetId,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::EngineConfig;

/// Input of `setCellRange`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCellRangeInput {
    pub sheet_id: SheetId,
    /// Target range; edits are anchored at its top-left cell
    pub range: String,
    /// Edits by row then column; `null` rows and cells are skipped
    #[serde(default)]
    pub cells: Vec<Option<Vec<Option<CellEdit>>>>,
    /// Destination to tile the target range into after writing
    #[serde(default)]
    pub copy_to_range: Option<String>,
    #[serde(default)]
    pub resize_width: Option<ResizePolicy>,
    #[serde(default)]
    pub resize_height: Option<ResizePolicy>,
}

/// One cell's worth of edits
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEdit {
    /// Formula text; an empty string counts as no formula
    #[serde(default)]
    pub formula: Option<String>,
    /// Literal value; `Some(CellValue::Empty)` clears the cell, `None` leaves it
    #[serde(default, deserialize_with = "present")]
    pub value: Option<CellValue>,
    /// Style facets to overwrite
    #[serde(default)]
    pub cell_styles: Option<StyleDelta>,
}

impl CellEdit {
    /// An edit writing a literal value
    pub fn value<V: Into<CellValue>>(value: V) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// An edit writing a formula
    pub fn formula<S: Into<String>>(formula: S) -> Self {
        Self {
            formula: Some(formula.into()),
            ..Self::default()
        }
    }

    /// Also apply `styles`
    pub fn with_styles(mut self, styles: StyleDelta) -> Self {
        self.cell_styles = Some(styles);
        self
    }
}

// `null` must reach the field as `Some(Empty)`; serde's default would give `None`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<CellValue>, D::Error>
where
    D: Deserializer<'de>,
{
    CellValue::deserialize(deserializer).map(Some)
}

/// A sparse set of style facets to write over a cell's current style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Font size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// `"bold"` or `"normal"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,
}

impl StyleDelta {
    /// Merge the present facets into `style`
    pub fn apply(&self, mut style: CellStyle) -> CellStyle {
        if let Some(color) = &self.font_color {
            style.fore_color = Some(color.clone());
        }
        if let Some(color) = &self.background_color {
            style.back_color = Some(color.clone());
        }

        let size = self.font_size.filter(|s| s.is_finite() && *s > 0.0);
        let bold = match self.font_weight.as_deref() {
            Some(w) if w.eq_ignore_ascii_case("bold") => Some(true),
            Some(w) if w.eq_ignore_ascii_case("normal") => Some(false),
            _ => None,
        };
        if size.is_some() || bold.is_some() {
            let mut font = style.font_descriptor();
            if let Some(size) = size {
                font = font.with_size(size);
            }
            if let Some(bold) = bold {
                font = font.with_bold(bold);
            }
            style.font = Some(font.to_string());
        }

        if let Some(format) = &self.number_format {
            style.formatter = Some(format.clone());
        }
        style
    }
}

/// How to size a row or column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResizePolicy {
    /// Fit the content
    Autofit,
    /// An explicit size in points
    Points { value: f64 },
    /// The configured standard size
    Standard,
}

/// Evaluated result of a written formula
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormulaResult {
    Number(f64),
    Text(String),
}

impl FormulaResult {
    /// Numbers and text are kept, booleans become `"true"`/`"false"`, empty is dropped
    pub fn from_value(value: CellValue) -> Option<Self> {
        match value {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(FormulaResult::Number(n)),
            CellValue::String(s) => Some(FormulaResult::Text(s)),
            CellValue::Boolean(b) => Some(FormulaResult::Text(b.to_string())),
        }
    }
}

/// Output of `setCellRange`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetCellRangeOutput {
    /// Evaluated formula results keyed by A1 address, omitted when empty
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub formula_results: BTreeMap<String, FormulaResult>,
}

/// Input of `copyTo`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyToInput {
    pub sheet_id: SheetId,
    pub source_range: String,
    /// Only the top-left cell of the destination is used
    pub destination_range: String,
}

/// What `clearCellRange` removes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearType {
    /// Values and formulas
    #[default]
    Contents,
    /// The whole style
    Formats,
    /// Both
    All,
}

impl ClearType {
    fn contents(self) -> bool {
        matches!(self, ClearType::Contents | ClearType::All)
    }

    fn formats(self) -> bool {
        matches!(self, ClearType::Formats | ClearType::All)
    }
}

/// Input of `clearCellRange`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCellRangeInput {
    pub sheet_id: SheetId,
    pub range: String,
    #[serde(default)]
    pub clear_type: ClearType,
}

/// Input of `resizeRange`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeRangeInput {
    pub sheet_id: SheetId,
    /// Rows and columns to resize; the whole sheet when absent
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub width: Option<ResizePolicy>,
    #[serde(default)]
    pub height: Option<ResizePolicy>,
}

/// Apply a `setCellRange` batch to `sheet`
pub fn set_cell_range<S>(
    sheet: &mut S,
    input: &SetCellRangeInput,
    config: &EngineConfig,
) -> Result<SetCellRangeOutput>
where
    S: HostSheet + ?Sized,
{
    let range = RangeBound::parse_with(&input.range, &config.range_limits)?;
    let destination = input
        .copy_to_range
        .as_deref()
        .map(|d| RangeBound::parse_with(d, &config.range_limits))
        .transpose()?;
    check_policy(input.resize_width, "column width")?;
    check_policy(input.resize_height, "row height")?;

    let mut sheet = PaintGuard::new(sheet);
    let mut output = SetCellRangeOutput::default();
    let mut written = 0usize;

    for (r, row) in input.cells.iter().enumerate() {
        let Some(row) = row else { continue };
        for (c, edit) in row.iter().enumerate() {
            let Some(edit) = edit else { continue };
            let target_row = offset(range.start_row, r)?;
            let target_col = offset(range.start_col, c)?;
            apply_edit(&mut *sheet, target_row, target_col, edit, &mut output)?;
            written += 1;
        }
    }

    if let Some(destination) = destination {
        copy_block(&mut *sheet, &range, destination.start_row, destination.start_col)?;
    }
    resize(
        &mut *sheet,
        &range,
        input.resize_width,
        input.resize_height,
        config,
    )?;

    tracing::debug!(
        range = %range,
        cells = written,
        formulas = output.formula_results.len(),
        "cell range written"
    );
    Ok(output)
}

/// Copy `sourceRange` to the top-left of `destinationRange`
pub fn copy_to<S>(sheet: &mut S, input: &CopyToInput, config: &EngineConfig) -> Result<()>
where
    S: HostSheet + ?Sized,
{
    let source = RangeBound::parse_with(&input.source_range, &config.range_limits)?;
    let destination = RangeBound::parse_with(&input.destination_range, &config.range_limits)?;

    let mut sheet = PaintGuard::new(sheet);
    copy_block(&mut *sheet, &source, destination.start_row, destination.start_col)
}

/// Clear contents, formats, or both over a range
pub fn clear_cell_range<S>(
    sheet: &mut S,
    input: &ClearCellRangeInput,
    config: &EngineConfig,
) -> Result<()>
where
    S: HostSheet + ?Sized,
{
    let range = RangeBound::parse_with(&input.range, &config.range_limits)?;
    let clear = input.clear_type;

    let mut sheet = PaintGuard::new(sheet);
    for addr in range.cells() {
        if clear.contents() {
            sheet.set_formula(addr.row, addr.col, None)?;
            sheet.set_value(addr.row, addr.col, CellValue::Empty)?;
        }
        if clear.formats() {
            sheet.set_style(addr.row, addr.col, None)?;
        }
    }
    Ok(())
}

/// Resize the rows and columns of a range, or of the whole sheet
pub fn resize_range<S>(sheet: &mut S, input: &ResizeRangeInput, config: &EngineConfig) -> Result<()>
where
    S: HostSheet + ?Sized,
{
    check_policy(input.width, "column width")?;
    check_policy(input.height, "row height")?;
    let range = match input.range.as_deref() {
        Some(text) => Some(RangeBound::parse_with(text, &config.range_limits)?),
        None => whole_sheet(&*sheet),
    };
    let Some(range) = range else {
        return Ok(());
    };

    let mut sheet = PaintGuard::new(sheet);
    resize(&mut *sheet, &range, input.width, input.height, config)
}

fn check_policy(policy: Option<ResizePolicy>, what: &str) -> Result<()> {
    match policy {
        Some(ResizePolicy::Points { value }) if !value.is_finite() || value < 0.0 => {
            Err(Error::InvalidArgument(format!("{what} {value}")))
        }
        _ => Ok(()),
    }
}

fn whole_sheet<S: HostSheet + ?Sized>(sheet: &S) -> Option<RangeBound> {
    let rows = sheet.row_count();
    let cols = sheet.column_count();
    if rows == 0 || cols == 0 {
        return None;
    }
    Some(RangeBound::new(0, 0, rows - 1, cols - 1))
}

fn offset(start: u32, delta: usize) -> Result<u32> {
    u32::try_from(delta)
        .ok()
        .and_then(|d| start.checked_add(d))
        .ok_or_else(|| Error::InvalidArgument("edit array extends past the last row or column".into()))
}

fn apply_edit<S: HostSheet + ?Sized>(
    sheet: &mut S,
    row: u32,
    col: u32,
    edit: &CellEdit,
    output: &mut SetCellRangeOutput,
) -> Result<()> {
    match edit.formula.as_deref().filter(|f| !f.is_empty()) {
        Some(formula) => {
            sheet.set_formula(row, col, Some(formula))?;
            if let Some(result) = FormulaResult::from_value(sheet.value(row, col)) {
                output
                    .formula_results
                    .insert(format_address(row, col), result);
            }
        }
        None => {
            if let Some(value) = &edit.value {
                sheet.set_value(row, col, value.clone())?;
            }
        }
    }

    if let Some(delta) = &edit.cell_styles {
        let style = delta.apply(sheet.style(row, col).unwrap_or_default());
        sheet.set_style(row, col, Some(style))?;
    }
    Ok(())
}

/// Copy formula-or-value and style of every cell in `source` to the block
/// whose top-left is `(dest_row, dest_col)`
///
/// The source is read in full before anything is written, so overlapping
/// blocks copy the original contents.
pub(crate) fn copy_block<S: HostSheet + ?Sized>(
    sheet: &mut S,
    source: &RangeBound,
    dest_row: u32,
    dest_col: u32,
) -> Result<()> {
    let snapshot: Vec<_> = source
        .cells()
        .map(|addr| {
            (
                addr,
                sheet.formula(addr.row, addr.col).filter(|f| !f.is_empty()),
                sheet.value(addr.row, addr.col),
                sheet.style(addr.row, addr.col),
            )
        })
        .collect();

    for (addr, formula, value, style) in snapshot {
        let row = dest_row.saturating_add(addr.row - source.start_row);
        let col = dest_col.saturating_add(addr.col - source.start_col);
        match formula {
            Some(formula) => sheet.set_formula(row, col, Some(&formula))?,
            None => sheet.set_value(row, col, value)?,
        }
        if style.is_some() {
            sheet.set_style(row, col, style)?;
        }
    }
    Ok(())
}

fn resize<S: HostSheet + ?Sized>(
    sheet: &mut S,
    range: &RangeBound,
    width: Option<ResizePolicy>,
    height: Option<ResizePolicy>,
    config: &EngineConfig,
) -> Result<()> {
    if let Some(policy) = width {
        for col in range.start_col..=range.end_col {
            match policy {
                ResizePolicy::Autofit => sheet.auto_fit_column(col)?,
                ResizePolicy::Points { value } => sheet.set_column_width(col, value)?,
                ResizePolicy::Standard => {
                    sheet.set_column_width(col, config.standard_column_width)?
                }
            }
        }
    }
    if let Some(policy) = height {
        for row in range.start_row..=range.end_row {
            match policy {
                ResizePolicy::Autofit => sheet.auto_fit_row(row)?,
                ResizePolicy::Points { value } => sheet.set_row_height(row, value)?,
                ResizePolicy::Standard => sheet.set_row_height(row, config.standard_row_height)?,
            }
        }
    }
    Ok(())
}
