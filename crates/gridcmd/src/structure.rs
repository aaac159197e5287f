//! Row, column and sheet structure commands

use gridcmd_core::{
    CellAddress, Error, HostSheet, HostWorkbook, PaintGuard, Result, SheetId,
};
use serde::{Deserialize, Serialize};

/// Operations of `modifySheetStructure`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetOperation {
    Insert,
    Delete,
    Freeze,
    Unfreeze,
    Hide,
    Unhide,
}

/// Axis a sheet operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Rows,
    Columns,
}

/// Input of `modifySheetStructure`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetStructureInput {
    pub sheet_id: SheetId,
    pub operation: SheetOperation,
    #[serde(default)]
    pub dimension: Option<Dimension>,
    /// 1-based row number for rows, column letters for columns
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

/// Operations of `modifyWorkbookStructure`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkbookOperation {
    Create,
    Delete,
    Rename,
    Duplicate,
}

/// Input of `modifyWorkbookStructure`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookStructureInput {
    pub operation: WorkbookOperation,
    #[serde(default)]
    pub sheet_name: Option<String>,
    #[serde(default)]
    pub sheet_id: Option<SheetId>,
    #[serde(default)]
    pub new_name: Option<String>,
}

/// Output of `modifyWorkbookStructure`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WorkbookOutput {
    #[serde(rename_all = "camelCase")]
    Sheet { sheet_id: SheetId, sheet_name: String },
    Message { message: String },
}

impl WorkbookOutput {
    fn sheet(sheet_id: SheetId, sheet_name: impl Into<String>) -> Self {
        WorkbookOutput::Sheet {
            sheet_id,
            sheet_name: sheet_name.into(),
        }
    }
}

/// Apply a `modifySheetStructure` command to `sheet`
pub fn modify_sheet<S>(sheet: &mut S, input: &SheetStructureInput) -> Result<()>
where
    S: HostSheet + ?Sized,
{
    let op = input.operation;
    if op == SheetOperation::Unfreeze {
        sheet.set_frozen_row_count(0)?;
        sheet.set_frozen_column_count(0)?;
        tracing::info!(sheet = %sheet.name(), "panes unfrozen");
        return Ok(());
    }

    let dimension = input.dimension.ok_or(Error::MissingArgument("dimension"))?;
    if input.count == 0 {
        return Err(Error::InvalidArgument("count must be at least 1".into()));
    }
    let count = input.count;

    if op == SheetOperation::Freeze {
        match dimension {
            Dimension::Rows => sheet.set_frozen_row_count(count)?,
            Dimension::Columns => sheet.set_frozen_column_count(count)?,
        }
        tracing::info!(sheet = %sheet.name(), ?dimension, count, "panes frozen");
        return Ok(());
    }

    let reference = input
        .reference
        .as_deref()
        .ok_or(Error::MissingArgument("reference"))?;
    let index = parse_reference(dimension, reference)?;

    let mut sheet = PaintGuard::new(sheet);
    match (op, dimension) {
        (SheetOperation::Insert, Dimension::Rows) => sheet.add_rows(index, count)?,
        (SheetOperation::Insert, Dimension::Columns) => sheet.add_columns(index, count)?,
        (SheetOperation::Delete, Dimension::Rows) => sheet.delete_rows(index, count)?,
        (SheetOperation::Delete, Dimension::Columns) => sheet.delete_columns(index, count)?,
        (SheetOperation::Hide | SheetOperation::Unhide, _) => {
            let visible = op == SheetOperation::Unhide;
            let extent = match dimension {
                Dimension::Rows => sheet.row_count(),
                Dimension::Columns => sheet.column_count(),
            };
            // Clip to the extent; a reference past it still reaches the host and fails there
            let end = index
                .saturating_add(count)
                .min(extent.max(index.saturating_add(1)));
            for i in index..end {
                match dimension {
                    Dimension::Rows => sheet.set_row_visible(i, visible)?,
                    Dimension::Columns => sheet.set_column_visible(i, visible)?,
                }
            }
        }
        (SheetOperation::Freeze | SheetOperation::Unfreeze, _) => {}
    }

    tracing::info!(
        sheet = %sheet.name(),
        operation = ?op,
        ?dimension,
        reference,
        count,
        "sheet structure modified"
    );
    Ok(())
}

fn parse_reference(dimension: Dimension, reference: &str) -> Result<u32> {
    let reference = reference.trim();
    match dimension {
        Dimension::Rows => CellAddress::parse_row_number(reference)
            .ok_or_else(|| Error::InvalidAddress(format!("'{}' is not a row number", reference))),
        Dimension::Columns => CellAddress::letters_to_column(reference),
    }
}

/// Apply a `modifyWorkbookStructure` command to `workbook`
pub fn modify_workbook<W>(workbook: &mut W, input: &WorkbookStructureInput) -> Result<WorkbookOutput>
where
    W: HostWorkbook + ?Sized,
{
    match input.operation {
        WorkbookOperation::Create => {
            let name = input
                .sheet_name
                .as_deref()
                .ok_or(Error::MissingArgument("sheetName"))?;
            let id = workbook.sheet_count();
            workbook.add_sheet(id, name)?;
            workbook.set_active_sheet_index(id)?;
            tracing::info!(sheet = name, id, "sheet created");
            Ok(WorkbookOutput::sheet(id, name))
        }
        WorkbookOperation::Delete => {
            let id = input.sheet_id.ok_or(Error::MissingArgument("sheetId"))?;
            workbook.remove_sheet(id)?;
            tracing::info!(id, "sheet deleted");
            Ok(WorkbookOutput::Message {
                message: "Sheet deleted".to_string(),
            })
        }
        WorkbookOperation::Rename => {
            let id = input.sheet_id.ok_or(Error::MissingArgument("sheetId"))?;
            let new_name = input
                .new_name
                .as_deref()
                .ok_or(Error::MissingArgument("newName"))?;
            if workbook
                .sheet_index_ignore_case(new_name)
                .is_some_and(|other| other != id)
            {
                return Err(Error::InvalidArgument(format!(
                    "A sheet named '{}' already exists",
                    new_name
                )));
            }
            let sheet = workbook.require_sheet_mut(id)?;
            let old_name = sheet.name().to_string();
            sheet.set_name(new_name)?;
            tracing::info!(id, from = %old_name, to = new_name, "sheet renamed");
            Ok(WorkbookOutput::sheet(id, new_name))
        }
        WorkbookOperation::Duplicate => {
            let id = input.sheet_id.ok_or(Error::MissingArgument("sheetId"))?;
            duplicate_sheet(workbook, id, input.new_name.as_deref())
        }
    }
}

fn duplicate_sheet<W>(workbook: &mut W, id: SheetId, new_name: Option<&str>) -> Result<WorkbookOutput>
where
    W: HostWorkbook + ?Sized,
{
    let source = workbook.require_sheet(id)?;
    let name = match new_name {
        Some(name) => name.to_string(),
        None => format!("{} (Copy)", source.name()),
    };
    let cells: Vec<_> = source
        .used_range()
        .into_iter()
        .flat_map(|used| used.cells())
        .map(|addr| {
            (
                addr,
                source.formula(addr.row, addr.col).filter(|f| !f.is_empty()),
                source.value(addr.row, addr.col),
                source.style(addr.row, addr.col),
            )
        })
        .collect();

    let new_id = workbook.sheet_count();
    workbook.add_sheet(new_id, &name)?;
    {
        let mut sheet = PaintGuard::new(workbook.require_sheet_mut(new_id)?);
        for (addr, formula, value, style) in cells {
            match formula {
                Some(formula) => sheet.set_formula(addr.row, addr.col, Some(&formula))?,
                None if !value.is_empty() => sheet.set_value(addr.row, addr.col, value)?,
                None => {}
            }
            if style.is_some() {
                sheet.set_style(addr.row, addr.col, style)?;
            }
        }
    }
    workbook.set_active_sheet_index(new_id)?;

    tracing::info!(source = id, id = new_id, sheet = %name, "sheet duplicated");
    Ok(WorkbookOutput::sheet(new_id, name))
}
