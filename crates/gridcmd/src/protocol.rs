//! Wire types of the command surface
//!
//! A command arrives as one JSON object naming the tool and carrying its
//! input, with camelCase fields throughout:
//!
//! ```json
//! {"tool": "getCellRanges", "input": {"sheetId": 0, "ranges": ["A1:C10"]}}
//! ```
//!
//! A driver answers with a [`Response`], one JSON object per command.

use gridcmd_core::SheetId;
use serde::{Deserialize, Serialize};

use crate::batch::{ClearCellRangeInput, CopyToInput, ResizeRangeInput, SetCellRangeInput};
use crate::search::SearchInput;
use crate::structure::{SheetStructureInput, WorkbookStructureInput};
use crate::traversal::CellMap;

/// A command addressed to the engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "tool", content = "input", rename_all = "camelCase")]
pub enum Command {
    /// List the workbook's sheets
    GetSheets,
    /// Read cells from one sheet under a cell budget
    GetCellRanges(GetCellRangesInput),
    /// Write values, formulas and styles
    SetCellRange(SetCellRangeInput),
    /// Find cells by their text
    SearchData(SearchInput),
    /// Insert, delete, freeze or hide rows and columns
    ModifySheetStructure(SheetStructureInput),
    /// Create, delete, rename or duplicate sheets
    ModifyWorkbookStructure(WorkbookStructureInput),
    /// Copy a block of cells
    CopyTo(CopyToInput),
    /// Clear contents and/or formats of a block
    ClearCellRange(ClearCellRangeInput),
    /// Resize rows and columns
    ResizeRange(ResizeRangeInput),
    /// Make a sheet active
    ActivateSheet(ActivateSheetInput),
    /// Activate a sheet and select a range on it
    SelectRange(SelectRangeInput),
    /// List charts and pivot tables (unsupported)
    GetAllObjects(serde_json::Value),
    /// Create, update or delete a chart or pivot table (unsupported)
    ModifyObject(serde_json::Value),
}

impl Command {
    /// Tool name as it appears on the wire
    pub fn tool(&self) -> &'static str {
        match self {
            Command::GetSheets => "getSheets",
            Command::GetCellRanges(_) => "getCellRanges",
            Command::SetCellRange(_) => "setCellRange",
            Command::SearchData(_) => "searchData",
            Command::ModifySheetStructure(_) => "modifySheetStructure",
            Command::ModifyWorkbookStructure(_) => "modifyWorkbookStructure",
            Command::CopyTo(_) => "copyTo",
            Command::ClearCellRange(_) => "clearCellRange",
            Command::ResizeRange(_) => "resizeRange",
            Command::ActivateSheet(_) => "activateSheet",
            Command::SelectRange(_) => "selectRange",
            Command::GetAllObjects(_) => "getAllObjects",
            Command::ModifyObject(_) => "modifyObject",
        }
    }
}

/// Input of `getCellRanges`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCellRangesInput {
    pub sheet_id: SheetId,
    pub ranges: Vec<String>,
    /// Cell budget; the configured default when absent
    #[serde(default)]
    pub cell_limit: Option<usize>,
}

/// Input of `activateSheet`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateSheetInput {
    pub sheet_id: SheetId,
}

/// Input of `selectRange`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRangeInput {
    pub sheet_id: SheetId,
    pub range: String,
}

/// One entry of `getSheets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    pub id: SheetId,
    pub name: String,
    /// Rows spanned by the used range
    pub max_rows: u32,
    /// Columns spanned by the used range
    pub max_columns: u32,
}

/// Output of `getCellRanges`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCellRangesOutput {
    pub worksheet: WorksheetCells,
    pub has_more: bool,
    /// Ranges to request next, present only when `has_more`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_ranges: Vec<String>,
}

/// The sheet part of `getCellRanges`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetCells {
    pub name: String,
    pub sheet_id: SheetId,
    /// Used-range extent from A1, absent for an empty sheet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    pub cells: CellMap,
}

/// A driver's answer to one command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Ok { data: serde_json::Value },
    Error { message: String },
}

impl Response {
    /// Wrap the outcome of [`SpreadsheetService::execute`](crate::SpreadsheetService::execute)
    pub fn from_result<E: std::fmt::Display>(result: Result<serde_json::Value, E>) -> Self {
        match result {
            Ok(data) => Response::Ok { data },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{SheetOperation, WorkbookOperation};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn command(value: serde_json::Value) -> Command {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(command(json!({"tool": "getSheets"})), Command::GetSheets);

        let Command::GetCellRanges(read) = command(json!({
            "tool": "getCellRanges",
            "input": {"sheetId": 1, "ranges": ["A1:B2", "D"], "cellLimit": 20}
        })) else {
            panic!("expected getCellRanges");
        };
        assert_eq!(read.sheet_id, 1);
        assert_eq!(read.ranges, vec!["A1:B2", "D"]);
        assert_eq!(read.cell_limit, Some(20));

        let Command::ModifySheetStructure(op) = command(json!({
            "tool": "modifySheetStructure",
            "input": {"sheetId": 0, "operation": "freeze", "dimension": "rows"}
        })) else {
            panic!("expected modifySheetStructure");
        };
        assert_eq!(op.operation, SheetOperation::Freeze);
        assert_eq!(op.count, 1);

        let Command::ModifyWorkbookStructure(op) = command(json!({
            "tool": "modifyWorkbookStructure",
            "input": {"operation": "duplicate", "sheetId": 0}
        })) else {
            panic!("expected modifyWorkbookStructure");
        };
        assert_eq!(op.operation, WorkbookOperation::Duplicate);
        assert_eq!(op.new_name, None);
    }

    #[test]
    fn test_tool_names_round_trip() {
        let cmd = command(json!({
            "tool": "selectRange",
            "input": {"sheetId": 0, "range": "B2"}
        }));
        assert_eq!(cmd.tool(), "selectRange");
        assert_eq!(
            command(json!({"tool": "modifyObject", "input": {}})).tool(),
            "modifyObject"
        );
    }

    #[test]
    fn test_unknown_tool_is_rejected() {
        let err = serde_json::from_value::<Command>(json!({"tool": "deleteEverything", "input": {}}));
        assert!(err.is_err());
    }

    #[test]
    fn test_response_shape() {
        let ok = Response::from_result::<String>(Ok(json!({"a": 1})));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"status": "ok", "data": {"a": 1}})
        );

        let err = Response::from_result(Err::<serde_json::Value, _>("boom"));
        assert!(!err.is_ok());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "error", "message": "boom"})
        );
    }
}
