//! Command dispatch against an attached host workbook

use gridcmd_core::{Error, HostSheet, HostWorkbook, RangeBound, Result, SheetId};
use serde::Serialize;
use serde_json::Value;

use crate::batch::{
    self, ClearCellRangeInput, CopyToInput, ResizeRangeInput, SetCellRangeInput,
    SetCellRangeOutput,
};
use crate::config::EngineConfig;
use crate::protocol::{
    ActivateSheetInput, Command, GetCellRangesInput, GetCellRangesOutput, SelectRangeInput,
    SheetInfo, WorksheetCells,
};
use crate::search::{self, SearchInput, SearchOutput};
use crate::structure::{self, SheetStructureInput, WorkbookOutput, WorkbookStructureInput};
use crate::traversal::{read_ranges, sheet_dimension};

/// Executes commands against a host workbook
///
/// The service holds no cell state; every command reads and writes through
/// the attached host. Commands that need a host fail with
/// [`Error::HostUnavailable`] until one is attached.
///
/// ```
/// use gridcmd::{Command, SpreadsheetService};
/// use gridcmd_core::MemoryWorkbook;
///
/// let mut service = SpreadsheetService::new();
/// service.attach(MemoryWorkbook::new());
///
/// let command: Command = serde_json::from_str(
///     r#"{"tool":"setCellRange","input":{"sheetId":0,"range":"A1","cells":[[{"value":3}]]}}"#,
/// ).unwrap();
/// service.execute(command).unwrap();
///
/// let sheets = service.get_sheets();
/// assert_eq!(sheets[0].max_rows, 1);
/// ```
#[derive(Debug)]
pub struct SpreadsheetService<H> {
    host: Option<H>,
    config: EngineConfig,
}

impl<H> Default for SpreadsheetService<H> {
    fn default() -> Self {
        Self {
            host: None,
            config: EngineConfig::default(),
        }
    }
}

impl<H: HostWorkbook> SpreadsheetService<H> {
    /// Create a service with the default configuration and no host
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service with `config` and no host
    pub fn with_config(config: EngineConfig) -> Self {
        Self { host: None, config }
    }

    /// Bind a host, returning the previously bound one
    pub fn attach(&mut self, host: H) -> Option<H> {
        self.host.replace(host)
    }

    /// Unbind and return the host
    pub fn detach(&mut self) -> Option<H> {
        self.host.take()
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn workbook(&self) -> Result<&H> {
        self.host.as_ref().ok_or(Error::HostUnavailable)
    }

    fn workbook_mut(&mut self) -> Result<&mut H> {
        self.host.as_mut().ok_or(Error::HostUnavailable)
    }

    fn sheet_mut(&mut self, id: SheetId) -> Result<(&mut H::Sheet, &EngineConfig)> {
        let workbook = self.host.as_mut().ok_or(Error::HostUnavailable)?;
        Ok((workbook.require_sheet_mut(id)?, &self.config))
    }

    /// Execute one command, returning its output as JSON
    pub fn execute(&mut self, command: Command) -> Result<Value> {
        tracing::debug!(tool = command.tool(), "executing command");
        match command {
            Command::GetSheets => to_json(&self.get_sheets()),
            Command::GetCellRanges(input) => to_json(&self.get_cell_ranges(&input)?),
            Command::SetCellRange(input) => to_json(&self.set_cell_range(&input)?),
            Command::SearchData(input) => to_json(&self.search_data(&input)?),
            Command::ModifySheetStructure(input) => {
                self.modify_sheet_structure(&input)?;
                Ok(empty())
            }
            Command::ModifyWorkbookStructure(input) => {
                to_json(&self.modify_workbook_structure(&input)?)
            }
            Command::CopyTo(input) => {
                self.copy_to(&input)?;
                Ok(empty())
            }
            Command::ClearCellRange(input) => {
                self.clear_cell_range(&input)?;
                Ok(empty())
            }
            Command::ResizeRange(input) => {
                self.resize_range(&input)?;
                Ok(empty())
            }
            Command::ActivateSheet(input) => {
                self.activate_sheet(&input)?;
                Ok(empty())
            }
            Command::SelectRange(input) => {
                self.select_range(&input)?;
                Ok(empty())
            }
            Command::GetAllObjects(_) => Err(Error::NotImplemented("getAllObjects")),
            Command::ModifyObject(_) => Err(Error::NotImplemented("modifyObject")),
        }
    }

    /// List the sheets with their used-range extents
    ///
    /// Without a host this is an empty list rather than an error.
    pub fn get_sheets(&self) -> Vec<SheetInfo> {
        let Some(workbook) = self.host.as_ref() else {
            return Vec::new();
        };
        (0..workbook.sheet_count())
            .filter_map(|id| workbook.sheet(id).map(|sheet| (id, sheet)))
            .map(|(id, sheet)| {
                let used = sheet.used_range();
                SheetInfo {
                    id,
                    name: sheet.name().to_string(),
                    max_rows: used.map_or(0, |r| r.row_count()),
                    max_columns: used.map_or(0, |r| r.col_count()),
                }
            })
            .collect()
    }

    pub fn get_cell_ranges(&self, input: &GetCellRangesInput) -> Result<GetCellRangesOutput> {
        let sheet = self.workbook()?.require_sheet(input.sheet_id)?;
        let limit = input.cell_limit.unwrap_or(self.config.default_cell_limit);
        let read = read_ranges(sheet, &input.ranges, limit, &self.config.range_limits)?;

        tracing::debug!(
            sheet = %sheet.name(),
            visited = read.visited,
            reported = read.cells.len(),
            has_more = read.has_more(),
            "ranges read"
        );
        Ok(GetCellRangesOutput {
            has_more: read.has_more(),
            next_ranges: read.continuation,
            worksheet: WorksheetCells {
                name: sheet.name().to_string(),
                sheet_id: input.sheet_id,
                dimension: sheet_dimension(sheet),
                cells: read.cells,
            },
        })
    }

    pub fn set_cell_range(&mut self, input: &SetCellRangeInput) -> Result<SetCellRangeOutput> {
        let (sheet, config) = self.sheet_mut(input.sheet_id)?;
        batch::set_cell_range(sheet, input, config)
    }

    pub fn search_data(&self, input: &SearchInput) -> Result<SearchOutput> {
        search::search(self.workbook()?, input, &self.config)
    }

    pub fn modify_sheet_structure(&mut self, input: &SheetStructureInput) -> Result<()> {
        let (sheet, _) = self.sheet_mut(input.sheet_id)?;
        structure::modify_sheet(sheet, input)
    }

    pub fn modify_workbook_structure(
        &mut self,
        input: &WorkbookStructureInput,
    ) -> Result<WorkbookOutput> {
        structure::modify_workbook(self.workbook_mut()?, input)
    }

    pub fn copy_to(&mut self, input: &CopyToInput) -> Result<()> {
        let (sheet, config) = self.sheet_mut(input.sheet_id)?;
        batch::copy_to(sheet, input, config)
    }

    pub fn clear_cell_range(&mut self, input: &ClearCellRangeInput) -> Result<()> {
        let (sheet, config) = self.sheet_mut(input.sheet_id)?;
        batch::clear_cell_range(sheet, input, config)
    }

    pub fn resize_range(&mut self, input: &ResizeRangeInput) -> Result<()> {
        let (sheet, config) = self.sheet_mut(input.sheet_id)?;
        batch::resize_range(sheet, input, config)
    }

    pub fn activate_sheet(&mut self, input: &ActivateSheetInput) -> Result<()> {
        self.workbook_mut()?.set_active_sheet_index(input.sheet_id)
    }

    pub fn select_range(&mut self, input: &SelectRangeInput) -> Result<()> {
        let range = RangeBound::parse_with(&input.range, &self.config.range_limits)?;
        let workbook = self.workbook_mut()?;
        workbook.set_active_sheet_index(input.sheet_id)?;
        workbook
            .require_sheet_mut(input.sheet_id)?
            .set_selection(range)
    }
}

fn empty() -> Value {
    Value::Object(serde_json::Map::new())
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::host(format!("unserializable output: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcmd_core::{CellValue, MemoryWorkbook};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service() -> SpreadsheetService<MemoryWorkbook> {
        let mut service = SpreadsheetService::new();
        service.attach(MemoryWorkbook::with_sheets(&["Sheet1", "Notes"]).unwrap());
        service
    }

    fn run(service: &mut SpreadsheetService<MemoryWorkbook>, command: Value) -> Result<Value> {
        service.execute(serde_json::from_value(command).unwrap())
    }

    #[test]
    fn test_no_host() {
        let mut service: SpreadsheetService<MemoryWorkbook> = SpreadsheetService::new();
        assert_eq!(run(&mut service, json!({"tool": "getSheets"})).unwrap(), json!([]));
        let err = run(
            &mut service,
            json!({"tool": "activateSheet", "input": {"sheetId": 0}}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::HostUnavailable));
    }

    #[test]
    fn test_get_sheets_reports_used_extent() {
        let mut service = service();
        run(
            &mut service,
            json!({"tool": "setCellRange", "input": {"sheetId": 0, "range": "B2", "cells": [[{"value": 1}, {"value": 2}]]}}),
        )
        .unwrap();
        assert_eq!(
            run(&mut service, json!({"tool": "getSheets"})).unwrap(),
            json!([
                {"id": 0, "name": "Sheet1", "maxRows": 1, "maxColumns": 2},
                {"id": 1, "name": "Notes", "maxRows": 0, "maxColumns": 0}
            ])
        );
    }

    #[test]
    fn test_get_cell_ranges_output() {
        let mut service = service();
        let sheet = service.host_mut().unwrap().sheet_mut(0).unwrap();
        sheet.set_cell_value("A1", "Name").unwrap();
        sheet.set_cell_value("B1", 3.5).unwrap();
        sheet.set_cell_formula("A2", "=B1*2").unwrap();

        let out = run(
            &mut service,
            json!({"tool": "getCellRanges", "input": {"sheetId": 0, "ranges": ["A1:B2"]}}),
        )
        .unwrap();
        assert_eq!(
            out,
            json!({
                "worksheet": {
                    "name": "Sheet1",
                    "sheetId": 0,
                    "dimension": "A1:B2",
                    "cells": {"A1": "Name", "B1": 3.5, "A2": [null, "=B1*2"]}
                },
                "hasMore": false
            })
        );

        let out = run(
            &mut service,
            json!({"tool": "getCellRanges", "input": {"sheetId": 0, "ranges": ["A1:B2"], "cellLimit": 3}}),
        )
        .unwrap();
        assert_eq!(out["hasMore"], json!(true));
        assert_eq!(out["nextRanges"], json!(["B2"]));
    }

    #[test]
    fn test_unknown_sheet() {
        let mut service = service();
        let err = run(
            &mut service,
            json!({"tool": "getCellRanges", "input": {"sheetId": 9, "ranges": ["A1"]}}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::SheetNotFound(9)));
    }

    #[test]
    fn test_select_range_activates_sheet() {
        let mut service = service();
        run(
            &mut service,
            json!({"tool": "selectRange", "input": {"sheetId": 1, "range": "C3:D4"}}),
        )
        .unwrap();

        let wb = service.host().unwrap();
        assert_eq!(wb.active_sheet_index(), 1);
        assert_eq!(wb.sheet(1).unwrap().selection().to_string(), "C3:D4");

        let err = run(
            &mut service,
            json!({"tool": "selectRange", "input": {"sheetId": 0, "range": "?"}}),
        )
        .unwrap_err();
        assert!(err.is_parse_failure());
        assert_eq!(service.host().unwrap().active_sheet_index(), 1);
    }

    #[test]
    fn test_object_commands_are_not_implemented() {
        let mut service = service();
        for tool in ["getAllObjects", "modifyObject"] {
            let err = run(&mut service, json!({"tool": tool, "input": {}})).unwrap_err();
            assert!(matches!(err, Error::NotImplemented(name) if name == tool));
        }
    }

    #[test]
    fn test_commands_without_output_return_empty_object() {
        let mut service = service();
        let out = run(
            &mut service,
            json!({"tool": "modifySheetStructure", "input": {"sheetId": 0, "operation": "unfreeze"}}),
        )
        .unwrap();
        assert_eq!(out, json!({}));

        let out = run(
            &mut service,
            json!({"tool": "clearCellRange", "input": {"sheetId": 0, "range": "A1:C3", "clearType": "all"}}),
        )
        .unwrap();
        assert_eq!(out, json!({}));
        assert_eq!(
            service.host().unwrap().sheet(0).unwrap().value(0, 0),
            CellValue::Empty
        );
    }
}
