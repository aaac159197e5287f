//! # gridcmd
//!
//! A command execution engine that lets an automated agent drive a spreadsheet
//! grid through a fixed set of structured commands.
//!
//! The engine owns no cells. Every command is translated into bounded,
//! validated calls against a host implementing
//! [`HostWorkbook`](gridcmd_core::HostWorkbook), such as the in-memory
//! [`MemoryWorkbook`](gridcmd_core::MemoryWorkbook).
//!
//! ## Commands
//!
//! - `getSheets`, `getCellRanges` - list sheets, read cells under a budget
//! - `setCellRange`, `copyTo`, `clearCellRange`, `resizeRange` - batch edits
//! - `searchData` - find cells by their text
//! - `modifySheetStructure`, `modifyWorkbookStructure` - rows, columns and sheets
//! - `activateSheet`, `selectRange` - session state
//!
//! ## Example
//!
//! ```rust
//! use gridcmd::prelude::*;
//!
//! let mut service = SpreadsheetService::new();
//! service.attach(MemoryWorkbook::new());
//!
//! let write: Command = serde_json::from_str(
//!     r#"{"tool":"setCellRange","input":{"sheetId":0,"range":"A1:B1",
//!         "cells":[[{"value":"Total"},{"value":12}]]}}"#,
//! ).unwrap();
//! service.execute(write).unwrap();
//!
//! let read: Command = serde_json::from_str(
//!     r#"{"tool":"getCellRanges","input":{"sheetId":0,"ranges":["A1:B1"]}}"#,
//! ).unwrap();
//! let out = service.execute(read).unwrap();
//! assert_eq!(out["worksheet"]["cells"]["B1"], 12.0);
//! ```

pub mod batch;
pub mod config;
pub mod prelude;
pub mod protocol;
pub mod search;
pub mod service;
pub mod structure;
pub mod traversal;

pub use batch::{
    CellEdit, ClearCellRangeInput, ClearType, CopyToInput, FormulaResult, ResizePolicy,
    ResizeRangeInput, SetCellRangeInput, SetCellRangeOutput, StyleDelta,
};
pub use config::EngineConfig;
pub use protocol::{
    ActivateSheetInput, Command, GetCellRangesInput, GetCellRangesOutput, Response,
    SelectRangeInput, SheetInfo, WorksheetCells,
};
pub use search::{SearchInput, SearchMatch, SearchOptions, SearchOutput};
pub use service::SpreadsheetService;
pub use structure::{
    Dimension, SheetOperation, SheetStructureInput, WorkbookOperation, WorkbookOutput,
    WorkbookStructureInput,
};
pub use traversal::{read_ranges, CellMap, CellRead, CellReport};

// Re-export core types
pub use gridcmd_core::{
    format_address, CellAddress, CellStyle, CellValue, Error, HostSheet, HostWorkbook,
    MemorySheet, MemoryWorkbook, RangeBound, RangeLimits, Result, SheetId,
};
