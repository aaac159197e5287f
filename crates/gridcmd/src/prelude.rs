//! Prelude module - common imports for gridcmd users
//!
//! ```rust
//! use gridcmd::prelude::*;
//! ```

pub use crate::{
    // Cell and range types
    CellAddress,
    CellStyle,
    CellValue,
    // Commands
    Command,
    EngineConfig,
    Error,
    // Host capability
    HostSheet,
    HostWorkbook,
    MemorySheet,
    MemoryWorkbook,
    RangeBound,
    Response,
    Result,
    SheetId,
    SpreadsheetService,
};
