//! # gridcmd-core
//!
//! Core types for the gridcmd command engine.
//!
//! This crate provides the fundamental types used throughout gridcmd:
//! - [`CellValue`] - Scalar cell values (numbers, strings, booleans)
//! - [`CellAddress`] and [`RangeBound`] - A1 addressing and rectangular ranges
//! - [`CellStyle`] and [`FontDescriptor`] - The style facets a host stores per cell
//! - [`HostWorkbook`], [`HostSheet`] - The capability surface of a host grid
//! - [`MemoryWorkbook`], [`MemorySheet`] - An in-memory host
//!
//! ## Example
//!
//! ```rust
//! use gridcmd_core::{CellAddress, RangeBound};
//!
//! let range = RangeBound::parse("B2:C3").unwrap();
//! assert_eq!((range.start_row, range.start_col), (1, 1));
//! assert_eq!(CellAddress::new(1, 1).to_string(), "B2");
//! ```

pub mod cell;
pub mod error;
pub mod host;
pub mod memory;
pub mod range;
pub mod style;

// Re-exports for convenience
pub use cell::{format_address, CellAddress, CellValue};
pub use error::{Error, Result};
pub use host::{sheet_names_match, HostSheet, HostWorkbook, PaintGuard, SheetId};
pub use memory::{FormulaEvaluator, MemorySheet, MemoryWorkbook};
pub use range::{RangeBound, RangeCells, RangeLimits};
pub use style::{CellStyle, FontDescriptor};
