//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellValue`] - The scalar value stored in a cell
//! - [`CellAddress`] - A cell's location (e.g., "A1")

mod address;
mod value;

pub use address::{format_address, CellAddress};
pub use value::CellValue;
