//! # gridcmd-csv
//!
//! Loads CSV files into [`MemorySheet`](gridcmd_core::MemorySheet)s and writes
//! any host sheet back out as CSV. The CLI uses it to seed a workbook from
//! fixture files and to save the result.
//!
//! ```rust
//! use gridcmd_core::CellValue;
//! use gridcmd_csv::{CsvReadOptions, CsvReader};
//!
//! let sheet = CsvReader::read("Data", "a,1\nb,=B1*2\n".as_bytes(), &CsvReadOptions::default()).unwrap();
//! assert_eq!(sheet.get_value("B1").unwrap(), CellValue::Number(1.0));
//! assert_eq!(sheet.cell_at(1, 1).unwrap().formula.as_deref(), Some("=B1*2"));
//! ```

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;
