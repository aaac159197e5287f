//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use gridcmd_core::{CellValue, HostSheet};

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use crate::reader::CsvReader;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a sheet to a CSV file
    pub fn write_file<S, P>(sheet: &S, path: P, options: &CsvWriteOptions) -> CsvResult<()>
    where
        S: HostSheet + ?Sized,
        P: AsRef<Path>,
    {
        let file = File::create(path)?;
        Self::write(sheet, file, options)
    }

    /// Write a sheet to a writer
    ///
    /// Output always starts at A1 so that reading it back restores every
    /// cell to its address. An empty sheet writes nothing. With
    /// [`CsvWriteOptions::mark_text`], text that the reader would otherwise
    /// load as a formula, number or boolean is written with a leading `'`.
    pub fn write<S, W>(sheet: &S, writer: W, options: &CsvWriteOptions) -> CsvResult<()>
    where
        S: HostSheet + ?Sized,
        W: Write,
    {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        let mut rows = 0u32;
        if let Some(used) = sheet.used_range() {
            for row in 0..=used.end_row {
                let record: Vec<String> = (0..=used.end_col)
                    .map(|col| {
                        let formula = options
                            .write_formulas
                            .then(|| sheet.formula(row, col))
                            .flatten();
                        formula.unwrap_or_else(|| {
                            field(sheet.value(row, col), options.mark_text)
                        })
                    })
                    .collect();
                csv_writer.write_record(&record)?;
                rows += 1;
            }
        }

        csv_writer.flush()?;
        tracing::debug!(sheet = %sheet.name(), rows, "csv written");
        Ok(())
    }
}

fn field(value: CellValue, mark_text: bool) -> String {
    match value {
        CellValue::String(text) if mark_text && reads_as_other(&text) => format!("'{}", text),
        other => other.to_string(),
    }
}

fn reads_as_other(text: &str) -> bool {
    text.starts_with('=')
        || text.starts_with('\'')
        || !matches!(CsvReader::detect_type(text), CellValue::String(_))
}
