//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use gridcmd_core::{CellValue, HostSheet, MemorySheet};

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a sheet named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<MemorySheet> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Sheet1")
            .to_string();
        let file = File::open(path)?;
        Self::read(name, file, options)
    }

    /// Read CSV from a reader into a sheet called `name`
    ///
    /// Record `n` lands in row `n`, field `m` in column `m`. Empty fields
    /// leave the cell empty.
    pub fn read<S, R>(name: S, reader: R, options: &CsvReadOptions) -> CsvResult<MemorySheet>
    where
        S: Into<String>,
        R: Read,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.skip_header)
            .flexible(true)
            .from_reader(reader);

        let mut sheet = MemorySheet::new(name);

        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = u32::try_from(index).map_err(|_| CsvError::TooLarge { record: index })?;

            for (col, field) in record.iter().enumerate() {
                let col = u32::try_from(col).map_err(|_| CsvError::TooLarge { record: index })?;
                if field.is_empty() {
                    continue;
                }
                if let Some(text) = field.strip_prefix('\'').filter(|_| options.text_marker) {
                    sheet.set_value(row, col, CellValue::string(text))?;
                } else if options.formulas && field.starts_with('=') && field.len() > 1 {
                    sheet.set_formula(row, col, Some(field))?;
                } else {
                    let value = if options.auto_detect_types {
                        Self::detect_type(field)
                    } else {
                        CellValue::string(field)
                    };
                    sheet.set_value(row, col, value)?;
                }
            }
        }

        tracing::debug!(sheet = %sheet.name(), cells = sheet.cell_count(), "csv loaded");
        Ok(sheet)
    }

    /// Detect the type of a field value
    pub(crate) fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }

        // Rust also parses "inf" and "NaN"; those stay text
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }

        CellValue::string(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read(data: &str, options: &CsvReadOptions) -> MemorySheet {
        CsvReader::read("Sheet1", data.as_bytes(), options).unwrap()
    }

    #[test]
    fn test_type_detection() {
        let sheet = read(
            "name,qty,done\nbolt, 12 ,TRUE\nnut,1e3,false\n",
            &CsvReadOptions::default(),
        );

        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("name"));
        assert_eq!(sheet.get_value("B2").unwrap(), CellValue::Number(12.0));
        assert_eq!(sheet.get_value("C2").unwrap(), CellValue::Boolean(true));
        assert_eq!(sheet.get_value("B3").unwrap(), CellValue::Number(1000.0));
        assert_eq!(sheet.get_value("C3").unwrap(), CellValue::Boolean(false));
    }

    #[test]
    fn test_plain_text_mode() {
        let options = CsvReadOptions {
            auto_detect_types: false,
            formulas: false,
            ..CsvReadOptions::default()
        };
        let sheet = read("12,=A1\n", &options);
        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("12"));
        assert_eq!(sheet.get_value("B1").unwrap(), CellValue::string("=A1"));
        assert_eq!(sheet.formula(0, 1), None);
    }

    #[test]
    fn test_ragged_rows_and_empty_fields() {
        let sheet = read("a\nb,,c\n\"nan\",inf\n", &CsvReadOptions::default());
        assert_eq!(sheet.get_value("C2").unwrap(), CellValue::string("c"));
        assert_eq!(sheet.get_value("B2").unwrap(), CellValue::Empty);
        assert_eq!(sheet.get_value("A3").unwrap(), CellValue::string("nan"));
        assert_eq!(sheet.get_value("B3").unwrap(), CellValue::string("inf"));
        assert_eq!(sheet.used_range().unwrap().to_string(), "A1:C3");
    }

    #[test]
    fn test_text_marker() {
        let sheet = read("'=A1,'12,'TRUE,''quoted\n", &CsvReadOptions::default());
        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("=A1"));
        assert_eq!(sheet.formula(0, 0), None);
        assert_eq!(sheet.get_value("B1").unwrap(), CellValue::string("12"));
        assert_eq!(sheet.get_value("C1").unwrap(), CellValue::string("TRUE"));
        assert_eq!(sheet.get_value("D1").unwrap(), CellValue::string("'quoted"));

        let options = CsvReadOptions {
            text_marker: false,
            ..CsvReadOptions::default()
        };
        let sheet = read("'12\n", &options);
        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("'12"));
    }

    #[test]
    fn test_skip_header() {
        let options = CsvReadOptions {
            skip_header: true,
            ..CsvReadOptions::default()
        };
        let sheet = read("h1,h2\n1,2\n", &options);
        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::Number(1.0));
        assert_eq!(sheet.cell_count(), 2);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let options = CsvReadOptions {
            delimiter: b';',
            ..CsvReadOptions::default()
        };
        let sheet = read("1;2\n", &options);
        assert_eq!(sheet.get_value("B1").unwrap(), CellValue::Number(2.0));
    }
}
