//! CSV files written and read back through the filesystem

use gridcmd_core::{CellValue, HostSheet, MemorySheet};
use gridcmd_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use pretty_assertions::assert_eq;

#[test]
fn test_file_roundtrip_keeps_addresses_and_formulas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Budget.csv");

    let mut sheet = MemorySheet::new("Budget");
    sheet.set_cell_value("B2", "Rent").unwrap();
    sheet.set_cell_value("C2", 1200.0).unwrap();
    sheet.set_cell_value("D3", false).unwrap();
    sheet.set_cell_formula("C3", "=C2*12").unwrap();

    CsvWriter::write_file(&sheet, &path, &CsvWriteOptions::default()).unwrap();
    let loaded = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();

    assert_eq!(loaded.name(), "Budget");
    assert_eq!(loaded.used_range(), sheet.used_range());
    assert_eq!(loaded.get_value("B2").unwrap(), CellValue::string("Rent"));
    assert_eq!(loaded.get_value("C2").unwrap(), CellValue::Number(1200.0));
    assert_eq!(loaded.get_value("D3").unwrap(), CellValue::Boolean(false));
    assert_eq!(loaded.formula(2, 2).as_deref(), Some("=C2*12"));
}

#[test]
fn test_file_roundtrip_keeps_text_that_looks_typed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Codes.csv");

    let mut sheet = MemorySheet::new("Codes");
    for (a1, text) in [("A1", "=SUM(A2:A9)"), ("A2", "0042"), ("A3", "FALSE"), ("A4", "'")] {
        sheet.set_cell_value(a1, text).unwrap();
    }

    CsvWriter::write_file(&sheet, &path, &CsvWriteOptions::default()).unwrap();
    let loaded = CsvReader::read_file(&path, &CsvReadOptions::default()).unwrap();

    assert_eq!(loaded.formula(0, 0), None);
    for (a1, text) in [("A1", "=SUM(A2:A9)"), ("A2", "0042"), ("A3", "FALSE"), ("A4", "'")] {
        assert_eq!(loaded.get_value(a1).unwrap(), CellValue::string(text));
    }
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CsvReader::read_file(dir.path().join("absent.csv"), &CsvReadOptions::default())
        .unwrap_err();
    assert!(matches!(err, gridcmd_csv::CsvError::Io(_)));
}
