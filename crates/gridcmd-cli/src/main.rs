//! gridcmd CLI - run agent commands against CSV-backed sheets

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gridcmd::{Command, EngineConfig, Response, SpreadsheetService};
use gridcmd_core::{HostSheet, HostWorkbook, MemoryWorkbook};
use gridcmd_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gridcmd")]
#[command(
    author,
    version,
    about = "Drive a spreadsheet grid with structured JSON commands"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute JSON-lines commands and print one JSON response per line
    Run {
        #[command(flatten)]
        sheets: SheetArgs,

        /// Engine configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read commands from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write every sheet to `<dir>/<sheet name>.csv` when done
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },

    /// List the sheets a set of CSV files loads as
    Sheets {
        #[command(flatten)]
        sheets: SheetArgs,
    },
}

#[derive(Args)]
struct SheetArgs {
    /// CSV file to load as a sheet, named after the file stem (repeatable)
    #[arg(long = "csv", value_name = "PATH")]
    csv: Vec<PathBuf>,

    /// Field delimiter of the CSV files
    #[arg(short, long, default_value = ",")]
    delimiter: char,
}

impl SheetArgs {
    fn delimiter(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("Delimiter '{}' is not a single ASCII character", self.delimiter))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            sheets,
            config,
            input,
            save_dir,
        } => run(&sheets, config.as_deref(), input.as_deref(), save_dir.as_deref()),
        Commands::Sheets { sheets } => list_sheets(&sheets),
    }
}

fn load_workbook(args: &SheetArgs) -> Result<MemoryWorkbook> {
    if args.csv.is_empty() {
        return Ok(MemoryWorkbook::new());
    }

    let options = CsvReadOptions {
        delimiter: args.delimiter()?,
        ..CsvReadOptions::default()
    };
    let mut workbook = MemoryWorkbook::empty();
    for path in &args.csv {
        let sheet = CsvReader::read_file(path, &options)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        workbook
            .push_sheet(sheet)
            .with_context(|| format!("Cannot add '{}' as a sheet", path.display()))?;
    }
    Ok(workbook)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let file = File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid configuration in '{}'", path.display()))
}

fn run(
    sheets: &SheetArgs,
    config: Option<&Path>,
    input: Option<&Path>,
    save_dir: Option<&Path>,
) -> Result<()> {
    let mut service = SpreadsheetService::with_config(load_config(config)?);
    service.attach(load_workbook(sheets)?);

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut executed = 0usize;
    let mut failed = 0usize;
    for line in reader.lines() {
        let line = line.context("Failed to read command input")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = execute_line(&mut service, &line);
        executed += 1;
        if !response.is_ok() {
            failed += 1;
        }
        serde_json::to_writer(&mut out, &response).context("Failed to write response")?;
        writeln!(out).context("Failed to write response")?;
    }
    out.flush().context("Failed to write to stdout")?;
    eprintln!("Executed {} commands ({} failed)", executed, failed);

    if let Some(dir) = save_dir {
        if let Some(workbook) = service.host() {
            save_workbook(workbook, dir, sheets.delimiter()?)?;
        }
    }
    Ok(())
}

fn execute_line(service: &mut SpreadsheetService<MemoryWorkbook>, line: &str) -> Response {
    match serde_json::from_str::<Command>(line) {
        Ok(command) => Response::from_result(service.execute(command)),
        Err(e) => Response::Error {
            message: format!("Invalid command: {}", e),
        },
    }
}

fn save_workbook(workbook: &MemoryWorkbook, dir: &Path, delimiter: u8) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create '{}'", dir.display()))?;

    let options = CsvWriteOptions {
        delimiter,
        ..CsvWriteOptions::default()
    };
    for sheet in workbook.sheets() {
        let path = dir.join(format!("{}.csv", sheet.name()));
        CsvWriter::write_file(sheet, &path, &options)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Wrote '{}'", path.display());
    }
    Ok(())
}

fn list_sheets(args: &SheetArgs) -> Result<()> {
    let workbook = load_workbook(args)?;

    for id in 0..workbook.sheet_count() {
        if let Some(sheet) = workbook.sheet(id) {
            match sheet.used_range() {
                Some(range) => println!("{}\t{}\t{}", id, sheet.name(), range),
                None => println!("{}\t{}\t(empty)", id, sheet.name()),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcmd_core::CellValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_execute_line() {
        let mut service = SpreadsheetService::new();
        service.attach(MemoryWorkbook::new());

        let ok = execute_line(
            &mut service,
            r#"{"tool":"setCellRange","input":{"sheetId":0,"range":"A1","cells":[[{"value":"hi"}]]}}"#,
        );
        assert!(ok.is_ok());

        let bad = execute_line(&mut service, "{not json");
        assert!(matches!(bad, Response::Error { ref message } if message.starts_with("Invalid command")));

        let sheet = service.host().unwrap().sheet(0).unwrap();
        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("hi"));
    }

    #[test]
    fn test_load_and_save_csv_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Prices.csv");
        std::fs::write(&source, "item,price\nbolt,0.25\n").unwrap();

        let args = SheetArgs {
            csv: vec![source],
            delimiter: ',',
        };
        let workbook = load_workbook(&args).unwrap();
        assert_eq!(workbook.sheet_count(), 1);
        assert_eq!(workbook.sheet(0).unwrap().name(), "Prices");

        let out_dir = dir.path().join("out");
        save_workbook(&workbook, &out_dir, b',').unwrap();
        let written = std::fs::read_to_string(out_dir.join("Prices.csv")).unwrap();
        assert_eq!(written, "item,price\nbolt,0.25\n");
    }

    #[test]
    fn test_bad_delimiter() {
        let args = SheetArgs {
            csv: Vec::new(),
            delimiter: 'é',
        };
        assert!(args.delimiter().is_err());
    }
}
