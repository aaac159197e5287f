//! Budget-limited range reads
//!
//! [`read_ranges`] walks a list of A1 range strings row by row, reporting the
//! populated cells it passes, and stops after a fixed number of cells. The
//! unvisited remainder comes back as range strings that can be submitted again
//! to continue where the read left off.

use std::collections::BTreeMap;

use gridcmd_core::{
    format_address, CellAddress, CellValue, Error, HostSheet, RangeBound, RangeLimits, Result,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A reported cell: the bare value, or `[value, formula]` for formula cells
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CellReport {
    /// Literal value
    Value(CellValue),
    /// Current value and the formula producing it
    Formula(CellValue, String),
}

impl CellReport {
    /// The cell's current value
    pub fn value(&self) -> &CellValue {
        match self {
            CellReport::Value(v) | CellReport::Formula(v, _) => v,
        }
    }

    /// The cell's formula, if it has one
    pub fn formula(&self) -> Option<&str> {
        match self {
            CellReport::Value(_) => None,
            CellReport::Formula(_, f) => Some(f),
        }
    }
}

/// Reported cells keyed by A1 address, in visit order
///
/// Serializes as a JSON object whose keys keep the row-major visit order.
/// Each address appears once; a cell visited again by an overlapping range
/// keeps its first position and takes the later report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellMap {
    entries: Vec<(String, CellReport)>,
    index: BTreeMap<String, usize>,
}

impl CellMap {
    /// Look up a cell by A1 address
    pub fn get(&self, a1: &str) -> Option<&CellReport> {
        self.index.get(a1).map(|&i| &self.entries[i].1)
    }

    /// Number of reported cells
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no cell was reported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(address, cell)` pairs in visit order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellReport)> {
        self.entries.iter().map(|(key, cell)| (key.as_str(), cell))
    }

    fn push(&mut self, a1: String, cell: CellReport) {
        match self.index.get(&a1) {
            Some(&i) => self.entries[i].1 = cell,
            None => {
                self.index.insert(a1.clone(), self.entries.len());
                self.entries.push((a1, cell));
            }
        }
    }
}

impl Serialize for CellMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, cell) in &self.entries {
            map.serialize_entry(key, cell)?;
        }
        map.end()
    }
}

/// Outcome of a budget-limited read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellRead {
    /// Populated cells passed during the read
    pub cells: CellMap,
    /// Number of cells visited, populated or not
    pub visited: usize,
    /// Range strings still to read, empty when the read completed
    pub continuation: Vec<String>,
}

impl CellRead {
    /// Whether the budget ran out before every range was read
    pub fn has_more(&self) -> bool {
        !self.continuation.is_empty()
    }
}

/// Read `ranges` from `sheet`, visiting at most `cell_limit` cells
///
/// Ranges are read in list order, each row-major. Blank range strings are
/// ignored and unparsable ones are skipped with a warning. When the budget is
/// spent mid-range, the continuation starts with the rest of the current row
/// (if the row was entered) and the remaining rows of that range, followed by
/// the later range strings as given.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when `cell_limit` is zero.
pub fn read_ranges<S, R>(
    sheet: &S,
    ranges: &[R],
    cell_limit: usize,
    limits: &RangeLimits,
) -> Result<CellRead>
where
    S: HostSheet + ?Sized,
    R: AsRef<str>,
{
    if cell_limit == 0 {
        return Err(Error::InvalidArgument("cellLimit must be positive".into()));
    }

    let mut read = CellRead::default();

    for (index, text) in ranges.iter().enumerate() {
        let text = text.as_ref();
        if text.trim().is_empty() {
            continue;
        }
        if read.visited == cell_limit {
            read.continuation = remaining(&ranges[index..]);
            break;
        }

        let range = match RangeBound::parse_with(text, limits) {
            Ok(range) => range,
            Err(err) => {
                tracing::warn!(range = text, error = %err, "skipping unreadable range");
                continue;
            }
        };

        for addr in range.cells() {
            if read.visited == cell_limit {
                read.continuation = split_remainder(&range, addr);
                read.continuation.extend(remaining(&ranges[index + 1..]));
                return Ok(read);
            }
            visit(sheet, addr, &mut read.cells);
            read.visited += 1;
        }
    }

    Ok(read)
}

/// The used range of `sheet` as `A1:<last column><last row>`, or `None` if blank
///
/// The extent always starts at `A1`, so a sheet whose data begins at `C3`
/// still reports `A1:...`.
pub fn sheet_dimension<S: HostSheet + ?Sized>(sheet: &S) -> Option<String> {
    sheet
        .used_range()
        .map(|used| format!("A1:{}", format_address(used.end_row, used.end_col)))
}

fn visit<S: HostSheet + ?Sized>(sheet: &S, addr: CellAddress, cells: &mut CellMap) {
    let value = sheet.value(addr.row, addr.col);
    match sheet.formula(addr.row, addr.col) {
        Some(formula) if !formula.is_empty() => {
            cells.push(addr.to_a1_string(), CellReport::Formula(value, formula));
        }
        _ if !value.is_blank() => cells.push(addr.to_a1_string(), CellReport::Value(value)),
        _ => {}
    }
}

/// The unvisited part of `range`, given the first cell not yet visited
fn split_remainder(range: &RangeBound, next: CellAddress) -> Vec<String> {
    let mut rest = Vec::with_capacity(2);
    let mut first_full_row = next.row;

    if next.col > range.start_col {
        rest.push(RangeBound::new(next.row, next.col, next.row, range.end_col).to_a1_string());
        first_full_row += 1;
    }
    if first_full_row <= range.end_row {
        rest.push(
            RangeBound::new(first_full_row, range.start_col, range.end_row, range.end_col)
                .to_a1_string(),
        );
    }
    rest
}

fn remaining<R: AsRef<str>>(ranges: &[R]) -> Vec<String> {
    ranges
        .iter()
        .map(|r| r.as_ref())
        .filter(|r| !r.trim().is_empty())
        .map(str::to_string)
        .collect()
}
