//! Rectangular range bounds and A1 range parsing
//!
//! Range strings follow the loose grammar agents tend to emit:
//!
//! | input     | meaning                                   |
//! |-----------|-------------------------------------------|
//! | `B7`      | a single cell                             |
//! | `A1:C10`  | a rectangle                               |
//! | `A`       | column A, rows 1 through the open row end |
//! | `5`       | row 5, columns A through the open column end |
//! | `A:C`     | columns A-C, open rows                    |
//! | `5:10`    | rows 5-10, open columns                   |
//!
//! Sheets are unbounded, so an omitted endpoint falls back to [`RangeLimits`].

use lazy_regex::regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell::{format_address, CellAddress};
use crate::error::{Error, Result};

/// Fallback extent used when a range string leaves an axis open
///
/// The defaults (row index 999, column index 25, i.e. `A1:Z1000`) match the
/// grid size most hosted spreadsheet widgets start with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RangeLimits {
    /// Last row index (0-based, inclusive) of an open row span
    pub last_row: u32,
    /// Last column index (0-based, inclusive) of an open column span
    pub last_column: u32,
}

impl Default for RangeLimits {
    fn default() -> Self {
        Self {
            last_row: 999,
            last_column: 25,
        }
    }
}

/// An inclusive rectangle of cells, normalized so `start <= end` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeBound {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl RangeBound {
    /// Create a range from row/column indices, swapping reversed endpoints
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row: start_row.min(end_row),
            start_col: start_col.min(end_col),
            end_row: start_row.max(end_row),
            end_col: start_col.max(end_col),
        }
    }

    /// Create a single-cell range
    pub fn single(row: u32, col: u32) -> Self {
        Self::new(row, col, row, col)
    }

    /// Parse a range string with the default open-range limits
    ///
    /// # Examples
    /// ```
    /// use gridcmd_core::RangeBound;
    ///
    /// let range = RangeBound::parse("B2:C3").unwrap();
    /// assert_eq!(range, RangeBound::new(1, 1, 2, 2));
    ///
    /// let column = RangeBound::parse("C").unwrap();
    /// assert_eq!(column, RangeBound::new(0, 2, 999, 2));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        Self::parse_with(s, &RangeLimits::default())
    }

    /// Parse a range string, filling open axes from `limits`
    pub fn parse_with(s: &str, limits: &RangeLimits) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || Error::InvalidRange(s.to_string());

        let caps = regex!(r"^([A-Za-z]+)?(\d+)?(?::([A-Za-z]+)?(\d+)?)?$")
            .captures(trimmed)
            .ok_or_else(invalid)?;

        let start_col_str = caps.get(1).map(|m| m.as_str());
        let start_row_str = caps.get(2).map(|m| m.as_str());
        let end_col_str = caps.get(3).map(|m| m.as_str());
        let end_row_str = caps.get(4).map(|m| m.as_str());

        if start_col_str.is_none() && start_row_str.is_none() {
            return Err(invalid());
        }

        let column = |letters: &str| {
            CellAddress::letters_to_column(letters).map_err(|_| invalid())
        };
        let row = |digits: &str| CellAddress::parse_row_number(digits).ok_or_else(invalid);

        let start_col = start_col_str.map(column).transpose()?.unwrap_or(0);
        let start_row = start_row_str.map(row).transpose()?.unwrap_or(0);

        let end_col = match (end_col_str, start_col_str) {
            (Some(letters), _) => column(letters)?,
            (None, Some(_)) => start_col,
            (None, None) => limits.last_column,
        };
        let end_row = match (end_row_str, start_row_str) {
            (Some(digits), _) => row(digits)?,
            (None, Some(_)) => start_row,
            (None, None) => limits.last_row,
        };

        Ok(Self::new(start_row, start_col, end_row, end_col))
    }

    /// Top-left cell
    pub fn start(&self) -> CellAddress {
        CellAddress::new(self.start_row, self.start_col)
    }

    /// Bottom-right cell
    pub fn end(&self) -> CellAddress {
        CellAddress::new(self.end_row, self.end_col)
    }

    /// Check if a cell is within this range
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// A range of the same size whose top-left corner is `(row, col)`
    pub fn anchored_at(&self, row: u32, col: u32) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row.saturating_add(self.end_row - self.start_row),
            end_col: col.saturating_add(self.end_col - self.start_col),
        }
    }

    /// Iterate over all cell addresses in the range (row by row)
    pub fn cells(&self) -> RangeCells {
        RangeCells {
            range: *self,
            next: Some(self.start()),
        }
    }

    /// Format as `B2` (single cell) or `B2:C3`
    pub fn to_a1_string(&self) -> String {
        if self.start_row == self.end_row && self.start_col == self.end_col {
            format_address(self.start_row, self.start_col)
        } else {
            format!(
                "{}:{}",
                format_address(self.start_row, self.start_col),
                format_address(self.end_row, self.end_col)
            )
        }
    }
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// Row-major iterator over the cells of a [`RangeBound`]
pub struct RangeCells {
    range: RangeBound,
    next: Option<CellAddress>,
}

impl Iterator for RangeCells {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        let addr = self.next?;

        self.next = if addr.col < self.range.end_col {
            Some(CellAddress::new(addr.row, addr.col + 1))
        } else if addr.row < self.range.end_row {
            Some(CellAddress::new(addr.row + 1, self.range.start_col))
        } else {
            None
        };

        Some(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_rectangle() {
        assert_eq!(RangeBound::parse("B2:C3").unwrap(), RangeBound::new(1, 1, 2, 2));
        assert_eq!(RangeBound::parse("a1:c10").unwrap(), RangeBound::new(0, 0, 9, 2));
    }

    #[test]
    fn test_parse_single_cell() {
        let range = RangeBound::parse("B7").unwrap();
        assert_eq!(range, RangeBound::single(6, 1));
        assert_eq!(range.cell_count(), 1);
    }

    #[test]
    fn test_parse_open_column() {
        assert_eq!(RangeBound::parse("A").unwrap(), RangeBound::new(0, 0, 999, 0));
        assert_eq!(RangeBound::parse("A:C").unwrap(), RangeBound::new(0, 0, 999, 2));
    }

    #[test]
    fn test_parse_open_row() {
        assert_eq!(RangeBound::parse("5").unwrap(), RangeBound::new(4, 0, 4, 25));
        assert_eq!(RangeBound::parse("5:10").unwrap(), RangeBound::new(4, 0, 9, 25));
    }

    #[test]
    fn test_parse_mixed_forms() {
        // Start column only, end fully specified
        assert_eq!(RangeBound::parse("B:D7").unwrap(), RangeBound::new(0, 1, 6, 3));
        // End row omitted falls back to start row
        assert_eq!(RangeBound::parse("A5:C").unwrap(), RangeBound::new(4, 0, 4, 2));
    }

    #[test]
    fn test_parse_normalizes_reversed_endpoints() {
        assert_eq!(RangeBound::parse("C3:A1").unwrap(), RangeBound::new(0, 0, 2, 2));
    }

    #[test]
    fn test_parse_uses_configured_limits() {
        let limits = RangeLimits {
            last_row: 49,
            last_column: 4,
        };
        assert_eq!(
            RangeBound::parse_with("B", &limits).unwrap(),
            RangeBound::new(0, 1, 49, 1)
        );
        assert_eq!(
            RangeBound::parse_with("3", &limits).unwrap(),
            RangeBound::new(2, 0, 2, 4)
        );
    }

    #[test]
    fn test_parse_failures() {
        for bad in ["", "   ", ":", ":B", ":5", "A0", "A1:B0", "1A", "A-1", "A1:B2:C3", "Sheet1!A1"] {
            let err = RangeBound::parse(bad).unwrap_err();
            assert!(err.is_parse_failure(), "{bad:?} gave {err}");
        }
        assert!(RangeBound::parse("A99999999999").is_err());
    }

    #[test]
    fn test_to_a1_string() {
        assert_eq!(RangeBound::new(1, 1, 2, 2).to_a1_string(), "B2:C3");
        assert_eq!(RangeBound::single(1, 1).to_string(), "B2");
    }

    #[test]
    fn test_cells_iterator() {
        let cells: Vec<_> = RangeBound::parse("A1:B2").unwrap().cells().collect();
        assert_eq!(
            cells,
            vec![
                CellAddress::new(0, 0),
                CellAddress::new(0, 1),
                CellAddress::new(1, 0),
                CellAddress::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_anchored_at() {
        let range = RangeBound::parse("A1:B3").unwrap();
        assert_eq!(range.anchored_at(4, 4), RangeBound::new(4, 4, 6, 5));
    }

    proptest! {
        #[test]
        fn parsed_ranges_are_normalized(
            r1 in 0u32..5000, c1 in 0u32..800, r2 in 0u32..5000, c2 in 0u32..800
        ) {
            let text = format!("{}:{}", format_address(r1, c1), format_address(r2, c2));
            let range = RangeBound::parse(&text).unwrap();
            prop_assert!(range.start_row <= range.end_row);
            prop_assert!(range.start_col <= range.end_col);
            prop_assert_eq!(range, RangeBound::new(r1, c1, r2, c2));
        }

        #[test]
        fn garbage_never_parses(s in "[^A-Za-z0-9:]+") {
            prop_assert!(RangeBound::parse(&s).is_err());
        }
    }
}
