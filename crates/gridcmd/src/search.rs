//! Cross-sheet content search

use gridcmd_core::{format_address, CellValue, HostSheet, HostWorkbook, Result, SheetId};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Input of `searchData`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    pub search_term: String,
    /// Sheet to search; every sheet when absent
    #[serde(default)]
    pub sheet_id: Option<SheetId>,
    #[serde(default)]
    pub options: SearchOptions,
}

/// Matching options of `searchData`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    pub match_case: bool,
    pub match_entire_cell: bool,
    /// Result cap; the configured default when absent
    pub max_results: Option<usize>,
}

/// A cell whose text matched the search term
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub sheet_name: String,
    pub sheet_id: SheetId,
    pub a1: String,
    pub value: CellValue,
    pub formula: Option<String>,
    /// 1-based
    pub row: u32,
    /// 1-based
    pub column: u32,
}

/// Output of `searchData`
///
/// Results are never paged; the paging fields are fixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput {
    pub matches: Vec<SearchMatch>,
    pub total_found: usize,
    pub returned: usize,
    pub offset: usize,
    pub has_more: bool,
    pub search_term: String,
    pub search_scope: String,
    pub next_offset: Option<usize>,
}

struct Matcher {
    needle: String,
    match_case: bool,
    entire_cell: bool,
}

impl Matcher {
    fn new(term: &str, options: &SearchOptions) -> Self {
        let needle = if options.match_case {
            term.to_string()
        } else {
            term.to_lowercase()
        };
        Self {
            needle,
            match_case: options.match_case,
            entire_cell: options.match_entire_cell,
        }
    }

    fn matches(&self, value: &CellValue) -> bool {
        if value.is_blank() {
            return false;
        }
        let text = value.to_string();
        let text = if self.match_case {
            text
        } else {
            text.to_lowercase()
        };
        if self.entire_cell {
            text == self.needle
        } else {
            text.contains(&self.needle)
        }
    }
}

/// Search cell values of one sheet or of the whole workbook
pub fn search<W>(workbook: &W, input: &SearchInput, config: &EngineConfig) -> Result<SearchOutput>
where
    W: HostWorkbook + ?Sized,
{
    let max_results = input
        .options
        .max_results
        .unwrap_or(config.default_max_results);
    let matcher = Matcher::new(&input.search_term, &input.options);

    let (sheets, scope) = match input.sheet_id {
        Some(id) => {
            workbook.require_sheet(id)?;
            (vec![id], format!("Sheet {}", id))
        }
        None => ((0..workbook.sheet_count()).collect(), "All sheets".to_string()),
    };

    let mut matches = Vec::new();
    for id in sheets {
        if matches.len() >= max_results {
            break;
        }
        if let Some(sheet) = workbook.sheet(id) {
            scan_sheet(workbook, sheet, &matcher, max_results, &mut matches);
        }
    }

    tracing::debug!(
        term = %input.search_term,
        scope = %scope,
        found = matches.len(),
        "search complete"
    );

    let returned = matches.len();
    Ok(SearchOutput {
        matches,
        total_found: returned,
        returned,
        offset: 0,
        has_more: false,
        search_term: input.search_term.clone(),
        search_scope: scope,
        next_offset: None,
    })
}

fn scan_sheet<W>(
    workbook: &W,
    sheet: &W::Sheet,
    matcher: &Matcher,
    max_results: usize,
    matches: &mut Vec<SearchMatch>,
) where
    W: HostWorkbook + ?Sized,
{
    let Some(used) = sheet.used_range() else {
        return;
    };
    let sheet_name = sheet.name().to_string();
    // Ids are handed out by name so a match always points at the sheet the name resolves to
    let sheet_id = workbook.sheet_index(&sheet_name).unwrap_or_default();

    for addr in used.cells() {
        if matches.len() >= max_results {
            return;
        }
        let value = sheet.value(addr.row, addr.col);
        if !matcher.matches(&value) {
            continue;
        }
        matches.push(SearchMatch {
            sheet_name: sheet_name.clone(),
            sheet_id,
            a1: format_address(addr.row, addr.col),
            value,
            formula: sheet.formula(addr.row, addr.col),
            row: addr.row + 1,
            column: addr.col + 1,
        });
    }
}
