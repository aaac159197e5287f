//! CSV options

/// Options for reading CSV files
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Skip the first record instead of loading it as row 1
    pub skip_header: bool,
    /// Turn `true`/`false` and numeric fields into booleans and numbers
    pub auto_detect_types: bool,
    /// Load fields starting with `=` as formulas
    pub formulas: bool,
    /// Load fields starting with `'` as text, without the apostrophe
    pub text_marker: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            skip_header: false,
            auto_detect_types: true,
            formulas: true,
            text_marker: true,
        }
    }
}

/// Options for writing CSV files
#[derive(Debug, Clone)]
pub struct CsvWriteOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Write a cell's formula instead of its value when it has one
    pub write_formulas: bool,
    /// Prefix text that would read back as a formula, number or boolean with `'`
    pub mark_text: bool,
    /// Line terminator
    pub line_terminator: LineTerminator,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            write_formulas: true,
            mark_text: true,
            line_terminator: LineTerminator::LF,
        }
    }
}

/// Line terminator type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// Unix-style (LF)
    LF,
    /// Windows-style (CRLF)
    CRLF,
}
