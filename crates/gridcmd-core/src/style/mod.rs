//! Cell styling types
//!
//! This module contains:
//! - [`CellStyle`] - The style facets a host stores per cell
//! - [`FontDescriptor`] - Parsed form of the host's font shorthand

mod font;

pub use font::{FontDescriptor, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

use serde::{Deserialize, Serialize};

/// Per-cell style as exchanged with the host grid
///
/// Every facet is optional; an unset facet means "host default". Styles are
/// copied between cells as a whole, and merged facet by facet when edited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    /// Text color (e.g., "#FF0000", "red")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fore_color: Option<String>,
    /// Background fill color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_color: Option<String>,
    /// Font shorthand (e.g., "bold 11pt Calibri")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Number format code (e.g., "0.00%")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
}

impl CellStyle {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font color
    pub fn fore_color<S: Into<String>>(mut self, color: S) -> Self {
        self.fore_color = Some(color.into());
        self
    }

    /// Set fill color
    pub fn back_color<S: Into<String>>(mut self, color: S) -> Self {
        self.back_color = Some(color.into());
        self
    }

    /// Set the font shorthand
    pub fn font<S: Into<String>>(mut self, font: S) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Set font to bold, keeping the rest of the font
    pub fn bold(mut self) -> Self {
        self.font = Some(self.font_descriptor().with_bold(true).to_string());
        self
    }

    /// Set number format string
    pub fn formatter<S: Into<String>>(mut self, format: S) -> Self {
        self.formatter = Some(format.into());
        self
    }

    /// The font facet parsed, or the default font if unset
    pub fn font_descriptor(&self) -> FontDescriptor {
        self.font
            .as_deref()
            .map(FontDescriptor::parse)
            .unwrap_or_default()
    }

    /// Whether every facet is unset
    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let style = CellStyle::new().fore_color("#FF0000").bold();
        assert_eq!(style.fore_color.as_deref(), Some("#FF0000"));
        assert_eq!(style.font.as_deref(), Some("bold 11pt Calibri"));
        assert!(!style.is_default());
        assert!(CellStyle::new().is_default());
    }

    #[test]
    fn test_serde_skips_unset_facets() {
        let json = serde_json::to_string(&CellStyle::new().back_color("yellow")).unwrap();
        assert_eq!(json, r#"{"backColor":"yellow"}"#);
    }
}
