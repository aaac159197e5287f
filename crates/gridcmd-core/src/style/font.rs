//! Font descriptor parsing and formatting
//!
//! Hosts store a cell's font as a CSS-like shorthand string such as
//! `"bold 14pt Calibri"`. [`FontDescriptor`] splits that string into facets so
//! one facet can change without clobbering the others.

use std::fmt;

/// Default font family
pub const DEFAULT_FONT_FAMILY: &str = "Calibri";

/// Default font size in points
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// A leading keyword of the shorthand, before the family
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// A bold weight such as `bold` or `700`
    Weight(String),
    /// `14pt` or `16px`
    Size(String),
    /// Anything else (`italic`, `small-caps`, `normal` ...), kept verbatim
    Other(String),
}

/// Parsed font shorthand
///
/// Leading keywords are kept as written and in order, so editing the
/// size or weight leaves the rest of the descriptor as it was written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontDescriptor {
    tokens: Vec<Token>,
    family: String,
}

impl FontDescriptor {
    /// Create a new default font (11pt Calibri)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a shorthand like `"bold italic 14pt Arial"`
    ///
    /// Leading keywords run up to the first token that is neither a known
    /// keyword nor a size; that token and everything after it is the family.
    /// Missing parts keep their defaults.
    pub fn parse(descriptor: &str) -> Self {
        let mut font = Self::default();
        let mut family = Vec::new();

        for token in descriptor.split_whitespace() {
            if !family.is_empty() {
                family.push(token);
                continue;
            }
            let lower = token.to_ascii_lowercase();
            if is_bold_weight(&lower) {
                font.tokens.push(Token::Weight(token.to_string()));
            } else if parse_size(&lower).is_some() {
                font.tokens.push(Token::Size(token.to_string()));
            } else if is_keyword(&lower) {
                font.tokens.push(Token::Other(token.to_string()));
            } else {
                family.push(token);
            }
        }

        font.family = family.join(" ");
        font
    }

    /// Font family name (e.g., "Calibri", "Arial")
    pub fn family(&self) -> &str {
        if self.family.is_empty() {
            DEFAULT_FONT_FAMILY
        } else {
            &self.family
        }
    }

    /// Font size in points
    pub fn size(&self) -> f64 {
        self.tokens
            .iter()
            .rev()
            .find_map(|t| match t {
                Token::Size(text) => parse_size(&text.to_ascii_lowercase()),
                _ => None,
            })
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn is_bold(&self) -> bool {
        self.tokens.iter().any(|t| matches!(t, Token::Weight(_)))
    }

    pub fn is_italic(&self) -> bool {
        self.tokens.iter().any(|t| {
            matches!(t, Token::Other(text)
                if text.eq_ignore_ascii_case("italic") || text.eq_ignore_ascii_case("oblique"))
        })
    }

    /// Set font size in points, replacing the written size in place
    pub fn with_size(mut self, size: f64) -> Self {
        let text = format!("{}pt", size);
        match self.tokens.iter().position(|t| matches!(t, Token::Size(_))) {
            Some(i) => self.tokens[i] = Token::Size(text),
            None => self.tokens.push(Token::Size(text)),
        }
        self
    }

    /// Set bold; adding bold prefixes the descriptor, removing it drops the weight
    pub fn with_bold(mut self, bold: bool) -> Self {
        if bold {
            if !self.is_bold() {
                self.tokens.insert(0, Token::Weight("bold".to_string()));
            }
        } else {
            self.tokens.retain(|t| !matches!(t, Token::Weight(_)));
        }
        self
    }
}

fn is_bold_weight(token: &str) -> bool {
    matches!(token, "bold" | "bolder" | "700" | "800" | "900")
}

fn is_keyword(token: &str) -> bool {
    matches!(
        token,
        "normal"
            | "italic"
            | "oblique"
            | "lighter"
            | "small-caps"
            | "100"
            | "200"
            | "300"
            | "400"
            | "500"
            | "600"
    ) || token.ends_with("-condensed")
        || token.ends_with("-expanded")
        || token == "condensed"
        || token == "expanded"
}

/// `14pt` as points, `16px` converted to points
fn parse_size(token: &str) -> Option<f64> {
    if let Some(pt) = token.strip_suffix("pt") {
        return pt.parse().ok();
    }
    if let Some(px) = token.strip_suffix("px") {
        return px.parse::<f64>().ok().map(|px| px * 0.75);
    }
    None
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut has_size = false;
        for token in &self.tokens {
            let text = match token {
                Token::Size(text) => {
                    has_size = true;
                    text
                }
                Token::Weight(text) | Token::Other(text) => text,
            };
            write!(f, "{} ", text)?;
        }
        if !has_size {
            write!(f, "{}pt ", DEFAULT_FONT_SIZE)?;
        }
        write!(f, "{}", self.family())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor() {
        assert_eq!(FontDescriptor::new().to_string(), "11pt Calibri");
    }

    #[test]
    fn test_parse_full_descriptor() {
        let font = FontDescriptor::parse("bold italic 14pt Times New Roman");
        assert!(font.is_bold());
        assert!(font.is_italic());
        assert_eq!(font.size(), 14.0);
        assert_eq!(font.family(), "Times New Roman");
        assert_eq!(font.to_string(), "bold italic 14pt Times New Roman");
    }

    #[test]
    fn test_parse_px_size() {
        let font = FontDescriptor::parse("16px Arial");
        assert_eq!(font.size(), 12.0);
        assert_eq!(font.family(), "Arial");
    }

    #[test]
    fn test_parse_partial_descriptor_keeps_defaults() {
        let font = FontDescriptor::parse("bold");
        assert!(font.is_bold());
        assert_eq!(font.size(), DEFAULT_FONT_SIZE);
        assert_eq!(font.family(), DEFAULT_FONT_FAMILY);
        assert_eq!(font.to_string(), "bold 11pt Calibri");
    }

    #[test]
    fn test_size_change_keeps_weight() {
        let font = FontDescriptor::parse("bold 11pt Calibri").with_size(18.0);
        assert_eq!(font.to_string(), "bold 18pt Calibri");
    }

    #[test]
    fn test_bold_edit_keeps_other_keywords_and_size() {
        let font = FontDescriptor::parse("small-caps 16px Arial").with_bold(true);
        assert_eq!(font.to_string(), "bold small-caps 16px Arial");
        assert_eq!(font.size(), 12.0);

        let font = FontDescriptor::parse("italic 700 9pt Arial").with_bold(false);
        assert_eq!(font.to_string(), "italic 9pt Arial");
    }

    #[test]
    fn test_size_edit_replaces_size_in_place() {
        let font = FontDescriptor::parse("italic small-caps 16px Arial").with_size(10.0);
        assert_eq!(font.to_string(), "italic small-caps 10pt Arial");

        let font = FontDescriptor::parse("small-caps Arial").with_size(10.0);
        assert_eq!(font.to_string(), "small-caps 10pt Arial");
    }
}
