//! Engine configuration

use gridcmd_core::RangeLimits;
use serde::{Deserialize, Serialize};

/// Tunables for command execution
///
/// Every field has a default, so a partial JSON object (or `{}`) is a valid
/// configuration.
///
/// ```
/// use gridcmd::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{"defaultCellLimit": 50}"#).unwrap();
/// assert_eq!(config.default_cell_limit, 50);
/// assert_eq!(config.range_limits.last_row, 999);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Extent used for open range strings such as `"A"` or `"5:10"`
    pub range_limits: RangeLimits,
    /// Cell budget of `getCellRanges` when the request gives none
    pub default_cell_limit: usize,
    /// Match cap of `searchData` when the request gives none
    pub default_max_results: usize,
    /// Column width in points applied by the `standard` resize policy
    pub standard_column_width: f64,
    /// Row height in points applied by the `standard` resize policy
    pub standard_row_height: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            range_limits: RangeLimits::default(),
            default_cell_limit: 10_000,
            default_max_results: 500,
            standard_column_width: 64.0,
            standard_row_height: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_nested_limits() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"rangeLimits": {"lastColumn": 51}, "standardRowHeight": 18}"#)
                .unwrap();
        assert_eq!(config.range_limits.last_column, 51);
        assert_eq!(config.range_limits.last_row, 999);
        assert_eq!(config.standard_row_height, 18.0);
    }
}
