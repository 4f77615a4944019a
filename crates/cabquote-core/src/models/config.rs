//! Configuration structures for the quotation pipeline.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration for the cabquote pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Line scanning configuration.
    pub parser: ParserConfig,

    /// SKU rule set selection.
    pub sku: SkuConfig,

    /// Total reconciliation configuration.
    pub reconciliation: ReconciliationConfig,

    /// Locations of the externally maintained data files.
    pub store: StoreConfig,
}

/// Line classifier and extractor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Phrases that mark the document grand-total line.
    pub total_markers: Vec<String>,

    /// Phrase (case-insensitive) that introduces a new door color.
    pub context_marker: String,

    /// Keyword that marks a code split across several lines (`WF330 FOR`).
    pub continuation_keyword: String,

    /// Lines at least this long are never fragment starts.
    pub fragment_max_len: usize,

    /// Maximum number of non-blank lines merged into one fragment.
    pub fragment_window: usize,

    /// Table header and footer prefixes that are never product rows.
    pub header_prefixes: Vec<String>,

    /// Token fused with sequence numbers in fragments; dropped from descriptions.
    pub fragment_placeholder: String,

    /// Description used when a fragment leaves none.
    pub default_fragment_description: String,

    /// Move page footers and the fused table header onto their own lines.
    pub split_fused_lines: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            total_markers: vec!["OPWM_1 Net Total".to_string()],
            context_marker: "door color".to_string(),
            continuation_keyword: "FOR".to_string(),
            fragment_max_len: 30,
            fragment_window: 3,
            header_prefixes: ["Style", "Door", "Cabinet", "Print", "Volume"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            fragment_placeholder: "BASE".to_string(),
            default_fragment_description: "Base Accessory".to_string(),
            split_fused_lines: true,
        }
    }
}

/// Which named rule sets drive SKU generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkuConfig {
    /// Rule set used for records recovered from quotation text.
    pub pdf_rule_set: String,

    /// Rule set used for manual, category-driven lookups.
    pub manual_rule_set: String,
}

impl Default for SkuConfig {
    fn default() -> Self {
        Self {
            pdf_rule_set: crate::sku::PDF_PARSING_RULES.to_string(),
            manual_rule_set: crate::sku::MANUAL_QUOTE_RULES.to_string(),
        }
    }
}

/// Total reconciliation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Absolute difference below which totals are considered equal.
    pub tolerance: Decimal,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
        }
    }
}

/// Data file locations. Only read by callers that do file I/O.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Named SKU rule sets.
    pub rules_file: PathBuf,

    /// Final SKU overrides (`original -> final`).
    pub overrides_file: PathBuf,

    /// Price catalog keyed by SKU.
    pub catalog_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            rules_file: PathBuf::from("data/sku_rules.json"),
            overrides_file: PathBuf::from("data/sku_mappings.json"),
            catalog_file: PathBuf::from("data/catalog.json"),
        }
    }
}

impl QuoteConfig {
    /// Parse configuration from JSON text. Missing sections take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = QuoteConfig::from_json(r#"{"parser": {"fragment_window": 4}}"#).unwrap();

        assert_eq!(config.parser.fragment_window, 4);
        assert_eq!(config.parser.continuation_keyword, "FOR");
        assert_eq!(config.reconciliation.tolerance, Decimal::new(1, 2));
        assert_eq!(config.sku.pdf_rule_set, "pdf_parsing_rules");
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = QuoteConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(QuoteConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(QuoteConfig::from_json("{not json").is_err());
    }
}
