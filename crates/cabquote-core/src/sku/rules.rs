//! Named SKU rule sets.
//!
//! On disk the rule book is a JSON object of named sets:
//!
//! ```json
//! {
//!   "pdf_parsing_rules": {
//!     "rules": [
//!       { "id": "wall", "pattern": "wall", "format_template": "{user_code}-W-{door_color}" }
//!     ]
//!   }
//! }
//! ```
//!
//! `condition` and `sku_format` are accepted as aliases of `pattern` and
//! `format_template`.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::MANUAL_QUOTE_RULES;
use crate::error::Result;

/// One data-driven SKU rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuRule {
    #[serde(default)]
    pub id: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Description substring (PDF rules) or condition expression (manual rules).
    /// `"*"` matches everything, an empty pattern matches nothing.
    #[serde(default, alias = "condition")]
    pub pattern: String,

    #[serde(default, alias = "sku_format")]
    pub format_template: String,

    /// Comma-separated transform names applied to the code before rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<String>,

    /// Template tried when `format_template` cannot be rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    /// Restricts a manual rule to one product category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl SkuRule {
    /// Enabled rule with a pattern and template.
    pub fn new(
        id: impl Into<String>,
        pattern: impl Into<String>,
        format_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            pattern: pattern.into(),
            format_template: format_template.into(),
            preprocessing: None,
            fallback: None,
            category: None,
        }
    }

    pub fn with_preprocessing(mut self, preprocessing: impl Into<String>) -> Self {
        self.preprocessing = Some(preprocessing.into());
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Wildcard or case-insensitive substring match against a description.
    pub fn matches_description(&self, description: &str) -> bool {
        let pattern = self.pattern.trim();
        if pattern == "*" {
            return true;
        }
        if pattern.is_empty() {
            return false;
        }
        description.to_lowercase().contains(&pattern.to_lowercase())
    }

    /// Run the configured transforms over `code`. Unknown names are skipped.
    pub fn preprocess(&self, code: &str) -> String {
        let Some(names) = self.preprocessing.as_deref() else {
            return code.to_string();
        };

        names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .fold(code.to_string(), |code, name| match name.parse::<Preprocessing>() {
                Ok(step) => step.apply(&code),
                Err(unknown) => {
                    tracing::warn!(
                        "rule {}: unknown preprocessing {:?}, ignored",
                        self.id,
                        unknown
                    );
                    code
                }
            })
    }
}

/// Code transforms a rule can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocessing {
    /// Drop a trailing `-L` / `-R` hand marker.
    StripLrSuffix,
    Uppercase,
    /// Remove all whitespace.
    RemoveSpaces,
}

impl Preprocessing {
    pub fn apply(self, code: &str) -> String {
        match self {
            Self::StripLrSuffix => strip_lr_suffix(code).to_string(),
            Self::Uppercase => code.to_uppercase(),
            Self::RemoveSpaces => code.split_whitespace().collect(),
        }
    }
}

impl FromStr for Preprocessing {
    type Err = String;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "strip_lr_suffix" | "remove_lr_suffix" => Ok(Self::StripLrSuffix),
            "uppercase" => Ok(Self::Uppercase),
            "remove_spaces" => Ok(Self::RemoveSpaces),
            _ => Err(name.to_string()),
        }
    }
}

/// `B30-L` -> `B30`; codes without a hand marker are returned as is.
pub fn strip_lr_suffix(code: &str) -> &str {
    code.strip_suffix("-L")
        .or_else(|| code.strip_suffix("-R"))
        .unwrap_or(code)
}

/// An ordered list of rules; the first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<SkuRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<SkuRule>) -> Self {
        Self { rules }
    }
}

/// All rule sets, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleBook {
    sets: BTreeMap<String, RuleSet>,
}

impl RuleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in rule book used when no rules file exists yet.
    ///
    /// Only the manual quote set is seeded; text parsing relies on the
    /// keyword fallbacks until rules are configured.
    pub fn with_defaults() -> Self {
        let mut book = Self::new();
        book.insert(
            MANUAL_QUOTE_RULES,
            RuleSet::new(vec![
                SkuRule::new(
                    "door_sku_rule",
                    "category == 'Door'",
                    "{door_variant}-{product_name}-Door",
                ),
                SkuRule::new(
                    "box_standard_sku_rule",
                    "category == 'BOX' and box_variant is not empty",
                    "{box_variant}-{product_name}-BOX",
                ),
                SkuRule::new(
                    "box_open_sku_rule",
                    "category == 'BOX' and door_variant is not empty and box_variant is empty",
                    "{door_variant}-{product_name}-OPEN",
                ),
                SkuRule::new(
                    "hardware_sku_rule",
                    "category == 'HARDWARE'",
                    "{product_name}",
                ),
            ]),
        );
        book
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, set: RuleSet) {
        self.sets.insert(name.into(), set);
    }

    /// Rules of the named set; an unknown name yields no rules.
    pub fn rule_set(&self, name: &str) -> &[SkuRule] {
        match self.sets.get(name) {
            Some(set) => set.rules.as_slice(),
            None => {
                tracing::debug!("rule set {:?} not defined, using built-in fallbacks", name);
                &[]
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }
}
