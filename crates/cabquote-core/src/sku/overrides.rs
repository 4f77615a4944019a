//! User-maintained SKU overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Final `original -> replacement` table applied after rule generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuOverrides {
    map: BTreeMap<String, String>,
}

impl SkuOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object of `original -> replacement` pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn insert(&mut self, original: impl Into<String>, replacement: impl Into<String>) {
        self.map.insert(original.into(), replacement.into());
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.map.get(original).map(String::as_str)
    }

    /// Replace `sku` when it is a key of the table, else return it unchanged.
    ///
    /// Only one lookup is made: replacements are not chased further.
    pub fn apply(&self, sku: &str) -> String {
        match self.map.get(sku) {
            Some(replacement) => {
                tracing::debug!("override {} -> {}", sku, replacement);
                replacement.clone()
            }
            None => sku.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SkuOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let overrides: SkuOverrides = [("B30-PLY-BSS", "B30-BSS")].into_iter().collect();
        assert_eq!(overrides.apply("B30-PLY-BSS"), "B30-BSS");
        assert_eq!(overrides.apply("W3030-PLY-BSS"), "W3030-PLY-BSS");
    }

    #[test]
    fn test_apply_is_idempotent_for_non_keys() {
        let overrides: SkuOverrides = [("A", "B")].into_iter().collect();
        let once = overrides.apply("A");
        assert_eq!(overrides.apply(&once), once);
    }

    #[test]
    fn test_from_json() {
        let overrides = SkuOverrides::from_json(r#"{"HW-HINGE": "HW-HINGE-SOFT"}"#).unwrap();
        assert_eq!(overrides.get("HW-HINGE"), Some("HW-HINGE-SOFT"));
        assert_eq!(overrides.len(), 1);
    }
}
