//! Price catalog keyed by SKU.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// One catalog row as produced by the spreadsheet import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    /// Product name without variant suffixes.
    pub product_name: String,

    /// Door color variant (e.g. `BSS`).
    pub door_variant: String,

    /// Box material variant (e.g. `PLY`).
    pub box_variant: String,

    /// Catalog category label (e.g. `BOX`, `Door`, `HARDWARE`).
    pub category: String,

    /// Unit price.
    pub unit_price: Decimal,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogValue {
    Entry(CatalogEntry),
    Price(Decimal),
}

impl From<CatalogValue> for CatalogEntry {
    fn from(value: CatalogValue) -> Self {
        match value {
            CatalogValue::Entry(entry) => entry,
            CatalogValue::Price(unit_price) => CatalogEntry {
                unit_price,
                ..CatalogEntry::default()
            },
        }
    }
}

/// SKU to price and metadata. Iteration is in SKU order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, CatalogValue>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(sku, value)| (sku.trim().to_string(), CatalogEntry::from(value)))
            .collect())
    }
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON.
    ///
    /// Values may be full entries or, in the legacy layout, bare prices.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, sku: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(sku.into(), entry);
    }

    /// Look up an entry by exact SKU.
    pub fn get(&self, sku: &str) -> Option<&CatalogEntry> {
        self.entries.get(sku)
    }

    /// Unit price for an exact SKU.
    pub fn price_for(&self, sku: &str) -> Option<Decimal> {
        self.get(sku).map(|e| e.unit_price)
    }

    /// All SKUs in sorted order.
    pub fn skus(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, CatalogEntry)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, CatalogEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_structured_catalog() {
        let json = r#"{
            "B30-PLY-BSS": {
                "product_name": "B30",
                "door_variant": "BSS",
                "box_variant": "PLY",
                "category": "BOX",
                "unit_price": "245.50"
            }
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        let entry = catalog.get("B30-PLY-BSS").unwrap();

        assert_eq!(entry.category, "BOX");
        assert_eq!(catalog.price_for("B30-PLY-BSS"), Some(Decimal::from_str("245.50").unwrap()));
    }

    #[test]
    fn test_legacy_flat_catalog() {
        let catalog = Catalog::from_json(r#"{"HW-HINGE": 12, "BSS-WF330": "30.00"}"#).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.price_for("HW-HINGE"), Some(Decimal::from(12)));
        assert_eq!(catalog.price_for("BSS-WF330"), Some(Decimal::new(3000, 2)));
        assert_eq!(catalog.get("HW-HINGE").unwrap().category, "");
    }

    #[test]
    fn test_skus_are_sorted() {
        let catalog: Catalog = ["Z1", "A1", "M1"]
            .iter()
            .map(|s| (s.to_string(), CatalogEntry::default()))
            .collect();

        assert_eq!(catalog.skus().collect::<Vec<_>>(), vec!["A1", "M1", "Z1"]);
        assert!(catalog.price_for("missing").is_none());
    }
}
