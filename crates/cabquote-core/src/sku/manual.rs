//! Category-driven SKU lookup for manually entered quote lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::rules::SkuRule;
use super::template::{clean_hyphens, render};
use crate::models::catalog::Catalog;

/// What the operator typed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualQuery {
    pub category: String,
    pub product: String,
    pub box_variant: String,
    pub door_variant: String,
}

impl ManualQuery {
    pub fn new(category: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            product: product.into(),
            ..Self::default()
        }
    }

    pub fn with_box_variant(mut self, box_variant: impl Into<String>) -> Self {
        self.box_variant = box_variant.into();
        self
    }

    pub fn with_door_variant(mut self, door_variant: impl Into<String>) -> Self {
        self.door_variant = door_variant.into();
        self
    }
}

/// Product families with a fixed SKU shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Assembly,
    Door,
    Box,
    EndPanel,
    Molding,
    ToeKick,
    Filler,
    Hardware,
    Other,
}

impl ProductCategory {
    /// Recognize a category from a free-form label (`"RTA Assm."`, `"BOX柜身"`).
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_uppercase();
        if label.contains("ASSM") || label.contains("ASSEMBLY") {
            Self::Assembly
        } else if label.contains("DOOR") {
            Self::Door
        } else if label.contains("BOX") || label.contains("CABINET") {
            Self::Box
        } else if label.contains("END PANEL") || label.contains("ENDING PANEL") {
            Self::EndPanel
        } else if label.contains("MOLD") {
            Self::Molding
        } else if label.contains("TOE KICK") || label.contains("TOEKICK") {
            Self::ToeKick
        } else if label.contains("FILLER") {
            Self::Filler
        } else if label.contains("HARDWARE") || label == "HW" {
            Self::Hardware
        } else {
            Self::Other
        }
    }

    /// Built-in candidates, most specific first. Door forms need a door variant.
    pub fn candidates(self, product: &str, door_variant: &str) -> Vec<String> {
        let p = product.trim().to_uppercase();
        let d = door_variant.trim();
        if p.is_empty() {
            return Vec::new();
        }

        let (with_door, plain) = match self {
            Self::Assembly => (format!("{p}-ASSM-{d}"), format!("{p}-ASSM")),
            Self::Door => (format!("{p}-DOOR-{d}"), format!("{p}-DOOR")),
            Self::Box => (format!("{p}-PLY-{d}"), format!("{p}-PLY")),
            Self::EndPanel => (format!("{d}-EP-{p}"), format!("EP-{p}")),
            Self::Molding => (format!("{d}-MOLD-{p}"), format!("MOLD-{p}")),
            Self::ToeKick => (format!("{d}-TK-{p}"), format!("TK-{p}")),
            Self::Filler => (format!("{d}-FILL-{p}"), format!("FILL-{p}")),
            Self::Hardware => return vec![format!("HW-{p}")],
            Self::Other => (format!("{d}-{p}"), p.clone()),
        };

        if d.is_empty() {
            vec![plain]
        } else {
            vec![with_door, plain]
        }
    }
}

/// Whether two category labels name the same category.
///
/// Recognized labels compare by kind; anything else by case-insensitive text.
pub fn same_category(a: &str, b: &str) -> bool {
    match (ProductCategory::from_label(a), ProductCategory::from_label(b)) {
        (ProductCategory::Other, ProductCategory::Other) => a.trim().eq_ignore_ascii_case(b.trim()),
        (left, right) => left == right,
    }
}

/// How a manual lookup found its SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMatch {
    /// A generated candidate is in the catalog.
    Exact,
    /// A catalog SKU contains the product (and door variant).
    Fuzzy,
    NotFound,
}

/// Result of a manual lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualLookup {
    pub sku: Option<String>,
    pub unit_price: Decimal,
    pub matched: LookupMatch,
    /// Every candidate that was tried, in order.
    pub candidates: Vec<String>,
}

impl ManualLookup {
    pub fn found(&self) -> bool {
        self.matched != LookupMatch::NotFound
    }
}

/// Resolves manual queries against the manual rule set and the catalog.
#[derive(Debug, Clone, Copy)]
pub struct ManualResolver<'a> {
    rules: &'a [SkuRule],
    catalog: &'a Catalog,
}

impl<'a> ManualResolver<'a> {
    pub fn new(rules: &'a [SkuRule], catalog: &'a Catalog) -> Self {
        Self { rules, catalog }
    }

    /// Candidate SKUs: rule output first, then the built-in shapes.
    /// Hyphen-cleaned, without duplicates.
    pub fn candidates(&self, query: &ManualQuery) -> Vec<String> {
        let product = query.product.trim().to_uppercase();
        let values = [
            ("product", product.as_str()),
            ("product_name", product.as_str()),
            ("box_variant", query.box_variant.trim()),
            ("door_variant", query.door_variant.trim()),
            ("category", query.category.trim()),
        ];

        let from_rules = self
            .rules
            .iter()
            .filter(|rule| rule.enabled)
            .filter(|rule| {
                rule.category
                    .as_deref()
                    .is_none_or(|category| same_category(category, &query.category))
            })
            .filter(|rule| Condition::parse(&rule.pattern).evaluate(query))
            .filter_map(|rule| render_manual(rule, &values));

        let built_in = ProductCategory::from_label(&query.category)
            .candidates(&product, &query.door_variant);

        let mut candidates: Vec<String> = Vec::new();
        for candidate in from_rules.chain(built_in) {
            let candidate = clean_hyphens(&candidate);
            if !candidate.is_empty() && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        candidates
    }

    pub fn lookup(&self, query: &ManualQuery) -> ManualLookup {
        let candidates = self.candidates(query);

        if let Some((sku, price)) = candidates
            .iter()
            .find_map(|sku| self.catalog.price_for(sku).map(|price| (sku.clone(), price)))
        {
            tracing::debug!("manual lookup hit {}", sku);
            return ManualLookup {
                sku: Some(sku),
                unit_price: price,
                matched: LookupMatch::Exact,
                candidates,
            };
        }

        if let Some((sku, price)) = self.fuzzy_match(query) {
            tracing::debug!("manual lookup fuzzy hit {}", sku);
            return ManualLookup {
                sku: Some(sku),
                unit_price: price,
                matched: LookupMatch::Fuzzy,
                candidates,
            };
        }

        tracing::debug!("manual lookup found nothing for {:?}", query.product);
        ManualLookup {
            sku: None,
            unit_price: Decimal::ZERO,
            matched: LookupMatch::NotFound,
            candidates,
        }
    }

    fn fuzzy_match(&self, query: &ManualQuery) -> Option<(String, Decimal)> {
        let product = query.product.trim().to_uppercase();
        if product.is_empty() {
            return None;
        }
        let door = query.door_variant.trim().to_uppercase();

        self.catalog
            .skus()
            .find(|sku| {
                let upper = sku.to_uppercase();
                upper.contains(&product) && (door.is_empty() || upper.contains(&door))
            })
            .and_then(|sku| {
                self.catalog
                    .price_for(sku)
                    .map(|price| (sku.to_string(), price))
            })
    }
}

fn render_manual(rule: &SkuRule, values: &[(&str, &str)]) -> Option<String> {
    match render(&rule.format_template, values) {
        Ok(sku) => Some(sku),
        Err(err) => {
            tracing::warn!("manual rule {}: {}", rule.id, err);
            let fallback = rule.fallback.as_deref()?;
            render(fallback, values)
                .map_err(|err| tracing::warn!("manual rule {} fallback: {}", rule.id, err))
                .ok()
        }
    }
}
