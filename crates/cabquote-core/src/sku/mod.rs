//! SKU generation and resolution.
//!
//! [`SkuEngine`] turns `(code, description, context)` into an SKU using the
//! active rule set and the built-in keyword fallbacks; [`SkuResolver`] layers
//! the override table on top. [`ManualResolver`] handles category-driven
//! lookups against the catalog.

pub mod condition;
pub mod engine;
pub mod manual;
pub mod overrides;
pub mod rules;
pub mod template;

pub use condition::{Condition, Field};
pub use engine::{SkuEngine, SkuResolver, fallback_sku};
pub use manual::{LookupMatch, ManualLookup, ManualQuery, ManualResolver, ProductCategory};
pub use overrides::SkuOverrides;
pub use rules::{Preprocessing, RuleBook, RuleSet, SkuRule};

/// Rule set used for records recovered from quotation text.
pub const PDF_PARSING_RULES: &str = "pdf_parsing_rules";

/// Rule set used for manual, category-driven lookups.
pub const MANUAL_QUOTE_RULES: &str = "manual_quote_rules";
