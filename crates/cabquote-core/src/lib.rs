//! Core library for recovering line items from cabinet quotation text.
//!
//! This crate provides:
//! - Line classification and extraction of product rows, including rows
//!   split over several lines
//! - Rule-driven SKU generation with keyword fallbacks and an override table
//! - Category-driven SKU lookup against a price catalog
//! - Reconciliation of recovered lines against the document grand total
//!
//! The crate does no file or network I/O: callers load configuration, rule
//! sets, overrides and catalog, then hand them in as a [`QuoteSnapshot`].

pub mod error;
pub mod models;
pub mod quote;
pub mod reconcile;
pub mod sku;
pub mod snapshot;

pub use error::{CabquoteError, LineError, Result, TemplateError};
pub use models::catalog::{Catalog, CatalogEntry};
pub use models::config::{ParserConfig, QuoteConfig, ReconciliationConfig, SkuConfig, StoreConfig};
pub use models::quote::{
    ParseStats, ParsedQuote, PriceSource, ProductRecord, RecordSource, ReconciliationResult,
    ReconciliationStatus,
};
pub use quote::{QuoteParser, RawRecord, RecordExtractor};
pub use reconcile::reconcile;
pub use sku::{
    ManualLookup, ManualQuery, ManualResolver, RuleBook, SkuEngine, SkuOverrides, SkuResolver,
    SkuRule,
};
pub use snapshot::QuoteSnapshot;
