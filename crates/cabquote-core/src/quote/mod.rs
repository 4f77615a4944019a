//! Quotation line-item recovery.

mod context;
mod parser;
pub mod rules;
pub mod text;

pub use context::ContextTracker;
pub use parser::QuoteParser;

use rust_decimal::Decimal;

use crate::error::LineError;

/// Result type for line-level extraction.
pub type LineResult<T> = std::result::Result<T, LineError>;

/// Columns recovered from one product row, before SKU and price resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Sequence number without the `*` flag.
    pub sequence_number: String,
    /// Code next to the price and quantity columns.
    pub manufacturer_code: String,
    /// Code from the user-code column.
    pub user_code: String,
    /// Row description, prefixed with `"* "` when flagged.
    pub description: String,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// Line total as printed.
    pub document_line_price: Decimal,
    /// Whether the sequence number carried a `*`.
    pub flagged: bool,
}

/// Turns the text of one product row into its columns.
///
/// The token-boundary guesswork for each row shape lives behind this trait so
/// a single shape can be re-implemented without touching the SKU engine or
/// reconciliation.
pub trait RecordExtractor {
    /// Extract the columns of one row, or explain why the text is not a row.
    fn extract(&self, text: &str) -> LineResult<RawRecord>;
}
