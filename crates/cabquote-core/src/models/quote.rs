//! Quotation data models.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Context label used before any door color has been seen.
pub const NO_CONTEXT: &str = "N/A";

/// One recovered line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Sequence number as printed, without the `*` flag.
    pub sequence_number: String,

    /// Code adjacent to the price and quantity columns.
    pub manufacturer_code: String,

    /// Code from the user-code column; usually equal to `manufacturer_code`.
    pub user_code: String,

    /// Free text between the sequence number and the price.
    /// Starts with `"* "` when the row was flagged.
    pub description: String,

    /// Quantity, at least 1.
    pub quantity: u32,

    /// Resolved unit price.
    pub unit_price: Decimal,

    /// Line total as printed in the document.
    pub document_line_price: Decimal,

    /// Door color in effect when the record was read.
    pub context_label: String,

    /// Resolved SKU (rules, fallbacks, then overrides).
    pub sku: String,

    /// Whether the sequence number carried a `*` marker.
    #[serde(default)]
    pub flagged: bool,

    /// 1-based line number of the first source line of this record.
    pub line_number: usize,

    /// Which extractor produced the record.
    pub source: RecordSource,

    /// Where `unit_price` came from.
    pub price_source: PriceSource,
}

impl ProductRecord {
    /// Numeric value of the sequence number, 0 when it is not a number.
    pub fn sequence_value(&self) -> u64 {
        sequence_value(&self.sequence_number)
    }

    /// `quantity * unit_price`, or `None` when the product overflows.
    pub fn line_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}

/// Numeric sort key of a sequence number; a leading `*` is ignored.
pub fn sequence_value(sequence: &str) -> u64 {
    sequence.trim_start_matches('*').parse().unwrap_or(0)
}

/// Orders records by numeric sequence number.
pub fn by_sequence(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    a.sequence_value().cmp(&b.sequence_value())
}

/// Extractor that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// A complete row on one line.
    SingleLine,
    /// A row merged from a split code fragment and its continuation lines.
    MultiLine,
}

/// Origin of a record's unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Found in the price catalog under the record's SKU.
    Catalog,
    /// Document line price divided by quantity.
    Document,
    /// Neither was available; price is zero.
    Missing,
}

/// Outcome of comparing recovered lines against the document total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconciliationStatus {
    /// Totals agree within tolerance.
    Match,
    /// Totals differ by at least the tolerance.
    Mismatch,
    /// The document total was never found.
    Unknown,
}

/// Result of the total cross-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Grand total printed in the document, if one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_total: Option<Decimal>,

    /// Sum of `quantity * unit_price` over all records.
    pub computed_total: Decimal,

    /// Comparison outcome.
    pub status: ReconciliationStatus,

    /// Operator-facing summary.
    pub message: String,
}

impl ReconciliationResult {
    /// True when the totals agree.
    pub fn is_match(&self) -> bool {
        self.status == ReconciliationStatus::Match
    }
}

/// Counters collected while scanning a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines in the normalized text.
    pub lines_scanned: usize,
    /// Records recovered from single lines.
    pub single_line_records: usize,
    /// Records recovered from merged fragments.
    pub multi_line_records: usize,
    /// Candidate lines or fragments that did not yield a record.
    pub skipped_lines: usize,
    /// Number of door color changes.
    pub context_changes: usize,
}

/// Everything one parse run hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedQuote {
    /// Records sorted by numeric sequence number.
    pub records: Vec<ProductRecord>,
    /// Total cross-check.
    pub reconciliation: ReconciliationResult,
    /// Non-fatal issues worth an operator's attention.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Scan counters.
    pub stats: ParseStats,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ParsedQuote {
    /// Sequence numbers that occur on more than one record, in sorted order.
    pub fn duplicate_sequences(&self) -> Vec<String> {
        duplicate_sequences(&self.records)
    }
}

pub(crate) fn duplicate_sequences(records: &[ProductRecord]) -> Vec<String> {
    let mut seen = std::collections::BTreeMap::<&str, usize>::new();
    for record in records {
        *seen.entry(record.sequence_number.as_str()).or_default() += 1;
    }
    seen.into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(seq, _)| seq.to_string())
        .collect()
}
