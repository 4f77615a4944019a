//! Cross-check of recovered lines against the document grand total.

use rust_decimal::Decimal;

use crate::models::quote::{ProductRecord, ReconciliationResult, ReconciliationStatus};
use crate::quote::rules::format_amount;

/// Default absolute tolerance (0.01).
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Sum of `quantity * unit_price` over all records.
///
/// A record whose line total overflows, or would overflow the running sum,
/// contributes nothing and is logged.
pub fn computed_total(records: &[ProductRecord]) -> Decimal {
    records.iter().fold(Decimal::ZERO, |total, record| {
        match record.line_total().and_then(|line| total.checked_add(line)) {
            Some(sum) => sum,
            None => {
                tracing::warn!(
                    "line total of sequence {} overflows, left out of the computed total",
                    record.sequence_number
                );
                total
            }
        }
    })
}

/// Compare the computed total with the document total.
///
/// Totals match when their absolute difference is below `tolerance`.
pub fn reconcile(
    document_total: Option<Decimal>,
    records: &[ProductRecord],
    tolerance: Decimal,
) -> ReconciliationResult {
    let computed = computed_total(records);

    let Some(expected) = document_total else {
        return ReconciliationResult {
            document_total: None,
            computed_total: computed,
            status: ReconciliationStatus::Unknown,
            message: format!(
                "Document total not found; computed total {}",
                format_amount(computed)
            ),
        };
    };

    let difference = computed.checked_sub(expected).map(|d| d.abs());
    let (status, message) = if difference.is_some_and(|d| d < tolerance) {
        (
            ReconciliationStatus::Match,
            format!("Totals match: {}", format_amount(expected)),
        )
    } else {
        (
            ReconciliationStatus::Mismatch,
            format!(
                "Total mismatch: document {} vs computed {} (difference {})",
                format_amount(expected),
                format_amount(computed),
                difference.map_or_else(|| "out of range".to_string(), format_amount)
            ),
        )
    };

    ReconciliationResult {
        document_total: Some(expected),
        computed_total: computed,
        status,
        message,
    }
}
