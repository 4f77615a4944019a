//! Line scanner that turns quotation text into product records.

use std::borrow::Cow;
use std::time::Instant;

use rust_decimal::Decimal;

use super::context::ContextTracker;
use super::rules::{
    FragmentExtractor, FragmentMerger, LineClassifier, LineKind, SingleLineExtractor,
};
use super::text::split_fused_lines;
use super::{LineResult, RawRecord, RecordExtractor};
use crate::error::Result;
use crate::models::catalog::Catalog;
use crate::models::config::{ParserConfig, QuoteConfig};
use crate::models::quote::{
    ParseStats, ParsedQuote, PriceSource, ProductRecord, RecordSource, by_sequence,
    duplicate_sequences,
};
use crate::reconcile::{DEFAULT_TOLERANCE, reconcile};
use crate::sku::SkuResolver;

/// Scans quotation text line by line.
///
/// A parser holds only compiled configuration; every call to
/// [`parse`](Self::parse) gets its own context and record list, so one parser
/// can serve many documents, including from several threads.
#[derive(Debug, Clone)]
pub struct QuoteParser {
    config: ParserConfig,
    classifier: LineClassifier,
    merger: FragmentMerger,
    single_line: SingleLineExtractor,
    fragment: FragmentExtractor,
    tolerance: Decimal,
}

impl QuoteParser {
    /// Create a parser with the default reconciliation tolerance.
    pub fn new(config: ParserConfig) -> Result<Self> {
        Ok(Self {
            classifier: LineClassifier::new(&config)?,
            merger: FragmentMerger::new(config.fragment_window),
            single_line: SingleLineExtractor::new(),
            fragment: FragmentExtractor::from_config(&config),
            tolerance: DEFAULT_TOLERANCE,
            config,
        })
    }

    /// Create a parser from the full pipeline configuration.
    pub fn from_config(config: &QuoteConfig) -> Result<Self> {
        Ok(Self::new(config.parser.clone())?.with_tolerance(config.reconciliation.tolerance))
    }

    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Recover records from `text`, resolve SKUs and prices, and reconcile.
    ///
    /// Never fails: lines that do not parse are skipped and counted.
    pub fn parse(&self, text: &str, skus: &SkuResolver<'_>, catalog: &Catalog) -> ParsedQuote {
        let start = Instant::now();

        let text = if self.config.split_fused_lines {
            Cow::Owned(split_fused_lines(text))
        } else {
            Cow::Borrowed(text)
        };
        let lines: Vec<&str> = text.lines().collect();

        let mut context = ContextTracker::new();
        let mut document_total: Option<Decimal> = None;
        let mut records: Vec<ProductRecord> = Vec::new();
        let mut stats = ParseStats {
            lines_scanned: lines.len(),
            ..ParseStats::default()
        };

        let mut index = 0;
        while index < lines.len() {
            let line = lines[index];
            let line_number = index + 1;

            match self.classifier.classify(line) {
                LineKind::Blank | LineKind::PageMarker | LineKind::Noise => {}
                LineKind::Total(total) => {
                    tracing::debug!("line {}: document total {}", line_number, total);
                    document_total = Some(total);
                }
                LineKind::Context(label) => {
                    context.update(label);
                }
                LineKind::FragmentStart => match self.merge_fragment(&lines, index) {
                    Ok((raw, next_index)) => {
                        records.push(self.build_record(
                            raw,
                            line_number,
                            RecordSource::MultiLine,
                            context.current(),
                            skus,
                            catalog,
                        ));
                        stats.multi_line_records += 1;
                        index = next_index;
                        continue;
                    }
                    Err(err) => {
                        tracing::debug!("line {}: fragment skipped: {}", line_number, err);
                        stats.skipped_lines += 1;
                    }
                },
                LineKind::Record => match self.single_line.extract(line) {
                    Ok(raw) => {
                        records.push(self.build_record(
                            raw,
                            line_number,
                            RecordSource::SingleLine,
                            context.current(),
                            skus,
                            catalog,
                        ));
                        stats.single_line_records += 1;
                    }
                    Err(err) => {
                        tracing::debug!("line {}: skipped: {}", line_number, err);
                        stats.skipped_lines += 1;
                    }
                },
            }

            index += 1;
        }

        stats.context_changes = context.changes();
        records.sort_by(by_sequence);

        let mut warnings = Vec::new();
        for sequence in duplicate_sequences(&records) {
            tracing::warn!("sequence number {} appears more than once", sequence);
            warnings.push(format!("Duplicate sequence number {}", sequence));
        }
        if records.is_empty() {
            warnings.push("No product records found".to_string());
        }

        let reconciliation = reconcile(document_total, &records, self.tolerance);

        tracing::info!(
            "Parsed {} lines: {} records, reconciliation {:?}",
            stats.lines_scanned,
            records.len(),
            reconciliation.status
        );

        ParsedQuote {
            records,
            reconciliation,
            warnings,
            stats,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn merge_fragment(&self, lines: &[&str], index: usize) -> LineResult<(RawRecord, usize)> {
        let fragment = self.merger.merge(lines, index)?;
        let raw = self.fragment.extract(&fragment.text)?;
        Ok((raw, fragment.next_index))
    }

    fn build_record(
        &self,
        raw: RawRecord,
        line_number: usize,
        source: RecordSource,
        context: &str,
        skus: &SkuResolver<'_>,
        catalog: &Catalog,
    ) -> ProductRecord {
        let sku = skus.resolve(&raw.user_code, &raw.description, context);

        let (unit_price, price_source) = match catalog.price_for(&sku) {
            Some(price) => (price, PriceSource::Catalog),
            None => match raw
                .document_line_price
                .checked_div(Decimal::from(raw.quantity))
            {
                Some(price) => (price, PriceSource::Document),
                None => (Decimal::ZERO, PriceSource::Missing),
            },
        };

        ProductRecord {
            sequence_number: raw.sequence_number,
            manufacturer_code: raw.manufacturer_code,
            user_code: raw.user_code,
            description: raw.description,
            quantity: raw.quantity,
            unit_price,
            document_line_price: raw.document_line_price,
            context_label: context.to_string(),
            sku,
            flagged: raw.flagged,
            line_number,
            source,
            price_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::CatalogEntry;
    use crate::models::quote::ReconciliationStatus;
    use crate::sku::SkuOverrides;
    use pretty_assertions::assert_eq;

    const QUOTE: &str = "\
Style: Shaker
Door color 1 BSS
Description Manuf. code # Qty User code
3DB30 27 3-Drawers Base Cabinet 758.00 13DB30
SB36 28 Sink Base Cabinet 1 FK Drawer + 2 Door 468.00 1SB36
WF330 FOR
BASE19 Base Accessory 30.00 1WF330 FOR
BASE
OPWM_1 Net Total $1,256.00
";

    fn parse(text: &str, catalog: &Catalog, overrides: &SkuOverrides) -> ParsedQuote {
        let parser = QuoteParser::new(ParserConfig::default()).unwrap();
        let resolver = SkuResolver::new(&[], overrides);
        parser.parse(text, &resolver, catalog)
    }

    #[test]
    fn test_parse_quote() {
        let result = parse(QUOTE, &Catalog::new(), &SkuOverrides::new());

        let seqs: Vec<_> = result.records.iter().map(|r| r.sequence_number.as_str()).collect();
        assert_eq!(seqs, vec!["19", "27", "28"]);

        let accessory = &result.records[0];
        assert_eq!(accessory.source, RecordSource::MultiLine);
        assert_eq!(accessory.line_number, 6);
        assert_eq!(accessory.sku, "BSS-WF330 FOR");
        assert_eq!(accessory.context_label, "BSS");

        let drawers = &result.records[1];
        assert_eq!(drawers.sku, "3DB30-PLY-BSS");
        assert_eq!(drawers.unit_price, Decimal::new(75800, 2));
        assert_eq!(drawers.price_source, PriceSource::Document);

        assert_eq!(result.stats.single_line_records, 2);
        assert_eq!(result.stats.multi_line_records, 1);
        assert_eq!(result.stats.context_changes, 1);
        assert_eq!(result.reconciliation.status, ReconciliationStatus::Match);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_catalog_price_and_overrides() {
        let mut catalog = Catalog::new();
        catalog.insert(
            "SB36-SPECIAL",
            CatalogEntry {
                unit_price: Decimal::new(40000, 2),
                ..CatalogEntry::default()
            },
        );
        let overrides: SkuOverrides = [("SB36-PLY-BSS", "SB36-SPECIAL")].into_iter().collect();

        let result = parse(QUOTE, &catalog, &overrides);
        let sink = result.records.iter().find(|r| r.sequence_number == "28").unwrap();

        assert_eq!(sink.sku, "SB36-SPECIAL");
        assert_eq!(sink.unit_price, Decimal::new(40000, 2));
        assert_eq!(sink.price_source, PriceSource::Catalog);
        assert_eq!(result.reconciliation.status, ReconciliationStatus::Mismatch);
    }

    #[test]
    fn test_unit_price_divides_line_price() {
        let result = parse(
            "B30 3 Base Cabinet 490.00 2B30",
            &Catalog::new(),
            &SkuOverrides::new(),
        );
        let record = &result.records[0];

        assert_eq!(record.quantity, 2);
        assert_eq!(record.unit_price, Decimal::new(24500, 2));
        assert_eq!(record.context_label, "N/A");
        assert_eq!(result.reconciliation.status, ReconciliationStatus::Unknown);
    }

    #[test]
    fn test_context_survives_page_markers() {
        let text = "Door color 1 MNW\n=== PAGE 2 ===\nB30 3 Base Cabinet 245.00 1B30";
        let result = parse(text, &Catalog::new(), &SkuOverrides::new());
        assert_eq!(result.records[0].context_label, "MNW");
    }

    #[test]
    fn test_malformed_lines_do_not_abort() {
        let text = "\
B30 3 245.00 1B30
WF330 FOR
nothing useful
still nothing
W3030 4 Wall Cabinet 120.00 1W3030
";
        let result = parse(text, &Catalog::new(), &SkuOverrides::new());

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].sequence_number, "4");
        assert_eq!(result.stats.skipped_lines, 2);
    }

    #[test]
    fn test_duplicate_sequences_are_kept_and_reported() {
        let text = "B30 3 Base Cabinet 245.00 1B30\nB36 3 Base Cabinet 260.00 1B36";
        let result = parse(text, &Catalog::new(), &SkuOverrides::new());

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.warnings, vec!["Duplicate sequence number 3".to_string()]);
        // Stable sort keeps document order for equal sequence numbers
        assert_eq!(result.records[0].manufacturer_code, "B30");
    }

    #[test]
    fn test_last_total_wins() {
        let text =
            "OPWM_1 Net Total $10.00\nB30 3 Base Cabinet 245.00 1B30\nOPWM_1 Net Total $245.00";
        let result = parse(text, &Catalog::new(), &SkuOverrides::new());
        assert_eq!(result.reconciliation.document_total, Some(Decimal::new(24500, 2)));
        assert!(result.reconciliation.is_match());
    }
}
