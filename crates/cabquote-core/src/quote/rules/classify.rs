//! Line classification for quotation text.
//!
//! Every trimmed line falls into exactly one [`LineKind`]. Rules are checked
//! in priority order: blank, page marker, grand total, door color heading,
//! split-code fragment start, complete product row, noise.

use regex::Regex;
use rust_decimal::Decimal;

use super::amounts::last_amount;
use super::patterns::{PAGE_MARKER, RECORD_START, TWO_DECIMAL_AMOUNT};
use crate::error::{CabquoteError, Result};
use crate::models::config::ParserConfig;

/// What a single line of quotation text is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after trimming.
    Blank,
    /// `=== PAGE n ===` inserted by the text extractor.
    PageMarker,
    /// Grand-total line with its last amount.
    Total(Decimal),
    /// Door color heading with its label.
    Context(String),
    /// First line of a product row whose code was split over several lines.
    FragmentStart,
    /// A complete single-line product row.
    Record,
    /// Headers, footers and anything else.
    Noise,
}

/// Classifies lines according to a [`ParserConfig`].
#[derive(Debug, Clone)]
pub struct LineClassifier {
    total_markers: Vec<String>,
    context: Regex,
    fragment: Regex,
    fragment_max_len: usize,
    header_prefixes: Vec<String>,
}

impl LineClassifier {
    /// Compile the configured markers into line patterns.
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let marker = phrase_pattern(&config.context_marker)
            .ok_or_else(|| CabquoteError::Config("context_marker is empty".to_string()))?;
        let keyword = phrase_pattern(&config.continuation_keyword)
            .ok_or_else(|| CabquoteError::Config("continuation_keyword is empty".to_string()))?;

        // Optional column number between the marker and the label: "Door color 1 BSS"
        let context = Regex::new(&format!(r"(?i:{marker})\s+(?:\d+\s+)?([A-Z]+)\b"))?;
        let fragment = Regex::new(&format!(r"[A-Z]+\d+\s+{keyword}\b"))?;

        Ok(Self {
            total_markers: config
                .total_markers
                .iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            context,
            fragment,
            fragment_max_len: config.fragment_max_len,
            header_prefixes: config.header_prefixes.clone(),
        })
    }

    /// Classify one line. Surrounding whitespace is ignored.
    pub fn classify(&self, line: &str) -> LineKind {
        let line = line.trim();

        if line.is_empty() {
            return LineKind::Blank;
        }

        if PAGE_MARKER.is_match(line) {
            return LineKind::PageMarker;
        }

        if self.total_markers.iter().any(|m| line.contains(m.as_str())) {
            if let Some(total) = last_amount(line) {
                return LineKind::Total(total);
            }
        }

        if let Some(caps) = self.context.captures(line) {
            return LineKind::Context(caps[1].to_string());
        }

        if self.is_fragment_start(line) {
            return LineKind::FragmentStart;
        }

        if self.is_record(line) {
            return LineKind::Record;
        }

        LineKind::Noise
    }

    /// Short line with a code followed by the continuation keyword and no price.
    pub fn is_fragment_start(&self, line: &str) -> bool {
        line.chars().count() < self.fragment_max_len
            && self.fragment.is_match(line)
            && !TWO_DECIMAL_AMOUNT.is_match(line)
    }

    /// Starts like a product row, carries a price and is not a header.
    pub fn is_record(&self, line: &str) -> bool {
        RECORD_START.is_match(line)
            && TWO_DECIMAL_AMOUNT.is_match(line)
            && !self.is_header(line)
    }

    fn is_header(&self, line: &str) -> bool {
        self.header_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
    }
}

/// Escape a phrase and let any run of whitespace match between its words.
fn phrase_pattern(phrase: &str) -> Option<String> {
    let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(r"\s+"))
    }
}
