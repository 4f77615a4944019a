//! Product rows whose code was split over several lines.
//!
//! The text extractor sometimes breaks a row like
//! `WF330 FOR BASE19 Base Accessory 30.00 1WF330 FOR BASE` into
//! `WF330 FOR` / `BASE19 Base Accessory 30.00 1WF330 FOR` / `BASE`, fusing the
//! tail of the user code with the sequence number. [`FragmentMerger`] gathers
//! the lines back together and [`FragmentExtractor`] re-splits the tokens.

use super::amounts::{find_price_token, parse_quantity};
use super::patterns::{LEADING_DIGITS, PAGE_MARKER, SEQUENCE_CODE, TWO_DECIMAL_AMOUNT};
use crate::error::LineError;
use crate::models::config::ParserConfig;
use crate::quote::{LineResult, RawRecord, RecordExtractor};

/// Lines merged into one candidate row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Single-space joined text of the merged lines.
    pub text: String,
    /// Index of the first line after the fragment.
    pub next_index: usize,
}

/// Gathers a split row from a bounded look-ahead window.
#[derive(Debug, Clone, Copy)]
pub struct FragmentMerger {
    window: usize,
}

impl FragmentMerger {
    /// Merge at most `window` non-blank lines.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// Merge lines from `start` until the joined text carries a price.
    ///
    /// Blank lines and page markers are skipped and do not count toward the
    /// window.
    pub fn merge(&self, lines: &[&str], start: usize) -> LineResult<Fragment> {
        let mut buffer: Vec<&str> = Vec::with_capacity(self.window);

        for (index, line) in lines.iter().enumerate().skip(start) {
            let line = line.trim();
            if line.is_empty() || PAGE_MARKER.is_match(line) {
                continue;
            }

            buffer.push(line);
            let text = buffer.join(" ");
            if TWO_DECIMAL_AMOUNT.is_match(&text) {
                return Ok(Fragment {
                    text,
                    next_index: index + 1,
                });
            }

            if buffer.len() >= self.window {
                break;
            }
        }

        Err(LineError::WindowExhausted(self.window))
    }
}

/// Re-splits a merged fragment into row columns.
#[derive(Debug, Clone)]
pub struct FragmentExtractor {
    placeholder: String,
    default_description: String,
}

impl FragmentExtractor {
    pub fn new(placeholder: impl Into<String>, default_description: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            default_description: default_description.into(),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(
            config.fragment_placeholder.clone(),
            config.default_fragment_description.clone(),
        )
    }
}

impl Default for FragmentExtractor {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}

impl RecordExtractor for FragmentExtractor {
    fn extract(&self, merged: &str) -> LineResult<RawRecord> {
        let tokens: Vec<&str> = merged.split_whitespace().collect();

        let (price_index, document_line_price) =
            find_price_token(&tokens).ok_or(LineError::NoPriceToken)?;

        // After the price: <qty><manufacturer code...>
        let after = &tokens[price_index + 1..];
        let first = after.first().ok_or(LineError::MissingQuantity)?;
        let caps = LEADING_DIGITS
            .captures(first)
            .ok_or(LineError::MissingQuantity)?;
        let quantity = parse_quantity(&caps[1]);

        let mut code_parts: Vec<&str> = Vec::with_capacity(after.len());
        if let Some(rest) = caps.get(2).map(|m| m.as_str()).filter(|r| !r.is_empty()) {
            code_parts.push(rest);
        }
        code_parts.extend_from_slice(&after[1..]);
        let manufacturer_code = code_parts.join(" ");

        // Before the price: <user code...> <PREFIX><seq><suffix> <description...>
        let before = &tokens[..price_index];
        let (seq_index, sequence) = before
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, token)| {
                SEQUENCE_CODE
                    .captures(token)
                    .and_then(|c| c.get(1))
                    .map(|digits| (i, digits))
            })
            .ok_or(LineError::NoSequenceToken)?;

        let token = before[seq_index];
        let prefix = &token[..sequence.start()];
        let suffix = &token[sequence.end()..];

        let mut description_parts: Vec<&str> = Vec::new();
        if !prefix.is_empty() && prefix != self.placeholder {
            description_parts.push(prefix);
        }
        if !suffix.is_empty() {
            description_parts.push(suffix);
        }
        description_parts.extend(
            before[seq_index + 1..]
                .iter()
                .copied()
                .filter(|t| *t != self.placeholder),
        );

        let mut description = description_parts.join(" ");
        if description.is_empty() {
            description = self.default_description.clone();
        }

        let user_code = if seq_index > 0 {
            before[..seq_index].join(" ")
        } else {
            manufacturer_code.clone()
        };

        let manufacturer_code = if manufacturer_code.is_empty() {
            user_code.clone()
        } else {
            manufacturer_code
        };

        Ok(RawRecord {
            sequence_number: sequence.as_str().to_string(),
            manufacturer_code,
            user_code,
            description,
            quantity,
            document_line_price,
            flagged: false,
        })
    }
}
