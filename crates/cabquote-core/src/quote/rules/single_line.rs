//! Complete single-line product rows.
//!
//! Row shape: `<code> <seq> <description...> <price> <qty><code>`, where the
//! last column is the quantity fused with the user code.

use super::amounts::{find_price_token, parse_quantity};
use super::patterns::{LEADING_DIGITS, USER_CODE};
use crate::error::LineError;
use crate::quote::{LineResult, RawRecord, RecordExtractor};

/// Rows with fewer tokens than this are discarded.
pub const MIN_TOKENS: usize = 5;

/// Extractor for rows printed on a single line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleLineExtractor;

impl SingleLineExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl RecordExtractor for SingleLineExtractor {
    fn extract(&self, line: &str) -> LineResult<RawRecord> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let (price_index, document_line_price) =
            find_price_token(&tokens).ok_or(LineError::NoPriceToken)?;

        if tokens.len() < MIN_TOKENS {
            return Err(LineError::TooFewTokens {
                expected: MIN_TOKENS,
                found: tokens.len(),
            });
        }

        if price_index < 2 {
            return Err(LineError::MissingColumns(price_index));
        }

        let manufacturer_code = tokens[0];
        let mut sequence_number = tokens[1];
        let mut description = tokens[2..price_index].join(" ");

        let (quantity, user_code) =
            split_quantity_column(manufacturer_code, tokens.get(price_index + 1).copied());

        let flagged = sequence_number.starts_with('*');
        if flagged {
            sequence_number = &sequence_number[1..];
            description = format!("* {}", description).trim_end().to_string();
        }

        Ok(RawRecord {
            sequence_number: sequence_number.to_string(),
            manufacturer_code: manufacturer_code.to_string(),
            user_code,
            description,
            quantity,
            document_line_price,
            flagged,
        })
    }
}

/// Split the fused `<qty><code>` column into quantity and user code.
///
/// When the manufacturer code itself starts with a digit (`3DB30`), the digits
/// cannot be told apart by shape, so the column is assumed to end with the
/// manufacturer code and whatever precedes it is the quantity. Otherwise the
/// leading digits are the quantity and an uppercase remainder is the user code.
pub fn split_quantity_column(manufacturer_code: &str, column: Option<&str>) -> (u32, String) {
    let Some(column) = column else {
        return (1, manufacturer_code.to_string());
    };

    if manufacturer_code.starts_with(|c: char| c.is_ascii_digit()) {
        let quantity = column
            .strip_suffix(manufacturer_code)
            .filter(|qty| !qty.is_empty() && qty.chars().all(|c| c.is_ascii_digit()))
            .map(parse_quantity)
            .unwrap_or(1);
        return (quantity, manufacturer_code.to_string());
    }

    match LEADING_DIGITS.captures(column) {
        Some(caps) => {
            let quantity = parse_quantity(&caps[1]);
            let rest = &caps[2];
            let user_code = if !rest.is_empty() && USER_CODE.is_match(rest) {
                rest.to_string()
            } else {
                manufacturer_code.to_string()
            };
            (quantity, user_code)
        }
        None => (1, manufacturer_code.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn extract(line: &str) -> LineResult<RawRecord> {
        SingleLineExtractor::new().extract(line)
    }

    #[test]
    fn test_digit_leading_code() {
        let record = extract("3DB30 27 3-Drawers Base Cabinet 758.00 13DB30").unwrap();

        assert_eq!(
            record,
            RawRecord {
                sequence_number: "27".to_string(),
                manufacturer_code: "3DB30".to_string(),
                user_code: "3DB30".to_string(),
                description: "3-Drawers Base Cabinet".to_string(),
                quantity: 1,
                document_line_price: Decimal::new(75800, 2),
                flagged: false,
            }
        );
    }

    #[test]
    fn test_numeral_inside_description() {
        let record =
            extract("SB36 28 Sink Base Cabinet 1 FK Drawer + 2 Door 468.00 1SB36").unwrap();

        assert_eq!(record.quantity, 1);
        assert_eq!(record.user_code, "SB36");
        assert_eq!(record.description, "Sink Base Cabinet 1 FK Drawer + 2 Door");
        assert_eq!(record.document_line_price, Decimal::new(46800, 2));
    }

    #[test]
    fn test_description_word_count_does_not_matter() {
        for words in 1..6 {
            let description = vec!["Wall"; words].join(" ");
            let line = format!("W3030 4 {} 1,240.00 2W3030", description);
            let record = extract(&line).unwrap();

            assert_eq!(record.manufacturer_code, "W3030");
            assert_eq!(record.sequence_number, "4");
            assert_eq!(record.description, description);
            assert_eq!(record.document_line_price, Decimal::new(124000, 2));
            assert_eq!(record.quantity, 2);
        }
    }

    #[test]
    fn test_flagged_sequence() {
        let record = extract("B30 *12 Base Cabinet 245.00 1B30").unwrap();

        assert_eq!(record.sequence_number, "12");
        assert_eq!(record.description, "* Base Cabinet");
        assert!(record.flagged);
    }

    #[test]
    fn test_user_code_differs_from_manufacturer_code() {
        let record = extract("B30 3 Base Cabinet 490.00 2B30-L").unwrap();
        assert_eq!(record.quantity, 2);
        assert_eq!(record.user_code, "B30-L");

        let record = extract("B30 3 Base Cabinet 490.00 2b30").unwrap();
        assert_eq!(record.user_code, "B30");
    }

    #[test]
    fn test_missing_quantity_column_defaults() {
        let record = extract("B30 3 Base Cabinet 245.00").unwrap();
        assert_eq!(record.quantity, 1);
        assert_eq!(record.user_code, "B30");
    }

    #[test]
    fn test_rejected_lines() {
        assert_eq!(extract("B30 3 Base Cabinet"), Err(LineError::NoPriceToken));
        assert_eq!(
            extract("B30 3 245.00 1B30"),
            Err(LineError::TooFewTokens { expected: 5, found: 4 })
        );
        assert_eq!(extract("B30 245.00 1B30 x y"), Err(LineError::MissingColumns(1)));
    }

    #[test]
    fn test_split_quantity_column() {
        assert_eq!(split_quantity_column("3DB30", Some("23DB30")), (2, "3DB30".to_string()));
        assert_eq!(split_quantity_column("3DB30", Some("3DB30")), (1, "3DB30".to_string()));
        assert_eq!(split_quantity_column("3DB30", Some("X")), (1, "3DB30".to_string()));
        assert_eq!(split_quantity_column("B30", Some("12B30")), (12, "B30".to_string()));
        assert_eq!(split_quantity_column("B30", Some("B30")), (1, "B30".to_string()));
        assert_eq!(split_quantity_column("B30", None), (1, "B30".to_string()));
    }
}
