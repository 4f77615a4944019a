//! Fixed regex patterns for quotation line scanning.
//!
//! Patterns that depend on configured phrases (total markers, the door color
//! marker, the continuation keyword) are compiled by
//! [`LineClassifier`](super::classify::LineClassifier) instead.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Price column token: 758.00, 1,759.00
    pub static ref PRICE_TOKEN: Regex = Regex::new(
        r"^\d+(?:,\d{3})*\.\d{2}$"
    ).unwrap();

    // Any two-decimal amount anywhere in a line
    pub static ref TWO_DECIMAL_AMOUNT: Regex = Regex::new(
        r"\d+\.\d{2}"
    ).unwrap();

    // Currency-like amount on a total line: $12,345.00, ￥980.00
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"[$¥￥€£]?(\d[\d,]*\.\d{2})"
    ).unwrap();

    // Product rows start with an uppercase letter or a digit
    pub static ref RECORD_START: Regex = Regex::new(
        r"^[A-Z0-9]"
    ).unwrap();

    // Fused quantity+code column: 1SB36, 13DB30
    pub static ref LEADING_DIGITS: Regex = Regex::new(
        r"^(\d+)(.*)$"
    ).unwrap();

    // User code left over after the quantity digits
    pub static ref USER_CODE: Regex = Regex::new(
        r"^[A-Z0-9-]+$"
    ).unwrap();

    // Uppercase prefix fused with a sequence number: BASE19
    pub static ref SEQUENCE_CODE: Regex = Regex::new(
        r"[A-Z]+(\d+)"
    ).unwrap();

    // Page marker inserted between pages: === PAGE 2 ===
    pub static ref PAGE_MARKER: Regex = Regex::new(
        r"^=+\s*PAGE\s+\d+\s*=+$"
    ).unwrap();

    // Page footer fused into table text
    pub static ref PAGE_FOOTER: Regex = Regex::new(
        r"(Print date: ?\d+ ?\d{4}-\d{2}-\d{2} Page ?\d+ ?/)"
    ).unwrap();

    // Table header fused into table text
    pub static ref TABLE_HEADER: Regex = Regex::new(
        r"(Description Manuf\. code # Qty User code)"
    ).unwrap();
}
