//! Amount parsing for quotation lines.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{CURRENCY_AMOUNT, PRICE_TOKEN};

/// Parse a price column token (`758.00`, `1,759.00`).
///
/// Returns `None` for anything that is not exactly a price token, so
/// description words like `3-Drawers` or bare quantities never qualify.
pub fn parse_price_token(token: &str) -> Option<Decimal> {
    if !PRICE_TOKEN.is_match(token) {
        return None;
    }
    Decimal::from_str(&token.replace(',', "")).ok()
}

/// Find the first price token in a token list.
pub fn find_price_token(tokens: &[&str]) -> Option<(usize, Decimal)> {
    tokens
        .iter()
        .enumerate()
        .find_map(|(i, t)| parse_price_token(t).map(|price| (i, price)))
}

/// The last currency-like amount on a line (`$12,345.00` -> `12345.00`).
pub fn last_amount(line: &str) -> Option<Decimal> {
    CURRENCY_AMOUNT
        .captures_iter(line)
        .filter_map(|caps| Decimal::from_str(&caps[1].replace(',', "")).ok())
        .last()
}

/// Parse a quantity column. Anything unparsable or zero becomes 1.
pub fn parse_quantity(digits: &str) -> u32 {
    match digits.parse::<u32>() {
        Ok(qty) if qty > 0 => qty,
        _ => {
            tracing::debug!("quantity {:?} not usable, defaulting to 1", digits);
            1
        }
    }
}

/// Format an amount with two decimals and thousands separators (`1,234.56`).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let Some((integer_part, decimal_part)) = digits.split_once('.') else {
        return s;
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}{}.{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_token() {
        assert_eq!(parse_price_token("758.00"), Some(Decimal::new(75800, 2)));
        assert_eq!(parse_price_token("1,759.00"), Some(Decimal::new(175900, 2)));
        assert_eq!(parse_price_token("13DB30"), None);
        assert_eq!(parse_price_token("30"), None);
    }

    #[test]
    fn test_find_price_token_skips_description_numbers() {
        let tokens = vec!["SB36", "28", "Sink", "Base", "1", "FK", "468.00", "1SB36"];
        assert_eq!(find_price_token(&tokens), Some((6, Decimal::new(46800, 2))));
        assert_eq!(find_price_token(&["B30", "1"]), None);
    }

    #[test]
    fn test_last_amount() {
        assert_eq!(
            last_amount("OPWM_1 Net Total 2 $1,190.00 $1,226.00"),
            Some(Decimal::new(122600, 2))
        );
        assert_eq!(last_amount("OPWM_1 Net Total ￥980.00"), Some(Decimal::new(98000, 2)));
        assert_eq!(last_amount("Net Total"), None);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("99999999999"), 1);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(123456, 2)), "1,234.56");
        assert_eq!(format_amount(Decimal::new(3000, 2)), "30.00");
        assert_eq!(format_amount(Decimal::new(1234567890, 2)), "12,345,678.90");
        assert_eq!(format_amount(Decimal::new(-100, 2)), "-1.00");
        assert_eq!(format_amount(Decimal::from(5)), "5.00");
    }
}
