//! Condition expressions for manual SKU rules.
//!
//! A closed grammar evaluated over a [`ManualQuery`]:
//!
//! - `*` or an empty string: always true
//! - `product`, `box_variant is not empty`, `door_variant is empty`
//! - `category == 'Door'`, `category != 'BOX'`
//! - `'OPEN' in product_name`, `'OPEN' not in product_name`
//! - `not <term>` / `!<term>`
//! - terms joined with `and` / `&&` (not inside quoted values)
//!
//! Anything else is treated as always true and logged.

use lazy_static::lazy_static;
use regex::Regex;

use super::manual::{ManualQuery, same_category};

lazy_static! {
    static ref AND: Regex = Regex::new(r"(?i)\s+and\s+|\s*&&\s*").unwrap();
    static ref NOT: Regex = Regex::new(r"(?i)^(?:not\s+|!\s*)(.+)$").unwrap();
    static ref EMPTINESS: Regex = Regex::new(r"(?i)^(\w+)\s+is\s+(not\s+)?empty$").unwrap();
    static ref EQUALITY: Regex = Regex::new(r#"^(\w+)\s*(==|!=)\s*['"](.*)['"]$"#).unwrap();
    static ref MEMBERSHIP: Regex = Regex::new(r#"(?i)^['"](.*)['"]\s+(not\s+)?in\s+(\w+)$"#).unwrap();
}

/// Query field a condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Product,
    BoxVariant,
    DoorVariant,
}

impl Field {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "category" => Some(Self::Category),
            "product" | "product_name" => Some(Self::Product),
            "box_variant" => Some(Self::BoxVariant),
            "door_variant" => Some(Self::DoorVariant),
            _ => None,
        }
    }

    fn value(self, query: &ManualQuery) -> &str {
        let value = match self {
            Self::Category => &query.category,
            Self::Product => &query.product,
            Self::BoxVariant => &query.box_variant,
            Self::DoorVariant => &query.door_variant,
        };
        value.trim()
    }
}

/// Parsed condition expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// Field is non-empty.
    Present(Field),
    /// Field equals a value, ignoring case. Categories compare by kind.
    Equals(Field, String),
    /// Field contains a substring, ignoring case.
    Contains(Field, String),
    Not(Box<Condition>),
    And(Vec<Condition>),
}

impl Condition {
    /// Parse an expression. Unrecognized expressions become [`Condition::Always`].
    pub fn parse(expression: &str) -> Self {
        let expression = expression.trim();
        if expression.is_empty() || expression == "*" {
            return Self::Always;
        }

        match Self::try_parse(expression) {
            Some(condition) => condition,
            None => {
                tracing::warn!(
                    "unrecognized condition {:?}, treating as always true",
                    expression
                );
                Self::Always
            }
        }
    }

    /// Strict parse: `None` when any term is not understood.
    pub fn try_parse(expression: &str) -> Option<Self> {
        let terms = split_terms(expression.trim())
            .into_iter()
            .map(parse_term)
            .collect::<Option<Vec<_>>>()?;

        match terms.len() {
            0 => None,
            1 => terms.into_iter().next(),
            _ => Some(Self::And(terms)),
        }
    }

    pub fn evaluate(&self, query: &ManualQuery) -> bool {
        match self {
            Self::Always => true,
            Self::Present(field) => !field.value(query).is_empty(),
            Self::Equals(Field::Category, expected) => same_category(&query.category, expected),
            Self::Equals(field, expected) => {
                field.value(query).eq_ignore_ascii_case(expected.trim())
            }
            Self::Contains(field, needle) => field
                .value(query)
                .to_uppercase()
                .contains(&needle.to_uppercase()),
            Self::Not(inner) => !inner.evaluate(query),
            Self::And(terms) => terms.iter().all(|term| term.evaluate(query)),
        }
    }
}

/// Split on `and` / `&&` outside quoted values.
fn split_terms(expression: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut start = 0;

    for separator in AND.find_iter(expression) {
        if inside_quotes(&expression[start..separator.start()]) {
            continue;
        }
        terms.push(&expression[start..separator.start()]);
        start = separator.end();
    }

    terms.push(&expression[start..]);
    terms
}

/// Whether `prefix` leaves a quoted value open.
fn inside_quotes(prefix: &str) -> bool {
    let mut open: Option<char> = None;
    for c in prefix.chars() {
        match open {
            None if c == '\'' || c == '"' => open = Some(c),
            Some(quote) if c == quote => open = None,
            _ => {}
        }
    }
    open.is_some()
}

fn parse_term(term: &str) -> Option<Condition> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }

    if let Some(caps) = NOT.captures(term) {
        return parse_term(&caps[1]).map(|inner| Condition::Not(Box::new(inner)));
    }

    if let Some(caps) = EMPTINESS.captures(term) {
        let present = Condition::Present(Field::from_name(&caps[1])?);
        return Some(if caps.get(2).is_some() {
            present
        } else {
            Condition::Not(Box::new(present))
        });
    }

    if let Some(caps) = EQUALITY.captures(term) {
        let equals = Condition::Equals(Field::from_name(&caps[1])?, caps[3].to_string());
        return Some(if &caps[2] == "!=" {
            Condition::Not(Box::new(equals))
        } else {
            equals
        });
    }

    if let Some(caps) = MEMBERSHIP.captures(term) {
        let contains = Condition::Contains(Field::from_name(&caps[3])?, caps[1].to_string());
        return Some(if caps.get(2).is_some() {
            Condition::Not(Box::new(contains))
        } else {
            contains
        });
    }

    Field::from_name(term).map(Condition::Present)
}
