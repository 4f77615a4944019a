//! Error types for the cabquote-core library.

use thiserror::Error;

/// Main error type for the cabquote library.
///
/// Only raised while building parsers and loading snapshots. A running parse
/// never returns it: line-level and field-level problems are recovered locally.
#[derive(Error, Debug)]
pub enum CabquoteError {
    /// JSON (de)serialization error for config, rules, overrides or catalog.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured marker could not be turned into a line pattern.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Why a single line (or merged fragment) was not turned into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// No `1234.56` / `1,234.56` token on the line.
    #[error("no price token")]
    NoPriceToken,

    /// Fewer whitespace tokens than a product row needs.
    #[error("expected at least {expected} tokens, found {found}")]
    TooFewTokens { expected: usize, found: usize },

    /// The price token sits where the code or sequence column should be.
    #[error("price token at column {0} leaves no room for code and sequence")]
    MissingColumns(usize),

    /// The fused quantity column after the price has no leading digits.
    #[error("no quantity after price")]
    MissingQuantity,

    /// No code-like token carrying a sequence number before the price.
    #[error("no sequence number token")]
    NoSequenceToken,

    /// The look-ahead window ran out before a price token appeared.
    #[error("no price within {0} lines")]
    WindowExhausted(usize),
}

/// Errors raised while rendering an SKU format template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template names a placeholder the renderer does not provide.
    #[error("unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),

    /// A `{` without a matching `}`.
    #[error("unclosed placeholder in {0:?}")]
    UnclosedPlaceholder(String),
}

/// Result type for the cabquote library.
pub type Result<T> = std::result::Result<T, CabquoteError>;
