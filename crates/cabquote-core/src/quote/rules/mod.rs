//! Line rules for quotation text: patterns, classification and the two row
//! extractors.

pub mod amounts;
pub mod classify;
pub mod fragment;
pub mod patterns;
pub mod single_line;

pub use amounts::{find_price_token, format_amount, last_amount, parse_price_token, parse_quantity};
pub use classify::{LineClassifier, LineKind};
pub use fragment::{Fragment, FragmentExtractor, FragmentMerger};
pub use single_line::SingleLineExtractor;
