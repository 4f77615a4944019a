//! Data models shared by the parser, the SKU engine and callers.

pub mod catalog;
pub mod config;
pub mod quote;
