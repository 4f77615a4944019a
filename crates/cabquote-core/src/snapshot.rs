//! Immutable inputs of one parse run.

use crate::error::Result;
use crate::models::catalog::Catalog;
use crate::models::config::QuoteConfig;
use crate::models::quote::ParsedQuote;
use crate::quote::QuoteParser;
use crate::sku::{ManualLookup, ManualQuery, ManualResolver, RuleBook, SkuOverrides, SkuResolver};

/// Configuration, rule sets, overrides and catalog captured together.
///
/// Callers load the data, build a snapshot and share it read-only with every
/// parse that should see the same state. Swapping rule sets means building a
/// new snapshot.
#[derive(Debug, Clone, Default)]
pub struct QuoteSnapshot {
    pub config: QuoteConfig,
    pub rules: RuleBook,
    pub overrides: SkuOverrides,
    pub catalog: Catalog,
}

impl QuoteSnapshot {
    pub fn new(
        config: QuoteConfig,
        rules: RuleBook,
        overrides: SkuOverrides,
        catalog: Catalog,
    ) -> Self {
        Self {
            config,
            rules,
            overrides,
            catalog,
        }
    }

    /// Parser compiled from the snapshot's configuration.
    pub fn parser(&self) -> Result<QuoteParser> {
        QuoteParser::from_config(&self.config)
    }

    /// Resolver over the configured PDF rule set and the overrides.
    pub fn resolver(&self) -> SkuResolver<'_> {
        SkuResolver::new(self.rules.rule_set(&self.config.sku.pdf_rule_set), &self.overrides)
    }

    /// Resolver for manual lookups over the configured manual rule set.
    pub fn manual_resolver(&self) -> ManualResolver<'_> {
        ManualResolver::new(self.rules.rule_set(&self.config.sku.manual_rule_set), &self.catalog)
    }

    /// Parse one document with an already compiled parser.
    pub fn parse_with(&self, parser: &QuoteParser, text: &str) -> ParsedQuote {
        parser.parse(text, &self.resolver(), &self.catalog)
    }

    /// Compile a parser and parse one document.
    pub fn parse(&self, text: &str) -> Result<ParsedQuote> {
        let parser = self.parser()?;
        Ok(self.parse_with(&parser, text))
    }

    /// Resolve the SKU of a single code.
    pub fn resolve_sku(&self, code: &str, description: &str, context: &str) -> String {
        self.resolver().resolve(code, description, context)
    }

    /// Category-driven lookup against the catalog.
    pub fn lookup(&self, query: &ManualQuery) -> ManualLookup {
        self.manual_resolver().lookup(query)
    }
}
