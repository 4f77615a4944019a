//! Loading of the configuration and data files into a core snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use cabquote_core::{Catalog, QuoteConfig, QuoteSnapshot, RuleBook, SkuOverrides};

/// Default config location: `<config_dir>/cabquote/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cabquote")
        .join("config.json")
}

/// Read a config file.
pub fn read_config(path: &Path) -> anyhow::Result<QuoteConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    QuoteConfig::from_json(&json)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

/// Write a config file, creating parent directories.
pub fn write_config(config: &QuoteConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config.to_json()?)?;
    Ok(())
}

/// Explicit `--config` path, else the default file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<QuoteConfig> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        read_config(&default_path)
    } else {
        Ok(QuoteConfig::default())
    }
}

/// Load rules, overrides and catalog named by the config.
///
/// A missing rules file falls back to the built-in rule book; other missing
/// data files are treated as empty.
pub fn load_snapshot(config: QuoteConfig) -> anyhow::Result<QuoteSnapshot> {
    let rules = read_optional(
        &config.store.rules_file,
        RuleBook::from_json,
        RuleBook::with_defaults,
    )?;
    let overrides = read_optional(
        &config.store.overrides_file,
        SkuOverrides::from_json,
        SkuOverrides::default,
    )?;
    let catalog = read_optional(
        &config.store.catalog_file,
        Catalog::from_json,
        Catalog::default,
    )?;

    info!(
        "Loaded {} overrides and {} catalog entries",
        overrides.len(),
        catalog.len()
    );

    Ok(QuoteSnapshot::new(config, rules, overrides, catalog))
}

fn read_optional<T, F, D>(path: &Path, parse: F, missing: D) -> anyhow::Result<T>
where
    F: FnOnce(&str) -> cabquote_core::Result<T>,
    D: FnOnce() -> T,
{
    if !path.exists() {
        debug!("{} not found, using defaults", path.display());
        return Ok(missing());
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&json).with_context(|| format!("Invalid data file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = QuoteConfig::default();
        config.store.rules_file = dir.path().join("rules.json");
        config.store.overrides_file = dir.path().join("overrides.json");
        config.store.catalog_file = dir.path().join("catalog.json");

        let snapshot = load_snapshot(config).unwrap();
        assert!(snapshot.catalog.is_empty());
        assert!(snapshot.overrides.is_empty());
        assert_eq!(snapshot.rules, RuleBook::with_defaults());
    }

    #[test]
    fn test_rules_file_replaces_built_in_rules() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules.json");
        fs::write(&rules, "{}").unwrap();

        let mut config = QuoteConfig::default();
        config.store.rules_file = rules;
        config.store.overrides_file = dir.path().join("overrides.json");
        config.store.catalog_file = dir.path().join("catalog.json");

        let snapshot = load_snapshot(config).unwrap();
        assert_eq!(snapshot.rules.names().count(), 0);
    }

    #[test]
    fn test_invalid_data_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        fs::write(&catalog, "[1, 2").unwrap();

        let mut config = QuoteConfig::default();
        config.store.catalog_file = catalog;
        config.store.rules_file = dir.path().join("rules.json");
        config.store.overrides_file = dir.path().join("overrides.json");

        assert!(load_snapshot(config).is_err());
    }

    #[test]
    fn test_config_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = QuoteConfig::default();
        config.parser.fragment_window = 5;
        write_config(&config, &path).unwrap();

        assert_eq!(read_config(&path).unwrap(), config);
    }
}
