//! Configuration file parsing, merging, and validation
//!
//! This module handles:
//! - Config file discovery from multiple locations
//! - TOML parsing with serde
//! - Layer merging with precedence rules
//! - Per-type `ToolConfig` derivation consumed by the sync engine
//! - Validation and error reporting
//!
//! Configuration is loaded once per run and passed explicitly into every
//! engine entry point.

mod discovery;
mod merge;
mod types;
mod validation;


use std::path::Path;

pub use discovery::{ConfigDiscovery, ConfigFiles};
pub use merge::ConfigMerger;
pub use types::{
    Config, DEFAULT_TENANT, ResourceSection, ServerConfig, ServerSettings, ToolConfig,
    TypeSection,
};
pub use validation::ConfigValidator;

/// Configuration manager that coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load and merge configuration from all sources
    ///
    /// With `no_config` set, discovery is skipped and only defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested file does not exist, or
    /// if any discovered file is unreadable, unparsable, or invalid.
    pub fn load(cli_config_path: Option<&Path>, no_config: bool) -> anyhow::Result<Config> {
        if no_config {
            return Ok(Config::default());
        }

        if let Some(path) = cli_config_path
            && !path.is_file()
        {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config_files = ConfigDiscovery::discover(cli_config_path);
        for path in config_files.iter() {
            tracing::debug!(path = %path.display(), "loading config layer");
        }

        let merged = ConfigMerger::merge(&config_files)?;

        ConfigValidator::validate(&merged)?;
        for warning in ConfigValidator::warnings(&merged) {
            tracing::warn!("{warning}");
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_config_yields_defaults() {
        let config = ConfigManager::load(None, true).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("prod.toml");

        let err = ConfigManager::load(Some(&missing), false).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
