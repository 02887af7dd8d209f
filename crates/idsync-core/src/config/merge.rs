//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **Optional scalars** (`url`, `token`, `allow_delete`, ...): a value set in a
//!   higher-precedence file replaces the lower one
//! - **Name lists** (`include_only`, `exclude`): replaced as a whole, never
//!   combined, so a profile can narrow or widen the selection
//! - **Keyword mappings**: unioned key by key, higher precedence wins per key

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::discovery::ConfigFiles;
use super::types::{Config, ServerConfig, TypeSection};
use crate::keywords::KeywordMapping;
use crate::resource::ResourceKind;

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. .idsync.local.toml
    /// 3. .idsync.toml
    /// 4. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> anyhow::Result<Config> {
        let mut merged = Config::default();

        // Load and merge in reverse precedence order (lowest to highest)
        for path in files.iter() {
            let layer = Self::load_file(path)?;
            Self::merge_layer(&mut merged, layer);
        }

        Ok(merged)
    }

    /// Parse a single config file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config TOML.
    pub fn load_file(path: &Path) -> anyhow::Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Lay `layer` over `base`
    pub fn merge_layer(base: &mut Config, mut layer: Config) {
        for kind in ResourceKind::ALL {
            let section = std::mem::take(layer.section_mut(kind));
            Self::merge_section(base.section_mut(kind), section);
        }

        Self::merge_server(&mut base.server, layer.server);
        merge_mappings(&mut base.keyword_mappings, layer.keyword_mappings);

        if layer.allow_delete.is_some() {
            base.allow_delete = layer.allow_delete;
        }
        if layer.exclude_secrets.is_some() {
            base.exclude_secrets = layer.exclude_secrets;
        }
    }

    fn merge_server(base: &mut ServerConfig, layer: ServerConfig) {
        if layer.url.is_some() {
            base.url = layer.url;
        }
        if layer.tenant.is_some() {
            base.tenant = layer.tenant;
        }
        if layer.token.is_some() {
            base.token = layer.token;
        }
        if layer.accept_invalid_certs.is_some() {
            base.accept_invalid_certs = layer.accept_invalid_certs;
        }
        if layer.timeout_secs.is_some() {
            base.timeout_secs = layer.timeout_secs;
        }
    }

    fn merge_section(base: &mut TypeSection, layer: TypeSection) {
        if layer.include_only.is_some() {
            base.include_only = layer.include_only;
        }
        if layer.exclude.is_some() {
            base.exclude = layer.exclude;
        }
        if layer.allow_delete.is_some() {
            base.allow_delete = layer.allow_delete;
        }
        if layer.exclude_secrets.is_some() {
            base.exclude_secrets = layer.exclude_secrets;
        }
        merge_mappings(&mut base.keyword_mappings, layer.keyword_mappings);

        for (name, resource) in layer.resources {
            let entry = base.resources.entry(name).or_default();
            merge_mappings(&mut entry.keyword_mappings, resource.keyword_mappings);
        }
    }
}

fn merge_mappings(base: &mut KeywordMapping, layer: KeywordMapping) {
    base.extend(layer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_merge_empty_config() {
        let config = ConfigMerger::merge(&ConfigFiles::default()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_merge_single_config() {
        let tmp = TempDir::new().unwrap();
        let config_file = tmp.path().join("config.toml");
        fs::write(
            &config_file,
            r#"
allow_delete = true

[server]
url = "https://localhost:9443"

[applications]
exclude = ["Console", "My Account"]
"#,
        )
        .unwrap();

        let files = ConfigFiles {
            project: Some(config_file),
            ..ConfigFiles::default()
        };
        let config = ConfigMerger::merge(&files).unwrap();

        assert_eq!(config.allow_delete, Some(true));
        assert_eq!(config.server.url.as_deref(), Some("https://localhost:9443"));
        assert_eq!(config.applications.exclude.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_merge_precedence() {
        let tmp = TempDir::new().unwrap();

        let global = tmp.path().join("global.toml");
        fs::write(
            &global,
            r#"
[server]
url = "https://dev.example.com"
tenant = "dev"

[keyword_mappings]
HOST = "dev.example.com"
PORT = "9443"

[applications]
include_only = ["AppA", "AppB"]
"#,
        )
        .unwrap();

        let cli = tmp.path().join("prod.toml");
        fs::write(
            &cli,
            r#"
[server]
url = "https://prod.example.com"

[keyword_mappings]
HOST = "prod.example.com"

[applications]
include_only = ["AppC"]
"#,
        )
        .unwrap();

        let files = ConfigFiles {
            cli: Some(cli),
            global: Some(global),
            ..ConfigFiles::default()
        };
        let config = ConfigMerger::merge(&files).unwrap();

        assert_eq!(config.server.url.as_deref(), Some("https://prod.example.com"));
        assert_eq!(config.server.tenant.as_deref(), Some("dev"));
        assert_eq!(config.keyword_mappings["HOST"], "prod.example.com");
        assert_eq!(config.keyword_mappings["PORT"], "9443");
        // Name lists replace rather than accumulate
        assert_eq!(config.applications.include_only, Some(vec!["AppC".to_string()]));
    }

    #[test]
    fn test_merge_resource_overrides() {
        let mut base = Config::default();
        let mut layer = Config::default();

        base.identity_providers
            .resources
            .entry("Google".to_string())
            .or_default()
            .keyword_mappings
            .insert("CLIENT_ID".to_string(), "dev-id".to_string());
        layer
            .identity_providers
            .resources
            .entry("Google".to_string())
            .or_default()
            .keyword_mappings
            .insert("CLIENT_SECRET".to_string(), "prod-secret".to_string());

        ConfigMerger::merge_layer(&mut base, layer);

        let google = &base.identity_providers.resources["Google"].keyword_mappings;
        assert_eq!(google["CLIENT_ID"], "dev-id");
        assert_eq!(google["CLIENT_SECRET"], "prod-secret");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let config_file = tmp.path().join("config.toml");
        fs::write(&config_file, "[applications]\nexlude = [\"A\"]\n").unwrap();

        let err = ConfigMerger::load_file(&config_file).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
