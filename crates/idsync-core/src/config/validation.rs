//! Configuration validation and error reporting

use super::types::{Config, TypeSection};
use crate::keywords::KeywordMapping;
use crate::resource::ResourceKind;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &Config) -> anyhow::Result<()> {
        Self::validate_mappings("keyword_mappings", &config.keyword_mappings)?;

        for kind in ResourceKind::ALL {
            let section = config.section(kind);
            let key = kind.config_key();

            Self::validate_names(key, "include_only", section.include_only.as_deref())?;
            Self::validate_names(key, "exclude", section.exclude.as_deref())?;
            Self::validate_mappings(&format!("{key}.keyword_mappings"), &section.keyword_mappings)?;

            for (name, resource) in &section.resources {
                if name.trim().is_empty() {
                    anyhow::bail!("{key}.resources has an entry with an empty name");
                }
                Self::validate_mappings(
                    &format!("{key}.resources.{name}.keyword_mappings"),
                    &resource.keyword_mappings,
                )?;
            }
        }

        Ok(())
    }

    /// Non-fatal observations about a configuration
    #[must_use]
    pub fn warnings(config: &Config) -> Vec<String> {
        let mut warnings = Vec::new();

        for kind in ResourceKind::ALL {
            let section = config.section(kind);
            for name in Self::overlap(section) {
                warnings.push(format!(
                    "{}: '{name}' is listed in both include_only and exclude; include_only takes precedence",
                    kind.config_key()
                ));
            }
        }

        warnings
    }

    fn overlap(section: &TypeSection) -> Vec<&str> {
        let (Some(include), Some(exclude)) = (&section.include_only, &section.exclude) else {
            return Vec::new();
        };
        include
            .iter()
            .filter(|name| exclude.contains(*name))
            .map(String::as_str)
            .collect()
    }

    fn validate_names(section: &str, field: &str, names: Option<&[String]>) -> anyhow::Result<()> {
        for name in names.unwrap_or_default() {
            if name.trim().is_empty() {
                anyhow::bail!("{section}.{field} contains an empty name");
            }
        }
        Ok(())
    }

    fn validate_mappings(scope: &str, mappings: &KeywordMapping) -> anyhow::Result<()> {
        for (key, value) in mappings {
            if !is_placeholder_key(key) {
                anyhow::bail!(
                    "{scope}: invalid keyword '{key}' (use letters, digits, and underscores, not starting with a digit)"
                );
            }
            if value.is_empty() {
                anyhow::bail!("{scope}: keyword '{key}' has an empty value");
            }
        }
        Ok(())
    }
}

/// Whether `key` can be written as a `{{.KEY}}` placeholder
fn is_placeholder_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
