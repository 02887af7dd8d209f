//! Per-resource keyword mapping resolution

use super::KeywordMapping;
use crate::config::ToolConfig;

/// Merges global and resource-specific keyword mappings
pub struct KeywordResolver;

impl KeywordResolver {
    /// Resolve the mapping for one resource
    ///
    /// Starts from the type's global mappings; entries of
    /// `resource_overrides[resource]` replace global values with the same
    /// key, and global keys the override does not mention are kept.
    #[must_use]
    pub fn resolve(resource: &str, config: &ToolConfig) -> KeywordMapping {
        let mut mapping = config.keyword_mappings.clone();

        if let Some(overrides) = config.resource_overrides.get(resource) {
            for (key, value) in overrides {
                mapping.insert(key.clone(), value.clone());
            }
        }

        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(entries: &[(&str, &str)]) -> KeywordMapping {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_without_overrides_returns_global() {
        let config = ToolConfig {
            keyword_mappings: mapping(&[("SERVER_HOST", "https://prod.example.com")]),
            ..ToolConfig::default()
        };

        let resolved = KeywordResolver::resolve("AppA", &config);
        assert_eq!(resolved, config.keyword_mappings);
    }

    #[test]
    fn test_override_replaces_key_and_keeps_others() {
        let mut config = ToolConfig {
            keyword_mappings: mapping(&[
                ("SERVER_HOST", "https://prod.example.com"),
                ("CALLBACK", "https://prod.example.com/cb"),
            ]),
            ..ToolConfig::default()
        };
        config.resource_overrides.insert(
            "AppA".to_string(),
            mapping(&[
                ("SERVER_HOST", "https://appa.example.com"),
                ("TENANT", "appa.com"),
            ]),
        );

        let resolved = KeywordResolver::resolve("AppA", &config);
        assert_eq!(resolved["SERVER_HOST"], "https://appa.example.com");
        assert_eq!(resolved["CALLBACK"], "https://prod.example.com/cb");
        assert_eq!(resolved["TENANT"], "appa.com");
        assert_eq!(resolved.len(), 3);

        // Other resources only see the global mapping
        let other = KeywordResolver::resolve("AppB", &config);
        assert_eq!(other["SERVER_HOST"], "https://prod.example.com");
        assert!(!other.contains_key("TENANT"));
    }
}
