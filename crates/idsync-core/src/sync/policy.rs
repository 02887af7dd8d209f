//! Exclusion policy shared by export and import

use crate::config::ToolConfig;

/// Decides which resource names take part in a pass
pub struct ExclusionPolicy;

impl ExclusionPolicy {
    /// Whether `name` is filtered out for the type configured by `config`
    ///
    /// A non-empty `include_only` governs alone; `exclude` only applies when
    /// there is no include list. Names match exactly.
    #[must_use]
    pub fn is_excluded(name: &str, config: &ToolConfig) -> bool {
        if let Some(include_only) = &config.include_only
            && !include_only.is_empty()
        {
            return !include_only.contains(name);
        }

        config
            .exclude
            .as_ref()
            .is_some_and(|exclude| exclude.contains(name))
    }
}
