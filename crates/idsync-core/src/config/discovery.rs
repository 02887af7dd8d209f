//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

/// Project config file name, searched from the current directory upwards
pub const PROJECT_CONFIG: &str = ".idsync.toml";

/// Uncommitted project-local overrides, searched like [`PROJECT_CONFIG`]
pub const LOCAL_CONFIG: &str = ".idsync.local.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Project-local config (.idsync.local.toml)
    pub local: Option<PathBuf>,
    /// Project config (.idsync.toml)
    pub project: Option<PathBuf>,
    /// Global XDG config
    pub global: Option<PathBuf>,
}

impl ConfigFiles {
    /// Discovered files from lowest to highest precedence
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.global, &self.project, &self.local, &self.cli]
            .into_iter()
            .flatten()
    }
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// Returns a `ConfigFiles` struct with paths to discovered configs.
    pub fn discover(cli_path: Option<&Path>) -> ConfigFiles {
        let cli = cli_path.filter(|p| p.is_file()).map(Path::to_path_buf);

        let start = std::env::current_dir().ok();
        let local = start.as_deref().and_then(|dir| Self::find_file(dir, LOCAL_CONFIG));
        let project = start.as_deref().and_then(|dir| Self::find_file(dir, PROJECT_CONFIG));
        let global = Self::find_global_config();

        ConfigFiles {
            cli,
            local,
            project,
            global,
        }
    }

    /// Find a config file in `start` or its parent directories
    fn find_file(start: &Path, name: &str) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Find global config in XDG config directory
    fn find_global_config() -> Option<PathBuf> {
        let global_config = dirs::config_dir()?.join("idsync").join("config.toml");
        global_config.is_file().then_some(global_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_cli_config() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("prod.toml");
        fs::write(&cli_config, "# config").unwrap();

        let files = ConfigDiscovery::discover(Some(&cli_config));
        assert_eq!(files.cli, Some(cli_config));
    }

    #[test]
    fn test_discover_cli_config_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("nonexistent.toml");

        let files = ConfigDiscovery::discover(Some(&cli_config));
        assert!(files.cli.is_none());
    }

    #[test]
    fn test_find_file_searches_ancestors() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(PROJECT_CONFIG), "").unwrap();

        let found = ConfigDiscovery::find_file(&nested, PROJECT_CONFIG);
        assert_eq!(found, Some(tmp.path().join(PROJECT_CONFIG)));
        assert!(ConfigDiscovery::find_file(&nested, "absent.toml").is_none());
    }

    #[test]
    fn test_iter_orders_lowest_precedence_first() {
        let files = ConfigFiles {
            cli: Some(PathBuf::from("cli.toml")),
            local: None,
            project: Some(PathBuf::from("project.toml")),
            global: Some(PathBuf::from("global.toml")),
        };
        let order: Vec<_> = files.iter().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(order, vec!["global.toml", "project.toml", "cli.toml"]);
    }
}
