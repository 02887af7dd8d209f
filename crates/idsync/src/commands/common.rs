//! Common types and utilities for command execution

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use idsync_core::config::{Config, ConfigManager};
use idsync_core::error::Result;
use idsync_core::resource::ResourceKind;
use idsync_core::sync::{SyncEngine, SyncReporter, SyncResult};

/// Server settings given on the command line or through the environment
#[derive(Debug, Default)]
pub struct ServerOverrides {
    /// Replaces `[server].url`
    pub url: Option<String>,
    /// Replaces `[server].tenant`
    pub tenant: Option<String>,
    /// Replaces `[server].token`
    pub token: Option<String>,
}

impl ServerOverrides {
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.server.url = Some(url.clone());
        }
        if let Some(tenant) = &self.tenant {
            config.server.tenant = Some(tenant.clone());
        }
        if let Some(token) = &self.token {
            config.server.token = Some(token.clone());
        }
    }
}

/// Execution options for sync commands
pub struct SyncOptions<'a> {
    /// Preview changes without applying (dry-run)
    pub dry_run: bool,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
    /// Skip loading all config files
    pub no_config: bool,
    /// Command-line server settings
    pub server: ServerOverrides,
    /// Set by the Ctrl+C handler
    pub interrupt: Arc<AtomicBool>,
}

impl SyncOptions<'_> {
    /// Load configuration files and apply command-line overrides
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = ConfigManager::load(self.config_path, self.no_config)
            .context("Failed to load configuration")?;
        self.server.apply(&mut config);
        Ok(config)
    }

    /// Build the engine for one resource type
    pub fn engine(&self, config: &Config, kind: ResourceKind) -> SyncEngine {
        SyncEngine::new(config.tool_config(kind))
            .with_dry_run(self.dry_run)
            .with_interrupt(Arc::clone(&self.interrupt))
    }

    /// Run one pass per kind, printing a summary after each
    ///
    /// A failed pass does not stop the remaining kinds, except an
    /// authentication failure, which aborts the run. Returns whether every
    /// pass completed without failures.
    pub fn run_passes<F>(&self, kinds: &[ResourceKind], mut pass: F) -> anyhow::Result<bool>
    where
        F: FnMut(ResourceKind) -> Result<SyncResult>,
    {
        let mut success = true;

        for &kind in kinds {
            if self.interrupt.load(Ordering::SeqCst) {
                tracing::warn!(kind = %kind, "interrupted, skipping remaining resource types");
                return Ok(false);
            }

            match pass(kind) {
                Ok(result) => {
                    println!("{}", SyncReporter::generate_summary(kind, &result));
                    success &= result.is_success();
                }
                Err(e) if e.is_auth() => {
                    return Err(anyhow::Error::new(e))
                        .with_context(|| format!("Authentication failed while listing {kind}"));
                }
                Err(e) => {
                    tracing::error!(kind = %kind, error = %e, "pass aborted");
                    success = false;
                }
            }
        }

        Ok(success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idsync_core::error::SyncError;

    fn options() -> SyncOptions<'static> {
        SyncOptions {
            dry_run: false,
            config_path: None,
            no_config: true,
            server: ServerOverrides::default(),
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut options = options();
        options.server.url = Some("https://cli.example.com".to_string());
        options.server.token = Some("cli-token".to_string());

        let config = options.load_config().unwrap();
        assert_eq!(config.server.url.as_deref(), Some("https://cli.example.com"));
        assert_eq!(config.server.token.as_deref(), Some("cli-token"));
        assert!(config.server.tenant.is_none());
    }

    #[test]
    fn test_run_passes_continues_after_pass_failure() {
        let options = options();
        let mut seen = Vec::new();

        let success = options
            .run_passes(&ResourceKind::ALL, |kind| {
                seen.push(kind);
                if kind == ResourceKind::Applications {
                    Err(SyncError::Server {
                        resource: kind.dir_name().to_string(),
                    })
                } else {
                    Ok(SyncResult::default())
                }
            })
            .unwrap();

        assert!(!success);
        assert_eq!(seen, ResourceKind::ALL.to_vec());
    }

    #[test]
    fn test_run_passes_aborts_on_auth_failure() {
        let options = options();
        let mut seen = Vec::new();

        let result = options.run_passes(&ResourceKind::ALL, |kind| {
            seen.push(kind);
            Err(SyncError::Auth {
                resource: kind.dir_name().to_string(),
                status: 401,
            })
        });

        assert!(result.is_err());
        assert_eq!(seen, vec![ResourceKind::Applications]);
    }

    #[test]
    fn test_run_passes_stops_when_interrupted() {
        let options = options();
        options.interrupt.store(true, Ordering::SeqCst);

        let success = options
            .run_passes(&ResourceKind::ALL, |_| Ok(SyncResult::default()))
            .unwrap();
        assert!(!success);
    }
}
