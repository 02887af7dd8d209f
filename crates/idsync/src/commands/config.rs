use anyhow::Context;
use idsync_core::config::ConfigDiscovery;

use crate::commands::SyncOptions;

pub struct Config;

impl Config {
    /// Print discovered config files and the merged result
    pub fn execute(options: &SyncOptions) -> anyhow::Result<()> {
        if !options.no_config {
            let files = ConfigDiscovery::discover(options.config_path);
            for path in files.iter() {
                println!("# layer: {}", path.display());
            }
        }

        let config = options.load_config()?;
        let rendered = toml::to_string_pretty(&config.redacted())
            .context("Failed to render configuration")?;
        println!("{rendered}");
        Ok(())
    }
}
