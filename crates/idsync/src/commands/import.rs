use std::path::Path;

use anyhow::Context;
use idsync_core::handler::{RestHandler, ServerClient};

use crate::cli::ResourceType;
use crate::commands::SyncOptions;

pub struct Import;

impl Import {
    /// Import every selected type from `input/<TypeDir>`
    pub fn execute(
        input: &Path,
        types: &[ResourceType],
        options: &SyncOptions,
    ) -> anyhow::Result<bool> {
        let config = options.load_config()?;
        let settings = config.server_settings()?;
        let client = ServerClient::new(&settings).context("Failed to create server client")?;

        let kinds = ResourceType::expand(types);
        tracing::info!(
            server = %settings.url,
            tenant = %settings.tenant,
            input = %input.display(),
            dry_run = options.dry_run,
            "importing"
        );

        options.run_passes(&kinds, |kind| {
            let handler = RestHandler::new(kind, &client);
            options
                .engine(&config, kind)
                .import(&handler, &input.join(kind.dir_name()))
        })
    }
}
