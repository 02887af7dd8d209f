use std::path::Path;

use anyhow::Context;
use idsync_core::handler::{RestHandler, ServerClient};
use idsync_core::resource::Format;

use crate::cli::ResourceType;
use crate::commands::SyncOptions;

pub struct Export;

impl Export {
    /// Export every selected type into `out/<TypeDir>`
    pub fn execute(
        out: &Path,
        format: &str,
        types: &[ResourceType],
        options: &SyncOptions,
    ) -> anyhow::Result<bool> {
        let config = options.load_config()?;
        let settings = config.server_settings()?;
        let client = ServerClient::new(&settings).context("Failed to create server client")?;

        let format = Format::parse_lossy(format);
        let kinds = ResourceType::expand(types);
        tracing::info!(
            server = %settings.url,
            tenant = %settings.tenant,
            out = %out.display(),
            %format,
            dry_run = options.dry_run,
            "exporting"
        );

        options.run_passes(&kinds, |kind| {
            let handler = RestHandler::new(kind, &client);
            options
                .engine(&config, kind)
                .export(&handler, &out.join(kind.dir_name()), format)
        })
    }
}
