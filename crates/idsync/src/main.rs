mod cli;
mod commands;
mod logging;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::{ServerOverrides, SyncOptions};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet)?;

    // First Ctrl+C stops after the current resource; a second one exits
    let interrupt = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupt);
    ctrlc::set_handler(move || {
        if handler_flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130); // Standard exit code for SIGINT
        }
        eprintln!("\nInterrupted, finishing the current resource (Ctrl+C again to abort)");
    })
    .context("Failed to set Ctrl+C handler")?;

    let options = SyncOptions {
        dry_run: cli.dry_run,
        config_path: cli.config.as_deref(),
        no_config: cli.no_config,
        server: ServerOverrides {
            url: cli.server_url.clone(),
            tenant: cli.tenant.clone(),
            token: cli.token.clone(),
        },
        interrupt,
    };

    let success = match &cli.command {
        Commands::Export { out, format, types } => {
            commands::Export::execute(out, format, types, &options)
                .context("Failed to execute export command")?
        }
        Commands::Import { input, types } => commands::Import::execute(input, types, &options)
            .context("Failed to execute import command")?,
        Commands::Config => {
            commands::Config::execute(&options).context("Failed to execute config command")?;
            true
        }
    };

    if !success {
        std::process::exit(1);
    }

    Ok(())
}
