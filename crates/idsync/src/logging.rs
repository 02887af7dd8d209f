//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber
///
/// `--verbose` and `--quiet` pin the level; otherwise `RUST_LOG` is honored
/// with `info` as the default.
pub fn init(verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::try_new("debug")?
    } else if quiet {
        EnvFilter::try_new("warn")?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}
