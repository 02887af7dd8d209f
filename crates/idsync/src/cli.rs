use clap::{Parser, Subcommand, ValueEnum};
use idsync_core::resource::ResourceKind;
use std::path::PathBuf;

/// Identity Server Configuration Synchronization Tool
///
/// Export applications, identity providers, and user stores from a live server
/// into portable files, and import them back into any environment
#[derive(Parser, Debug)]
#[command(name = "idsync")]
#[command(
    about = "Identity Server Configuration Synchronization Tool",
    long_about = None,
    version
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Preview changes without executing (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Use specific config file (e.g. an environment profile)
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "IDSYNC_CONFIG",
        conflicts_with = "no_config"
    )]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Server base URL, overrides [server].url
    #[arg(long, global = true, value_name = "URL", env = "IDSYNC_SERVER_URL")]
    pub server_url: Option<String>,

    /// Tenant domain, overrides [server].tenant
    #[arg(long, global = true, value_name = "TENANT", env = "IDSYNC_TENANT")]
    pub tenant: Option<String>,

    /// Bearer token, overrides [server].token
    #[arg(
        long,
        global = true,
        value_name = "TOKEN",
        env = "IDSYNC_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download deployed resources into local files
    Export {
        /// Root directory; one subdirectory per resource type is written
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,

        /// File format: yaml, json, or xml (unrecognized values mean yaml)
        #[arg(short, long, default_value = "yaml")]
        format: String,

        /// Filter by resource type(s)
        #[arg(short = 't', long = "type", value_enum)]
        types: Vec<ResourceType>,
    },

    /// Push local files to the server
    Import {
        /// Root directory holding one subdirectory per resource type
        #[arg(short, long = "in", value_name = "DIR", default_value = ".")]
        input: PathBuf,

        /// Filter by resource type(s)
        #[arg(short = 't', long = "type", value_enum)]
        types: Vec<ResourceType>,
    },

    /// Show the merged configuration (token redacted)
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceType {
    /// Service provider applications
    Applications,
    /// Identity providers, including the resident provider
    IdentityProviders,
    /// Secondary user stores
    UserStores,
    /// All resource types
    All,
}

impl ResourceType {
    /// Expand a type filter into kinds in processing order
    ///
    /// An empty filter selects every kind.
    pub fn expand(types: &[Self]) -> Vec<ResourceKind> {
        if types.is_empty() || types.contains(&Self::All) {
            return ResourceKind::ALL.to_vec();
        }
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| {
                types.iter().any(|t| match t {
                    Self::Applications => *kind == ResourceKind::Applications,
                    Self::IdentityProviders => *kind == ResourceKind::IdentityProviders,
                    Self::UserStores => *kind == ResourceKind::UserStores,
                    Self::All => true,
                })
            })
            .collect()
    }
}
