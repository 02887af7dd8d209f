pub mod common;
pub mod config;
pub mod export;
pub mod import;

pub use common::{ServerOverrides, SyncOptions};
pub use config::Config;
pub use export::Export;
pub use import::Import;
