//! # idsync-core
//!
//! Core library for identity server configuration synchronization.
//!
//! This library keeps declarative, file-based copies of applications,
//! identity providers, and user stores in step with a live server's REST
//! API. Exported files are made portable across environments by swapping
//! environment-specific literals for `{{.KEY}}` placeholders, and imports
//! swap them back before pushing.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error taxonomy shared by handlers and the reconciliation engine
pub mod error;

/// Configuration file discovery, parsing, merging, and validation
pub mod config;

/// Resource kinds, formats, and local/remote resource descriptors
pub mod resource;

/// Keyword mapping resolution and placeholder substitution
pub mod keywords;

/// Per-type remote operations and the REST-backed implementation
pub mod handler;

/// Export and import reconciliation passes
pub mod sync;
