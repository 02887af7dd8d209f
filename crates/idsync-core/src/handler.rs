//! Per-type remote operations
//!
//! The reconciliation engine only talks to the server through
//! [`ResourceHandler`]. [`RestHandler`] implements it over the server's REST
//! API; tests substitute a recording double.

mod client;
mod rest;
mod status;

pub use client::ServerClient;
pub use rest::{RestHandler, parse_content_disposition, parse_list};
pub use status::ApiStatus;

use crate::error::Result;
use crate::resource::{Format, RemoteResource, ResourceKind};

/// Exported file as delivered by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// File name to write under the type directory
    pub file_name: String,
    /// Raw file content, before keyword substitution
    pub content: String,
}

/// A local file ready to be pushed to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceUpload<'a> {
    /// Resource name, used for error attribution
    pub name: &'a str,
    /// File name sent in the multipart body
    pub file_name: &'a str,
    /// Content format, selects the part's content type
    pub format: Format,
    /// Content with placeholders already filled
    pub content: &'a str,
}

/// Remote operations for one resource type
pub trait ResourceHandler {
    /// Resource type served by this handler
    fn kind(&self) -> ResourceKind;

    /// Enumerate deployed resources in server order
    fn list(&self) -> Result<Vec<RemoteResource>>;

    /// Download one resource in the requested format
    fn export(
        &self,
        resource: &RemoteResource,
        format: Format,
        exclude_secrets: bool,
    ) -> Result<ExportedFile>;

    /// Create a new resource from a file
    fn create(&self, upload: &ResourceUpload<'_>) -> Result<()>;

    /// Replace an existing resource with a file
    fn update(&self, id: &str, upload: &ResourceUpload<'_>) -> Result<()>;

    /// Remove a deployed resource
    fn delete(&self, resource: &RemoteResource) -> Result<()>;

    /// Entries that always exist but are never returned by [`Self::list`]
    fn synthetic_entries(&self) -> Vec<RemoteResource> {
        self.kind().synthetic_entries()
    }

    /// Field in file content that declares the resource name
    fn identifying_field(&self) -> &'static str {
        self.kind().identifying_field()
    }
}
