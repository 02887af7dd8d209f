//! Resource kinds, content formats, and the descriptors the engine works on
//!
//! This module provides:
//! - `ResourceKind`: data-driven description of each server resource type
//! - `Format`: yaml/json/xml content formats with media types and extensions
//! - Local file enumeration for one type directory (flat scan)
//! - Identifying-field extraction from file content

mod format;
mod identity;
mod kind;
mod local;

pub use format::Format;
pub use identity::declared_name;
pub use kind::ResourceKind;
pub use local::{LocalResourceFile, LocalScan, scan_directory};

/// Summary of a deployed resource as reported by the list endpoint
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct RemoteResource {
    /// Server-assigned identifier
    pub id: String,
    /// Display name, matched against file-derived names
    pub name: String,
}

impl RemoteResource {
    /// Build a summary from borrowed parts
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A resource as seen by one sync pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Resource type
    pub kind: ResourceKind,
    /// Remote id when the resource is known to be deployed
    pub remote_id: Option<String>,
    /// File basename on import, server-reported name on export
    pub name: String,
    /// Content format
    pub format: Format,
}
