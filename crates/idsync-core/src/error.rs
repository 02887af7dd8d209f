//! Error types for resource synchronization
//!
//! Every variant names the resource it is attributed to so that failures
//! stay triageable across a batch of many resources.

use std::path::PathBuf;

/// Result type alias using [`SyncError`]
pub type Result<T> = std::result::Result<T, SyncError>;

/// Failure of a single remote or local resource operation
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Network or connection failure
    #[error("{resource}: transport failure: {message}")]
    Transport {
        /// Resource the request was issued for
        resource: String,
        /// Underlying transport error message
        message: String,
    },

    /// 401 or 403 from the server
    #[error("{resource}: {} (HTTP {status})", auth_label(.status))]
    Auth {
        /// Resource the request was issued for
        resource: String,
        /// Status code returned
        status: u16,
    },

    /// 400 from the server
    #[error("{resource}: request was malformed (HTTP 400)")]
    BadRequest {
        /// Resource the request was issued for
        resource: String,
    },

    /// 404 from the server
    #[error("{resource}: not found on the server (HTTP 404)")]
    NotFound {
        /// Resource the request was issued for
        resource: String,
    },

    /// 409 from the server: a resource with the same name already exists
    #[error("{resource}: a resource with the same name already exists (HTTP 409)")]
    Conflict {
        /// Resource the request was issued for
        resource: String,
    },

    /// 500 from the server
    #[error("{resource}: internal server error (HTTP 500)")]
    Server {
        /// Resource the request was issued for
        resource: String,
    },

    /// Any status outside the known taxonomy
    #[error("{resource}: unexpected response status {status}")]
    UnexpectedStatus {
        /// Resource the request was issued for
        resource: String,
        /// Status code returned
        status: u16,
    },

    /// Malformed local file or remote payload
    #[error("{resource}: invalid content: {message}")]
    Validation {
        /// Resource the content belongs to
        resource: String,
        /// What was wrong with it
        message: String,
    },

    /// Unresolved placeholder or malformed template expression
    #[error("{resource}: cannot resolve template token '{token}'")]
    Template {
        /// Resource being imported
        resource: String,
        /// Offending token as written in the file
        token: String,
    },

    /// Failure while removing a deployed resource with no local counterpart
    #[error("{resource}: delete failed: {source}")]
    Delete {
        /// Resource being deleted
        resource: String,
        /// Cause reported by the handler
        #[source]
        source: Box<SyncError>,
    },

    /// Local filesystem failure
    #[error("{resource}: I/O error at {}: {source}", path.display())]
    Io {
        /// Resource the file belongs to
        resource: String,
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

fn auth_label(status: &u16) -> &'static str {
    if *status == 401 { "unauthorized" } else { "forbidden" }
}

impl SyncError {
    /// Name of the resource this error is attributed to
    #[must_use]
    pub fn resource(&self) -> &str {
        match self {
            Self::Transport { resource, .. }
            | Self::Auth { resource, .. }
            | Self::BadRequest { resource }
            | Self::NotFound { resource }
            | Self::Conflict { resource }
            | Self::Server { resource }
            | Self::UnexpectedStatus { resource, .. }
            | Self::Validation { resource, .. }
            | Self::Template { resource, .. }
            | Self::Delete { resource, .. }
            | Self::Io { resource, .. } => resource,
        }
    }

    /// Whether the server rejected our credentials
    #[must_use]
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Auth { .. } => true,
            Self::Delete { source, .. } => source.is_auth(),
            _ => false,
        }
    }

    /// Whether this is a create-time name conflict
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
