//! Content formats supported by the export and import endpoints

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Serialized form of a resource file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// YAML (default)
    #[default]
    Yaml,
    /// JSON
    Json,
    /// XML
    Xml,
}

impl Format {
    /// Parse a user-supplied format name, falling back to yaml
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "xml" => Self::Xml,
            _ => Self::Yaml,
        }
    }

    /// Detect the format from a file extension
    ///
    /// Returns `None` for extensions that are not resource files.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// Media type used for `accept` and multipart part headers
    #[must_use]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Yaml => "application/yaml",
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }

    /// Extension written for exported files when the server does not name them
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yml",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Xml => "xml",
        })
    }
}
