//! Resource type descriptions
//!
//! Each kind is described by data (endpoint, directory, identifying field,
//! list envelope, synthetic entries) so the engine runs one algorithm for all.

use serde::{Deserialize, Serialize};

use super::RemoteResource;

/// Id and name of the resident identity provider, which the list endpoint never returns
pub const RESIDENT_IDP: &str = "LOCAL";

/// Server resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// Service provider applications
    Applications,
    /// Federated identity providers
    IdentityProviders,
    /// Secondary user stores
    UserStores,
}

impl ResourceKind {
    /// All kinds in processing order
    pub const ALL: [Self; 3] = [
        Self::Applications,
        Self::IdentityProviders,
        Self::UserStores,
    ];

    /// Path segment under `/api/server/v1/`
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::IdentityProviders => "identity-providers",
            Self::UserStores => "userstores",
        }
    }

    /// Directory holding this kind's files under the local root
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Applications => "Applications",
            Self::IdentityProviders => "IdentityProviders",
            Self::UserStores => "UserStores",
        }
    }

    /// Field inside file content that declares the resource name
    #[must_use]
    pub const fn identifying_field(self) -> &'static str {
        match self {
            Self::Applications => "applicationName",
            Self::IdentityProviders => "identityProviderName",
            Self::UserStores => "name",
        }
    }

    /// Section of the configuration file holding this kind's settings
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::IdentityProviders => "identity_providers",
            Self::UserStores => "user_stores",
        }
    }

    /// Field of the list response wrapping the summaries; `None` for a bare array
    #[must_use]
    pub const fn list_envelope(self) -> Option<&'static str> {
        match self {
            Self::Applications => Some("applications"),
            Self::IdentityProviders => Some("identityProviders"),
            Self::UserStores => None,
        }
    }

    /// Always-present entries that enumeration does not return
    #[must_use]
    pub fn synthetic_entries(self) -> Vec<RemoteResource> {
        match self {
            Self::IdentityProviders => vec![RemoteResource::new(RESIDENT_IDP, RESIDENT_IDP)],
            Self::Applications | Self::UserStores => Vec::new(),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}
