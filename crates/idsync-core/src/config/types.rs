//! Configuration types and structures

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordMapping;
use crate::resource::ResourceKind;

/// Tenant used when none is configured
pub const DEFAULT_TENANT: &str = "carbon.super";

/// Server connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL, e.g. `https://localhost:9443`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Tenant domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,

    /// Bearer token sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Skip TLS certificate verification (self-signed dev servers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_invalid_certs: Option<bool>,

    /// Per-request deadline in seconds; unset means no deadline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Per-resource settings inside a type section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ResourceSection {
    /// Keyword mappings overriding the type's mappings for this resource
    #[serde(default)]
    pub keyword_mappings: KeywordMapping,
}

/// Settings for one resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TypeSection {
    /// Only these resources are synced (when non-empty)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_only: Option<Vec<String>>,

    /// Resources never synced (ignored when `include_only` is non-empty)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// Delete deployed resources with no local file on import
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_delete: Option<bool>,

    /// Ask the server to mask secrets on export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_secrets: Option<bool>,

    /// Keyword mappings for every resource of this type
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keyword_mappings: KeywordMapping,

    /// Per-resource settings keyed by resource name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, ResourceSection>,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default for every type's `allow_delete`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_delete: Option<bool>,

    /// Default for every type's `exclude_secrets`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_secrets: Option<bool>,

    /// Server connection
    #[serde(default)]
    pub server: ServerConfig,

    /// Keyword mappings shared by all types
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keyword_mappings: KeywordMapping,

    /// Application settings
    #[serde(default)]
    pub applications: TypeSection,

    /// Identity provider settings
    #[serde(default)]
    pub identity_providers: TypeSection,

    /// User store settings
    #[serde(default)]
    pub user_stores: TypeSection,
}

/// Resolved per-type settings consumed by the sync engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolConfig {
    /// Only these names are synced; `None` or empty means no restriction
    pub include_only: Option<BTreeSet<String>>,
    /// Names never synced
    pub exclude: Option<BTreeSet<String>>,
    /// Delete deployed resources with no local file on import
    pub allow_delete: bool,
    /// Ask the server to mask secrets on export
    pub exclude_secrets: bool,
    /// Mappings applying to every resource of the type
    pub keyword_mappings: KeywordMapping,
    /// Resource name to mappings overriding `keyword_mappings`
    pub resource_overrides: BTreeMap<String, KeywordMapping>,
}

/// Resolved server connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Base URL without trailing slash
    pub url: String,
    /// Tenant domain
    pub tenant: String,
    /// Bearer token
    pub token: String,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Per-request deadline
    pub timeout: Option<Duration>,
}

impl Config {
    /// Section for a resource type
    #[must_use]
    pub const fn section(&self, kind: ResourceKind) -> &TypeSection {
        match kind {
            ResourceKind::Applications => &self.applications,
            ResourceKind::IdentityProviders => &self.identity_providers,
            ResourceKind::UserStores => &self.user_stores,
        }
    }

    /// Mutable section for a resource type
    pub const fn section_mut(&mut self, kind: ResourceKind) -> &mut TypeSection {
        match kind {
            ResourceKind::Applications => &mut self.applications,
            ResourceKind::IdentityProviders => &mut self.identity_providers,
            ResourceKind::UserStores => &mut self.user_stores,
        }
    }

    /// Derive the engine settings for one resource type
    ///
    /// Type-level keyword mappings are laid over the global ones; flags fall
    /// back to the global defaults (`allow_delete = false`,
    /// `exclude_secrets = true`).
    #[must_use]
    pub fn tool_config(&self, kind: ResourceKind) -> ToolConfig {
        let section = self.section(kind);

        let mut keyword_mappings = self.keyword_mappings.clone();
        keyword_mappings.extend(
            section
                .keyword_mappings
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let resource_overrides = section
            .resources
            .iter()
            .filter(|(_, resource)| !resource.keyword_mappings.is_empty())
            .map(|(name, resource)| (name.clone(), resource.keyword_mappings.clone()))
            .collect();

        ToolConfig {
            include_only: section
                .include_only
                .as_ref()
                .map(|names| names.iter().cloned().collect()),
            exclude: section
                .exclude
                .as_ref()
                .map(|names| names.iter().cloned().collect()),
            allow_delete: section.allow_delete.or(self.allow_delete).unwrap_or(false),
            exclude_secrets: section
                .exclude_secrets
                .or(self.exclude_secrets)
                .unwrap_or(true),
            keyword_mappings,
            resource_overrides,
        }
    }

    /// Resolve server connection settings
    ///
    /// # Errors
    ///
    /// Returns an error if the url or token is missing, or the url is not http(s).
    pub fn server_settings(&self) -> anyhow::Result<ServerSettings> {
        let Some(url) = self.server.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
        else {
            anyhow::bail!("Server url is not configured (set [server].url or IDSYNC_SERVER_URL)");
        };
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            anyhow::bail!("Server url must start with http:// or https://: {url}");
        }

        let Some(token) = self.server.token.as_deref().filter(|t| !t.trim().is_empty()) else {
            anyhow::bail!("Access token is not configured (set [server].token or IDSYNC_TOKEN)");
        };

        let tenant = self
            .server
            .tenant
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TENANT);

        Ok(ServerSettings {
            url: url.trim_end_matches('/').to_string(),
            tenant: tenant.to_string(),
            token: token.to_string(),
            accept_invalid_certs: self.server.accept_invalid_certs.unwrap_or(false),
            timeout: self.server.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Copy with the access token masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.server.token.is_some() {
            copy.server.token = Some("********".to_string());
        }
        copy
    }
}
