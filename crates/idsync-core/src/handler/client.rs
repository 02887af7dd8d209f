//! Blocking HTTP client bound to one server and tenant

use anyhow::Context;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};

use crate::config::ServerSettings;
use crate::resource::ResourceKind;

/// Shared connection to the server's management API
///
/// One client is built per run and shared by every type's handler.
pub struct ServerClient {
    http: Client,
    base: Url,
    token: String,
}

impl ServerClient {
    /// Build a client from resolved settings
    ///
    /// # Errors
    ///
    /// Returns an error if the url cannot be parsed or the TLS backend
    /// cannot be initialized.
    pub fn new(settings: &ServerSettings) -> anyhow::Result<Self> {
        let mut base = Url::parse(&settings.url)
            .with_context(|| format!("Invalid server url: {}", settings.url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("Invalid server url: {}", settings.url);
        }
        if let Ok(mut segments) = base.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["t", settings.tenant.as_str(), "api", "server", "v1"]);
        }

        let http = Client::builder()
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .timeout(settings.timeout)
            .build()
            .context("Failed to initialize HTTP client")?;

        Ok(Self {
            http,
            base,
            token: settings.token.clone(),
        })
    }

    /// Endpoint URL for a resource type with extra path segments appended
    #[must_use]
    pub fn endpoint(&self, kind: ResourceKind, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.push(kind.endpoint()).extend(segments);
        }
        url
    }

    /// Authenticated GET request
    pub fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.token)
    }

    /// Authenticated POST request
    pub fn post(&self, url: Url) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.token)
    }

    /// Authenticated PUT request
    pub fn put(&self, url: Url) -> RequestBuilder {
        self.http.put(url).bearer_auth(&self.token)
    }

    /// Authenticated DELETE request
    pub fn delete(&self, url: Url) -> RequestBuilder {
        self.http.delete(url).bearer_auth(&self.token)
    }
}
