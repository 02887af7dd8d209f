//! REST-backed handler
//!
//! Endpoints, relative to `{base}/t/{tenant}/api/server/v1/{type}`:
//! - `GET` list
//! - `GET {id}/exportFile` with `accept` selecting the format
//! - `POST import` / `PUT {id}/import` with one multipart `file` field
//! - `DELETE {id}`

use std::path::Path;

use reqwest::blocking::Response;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};

use super::client::ServerClient;
use super::status::ApiStatus;
use super::{ExportedFile, ResourceHandler, ResourceUpload};
use crate::error::{Result, SyncError};
use crate::resource::{Format, RemoteResource, ResourceKind};

/// Handler for one resource type backed by the server's REST API
pub struct RestHandler<'a> {
    kind: ResourceKind,
    client: &'a ServerClient,
}

impl<'a> RestHandler<'a> {
    /// Create a handler for `kind` sharing `client`
    #[must_use]
    pub const fn new(kind: ResourceKind, client: &'a ServerClient) -> Self {
        Self { kind, client }
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder, resource: &str) -> Result<Response> {
        let response = request.send().map_err(|e| transport(resource, &e))?;
        let status = ApiStatus::from_code(response.status().as_u16());
        tracing::debug!(
            kind = %self.kind,
            resource,
            status = response.status().as_u16(),
            "server responded"
        );
        status.into_result(resource)?;
        Ok(response)
    }

    fn upload_form(upload: &ResourceUpload<'_>) -> Result<Form> {
        let part = Part::text(upload.content.to_string())
            .file_name(upload.file_name.to_string())
            .mime_str(upload.format.media_type())
            .map_err(|e| transport(upload.name, &e))?;
        Ok(Form::new().part("file", part))
    }
}

impl ResourceHandler for RestHandler<'_> {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn list(&self) -> Result<Vec<RemoteResource>> {
        let label = self.kind.dir_name();
        let url = self.client.endpoint(self.kind, &[]);
        let response = self.send(self.client.get(url).header(ACCEPT, "application/json"), label)?;
        let body = response.text().map_err(|e| transport(label, &e))?;
        parse_list(self.kind, &body)
    }

    fn export(
        &self,
        resource: &RemoteResource,
        format: Format,
        exclude_secrets: bool,
    ) -> Result<ExportedFile> {
        let url = self
            .client
            .endpoint(self.kind, &[resource.id.as_str(), "exportFile"]);
        let request = self
            .client
            .get(url)
            .query(&[("excludeSecrets", exclude_secrets)])
            .header(ACCEPT, format.media_type());
        let response = self.send(request, &resource.name)?;

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_disposition)
            .unwrap_or_else(|| fallback_file_name(&resource.name, format));

        let content = response.text().map_err(|e| transport(&resource.name, &e))?;
        Ok(ExportedFile { file_name, content })
    }

    fn create(&self, upload: &ResourceUpload<'_>) -> Result<()> {
        let url = self.client.endpoint(self.kind, &["import"]);
        let form = Self::upload_form(upload)?;
        self.send(self.client.post(url).multipart(form), upload.name)?;
        Ok(())
    }

    fn update(&self, id: &str, upload: &ResourceUpload<'_>) -> Result<()> {
        let url = self.client.endpoint(self.kind, &[id, "import"]);
        let form = Self::upload_form(upload)?;
        self.send(self.client.put(url).multipart(form), upload.name)?;
        Ok(())
    }

    fn delete(&self, resource: &RemoteResource) -> Result<()> {
        let url = self.client.endpoint(self.kind, &[resource.id.as_str()]);
        self.send(self.client.delete(url), &resource.name)?;
        Ok(())
    }
}

fn transport(resource: &str, err: &reqwest::Error) -> SyncError {
    SyncError::Transport {
        resource: resource.to_string(),
        message: err.to_string(),
    }
}

/// Decode a list response body for `kind`
///
/// Accepts either the kind's envelope object or a bare array. A missing
/// envelope field means nothing is deployed.
///
/// # Errors
///
/// Returns `SyncError::Validation` if the body is not the expected JSON.
pub fn parse_list(kind: ResourceKind, body: &str) -> Result<Vec<RemoteResource>> {
    let invalid = |message: String| SyncError::Validation {
        resource: kind.dir_name().to_string(),
        message,
    };

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| invalid(format!("unparsable list response: {e}")))?;

    let items = match (kind.list_envelope(), value) {
        (_, serde_json::Value::Array(items)) => items,
        (Some(field), serde_json::Value::Object(mut object)) => match object.remove(field) {
            Some(serde_json::Value::Array(items)) => items,
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(_) => return Err(invalid(format!("'{field}' is not an array"))),
        },
        (_, other) => {
            return Err(invalid(format!(
                "expected a list of resources, got {}",
                json_kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| invalid(format!("bad list entry: {e}")))
        })
        .collect()
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Extract the `filename` parameter of a content-disposition header
///
/// Directory components are stripped so a server-supplied name can never
/// escape the output directory.
#[must_use]
pub fn parse_content_disposition(header: &str) -> Option<String> {
    header_params(header)
        .into_iter()
        .filter_map(|param| param.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("filename"))
        .map(|(_, value)| unquote(value.trim()))
        .and_then(|name| {
            Path::new(&name)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
        })
        .filter(|name| !name.is_empty())
}

/// File name used when the server does not supply one
fn fallback_file_name(name: &str, format: Format) -> String {
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}.{}", format.extension())
}

/// Split header parameters on `;` outside quoted strings
fn header_params(header: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&header[start..]);
    params
}

fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"') else {
        return value.to_string();
    };
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
