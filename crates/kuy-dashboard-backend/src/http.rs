//! `reqwest` client for the dashboard REST API.

use std::time::Duration;

use kuy_dashboard_core::{Entity, EntityKey};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::BackendError;
use crate::traits::RemoteResource;
use crate::upload::{image_part, Attachment, ImageUploader};

/// Default API origin of a local backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Shared HTTP client: origin, bearer token, and connection pool.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attaches `Authorization: Bearer <token>` to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// The collection at `endpoint`.
    pub fn resource(&self, endpoint: impl Into<String>) -> HttpResource {
        HttpResource {
            client: self.clone(),
            endpoint: endpoint.into(),
        }
    }

    /// Image uploads for the collection at `endpoint`.
    pub fn uploader(&self, endpoint: impl Into<String>) -> ImageUploader {
        ImageUploader::new(self.clone(), endpoint)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends `request` and maps non-2xx statuses to [`BackendError`].
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        resource: &str,
        key: Option<&EntityKey>,
    ) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(resource, error = %e, "request failed");
            BackendError::Transport {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        tracing::debug!(resource, status = status.as_u16(), "response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        tracing::warn!(resource, status = status.as_u16(), %message, "request rejected");
        Err(BackendError::from_status(
            status.as_u16(),
            message,
            resource,
            key,
        ))
    }

    /// GETs `path` and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self.send(self.request(Method::GET, path), path, None).await?;
        self.decode_json(response).await
    }

    pub(crate) async fn decode_json<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, BackendError> {
        let bytes = response.bytes().await.map_err(BackendError::from)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Reads an optional entity: an empty body is `None`.
    async fn decode_optional_entity(
        &self,
        response: Response,
    ) -> Result<Option<Entity>, BackendError> {
        let bytes = response.bytes().await.map_err(BackendError::from)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let value: Value = serde_json::from_slice(&bytes)?;
        entity_from_response(value).map(Some)
    }
}

/// Takes the `message` field of a JSON error body, else the raw body text.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}

/// Accepts an entity object, or an envelope `{ "data": { .. } }`.
fn entity_from_response(value: Value) -> Result<Entity, BackendError> {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(inner)) if map.keys().all(|k| is_envelope_key(k)) => {
                Ok(Entity::new(inner))
            }
            Some(other) => {
                map.insert("data".to_string(), other);
                Ok(Entity::new(map))
            }
            None => Ok(Entity::new(map)),
        },
        other => Err(BackendError::Decode {
            message: format!("expected an object, got {}", json_kind(&other)),
        }),
    }
}

fn is_envelope_key(key: &str) -> bool {
    matches!(key, "message" | "success" | "status")
}

/// Accepts an array of objects, or an envelope `{ "data": [ .. ] }`.
fn entities_from_response(value: Value) -> Result<Vec<Entity>, BackendError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(BackendError::Decode {
                    message: "expected an array of entities".to_string(),
                })
            }
        },
        other => {
            return Err(BackendError::Decode {
                message: format!("expected an array, got {}", json_kind(&other)),
            })
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            Entity::from_value(item).ok_or_else(|| BackendError::Decode {
                message: format!("item {i} is not an object"),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Multipart body: one text part per non-null attribute plus the files.
fn multipart_form(
    draft: &Entity,
    attachments: &[Attachment],
) -> Result<reqwest::multipart::Form, BackendError> {
    let mut form = reqwest::multipart::Form::new();
    for (name, value) in draft.iter() {
        if attachments.iter().any(|a| &a.field == name) {
            continue;
        }
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        form = form.text(name.clone(), text);
    }
    for file in attachments {
        form = form.part(file.field.clone(), image_part(file.clone())?);
    }
    Ok(form)
}

/// A [`RemoteResource`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpResource {
    client: ApiClient,
    endpoint: String,
}

impl HttpResource {
    /// `<endpoint>/<key>`, with the key encoded as a single path segment.
    fn item_path(&self, key: &EntityKey) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(key.as_str())
        )
    }
}

impl RemoteResource for HttpResource {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn list(&self) -> Result<Vec<Entity>, BackendError> {
        let request = self.client.request(Method::GET, &self.endpoint);
        let response = self.client.send(request, &self.endpoint, None).await?;
        let value: Value = self.client.decode_json(response).await?;
        let entities = entities_from_response(value)?;
        tracing::debug!(endpoint = %self.endpoint, count = entities.len(), "listed");
        Ok(entities)
    }

    async fn create(&self, draft: &Entity) -> Result<Entity, BackendError> {
        let request = self
            .client
            .request(Method::POST, &self.endpoint)
            .json(draft);
        let response = self.client.send(request, &self.endpoint, None).await?;
        let value: Value = self.client.decode_json(response).await?;
        entity_from_response(value)
    }

    async fn update(
        &self,
        key: &EntityKey,
        draft: &Entity,
        attachments: &[Attachment],
    ) -> Result<Option<Entity>, BackendError> {
        let path = self.item_path(key);
        let request = self.client.request(Method::PUT, &path);
        let request = if attachments.is_empty() {
            request.json(draft)
        } else {
            request.multipart(multipart_form(draft, attachments)?)
        };
        let response = self.client.send(request, &self.endpoint, Some(key)).await?;
        self.client.decode_optional_entity(response).await
    }

    async fn delete(&self, key: &EntityKey) -> Result<(), BackendError> {
        let path = self.item_path(key);
        let request = self.client.request(Method::DELETE, &path);
        self.client.send(request, &self.endpoint, Some(key)).await?;
        Ok(())
    }
}
