// REST client for the maintenance backend.
use super::auth::{LoginRequest, LoginResponse, TokenSource};
use super::envelope::{error_message, normalize, Envelope};
use crate::config::settings::ApiSettings;
use crate::error::ClientError;
use serde_json::Value;
use shared::catalog::Resource;
use shared::models::Row;
use std::path::Path;
use std::sync::Arc;

/// CRUD access to every catalog resource under one base URL:
/// `{base}/{resource}` and `{base}/{resource}/{id}`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, token_source: Arc<dyn TokenSource>) -> Result<Self, ClientError> {
        settings.validate()?;
        let http = reqwest::Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            http,
            base_url: settings.normalized_base_url(),
            token_source,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    fn item_url(&self, resource: Resource, id: &str) -> String {
        format!("{}/{}", self.collection_url(resource), id)
    }

    async fn authed(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, ClientError> {
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// Sends the request and normalises the body. Non-2xx statuses become
    /// `ServerError` carrying the body's `{message|error}` when present.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Envelope, ClientError> {
        let resp = self.authed(builder).await?.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        let body: Option<Value> = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        if !status.is_success() {
            let message = body.as_ref().and_then(error_message);
            tracing::warn!(status = status.as_u16(), message = ?message, "API request failed");
            return Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        match body {
            Some(value) => normalize(value),
            None if text.trim().is_empty() => Ok(Envelope::default()),
            None => Err(ClientError::DecodeError(format!(
                "response body is not JSON ({} bytes)",
                text.len()
            ))),
        }
    }

    pub async fn list(&self, resource: Resource) -> Result<Vec<Row>, ClientError> {
        tracing::debug!(resource = %resource, "Listing rows");
        let envelope = self.send(self.http.get(self.collection_url(resource))).await?;
        tracing::info!(resource = %resource, count = envelope.rows.len(), "Rows fetched");
        Ok(envelope.rows)
    }

    pub async fn get(&self, resource: Resource, id: &str) -> Result<Row, ClientError> {
        let envelope = self.send(self.http.get(self.item_url(resource, id))).await?;
        envelope.into_single().ok_or_else(|| {
            ClientError::DecodeError(format!("empty response for {} '{}'", resource, id))
        })
    }

    /// Creates a row. Returns the stored row when the backend echoes it.
    pub async fn create(&self, resource: Resource, row: &Row) -> Result<Option<Row>, ClientError> {
        let envelope = self
            .send(self.http.post(self.collection_url(resource)).json(row))
            .await?;
        tracing::info!(resource = %resource, "Row created");
        Ok(envelope.into_single())
    }

    pub async fn update(&self, resource: Resource, id: &str, row: &Row) -> Result<Option<Row>, ClientError> {
        let envelope = self
            .send(self.http.put(self.item_url(resource, id)).json(row))
            .await?;
        tracing::info!(resource = %resource, id = %id, "Row updated");
        Ok(envelope.into_single())
    }

    pub async fn delete(&self, resource: Resource, id: &str) -> Result<(), ClientError> {
        self.send(self.http.delete(self.item_url(resource, id))).await?;
        tracing::info!(resource = %resource, id = %id, "Row deleted");
        Ok(())
    }

    /// Uploads one file as multipart field `file` to
    /// `{base}/{resource}/{id}/documents`.
    pub async fn upload_document(&self, resource: Resource, id: &str, path: &Path) -> Result<(), ClientError> {
        if !resource.accepts_documents() {
            return Err(ClientError::ValidationError(format!(
                "{} does not accept documents",
                resource
            )));
        }
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.clone());
        let form = reqwest::multipart::Form::new().part("file", part);
        let url = format!("{}/documents", self.item_url(resource, id));

        self.send(self.http.post(url).multipart(form)).await?;
        tracing::info!(resource = %resource, id = %id, file = %file_name, "Document uploaded");
        Ok(())
    }

    /// Exchanges credentials for a token. Sent without any Authorization
    /// header.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let url = format!("{}/auth/login", self.base_url);
        let resp = self
            .http
            .post(url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(ClientError::ServerError {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let row = normalize(body)?
            .into_single()
            .ok_or_else(|| ClientError::DecodeError("empty login response".to_string()))?;
        let login: LoginResponse = serde_json::from_value(Value::Object(row))
            .map_err(|e| ClientError::DecodeError(format!("login response: {}", e)))?;
        tracing::info!(username = %username, "Signed in");
        Ok(login)
    }
}
