//! Bearer-token sources for [`ApiClient`](super::http::ApiClient).
//!
//! The client asks its token source before every request; `Ok(None)` sends
//! the request anonymously.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use shared::models::Row;
use std::sync::{Arc, RwLock};

#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ClientError>;
}

/// Anonymous requests.
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(None)
    }
}

/// A token obtained elsewhere that never changes.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(Some(self.0.clone()))
    }
}

/// Token slot shared between the application context (which sets it on
/// login and clears it on logout) and the HTTP client (which reads it).
#[derive(Clone, Default)]
pub struct SessionToken {
    slot: Arc<RwLock<Option<String>>>,
}

impl SessionToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        let mut guard = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(token.into());
    }

    pub fn clear(&self) {
        let mut guard = self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = None;
    }

    pub fn current(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl TokenSource for SessionToken {
    async fn token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.current())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login payload after envelope normalisation. Backends name the token
/// either `token` or `access_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub user: Option<Row>,
}
