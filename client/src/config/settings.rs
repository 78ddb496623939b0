// Backend connection settings. Defaults are overridden by the desk config
// file and then by environment variables.
use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_API_URL: &str = "ASSET_DESK_API_URL";
pub const ENV_API_TIMEOUT: &str = "ASSET_DESK_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn with_env_overrides(self) -> Result<Self, ClientError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup` (environment-shaped: key -> value).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(base_url = %url, "API base URL overridden from environment");
            self.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_API_TIMEOUT) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                ClientError::ConfigError(format!("{} must be a whole number of seconds, got '{}'", ENV_API_TIMEOUT, raw))
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::ConfigError(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::ConfigError("API timeout must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }
}
