//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path every API route hangs off
pub const API_BASE_PATH: &str = "/api/v1";

/// Configuration validation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A required configuration field is missing.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The endpoint is not an http(s) URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A timeout value is out of acceptable range.
    #[error("invalid timeout: {0:?}")]
    InvalidTimeout(Duration),
}

/// Connection settings for a lakeFS server
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server URL, with or without the `/api/v1` suffix
    pub endpoint: String,

    /// Access key ID
    pub access_key_id: String,

    /// Secret access key
    pub secret_access_key: String,

    /// Request timeout
    #[serde(default = "default_request_timeout")]
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Connection timeout
    #[serde(default = "default_connect_timeout")]
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

impl ClientConfig {
    /// Create a new config with required fields.
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Endpoint with a trailing `/api/v1` and no trailing slash
    pub fn api_base(&self) -> String {
        let trimmed = self.endpoint.trim_end_matches('/');
        if trimmed.ends_with(API_BASE_PATH) {
            trimmed.to_string()
        } else {
            format!("{}{}", trimmed, API_BASE_PATH)
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.endpoint.is_empty() {
            return Err(ConfigValidationError::MissingField("endpoint"));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigValidationError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.access_key_id.is_empty() {
            return Err(ConfigValidationError::MissingField("access_key_id"));
        }
        if self.secret_access_key.is_empty() {
            return Err(ConfigValidationError::MissingField("secret_access_key"));
        }

        // 1s to 1h for requests, 1s to 5m for connects
        if self.request_timeout < Duration::from_secs(1)
            || self.request_timeout > Duration::from_secs(3600)
        {
            return Err(ConfigValidationError::InvalidTimeout(self.request_timeout));
        }
        if self.connect_timeout < Duration::from_secs(1)
            || self.connect_timeout > Duration::from_secs(300)
        {
            return Err(ConfigValidationError::InvalidTimeout(self.connect_timeout));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> ClientConfig {
        ClientConfig::new(endpoint, "AKIAEXAMPLE", "secret")
    }

    #[test]
    fn test_api_base_appends_path() {
        assert_eq!(
            config("http://localhost:8000").api_base(),
            "http://localhost:8000/api/v1"
        );
        assert_eq!(
            config("http://localhost:8000/").api_base(),
            "http://localhost:8000/api/v1"
        );
        assert_eq!(
            config("https://lakefs.example.com/api/v1/").api_base(),
            "https://lakefs.example.com/api/v1"
        );
    }

    #[test]
    fn test_validate() {
        assert!(config("http://localhost:8000").validate().is_ok());
        assert_eq!(
            config("").validate(),
            Err(ConfigValidationError::MissingField("endpoint"))
        );
        assert!(matches!(
            config("localhost:8000").validate(),
            Err(ConfigValidationError::InvalidEndpoint(_))
        ));
        assert_eq!(
            ClientConfig::new("http://localhost:8000", "", "secret").validate(),
            Err(ConfigValidationError::MissingField("access_key_id"))
        );
        assert!(matches!(
            config("http://localhost:8000")
                .with_request_timeout(Duration::ZERO)
                .validate(),
            Err(ConfigValidationError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn test_humantime_timeouts() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "endpoint": "http://localhost:8000",
                "access_key_id": "AKIAEXAMPLE",
                "secret_access_key": "secret",
                "request_timeout": "2m"
            }"#,
        )
        .unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.connect_timeout, default_connect_timeout());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config("http://localhost:8000"));
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("<redacted>"));
    }
}
