//! Error types for stress-client

use thiserror::Error;

use crate::config::ConfigValidationError;

/// Client error type
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigValidationError),

    /// Transport-level failure (connect, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an unexpected status code
    #[error("request failed: {message} ({status})")]
    Status {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or the canonical reason
        message: String,
    },

    /// A `lakefs://` URI could not be parsed
    #[error("invalid URI: {0}")]
    InvalidUri(String),
}

impl ClientError {
    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;
