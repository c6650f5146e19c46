//! # Client Error Types
//!
//! Two layers of failure:
//!
//! - [`ClientError`] covers construction and configuration. These are returned as
//!   `Err` from constructors and [`crate::ClientConfig::load`].
//! - [`ErrorInfo`] covers a single invocation. It never escapes as `Err` from
//!   `invoke`; it travels inside [`crate::InvokeResponse::error`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client construction result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while building a client or loading its configuration
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client setup failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid header value for {header}")]
    InvalidHeader { header: String },
}

impl ClientError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

/// Failure carried by an invocation result.
///
/// Serialized as `{"kind": "...", "message": ...}` so callers that render the
/// `{data, error}` pair as JSON see a stable shape from either backend.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ErrorInfo {
    /// The request never produced a response (connect, DNS, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// A success response whose body was not valid JSON
    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("{0}")]
    Unknown(String),
}

impl ErrorInfo {
    pub const ALL_ENDPOINTS_FAILED: &'static str = "All fallback endpoints failed";

    /// Error returned when an operation name is outside the supported set
    pub fn unknown_function(name: &str) -> Self {
        Self::Unknown(format!("Unknown function: {}", name))
    }

    /// Error returned when every candidate failed without a captured error
    pub fn all_endpoints_failed() -> Self {
        Self::Unknown(Self::ALL_ENDPOINTS_FAILED.to_string())
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Classify a reqwest failure. Body decode problems map to `Decode`,
    /// everything else is treated as a transport failure.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ErrorInfo {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
