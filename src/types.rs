//! Request and response shapes shared by every backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorInfo;

/// HTTP method hint carried by an invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(format!("unsupported method: {}", other)),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Options accepted by `invoke`
///
/// ```rust
/// use status_client::{HttpMethod, InvokeOptions};
///
/// let opts = InvokeOptions::post(serde_json::json!({"action": "incidents"}));
/// assert_eq!(opts.method(), HttpMethod::Post);
/// assert_eq!(opts.action(), Some("incidents"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvokeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl InvokeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// POST with a JSON body
    pub fn post(body: Value) -> Self {
        Self {
            method: Some(HttpMethod::Post),
            body: Some(body),
        }
    }

    /// Body-only options for an aggregator action, method left to the backend
    pub fn with_action(action: &str) -> Self {
        Self {
            method: None,
            body: Some(serde_json::json!({ "action": action })),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method.unwrap_or_default()
    }

    /// The `action` discriminator when the body carries a non-empty string.
    ///
    /// Null, empty, and non-string values all read as absent.
    pub fn action(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("action"))
            .and_then(Value::as_str)
            .filter(|action| !action.is_empty())
    }
}

/// Result pair returned by every `invoke`. Exactly one side is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub data: Option<Value>,
    pub error: Option<ErrorInfo>,
}

impl InvokeResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: ErrorInfo) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Collapse the pair into a `Result`.
    ///
    /// A pair with neither side set (`{data: null, error: null}`) is a
    /// successful JSON `null`.
    pub fn into_result(self) -> Result<Value, ErrorInfo> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data.unwrap_or(Value::Null)),
        }
    }
}

impl From<Result<Value, ErrorInfo>> for InvokeResponse {
    fn from(result: Result<Value, ErrorInfo>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::err(error),
        }
    }
}
