//! # Hosted Functions Client
//!
//! Thin client for a hosted edge-function service. Each `invoke` is a single
//! request to `{url}/functions/v1/{name}` authenticated with the anon key.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult, ErrorInfo};
use crate::transport::FunctionsClient;
use crate::types::{HttpMethod, InvokeOptions, InvokeResponse};

const APIKEY_HEADER: &str = "apikey";

/// Configuration for the hosted functions client
#[derive(Clone)]
pub struct HostedFunctionsConfig {
    /// Project URL (e.g. `https://<project>.supabase.co`)
    pub url: String,
    /// Public anon key
    pub anon_key: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl std::fmt::Debug for HostedFunctionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedFunctionsConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// HTTP client for hosted function invocation
pub struct HostedFunctionsClient {
    client: Client,
    functions_url: Url,
    config: HostedFunctionsConfig,
}

impl std::fmt::Debug for HostedFunctionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedFunctionsClient")
            .field("functions_url", &self.functions_url.as_str())
            .field("timeout_ms", &self.config.timeout_ms)
            .finish()
    }
}

impl HostedFunctionsClient {
    /// Create a client for the project at `config.url`
    pub fn new(config: HostedFunctionsConfig) -> ClientResult<Self> {
        let base = format!("{}/", config.url.trim_end_matches('/'));
        let functions_url = Url::parse(&base)
            .and_then(|url| url.join("functions/v1"))
            .map_err(|e| ClientError::invalid_url(&config.url, e))?;
        if functions_url.cannot_be_a_base() {
            return Err(ClientError::invalid_url(
                &config.url,
                "cannot be used as a base URL",
            ));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.anon_key)).map_err(|_| {
                ClientError::InvalidHeader {
                    header: AUTHORIZATION.as_str().to_string(),
                }
            })?,
        );
        default_headers.insert(
            HeaderName::from_static(APIKEY_HEADER),
            HeaderValue::from_str(&config.anon_key).map_err(|_| ClientError::InvalidHeader {
                header: APIKEY_HEADER.to_string(),
            })?,
        );

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("status-client/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .build()?;

        info!(
            "Created HostedFunctionsClient for {}, timeout: {}ms",
            functions_url, config.timeout_ms
        );

        Ok(Self {
            client,
            functions_url,
            config,
        })
    }

    /// Shorthand for [`HostedFunctionsClient::new`] from loose credentials
    pub fn from_credentials(url: &str, anon_key: &str, timeout_ms: u64) -> ClientResult<Self> {
        Self::new(HostedFunctionsConfig {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
            timeout_ms,
        })
    }

    /// URL of a single function
    pub fn function_url(&self, name: &str) -> Result<Url, ErrorInfo> {
        let mut url = self.functions_url.clone();
        url.path_segments_mut()
            .map_err(|_| ErrorInfo::Unknown(format!("Invalid function URL for {}", name)))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    async fn call(&self, name: &str, options: &InvokeOptions) -> Result<Value, ErrorInfo> {
        let url = self.function_url(name)?;
        // Hosted functions default to POST, unlike the same-origin endpoints
        let method = options.method.unwrap_or(HttpMethod::Post);

        debug!("Invoking hosted function {} via {} {}", name, method.as_str(), url);

        let mut request = self.client.request(method.into(), url);
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ErrorInfo::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("Hosted function {} returned {}", name, status);
            return Err(ErrorInfo::Http(status.as_u16()));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);

        let text = response
            .text()
            .await
            .map_err(|e| ErrorInfo::from_reqwest(&e))?;

        if is_json {
            Ok(serde_json::from_str(&text)?)
        } else if text.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(Value::String(text))
        }
    }
}

#[async_trait]
impl FunctionsClient for HostedFunctionsClient {
    fn transport_name(&self) -> &'static str {
        "hosted"
    }

    fn endpoint(&self) -> &str {
        self.functions_url.as_str()
    }

    async fn invoke(&self, name: &str, options: InvokeOptions) -> InvokeResponse {
        self.call(name, &options).await.into()
    }
}
