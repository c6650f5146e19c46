//! # Backend Selection
//!
//! One client type for callers regardless of where status data comes from.
//! [`StatusClient`] is resolved once from configuration:
//!
//! - both hosted URL and anon key present: every call is delegated to the
//!   hosted functions client, untouched
//! - otherwise: calls go to the same-origin fallback endpoints
//!
//! ## Usage
//!
//! ```rust,no_run
//! use status_client::{ClientConfig, FunctionsClient, InvokeOptions, StatusClient};
//!
//! # async fn run() -> status_client::ClientResult<()> {
//! let config = ClientConfig::load()?;
//! let client = StatusClient::from_config(&config)?;
//!
//! let response = client
//!     .invoke("status-aggregator", InvokeOptions::with_action("incidents"))
//!     .await;
//! match response.into_result() {
//!     Ok(data) => println!("{}", data),
//!     Err(error) => eprintln!("status unavailable: {}", error),
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::sync::OnceLock;
use tracing::info;

use crate::api_clients::{FallbackFunctionsClient, HostedFunctionsClient, HostedFunctionsConfig};
use crate::config::{ClientConfig, FallbackConfig};
use crate::endpoints::{StatusAction, StatusOperation};
use crate::error::ClientResult;
use crate::logging::log_invocation;
use crate::types::{InvokeOptions, InvokeResponse};

/// Common interface of every function-invocation backend.
///
/// `invoke` never fails: problems are reported in [`InvokeResponse::error`].
#[async_trait]
pub trait FunctionsClient: Send + Sync + std::fmt::Debug {
    /// Backend name for debugging/logging
    fn transport_name(&self) -> &'static str;

    /// Base endpoint the backend talks to
    fn endpoint(&self) -> &str;

    /// Invoke a named function
    async fn invoke(&self, name: &str, options: InvokeOptions) -> InvokeResponse;
}

/// Status client with its backend chosen at construction
#[derive(Debug)]
pub enum StatusClient {
    /// Hosted edge functions; calls are delegated unchanged
    Hosted(Box<dyn FunctionsClient>),
    /// Same-origin endpoints with ordered fallback
    Fallback(Box<FallbackFunctionsClient>),
}

impl StatusClient {
    /// Select a backend from configuration using [`HostedFunctionsClient`]
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let timeout_ms = config.hosted.timeout_ms;
        Self::from_config_with(config, |url, anon_key| {
            let client = HostedFunctionsClient::new(HostedFunctionsConfig {
                url: url.to_string(),
                anon_key: anon_key.to_string(),
                timeout_ms,
            })?;
            Ok(Box::new(client) as Box<dyn FunctionsClient>)
        })
    }

    /// Select a backend, building the hosted one with `hosted` when credentials
    /// are configured. The fallback backend is not constructed in that case.
    pub fn from_config_with<F>(config: &ClientConfig, hosted: F) -> ClientResult<Self>
    where
        F: FnOnce(&str, &str) -> ClientResult<Box<dyn FunctionsClient>>,
    {
        let client = match config.hosted_credentials() {
            Some((url, anon_key)) => StatusClient::Hosted(hosted(url, anon_key)?),
            None => Self::fallback(&config.fallback)?,
        };

        info!(
            transport = client.transport_name(),
            endpoint = client.endpoint(),
            "Selected status backend"
        );
        Ok(client)
    }

    /// Fallback backend regardless of hosted credentials
    pub fn fallback(config: &FallbackConfig) -> ClientResult<Self> {
        let client = FallbackFunctionsClient::new(config)?;
        Ok(StatusClient::Fallback(Box::new(client)))
    }

    /// The selected backend as a trait object
    pub fn functions(&self) -> &dyn FunctionsClient {
        match self {
            StatusClient::Hosted(c) => c.as_ref(),
            StatusClient::Fallback(c) => c.as_ref(),
        }
    }

    #[must_use]
    pub fn is_hosted(&self) -> bool {
        matches!(self, StatusClient::Hosted(_))
    }

    /// `status-overview`
    pub async fn status_overview(&self) -> InvokeResponse {
        self.invoke(StatusOperation::Overview.name(), InvokeOptions::default())
            .await
    }

    /// `status-aggregator` for one action
    pub async fn aggregate(&self, action: StatusAction) -> InvokeResponse {
        self.invoke(
            StatusOperation::Aggregator.name(),
            InvokeOptions::with_action(action.as_str()),
        )
        .await
    }
}

#[async_trait]
impl FunctionsClient for StatusClient {
    fn transport_name(&self) -> &'static str {
        self.functions().transport_name()
    }

    fn endpoint(&self) -> &str {
        self.functions().endpoint()
    }

    async fn invoke(&self, name: &str, options: InvokeOptions) -> InvokeResponse {
        let response = match self {
            StatusClient::Hosted(c) => c.invoke(name, options).await,
            StatusClient::Fallback(c) => c.invoke(name, options).await,
        };
        log_invocation(self.transport_name(), name, &response);
        response
    }
}

static SHARED_CLIENT: OnceLock<StatusClient> = OnceLock::new();

/// Process-wide client built from [`ClientConfig::load`] on first use.
///
/// Configuration is read once; later environment changes have no effect.
pub fn shared() -> ClientResult<&'static StatusClient> {
    if let Some(client) = SHARED_CLIENT.get() {
        return Ok(client);
    }

    let config = ClientConfig::load()?;
    let client = StatusClient::from_config(&config)?;
    Ok(SHARED_CLIENT.get_or_init(|| client))
}
