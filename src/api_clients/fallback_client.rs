//! # Fallback Functions Client
//!
//! Stand-in for the hosted functions when no credentials are configured.
//! Known function names are routed to same-origin status endpoints through
//! the [`FallbackResolver`]; anything else is reported as an unknown function.

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::debug;

use crate::config::FallbackConfig;
use crate::endpoints::{StatusAction, StatusOperation, OVERVIEW_CANDIDATES};
use crate::error::{ClientResult, ErrorInfo};
use crate::resolver::{FallbackResolver, Fetch};
use crate::transport::FunctionsClient;
use crate::types::{InvokeOptions, InvokeResponse};

/// Function-invocation client backed by same-origin HTTP endpoints
#[derive(Debug, Clone)]
pub struct FallbackFunctionsClient {
    resolver: FallbackResolver,
}

impl FallbackFunctionsClient {
    pub fn new(config: &FallbackConfig) -> ClientResult<Self> {
        let resolver = FallbackResolver::new(&config.base_url, config.timeout_ms)?;
        Ok(Self { resolver })
    }

    /// Client over a caller-supplied transport
    pub fn with_fetcher(base_url: &str, fetcher: Arc<dyn Fetch>) -> ClientResult<Self> {
        let resolver = FallbackResolver::with_fetcher(base_url, fetcher)?;
        Ok(Self { resolver })
    }

    /// Candidate paths for a function call, or the unknown-function error
    pub fn candidates_for(
        name: &str,
        options: &InvokeOptions,
    ) -> Result<&'static [&'static str], ErrorInfo> {
        match StatusOperation::from_name(name) {
            Some(StatusOperation::Overview) => Ok(OVERVIEW_CANDIDATES),
            Some(StatusOperation::Aggregator) => {
                let action = StatusAction::resolve(options.action());
                debug!(
                    requested = ?options.action(),
                    resolved = %action,
                    "Resolved aggregator action"
                );
                Ok(action.candidates())
            }
            None => Err(ErrorInfo::unknown_function(name)),
        }
    }

    async fn dispatch(&self, name: &str, options: &InvokeOptions) -> Result<Value, ErrorInfo> {
        let candidates = Self::candidates_for(name, options)?;
        // Same-origin endpoints are plain GETs; the method and body hints only
        // matter to the hosted service.
        self.resolver
            .resolve(candidates, &InvokeOptions::default())
            .await
    }
}

#[async_trait]
impl FunctionsClient for FallbackFunctionsClient {
    fn transport_name(&self) -> &'static str {
        "fallback"
    }

    fn endpoint(&self) -> &str {
        self.resolver.base_url()
    }

    async fn invoke(&self, name: &str, options: InvokeOptions) -> InvokeResponse {
        let outcome = AssertUnwindSafe(self.dispatch(name, &options))
            .catch_unwind()
            .await;

        match outcome {
            Ok(result) => result.into(),
            Err(panic) => InvokeResponse::err(ErrorInfo::Unknown(panic_message(panic.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "status request panicked".to_string()
    }
}
