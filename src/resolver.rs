//! # URL Fallback Resolver
//!
//! Tries an ordered list of equivalent endpoints one at a time and returns the
//! first JSON body served with a success status. Later candidates are only
//! contacted after earlier ones fail.
//!
//! Failure bookkeeping:
//! - transport errors and undecodable bodies are remembered as the last error
//! - a non-success status is logged and skipped without being remembered
//! - when nothing succeeds, the last remembered error is returned, otherwise
//!   [`ErrorInfo::all_endpoints_failed`]

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::{ClientError, ClientResult, ErrorInfo};
use crate::types::InvokeOptions;

/// Raw response handed back by a [`Fetch`] implementation
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport used by the resolver.
///
/// Returning `Err` means the request never produced a response. A response
/// with any status is `Ok`.
#[async_trait]
pub trait Fetch: Send + Sync + std::fmt::Debug {
    async fn fetch(
        &self,
        url: &Url,
        options: &InvokeOptions,
    ) -> Result<FetchedResponse, ErrorInfo>;
}

/// [`Fetch`] backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout_ms: u64) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(format!("status-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for ReqwestFetcher {
    async fn fetch(
        &self,
        url: &Url,
        options: &InvokeOptions,
    ) -> Result<FetchedResponse, ErrorInfo> {
        let mut request = self.client.request(options.method().into(), url.clone());
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ErrorInfo::from_reqwest(&e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ErrorInfo::from_reqwest(&e))?;

        Ok(FetchedResponse::new(status, body.to_vec()))
    }
}

/// Outcome of trying a single candidate
#[derive(Debug)]
pub enum Attempt<T> {
    /// Stop here with this value
    Success(T),
    /// The endpoint answered with a non-success status
    Rejected(u16),
    /// The endpoint could not be used; remembered as the last error
    Failed(ErrorInfo),
}

/// Run `attempt` over `candidates` in order until one succeeds.
///
/// This is the only place ordered fallback is implemented; every operation
/// funnels its candidate list through here.
pub async fn try_candidates<'a, I, T, F, Fut>(
    candidates: I,
    mut attempt: F,
) -> Result<T, ErrorInfo>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let mut last_error: Option<ErrorInfo> = None;
    let mut tried = 0usize;

    for candidate in candidates {
        tried += 1;
        debug!(candidate = %candidate, "Trying candidate endpoint");

        match attempt(candidate).await {
            Attempt::Success(value) => {
                debug!(candidate = %candidate, "Candidate endpoint succeeded");
                return Ok(value);
            }
            Attempt::Rejected(status) => {
                warn!(
                    candidate = %candidate,
                    status,
                    "Candidate endpoint returned non-success status"
                );
            }
            Attempt::Failed(err) => {
                warn!(candidate = %candidate, error = %err, "Candidate endpoint failed");
                last_error = Some(err);
            }
        }
    }

    let err = last_error.unwrap_or_else(ErrorInfo::all_endpoints_failed);
    error!(tried, error = %err, "All candidate endpoints failed");
    Err(err)
}

/// Resolves candidate paths against an origin and fetches them in order
#[derive(Debug, Clone)]
pub struct FallbackResolver {
    base_url: Url,
    fetcher: Arc<dyn Fetch>,
}

impl FallbackResolver {
    /// Resolver using reqwest against `base_url`
    pub fn new(base_url: &str, timeout_ms: u64) -> ClientResult<Self> {
        let fetcher = ReqwestFetcher::new(timeout_ms)?;
        Self::with_fetcher(base_url, Arc::new(fetcher))
    }

    /// Resolver using a caller-supplied transport
    pub fn with_fetcher(base_url: &str, fetcher: Arc<dyn Fetch>) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::invalid_url(base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::invalid_url(
                base_url.as_str(),
                "cannot be used as a base URL",
            ));
        }
        Ok(Self { base_url, fetcher })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Absolute URL for a candidate. Paths resolve against the origin,
    /// absolute URLs are kept as-is.
    pub fn candidate_url(&self, candidate: &str) -> Result<Url, ErrorInfo> {
        self.base_url.join(candidate).map_err(|e| {
            ErrorInfo::Unknown(format!("Invalid candidate URL '{}': {}", candidate, e))
        })
    }

    /// Fetch `candidates` in order and parse the first success as JSON
    pub async fn resolve(
        &self,
        candidates: &[&str],
        options: &InvokeOptions,
    ) -> Result<Value, ErrorInfo> {
        try_candidates(candidates.to_vec(), |candidate| async move {
            let url = match self.candidate_url(candidate) {
                Ok(url) => url,
                Err(err) => return Attempt::Failed(err),
            };

            match self.fetcher.fetch(&url, options).await {
                Ok(response) if response.is_success() => {
                    match serde_json::from_slice::<Value>(&response.body) {
                        Ok(value) => Attempt::Success(value),
                        Err(err) => Attempt::Failed(err.into()),
                    }
                }
                Ok(response) => Attempt::Rejected(response.status),
                Err(err) => Attempt::Failed(err),
            }
        })
        .await
    }
}
