//! # Status Client Library
//!
//! Fetches service status (overview, incidents, maintenances, components)
//! through a single invocation interface. With hosted credentials configured
//! the calls go to hosted edge functions; without them they go to same-origin
//! HTTP endpoints, trying a secondary path when the primary one fails.

pub mod api_clients;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod transport;
pub mod types;

// Re-export commonly used types for convenience
pub use api_clients::{FallbackFunctionsClient, HostedFunctionsClient, HostedFunctionsConfig};
pub use config::ClientConfig;
pub use endpoints::{StatusAction, StatusOperation};
pub use error::{ClientError, ClientResult, ErrorInfo};
pub use resolver::{FallbackResolver, Fetch, FetchedResponse, ReqwestFetcher};
pub use transport::{shared, FunctionsClient, StatusClient};
pub use types::{HttpMethod, InvokeOptions, InvokeResponse};
