//! API Client Modules
//!
//! The two function-invocation backends: the hosted edge-function service and
//! the same-origin fallback endpoints.

pub mod fallback_client;
pub mod hosted_client;

pub use fallback_client::FallbackFunctionsClient;
pub use hosted_client::{HostedFunctionsClient, HostedFunctionsConfig};
