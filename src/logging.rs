//! # Structured Logging Module
//!
//! Environment-aware `tracing` setup for the status client and its CLI.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::types::InvokeResponse;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// `RUST_LOG` wins when set; otherwise the level follows `STATUS_CLIENT_ENV`.
/// `STATUS_CLIENT_LOG_FORMAT=json` switches to JSON lines. Safe to call more
/// than once.
pub fn init_structured_logging() {
    init_with_level(None);
}

/// Same as [`init_structured_logging`] with an explicit default level, used by
/// the CLI's `--verbose` flag.
pub fn init_with_level(level: Option<&str>) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let default_level = level
            .map(str::to_string)
            .unwrap_or_else(|| get_log_level(&environment).to_string());
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level));

        let json = std::env::var("STATUS_CLIENT_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let layer = if json {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_filter(filter)
                .boxed()
        };

        // Another subscriber may already be installed by the embedding application
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::debug!(
            environment = %environment,
            level = %default_level,
            "Structured logging initialized"
        );
    });
}

fn get_environment() -> String {
    std::env::var("STATUS_CLIENT_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "warn",
        "test" => "debug",
        _ => "info",
    }
}

/// Log the outcome of one invocation
pub fn log_invocation(transport: &str, function: &str, response: &InvokeResponse) {
    match &response.error {
        None => tracing::info!(
            transport = %transport,
            function = %function,
            status = "ok",
            timestamp = %Utc::now().to_rfc3339(),
            "STATUS_INVOKE"
        ),
        Some(error) => tracing::warn!(
            transport = %transport,
            function = %function,
            status = "error",
            error = %error,
            timestamp = %Utc::now().to_rfc3339(),
            "STATUS_INVOKE"
        ),
    }
}
