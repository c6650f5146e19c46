//! # Client Configuration
//!
//! Settings that decide which backend the status client talks to. Loaded once
//! at startup from (highest precedence first) environment variables, an
//! optional TOML file, and built-in defaults.
//!
//! | Variable | Field |
//! |---|---|
//! | `SUPABASE_URL` / `VITE_SUPABASE_URL` | `hosted.url` |
//! | `SUPABASE_ANON_KEY` / `VITE_SUPABASE_ANON_KEY` | `hosted.anon_key` |
//! | `STATUS_CLIENT_BASE_URL` | `fallback.base_url` |
//! | `STATUS_CLIENT_TIMEOUT_MS` | `hosted.timeout_ms`, `fallback.timeout_ms` |
//! | `STATUS_CLIENT_CONFIG` | path of the TOML file |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "VITE_SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"];
const BASE_URL_VAR: &str = "STATUS_CLIENT_BASE_URL";
const TIMEOUT_VAR: &str = "STATUS_CLIENT_TIMEOUT_MS";
const CONFIG_PATH_VAR: &str = "STATUS_CLIENT_CONFIG";

/// Status client configuration
///
/// # Examples
///
/// ```rust
/// use status_client::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.fallback.base_url, "http://localhost:8080");
/// assert!(config.hosted_credentials().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Hosted function-invocation service
    pub hosted: HostedServiceConfig,
    /// Same-origin endpoints used when the hosted service is not configured
    pub fallback: FallbackConfig,
}

/// Hosted service settings. Both `url` and `anon_key` must be non-empty for
/// the hosted backend to be selected.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedServiceConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HostedServiceConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl std::fmt::Debug for HostedServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedServiceConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Fallback endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Origin the candidate paths are resolved against
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Build a config that selects the hosted backend
    pub fn hosted(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            hosted: HostedServiceConfig {
                url: Some(url.into()),
                anon_key: Some(anon_key.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Build a config that selects the fallback backend against `base_url`
    pub fn fallback(base_url: impl Into<String>) -> Self {
        Self {
            fallback: FallbackConfig {
                base_url: base_url.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// `(url, key)` when both are present and non-empty
    pub fn hosted_credentials(&self) -> Option<(&str, &str)> {
        let url = self.hosted.url.as_deref().filter(|v| !v.is_empty())?;
        let key = self.hosted.anon_key.as_deref().filter(|v| !v.is_empty())?;
        Some((url, key))
    }

    /// Load configuration from environment variables and config file
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (`STATUS_CLIENT_CONFIG`, `./status-client.toml`,
    ///    `./config/status-client.toml`)
    /// 3. Default values
    pub fn load() -> ClientResult<Self> {
        let env = |name: &str| std::env::var(name).ok();
        let path = env(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .or_else(Self::find_config_file);
        Self::load_with(path.as_deref(), env)
    }

    /// Load configuration from a specific file, still honoring environment overrides
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        if !path.is_file() {
            return Err(ClientError::config_error(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Self::load_with(Some(path), |name| std::env::var(name).ok())
    }

    /// Layer an optional file and an environment lookup over the defaults.
    ///
    /// `env` is consulted instead of the process environment so callers can
    /// supply their own variables.
    pub fn load_with<F>(path: Option<&Path>, env: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Loading config from: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let first_of = |names: &[&str]| names.iter().find_map(|name| env(name));

        builder = builder
            .set_override_option("hosted.url", first_of(&URL_VARS))?
            .set_override_option("hosted.anon_key", first_of(&KEY_VARS))?
            .set_override_option("fallback.base_url", env(BASE_URL_VAR))?;

        if let Some(raw) = env(TIMEOUT_VAR) {
            let timeout_ms: i64 = raw.trim().parse().map_err(|e| {
                ClientError::config_error(format!("Invalid {}='{}': {}", TIMEOUT_VAR, raw, e))
            })?;
            builder = builder
                .set_override("hosted.timeout_ms", timeout_ms)?
                .set_override("fallback.timeout_ms", timeout_ms)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;

        debug!("Loaded client configuration: {:?}", config);
        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let possible_paths = [
            Path::new("./status-client.toml"),
            Path::new("./config/status-client.toml"),
        ];

        possible_paths
            .iter()
            .find(|path| path.is_file())
            .map(|path| path.to_path_buf())
    }
}
