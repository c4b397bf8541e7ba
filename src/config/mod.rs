//! Configuration
//!
//! Layered configuration for the remote directory and logging. Sources are
//! merged by [`MergeService`]: built-in defaults, the global config file, an
//! explicit file, then `USERDASH__*` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub use facade::ConfigLoader;
pub use merge::service::MergeService;

/// Public mock directory the dashboard talks to by default
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_COLLECTION: &str = "users";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Remote directory endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Collection path under the base URL
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            collection: default_collection(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RemoteConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ApiError::ConfigError(format!("Invalid base_url: {} ({})", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::ConfigError(format!(
                "Invalid base_url: {} (must start with http:// or https://)",
                self.base_url
            )));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ApiError::ConfigError(format!(
                "Invalid base_url: {} (missing host)",
                self.base_url
            )));
        }
        if self.collection.trim_matches('/').is_empty() {
            return Err(ApiError::ConfigError(
                "collection cannot be empty".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ApiError::ConfigError(
                "timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DashConfig {
    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
