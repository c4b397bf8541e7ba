//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::DashConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<DashConfig, ConfigError> {
        MergeService::load(None)
    }

    /// Load configuration with a specific file layered over the global one.
    pub fn load_from_file(path: &Path) -> Result<DashConfig, ConfigError> {
        MergeService::load(Some(path))
    }

    /// Create default configuration.
    pub fn default() -> DashConfig {
        DashConfig::default()
    }
}
