//! Built-in defaults registered on the builder before any source.

use crate::config::{DEFAULT_BASE_URL, DEFAULT_COLLECTION, DEFAULT_TIMEOUT_MS};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the default remote settings.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("remote.base_url", DEFAULT_BASE_URL)?
        .set_default("remote.collection", DEFAULT_COLLECTION)?
        .set_default("remote.timeout_ms", DEFAULT_TIMEOUT_MS as i64)
}
