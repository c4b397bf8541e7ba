//! Error types.
//!
//! `RemoteFailure` is the only thing the remote directory reports; it never
//! crosses the dispatcher. `ApiError` covers the fallible surfaces around the
//! core (configuration, CLI input, lookups).

use crate::types::UserId;
use thiserror::Error;

/// Failure of a remote directory call, carrying a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}")]
pub struct RemoteFailure {
    description: String,
}

impl RemoteFailure {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The description, or `default` when the remote gave nothing usable.
    pub fn describe_or(&self, default: &str) -> String {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            default.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Errors raised outside of intent settlement
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Remote directory error: {0}")]
    Remote(#[from] RemoteFailure),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid user draft: {0}")]
    InvalidDraft(String),

    #[error("User not found: {0}")]
    UserNotFound(UserId),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
