//! Logging
//!
//! `tracing` subscriber setup for the library and the CLI. Settings come from
//! [`LoggingConfig`]; the `USERDASH_LOG*` environment variables override them.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LEVEL_VAR: &str = "USERDASH_LOG";
const FORMAT_VAR: &str = "USERDASH_LOG_FORMAT";
const OUTPUT_VAR: &str = "USERDASH_LOG_OUTPUT";
const MODULES_VAR: &str = "USERDASH_LOG_MODULES";
const FILE_VAR: &str = "USERDASH_LOG_FILE";

/// Logging section of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// trace, debug, info, warn, error or off
    pub level: String,

    /// text or json
    pub format: String,

    /// stdout, stderr, file, file+stderr or both
    pub output: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// ANSI colors for text output on a terminal stream
    pub color: bool,

    /// Per-target levels, e.g. `userdash::dispatch = "debug"`
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            format: "text".to_string(),
            output: "stderr".to_string(),
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log format: {} (expected text or json)",
                other
            ))),
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    File,
    FileAndStderr,
    Both,
}

impl LogOutput {
    pub fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }

    fn make_writer(self, file: Option<PathBuf>) -> Result<BoxMakeWriter, ApiError> {
        Ok(match self {
            LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
            LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
            LogOutput::File => BoxMakeWriter::new(Mutex::new(open_log_file(file)?)),
            LogOutput::FileAndStderr => {
                BoxMakeWriter::new(Mutex::new(open_log_file(file)?).and(std::io::stderr))
            }
        })
    }
}

impl FromStr for LogOutput {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            "both" => Ok(LogOutput::Both),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (expected stdout, stderr, file, file+stderr or both)",
                other
            ))),
        }
    }
}

/// Pick the log file: explicit path, then `USERDASH_LOG_FILE`, then the
/// platform state directory.
pub fn resolve_log_file_path(explicit: Option<PathBuf>) -> Result<PathBuf, ApiError> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    if let Some(path) = non_empty_var(FILE_VAR) {
        return Ok(PathBuf::from(path));
    }
    let dirs = directories::ProjectDirs::from("", "userdash", "userdash").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories for log file".to_string())
    })?;
    let dir = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
    Ok(dir.join("userdash.log"))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn open_log_file(path: Option<PathBuf>) -> Result<std::fs::File, ApiError> {
    let path = resolve_log_file_path(path)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ApiError::ConfigError(format!("Failed to open log file {:?}: {}", path, e)))
}

fn parse_directive(target: &str, level: &str) -> Result<tracing_subscriber::filter::Directive, ApiError> {
    format!("{}={}", target.trim(), level.trim())
        .parse()
        .map_err(|e| ApiError::ConfigError(format!("Invalid log directive {}={}: {}", target, level, e)))
}

/// Parse a full `USERDASH_LOG` value such as `info,userdash::remote=debug`.
fn parse_env_filter(directives: &str) -> Result<EnvFilter, ApiError> {
    EnvFilter::try_new(directives).map_err(|e| {
        ApiError::ConfigError(format!("Invalid {} value {:?}: {}", LEVEL_VAR, directives, e))
    })
}

impl LoggingConfig {
    /// Level filter. `USERDASH_LOG` replaces the configured level and module
    /// map entirely; `USERDASH_LOG_MODULES` adds `target=level` pairs on top.
    fn env_filter(&self) -> Result<EnvFilter, ApiError> {
        if !self.enabled {
            return Ok(EnvFilter::new("off"));
        }
        if let Some(directives) = non_empty_var(LEVEL_VAR) {
            return parse_env_filter(&directives);
        }
        let mut filter = EnvFilter::new(&self.level);
        for (target, level) in &self.modules {
            filter = filter.add_directive(parse_directive(target, level)?);
        }
        if let Some(extra) = non_empty_var(MODULES_VAR) {
            for pair in extra.split(',') {
                if let Some((target, level)) = pair.split_once('=') {
                    filter = filter.add_directive(parse_directive(target, level)?);
                }
            }
        }
        Ok(filter)
    }

    fn log_format(&self) -> Result<LogFormat, ApiError> {
        non_empty_var(FORMAT_VAR)
            .as_deref()
            .unwrap_or(self.format.as_str())
            .parse()
    }

    fn log_output(&self) -> Result<LogOutput, ApiError> {
        non_empty_var(OUTPUT_VAR)
            .as_deref()
            .unwrap_or(self.output.as_str())
            .parse()
    }
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed or a setting does not parse.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = config.env_filter()?;
    let format = config.log_format()?;
    let output = config.log_output()?;
    let writer = output.make_writer(config.file.clone())?;
    let ansi = config.color && !output.writes_file();

    let registry = Registry::default().with(filter);
    let installed = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };
    installed.map_err(|e| ApiError::ConfigError(format!("Failed to initialize logging: {}", e)))
}
