//! Logging configuration and initialization
//!
//! Centralized `tracing` setup for the ctgov binaries. Console output is
//! always enabled; a daily-rotating log file can be added on top by setting
//! a log directory. Diagnostics go through the structured macros (`trace!`,
//! `debug!`, `info!`, `warn!`, `error!`) with field syntax:
//!
//! ```rust
//! use tracing::info;
//!
//! let shard = 3;
//! info!(shard = shard, "shard completed");
//! ```
//!
//! `println!` is reserved for the progress bar and the final summary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: LogLevel,

    /// Log format (text or JSON)
    pub format: LogFormat,

    /// When set, logs are also written to a daily-rotating file in this
    /// directory (in addition to the console)
    pub log_dir: Option<PathBuf>,

    /// Log file name prefix (e.g., "ctgov-ingest" -> "ctgov-ingest.2026-08-07.log")
    pub log_file_prefix: String,

    /// Additional filter directives (e.g., "reqwest=warn,ctgov_ingest=debug")
    pub filter_directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
            log_dir: None,
            log_file_prefix: "ctgov".to_string(),
            filter_directives: None,
        }
    }
}

impl LogConfig {
    /// Create a new LogConfig with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CTGOV_LOG_LEVEL`: Log level (trace, debug, info, warn, error)
    /// - `CTGOV_LOG_FORMAT`: Log format (text, json)
    /// - `CTGOV_LOG_DIR`: Directory for log files (unset = console only)
    /// - `CTGOV_LOG_PREFIX`: Prefix for log files
    /// - `CTGOV_LOG_FILTER`: Additional filter directives
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("CTGOV_LOG_LEVEL") {
            config.level = level.parse()?;
        }

        if let Ok(format) = std::env::var("CTGOV_LOG_FORMAT") {
            config.format = format.parse()?;
        }

        if let Ok(dir) = std::env::var("CTGOV_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }

        if let Ok(prefix) = std::env::var("CTGOV_LOG_PREFIX") {
            config.log_file_prefix = prefix;
        }

        if let Ok(filter) = std::env::var("CTGOV_LOG_FILTER") {
            config.filter_directives = Some(filter);
        }

        Ok(config)
    }

    /// Override the level, keeping everything else
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Override the log file prefix, keeping everything else
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }
}

/// Initialize logging with the given configuration
///
/// Sets up the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let mut filter =
        EnvFilter::from_default_env().add_directive(config.level.to_tracing_level().into());

    if let Some(ref directives) = config.filter_directives {
        for directive in directives.split(',') {
            filter = filter.add_directive(
                directive
                    .parse()
                    .context("Failed to parse filter directive")?,
            );
        }
    }

    let file_writer = match config.log_dir {
        Some(ref dir) => {
            std::fs::create_dir_all(dir).context("Failed to create log directory")?;
            let appender = tracing_appender::rolling::daily(dir, &config.log_file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            // The guard must outlive the process for buffered lines to flush
            std::mem::forget(guard);
            Some(non_blocking)
        },
        None => None,
    };

    match config.format {
        LogFormat::Text => {
            let console_layer = fmt::layer().with_writer(std::io::stderr);
            let file_layer = file_writer
                .map(|writer| fmt::layer().with_writer(writer).with_ansi(false));
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
        },
        LogFormat::Json => {
            let console_layer = fmt::layer().json().with_writer(std::io::stderr);
            let file_layer = file_writer
                .map(|writer| fmt::layer().json().with_writer(writer).with_ansi(false));
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;
        },
    }

    Ok(())
}
