//! # Logging Setup
//!
//! Structured logging with the `tracing` crate. Host applications call
//! [`init_logging`] once at startup; library crates only emit events and
//! never install a subscriber themselves.
//!
//! Tokens and client secrets are never logged anywhere in this workspace.
//!
//! ## Usage
//!
//! ```no_run
//! use graph_core::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! let config = LoggingConfig::default().with_format(LogFormat::Compact);
//! init_logging(&config).expect("Failed to initialize logging");
//!
//! tracing::info!("client starting");
//! ```

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Compact format for production
    Compact,
    /// Structured JSON format for machine parsing
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Filter directives (e.g. `"info,graph_mail=debug"`). When absent,
    /// `RUST_LOG` is consulted, falling back to `info`.
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }
}

/// Errors raised while installing the subscriber.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid filter directives: {0}")]
    InvalidFilter(String),

    #[error("failed to install subscriber: {0}")]
    InitFailed(String),
}

/// Install the global `tracing` subscriber.
///
/// Fails if a subscriber is already installed for this process.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match &config.filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| LoggingError::InitFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_filter("info,graph_auth=debug");

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter.as_deref(), Some("info,graph_auth=debug"));
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let config = LoggingConfig::default().with_filter("graph_auth=notalevel");
        let result = init_logging(&config);

        assert!(matches!(result, Err(LoggingError::InvalidFilter(_))));
    }
}
