//! Logging setup for the consumer-insights binary
//!
//! Console output always; optionally a daily-rotating log file in the
//! platform data directory.
//!
//! ## Usage
//!
//! ```no_run
//! use consumer_insights::{config::LoggingSettings, logging};
//!
//! logging::init(&LoggingSettings::default()).expect("Failed to initialize logging");
//! tracing::info!("App started");
//! ```

use crate::config::LoggingSettings;
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/consumer-insights/logs`
/// - macOS: `~/Library/Application Support/consumer-insights/logs`
/// - Linux: `~/.local/share/consumer-insights/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    Ok(base_dir.join("consumer-insights").join("logs"))
}

/// Builds the filter: `RUST_LOG` when set, the configured level otherwise
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log level '{}'", settings.level))
}

/// Initializes the global subscriber
///
/// # Errors
///
/// Returns error if the log level is invalid, or if file logging is enabled
/// and the log directory or appender cannot be created.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let env_filter = env_filter(settings)?;

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let file_layer = if settings.to_file {
        let log_dir = get_log_dir()?;
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("consumer-insights")
            .filename_suffix("log")
            .build(&log_dir)
            .context("Failed to create log file appender")?;

        Some(
            fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(appender),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(to_file = settings.to_file, "Logging initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_log_dir() {
        let log_dir = get_log_dir().expect("Failed to get log dir");
        assert!(
            log_dir.ends_with("consumer-insights/logs")
                || log_dir.ends_with("consumer-insights\\logs")
        );
    }
}
