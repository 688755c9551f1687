//! Logging initialization using the `tracing` ecosystem.
//!
//! The TUI owns the terminal, so interactive runs log to a daily-rotating
//! file only. Headless runs (export mode) also log to stderr.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Prefix of the rotated log files.
pub const LOG_FILE_PREFIX: &str = "buzzwatch.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File only; stdout/stderr belong to the TUI.
    Tui,
    /// File plus stderr.
    Headless,
}

/// Daily-rotating appender under `log_dir`, creating the directory if needed.
pub fn file_appender(log_dir: impl AsRef<Path>) -> Result<RollingFileAppender> {
    let log_dir = log_dir.as_ref();
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir)
        .with_context(|| format!("Cannot open log directory {}", log_dir.display()))
}

/// Initialize the global tracing subscriber.
///
/// Should be called once at program start. The returned guard flushes the
/// file writer when dropped and must be held until exit.
pub fn init_logging(mode: LogMode, log_dir: impl AsRef<Path>) -> Result<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender(log_dir)?);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = match mode {
        LogMode::Headless => Some(fmt::layer().with_writer(io::stderr).with_target(false)),
        LogMode::Tui => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        assert!(file_appender(&log_dir).is_ok());
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_file_appender_unusable_directory_is_an_error() {
        // A regular file cannot act as the log directory
        let file = NamedTempFile::new().unwrap();
        let err = file_appender(file.path().join("logs")).unwrap_err();
        assert!(err.to_string().contains("Cannot open log directory"));
    }
}
