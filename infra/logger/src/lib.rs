//! # Logger
//!
//! Tracing setup shared by every binary in the workspace. Configures console
//! and rolling file output with non-blocking I/O and environment-based
//! filtering.
//!
//! * Console output is compact and colored; file output is plain or JSON.
//! * `RUST_LOG` always overrides the programmatic defaults; use
//!   [`LoggerBuilder::env_filter`] for module-directed defaults
//!   (e.g., `"hearth=debug,tokio=info"`).
//!
//! ## Example
//!
//! ```rust
//! use hearth_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder("my-hub")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// A builder for configuring and initializing the global tracing subscriber.
///
/// File-specific options (`rotation`, `max_files`, `json`) only become
/// available after [`LoggerBuilder::path`] has been called.
#[derive(Debug)]
pub struct LoggerBuilder<F: Sealed = NoFile> {
    config: LoggerConfig,
    name: String,
    file_state: PhantomData<F>,
}

impl LoggerBuilder<WithFile> {
    /// Configures the maximum number of log files to keep.
    #[must_use = "The builder must be consumed by `init` to take effect."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    /// Configures the log file rotation strategy.
    #[must_use = "The builder must be consumed by `init` to take effect."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Switches file output to JSON lines.
    #[must_use = "The builder must be consumed by `init` to take effect."]
    pub const fn json(mut self) -> Self {
        self.config.json = true;
        self
    }
}

impl<F: Sealed> LoggerBuilder<F> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be consumed by `init` to take effect."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `hearth=debug,tokio=info`).
    ///
    /// `RUST_LOG` still overrides this; it is a programmatic default only.
    /// An invalid filter makes [`LoggerBuilder::init`] return an error.
    #[must_use = "The builder must be consumed by `init` to take effect."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables console logging.
    #[must_use = "The builder must be consumed by `init` to take effect."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Sets the directory for rolling log files.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithFile> {
        let mut config = self.config;
        config.path = Some(path.into());
        LoggerBuilder { config, name: self.name, file_state: PhantomData }
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle holding the [`WorkerGuard`] of the non-blocking
    /// file writer. Keep it alive for the lifetime of the program, otherwise
    /// buffered log lines are lost.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already
    /// been set, [`LoggerError::InvalidConfiguration`] for invalid builder
    /// settings, and [`LoggerError::Appender`] if the file appender cannot
    /// be created.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }
        if self.config.max_files == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: None,
            });
        }

        let env_filter = build_env_filter(&self.config)?;

        let mut layers = Vec::new();

        if self.config.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = if let Some(path) = self.config.path {
            fs::create_dir_all(&path).map_err(|e| LoggerError::Internal {
                message: e.to_string().into(),
                context: Some(format!("Failed to create path: {}", path.display()).into()),
            })?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.config.rotation)
                .filename_prefix(&self.name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.config.max_files)
                .build(path)?;

            let (non_blocking, g) = tracing_appender::non_blocking(file_appender);
            let file_layer = layer().with_writer(non_blocking).with_ansi(false);

            layers.push(if self.config.json {
                file_layer.json().boxed()
            } else {
                file_layer.boxed()
            });
            Some(g)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background worker guard of the file writer. Drop it only when
/// the application is shutting down.
#[must_use = "Dropping this handle stops the background logging worker."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] for the global tracing subscriber.
    ///
    /// The `name` identifies the application and prefixes rolling log files
    /// (e.g., `my-hub.2026-08-27.log`).
    #[must_use = "The builder must be consumed by `init` to take effect."]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            config: LoggerConfig::default(),
            name: name.into(),
            file_state: PhantomData,
        }
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_builder_defaults() {
        let builder = Logger::builder("test-hub").env_filter("hearth=debug");
        assert!(builder.config.console);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.env_filter.as_deref(), Some("hearth=debug"));
        assert!(builder.config.path.is_none());
    }

    #[test]
    #[serial]
    fn test_builder_file_options() {
        let builder = Logger::builder("test-hub")
            .console(false)
            .level(LevelFilter::DEBUG)
            .path("/tmp/hearth-logs")
            .max_files(5)
            .json();

        assert!(!builder.config.console);
        assert_eq!(builder.config.level, LevelFilter::DEBUG);
        assert_eq!(builder.config.max_files, 5);
        assert!(builder.config.json);
    }

    #[test]
    #[serial]
    fn test_empty_name_rejected() {
        let err = Logger::builder("  ").init().expect_err("empty name must be rejected");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn test_zero_max_files_rejected() {
        let err = Logger::builder("test-hub")
            .path("/tmp/hearth-logs")
            .max_files(0)
            .init()
            .expect_err("zero max_files must be rejected");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
