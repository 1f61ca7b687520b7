//! Logging configuration for logcompat
//!
//! Structured logging through the `tracing` framework, with stdout and
//! daily-rotated file output.

use logcompat_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default file name when the configured path has none
const DEFAULT_LOG_FILE: &str = "logcompat.log";

/// Log output destination
#[derive(Debug, Clone)]
pub enum LogOutput {
    /// Output to stdout
    Stdout,
    /// Output to a file with daily rotation
    File(PathBuf),
    /// Output to both stdout and file
    Both(PathBuf),
}

/// Log format style
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Human-readable multi-line format (default)
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level filter, in `EnvFilter` syntax
    pub level: String,
    /// Output destination
    pub output: LogOutput,
    /// Format style
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    /// Create config with info level and stdout output
    pub fn info() -> Self {
        Self::default()
    }

    /// Create config with debug level
    pub fn debug() -> Self {
        Self {
            level: "debug".to_string(),
            ..Default::default()
        }
    }

    /// Create config with warn level
    pub fn warn() -> Self {
        Self {
            level: "warn".to_string(),
            ..Default::default()
        }
    }

    /// Set log output to file with rotation
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::File(path.into());
        self
    }

    /// Set log output to both stdout and file
    pub fn with_both<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = LogOutput::Both(path.into());
        self
    }

    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set log level filter
    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    /// Install this configuration as the global subscriber.
    ///
    /// `RUST_LOG` overrides the configured level when set. For file output
    /// the returned guard must be kept alive; dropping it flushes and stops
    /// the background writer.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use logcompat::logging::LogConfig;
    ///
    /// let _guard = LogConfig::info().init()?;
    /// # Ok::<(), logcompat::Error>(())
    /// ```
    pub fn init(self) -> Result<Option<WorkerGuard>> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| Error::InvalidConfig(format!("log level {:?}: {}", self.level, e)))?;

        let ansi = matches!(self.output, LogOutput::Stdout);
        let (writer, guard) = match &self.output {
            LogOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), None),
            LogOutput::File(path) => {
                let (non_blocking, guard) = file_writer(path);
                (BoxMakeWriter::new(non_blocking), Some(guard))
            }
            LogOutput::Both(path) => {
                let (non_blocking, guard) = file_writer(path);
                (
                    BoxMakeWriter::new(std::io::stdout.and(non_blocking)),
                    Some(guard),
                )
            }
        };

        let layer = match self.format {
            LogFormat::Pretty => fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .pretty()
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .compact()
                .boxed(),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .map_err(|e| Error::InvalidConfig(format!("logging already initialised: {}", e)))?;

        Ok(guard)
    }
}

fn file_writer(path: &Path) -> (NonBlocking, WorkerGuard) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);

    tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name))
}
