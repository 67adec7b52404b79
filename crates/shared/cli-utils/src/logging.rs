//! Validated logging configuration.
//!
//! Binaries describe their logging flags with [`define_log_args!`](crate::define_log_args)
//! and convert the parsed arguments into a [`LogConfig`], which then installs the
//! global tracing subscriber.

use std::path::PathBuf;

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Full format with timestamp, level, target and spans.
    ///
    /// Example: `2024-01-15T10:30:00.123456Z  INFO govdeploy::governance: deployed contract`
    #[default]
    Full,

    /// Compact format with minimal metadata.
    Compact,

    /// One JSON object per event.
    Json,

    /// Multi-line, human oriented output.
    Pretty,

    /// `key=value` pairs, see [`LogfmtFormatter`](crate::LogfmtFormatter).
    Logfmt,
}

/// Rotation strategy for file logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogRotation {
    /// Rotate every minute (testing only).
    Minutely,
    /// Rotate every hour.
    Hourly,
    /// Rotate every day at midnight.
    Daily,
    /// Single file, never rotated.
    #[default]
    Never,
}

/// Console log output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdoutLogConfig {
    /// Format of console events.
    pub format: LogFormat,
}

/// File log output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogConfig {
    /// Directory that receives the log files.
    pub directory_path: PathBuf,
    /// Format of file events.
    pub format: LogFormat,
    /// Rotation strategy.
    pub rotation: LogRotation,
}

/// Validated logging configuration.
///
/// Console output is written to stderr; stdout is left to the command's own output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level applied when `RUST_LOG` does not override it.
    pub global_level: LevelFilter,
    /// Console logging, `None` when quiet.
    pub stdout_logs: Option<StdoutLogConfig>,
    /// File logging, `None` when disabled.
    pub file_logs: Option<FileLogConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global_level: LevelFilter::INFO,
            stdout_logs: Some(StdoutLogConfig { format: LogFormat::Full }),
            file_logs: None,
        }
    }
}

/// Maps a `-v` count to a level filter.
///
/// `0` disables logging, `1`=ERROR, `2`=WARN, `3`=INFO, `4`=DEBUG, `5+`=TRACE.
pub const fn verbosity_to_level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
