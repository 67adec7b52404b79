//! Logging argument generator shared by the binaries.

/// Generates a `LogArgs` struct with logging flags, parameterized by env var prefix.
///
/// # Usage
///
/// ```rust,ignore
/// govdeploy_cli_utils::define_log_args!("GOVDEPLOY");
/// ```
///
/// Env-backed fields use the given prefix: `_LOG_VERBOSITY`, `_LOG_FORMAT` and `_LOG_DIR`.
/// `_LOG_VERBOSITY` takes a number (1=ERROR … 5=TRACE), not a level name.
///
/// Also generates `impl Default for LogArgs` and `impl From<LogArgs> for LogConfig`.
/// The calling crate must depend on `clap`.
#[rustfmt::skip]
#[macro_export]
macro_rules! define_log_args {
    ($prefix:literal) => {
        /// Log-related CLI arguments.
        ///
        /// Verbosity levels: 1=ERROR, 2=WARN, 3=INFO (default), 4=DEBUG, 5=TRACE.
        /// Use `-q` to suppress console logging entirely.
        #[derive(Debug, Clone, ::clap::Parser)]
        #[command(next_help_heading = "Logging")]
        pub struct LogArgs {
            /// Increase logging verbosity (1=ERROR, 2=WARN, 3=INFO, 4=DEBUG, 5=TRACE).
            #[arg(
                short = 'v',
                long = "verbose",
                action = ::clap::ArgAction::Count,
                default_value = "3",
                env = concat!($prefix, "_LOG_VERBOSITY"),
                global = true
            )]
            pub level: u8,

            /// Suppress console logging.
            #[arg(long = "logs.stdout.quiet", alias = "quiet", short = 'q', global = true)]
            pub stdout_quiet: bool,

            /// Console log format.
            #[arg(
                long = "logs.stdout.format",
                default_value = "full",
                env = concat!($prefix, "_LOG_FORMAT"),
                global = true
            )]
            pub stdout_format: $crate::LogFormat,

            /// Directory for file logging (enables file logging when set).
            #[arg(long = "logs.file.directory", env = concat!($prefix, "_LOG_DIR"), global = true)]
            pub file_directory: Option<::std::path::PathBuf>,

            /// File log format.
            #[arg(long = "logs.file.format", default_value = "json", global = true)]
            pub file_format: $crate::LogFormat,

            /// File log rotation strategy.
            #[arg(long = "logs.file.rotation", default_value = "never", global = true)]
            pub file_rotation: $crate::LogRotation,
        }

        impl Default for LogArgs {
            fn default() -> Self {
                Self {
                    level: 3,
                    stdout_quiet: false,
                    stdout_format: $crate::LogFormat::Full,
                    file_directory: None,
                    file_format: $crate::LogFormat::Json,
                    file_rotation: $crate::LogRotation::Never,
                }
            }
        }

        impl From<LogArgs> for $crate::LogConfig {
            fn from(args: LogArgs) -> Self {
                let stdout_logs = if args.stdout_quiet {
                    None
                } else {
                    Some($crate::StdoutLogConfig { format: args.stdout_format })
                };
                let file_logs = args.file_directory.map(|dir| $crate::FileLogConfig {
                    directory_path: dir,
                    format: args.file_format,
                    rotation: args.file_rotation,
                });
                Self {
                    global_level: $crate::verbosity_to_level_filter(args.level),
                    stdout_logs,
                    file_logs,
                }
            }
        }
    };
}
