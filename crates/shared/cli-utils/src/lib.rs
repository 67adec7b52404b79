#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[doc(hidden)]
pub use clap;

mod backtrace;
pub use backtrace::Backtracing;

mod args;

mod cli;

mod logging;
pub use logging::{
    FileLogConfig, LogConfig, LogFormat, LogRotation, StdoutLogConfig, verbosity_to_level_filter,
};

mod tracing;
pub use tracing::{LogfmtFormatter, init_test_tracing};

mod runtime;
pub use runtime::build_runtime;

mod styles;
pub use styles::CliStyles;
