//! CLI parsing helpers.

/// Parses CLI arguments, stamping the command with the calling crate's metadata.
///
/// `--version` and `--help` then show the binary package's version and description
/// from its `Cargo.toml` rather than whatever the derive picked up.
///
/// ```ignore
/// let cli = govdeploy_cli_utils::parse_cli!(Cli);
/// ```
#[macro_export]
macro_rules! parse_cli {
    ($cli_type:ty) => {{
        use $crate::clap::{CommandFactory, FromArgMatches};

        let cmd = <$cli_type>::command()
            .version(env!("CARGO_PKG_VERSION"))
            .about(env!("CARGO_PKG_DESCRIPTION"));
        let matches = cmd.get_matches();
        <$cli_type>::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }};
}
