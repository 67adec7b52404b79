#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod cli;

use dotenvy::dotenv;
use tracing::error;

fn main() {
    govdeploy_cli_utils::Backtracing::enable();
    dotenv().ok();

    let cli = govdeploy_cli_utils::parse_cli!(cli::Cli);
    let console_logs = cli.console_logs_enabled();

    if let Err(err) = cli.run() {
        if console_logs {
            error!(error = %err, "Deployment failed");
        } else {
            // Console logging is off; the failure still has to surface.
            eprintln!("Error: {err:#}");
        }
        std::process::exit(1);
    }
}
