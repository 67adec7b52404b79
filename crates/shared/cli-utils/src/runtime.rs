//! Tokio runtime construction for the one-shot binaries.

/// Builds a single-threaded Tokio runtime with IO and timers enabled.
///
/// Deployment steps run strictly in sequence.
///
/// ```no_run
/// let runtime = govdeploy_cli_utils::build_runtime().expect("runtime");
/// runtime.block_on(async {});
/// ```
pub fn build_runtime() -> eyre::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| eyre::eyre!("Failed to build tokio runtime: {e}"))
}
