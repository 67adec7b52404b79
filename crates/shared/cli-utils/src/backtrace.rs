//! Backtrace toggle for failed runs.

/// Enables backtraces on error reports.
#[derive(Debug, Clone, Copy)]
pub struct Backtracing;

impl Backtracing {
    /// Sets `RUST_BACKTRACE=1` unless the caller already chose a value.
    ///
    /// Must run before any other thread is spawned.
    pub fn enable() {
        if std::env::var_os("RUST_BACKTRACE").is_none() {
            // SAFETY: called first thing in main, before the runtime starts its workers.
            unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
        }
    }
}
