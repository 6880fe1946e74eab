//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g.
/// `RUST_LOG=tilecover::route=debug` to see per-call planner summaries.
///
/// # Example
/// ```no_run
/// tilecover::core::logging::init();
/// log::info!("Planner ready");
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}
