//! Logging setup

/// Initialize env_logger for the engine.
///
/// Defaults to `info`; set RUST_LOG to change the filter, e.g.
/// `RUST_LOG=skerry=debug` to watch individual chunk loads.
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}
