use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "ROI_CALC_LOG";
pub const DEFAULT_LOG_FILTER: &str = "roi_calc=info";

/// Filter from `ROI_CALC_LOG`, then `RUST_LOG`, then [`DEFAULT_LOG_FILTER`].
/// Unparseable directives fall through to the next source.
pub fn env_filter() -> EnvFilter {
    std::env::var(ENV_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber. Output goes to stderr because stdout
/// carries protocol frames. Calling it twice is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
