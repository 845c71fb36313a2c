use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GRNA_REPORT_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Installs the stderr subscriber. Honours `GRNA_REPORT_LOG`; a second
/// call is a no-op so tests and embedders can call it freely.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    init_with_filter(filter);
}

pub fn init_with_filter(filter: impl Into<EnvFilter>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter.into())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
