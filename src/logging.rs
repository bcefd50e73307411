use tracing_subscriber::EnvFilter;

/// Environment variable holding a full `tracing` filter directive.
pub const LOG_ENV: &str = "NUVC_LOG";

/// Install the stderr subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("nuvc={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
