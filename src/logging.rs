use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global `tracing` subscriber.
///
/// Filtering comes from `RUST_LOG` and defaults to `info`. With `json` set,
/// each event is written as one flattened JSON object per line.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);

    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.init();
    }
}
