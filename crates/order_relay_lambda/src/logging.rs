use tracing_subscriber::EnvFilter;

/// Installs the JSON log formatter used by every relay binary.
///
/// CloudWatch stamps ingestion time, so timestamps and targets are omitted.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
