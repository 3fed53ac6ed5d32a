use tracing_subscriber::EnvFilter;

/// Initializes tracing for tests.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. The filter defaults to `info` and can be overridden through
/// `RUST_LOG`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
