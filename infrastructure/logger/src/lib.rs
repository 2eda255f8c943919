mod tracing_logger;

pub use tracing_logger::TracingLogger;

/// Installs the global fmt subscriber, filtered by `RUST_LOG` or
/// `default_filter` when it is unset.
pub fn init_tracing(default_filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}
