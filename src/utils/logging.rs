// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up the logging framework using tracing_subscriber.
/// Reads log level filters from the `RUST_LOG` environment variable.
/// Falls back to `default_level` if `RUST_LOG` is not set.
pub fn setup_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("Logging setup complete (default level: {}).", default_level);
}
