//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this twice is harmless;
/// the second call leaves the first subscriber in place.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("transit_client={}", config.log_level)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Whether request/response bodies may be logged.
pub fn payload_logging_enabled(config: &ObservabilityConfig) -> bool {
    cfg!(debug_assertions) && config.log_payloads
}
