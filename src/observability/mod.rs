//! # Observability Infrastructure
//!
//! Structured logging setup for processes embedding the auth gate. The gate
//! itself only emits `tracing` events and `metrics` counters; wiring an
//! exporter for either is left to the embedding proxy.

use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;
use crate::errors::{AuthGateError, Result};

/// Initialize the tracing subscriber from the observability config.
///
/// `RUST_LOG` takes precedence over the configured log level. Fails if a
/// global subscriber is already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json_logging {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| AuthGateError::internal(format!("Failed to initialize tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_safe_to_call_twice() {
        let config = ObservabilityConfig::default();
        let first = init_tracing(&config);
        let second = init_tracing(&config);
        // Whichever call wins the global slot, the loser errors cleanly.
        assert!(first.is_ok() || second.is_err());
    }
}
