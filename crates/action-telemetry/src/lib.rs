//! # Action Telemetry
//!
//! Observability for the action core.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` console output, pretty or JSON
//! - **Metrics**: Prometheus collectors for registrations and dispatch
//!
//! ## Usage
//!
//! ```rust,no_run
//! use action_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//!
//! // Logs and metrics are now being collected
//! let scrape = action_telemetry::encode_metrics().expect("encode");
//! # let _ = scrape;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ACTION_SERVICE_NAME` / `OTEL_SERVICE_NAME` | `action-core` | Service name in logs |
//! | `ACTION_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `ACTION_JSON_LOGS` | `false` (`true` in containers) | JSON log output |
//! | `ACTION_CONSOLE_OUTPUT` | `true` | Console output |
//! | `ACTION_ENVIRONMENT` | `dev` | Deployment environment |

#![warn(missing_docs)]

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, BATCH_SIZE, INTERACTIONS, REGISTERED_ACTIONS, REGISTRATIONS,
    REGISTRY,
};
pub use tracing_setup::{env_filter, init_test_tracing, init_tracing, TracingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Global subscriber could not be installed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first (no global subscriber needed)
    register_metrics()?;

    let tracing_guard = init_tracing(config)?;

    Ok(TelemetryGuard {
        _tracing: tracing_guard,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

/// Convenience macro for recording a metric with a value.
#[macro_export]
macro_rules! metric_observe {
    ($metric:expr, $value:expr) => {
        $metric.observe($value)
    };
    ($metric:expr, $labels:expr, $value:expr) => {
        $metric.with_label_values($labels).observe($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::Config("bad level".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: bad level");
    }
}
