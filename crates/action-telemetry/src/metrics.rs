//! Prometheus metrics for the action core.
//!
//! All metrics follow the naming convention: `action_core_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: registrations and interactions by outcome
//! - **Gauge**: number of bound actions
//! - **Histogram**: payloads per batch

use lazy_static::lazy_static;
use prometheus::{exponential_buckets, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // REGISTRY METRICS
    // =========================================================================

    /// Registration attempts that passed the owner check
    pub static ref REGISTRATIONS: CounterVec = CounterVec::new(
        Opts::new("action_core_registrations_total", "Action registrations by outcome"),
        &["outcome"]  // outcome: success/failure
    ).expect("metric creation failed");

    /// Actions currently bound, summed over every service in the process
    pub static ref REGISTERED_ACTIONS: Gauge = Gauge::new(
        "action_core_registered_actions",
        "Number of actions in the action table"
    ).expect("metric creation failed");

    // =========================================================================
    // DISPATCH METRICS
    // =========================================================================

    /// Dispatched payloads
    pub static ref INTERACTIONS: CounterVec = CounterVec::new(
        Opts::new("action_core_interactions_total", "Dispatched payloads by action and outcome"),
        &["action", "outcome"]
    ).expect("metric creation failed");

    /// Payloads per bulk_interact call
    pub static ref BATCH_SIZE: Histogram = Histogram::with_opts(
        HistogramOpts::new("action_core_batch_size", "Payloads submitted per batch")
            .buckets(exponential_buckets(1.0, 4.0, 8).unwrap_or_default())
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Registering twice fails with `TelemetryError::MetricsInit`.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(REGISTRATIONS.clone()),
        Box::new(REGISTERED_ACTIONS.clone()),
        Box::new(INTERACTIONS.clone()),
        Box::new(BATCH_SIZE.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
