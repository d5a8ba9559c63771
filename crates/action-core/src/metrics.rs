//! Metric hooks called by the service.
//!
//! With the `metrics` feature these feed the Prometheus collectors in
//! `action-telemetry`; without it they compile to nothing.
//!
//! The collectors are process-global and may be shared by several services,
//! so the bound-actions gauge only moves by deltas.

/// Outcome label for a successful operation.
pub(crate) const SUCCESS: &str = "success";
/// Outcome label for a failed operation.
pub(crate) const FAILURE: &str = "failure";
/// Action label for dispatches naming an unbound action.
pub(crate) const UNKNOWN_ACTION: &str = "unknown";

#[cfg(feature = "metrics")]
mod enabled {
    use action_telemetry::{
        metric_inc, metric_observe, BATCH_SIZE, INTERACTIONS, REGISTERED_ACTIONS, REGISTRATIONS,
    };

    pub(crate) fn action_bound() {
        REGISTERED_ACTIONS.inc();
    }

    pub(crate) fn action_unbound() {
        REGISTERED_ACTIONS.dec();
    }

    pub(crate) fn registration(outcome: &str) {
        metric_inc!(REGISTRATIONS, &[outcome]);
    }

    pub(crate) fn interaction(action: &str, outcome: &str) {
        metric_inc!(INTERACTIONS, &[action, outcome]);
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn batch_size(size: usize) {
        metric_observe!(BATCH_SIZE, size as f64);
    }
}

#[cfg(not(feature = "metrics"))]
mod enabled {
    pub(crate) fn action_bound() {}

    pub(crate) fn action_unbound() {}

    pub(crate) fn registration(_outcome: &str) {}

    pub(crate) fn interaction(_action: &str, _outcome: &str) {}

    pub(crate) fn batch_size(_size: usize) {}
}

pub(crate) use enabled::{action_bound, action_unbound, batch_size, interaction, registration};
