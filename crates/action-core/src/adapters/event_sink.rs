//! # Event Sink Adapter
//!
//! Records registry events in memory. Hosts that forward events elsewhere
//! implement `RegistryEventSink` themselves.

use crate::events::RegistryEvent;
use crate::ports::outbound::RegistryEventSink;
use tracing::debug;

/// Event sink that keeps every published event in order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventSink {
    events: Vec<RegistryEvent>,
}

impl InMemoryEventSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }
}

impl RegistryEventSink for InMemoryEventSink {
    fn publish(&mut self, event: RegistryEvent) {
        debug!(topic = event.topic(), "Registry event published");
        self.events.push(event);
    }
}

/// Event sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl RegistryEventSink for NoopEventSink {
    fn publish(&mut self, _event: RegistryEvent) {}
}

// =============================================================================
// TESTS
// =============================================================================
