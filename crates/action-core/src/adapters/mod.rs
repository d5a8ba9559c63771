//! # Adapters Layer (Outer Hexagon)
//!
//! Adapters connect the action core to its host.
//!
//! - In-memory implementations of every driven port
//! - A call handler that routes serialized calls into the driving ports

pub mod event_handler;
pub mod event_sink;
pub mod module_resolver;
pub mod state_adapter;

pub use event_handler::*;
pub use event_sink::*;
pub use module_resolver::*;
pub use state_adapter::*;
