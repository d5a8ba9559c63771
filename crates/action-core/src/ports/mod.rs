//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for action registration and dispatch.
//! These are the interfaces between the domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `ActionRegistryApi`, `ActionDispatchApi`
//! - **Driven Ports (Outbound)**: `ModuleResolver`, `StateStore`, `RegistryEventSink`
//! - No concrete collaborators in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
