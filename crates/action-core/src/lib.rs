//! # Action Core - Owner-Governed Action Registry and Dispatcher
//!
//! **Component:** `action_core`
//! **Architecture:** Hexagonal (domain / ports / adapters)
//!
//! ## Purpose
//!
//! Maps human-readable action names to independently deployed handler
//! modules and routes payloads to them. One owner principal controls the
//! action table; any caller may dispatch a payload to a registered action.
//! Handlers all read and write a single shared key/value state.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Owner Gate | `domain/invariants.rs` - `ensure_owner()` |
//! | INVARIANT-2 | Unique Action Names | `domain/invariants.rs` - `ensure_unregistered()` |
//! | INVARIANT-3 | Registry Governance | `domain/invariants.rs` - `ensure_governed()` |
//! | INVARIANT-4 | Interface Conformance | `domain/invariants.rs` - `interface_violation()` |
//! | INVARIANT-5 | Bounded Batches | `domain/invariants.rs` - `ensure_batch_size()` |
//!
//! ## Security
//!
//! - **Explicit Identity**: every operation takes the caller's `PrincipalId`;
//!   verifying it is the host's job
//! - **Single Owner**: registry mutation is owner-only
//! - **Governed Handlers**: a module must be owned by the registry identity
//!   before it can be bound
//!
//! Handlers run with full access to the shared state. Nothing isolates one
//! action's keys from another's, and a failing handler's earlier writes stay.
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `ModuleResolver` | Resolve handler modules, report their owner |
//! | `StateStore` | Shared key/value state passed to handlers |
//! | `RegistryEventSink` | Receive owner/registration events |
//!
//! ## Usage Example
//!
//! ```
//! use action_core::prelude::*;
//! use serde_json::{json, Value};
//!
//! let mut core = create_test_service();
//! core.resolver_mut().submit_owned(
//!     HandlerModule::with_interact(
//!         "example_action",
//!         handler_fn(|payload, state, _caller| {
//!             let key = payload
//!                 .get("key")
//!                 .and_then(Value::as_str)
//!                 .ok_or_else(|| HandlerError::MissingField("key".into()))?;
//!             state.set(key, payload.get("value").cloned().unwrap_or(Value::Null))?;
//!             Ok(Value::Null)
//!         }),
//!     ),
//!     "action_core",
//! );
//!
//! let sys = PrincipalId::new("sys");
//! core.register_action(&sys, "thing".into(), "example_action".into())?;
//!
//! let mut payload = Payload::new();
//! payload.insert("key".into(), json!("test"));
//! payload.insert("value".into(), json!("blah"));
//! core.interact(&PrincipalId::new("anyone"), &"thing".into(), &payload)?;
//!
//! assert_eq!(core.state().value("test"), Some(&json!("blah")));
//! # Ok::<(), ActionError>(())
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
mod metrics;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{action_interface, ActionTable, FunctionSignature, ParamRole};

    // Value objects
    pub use crate::domain::value_objects::{ActionName, HandlerId, Payload, PrincipalId, Value};

    // Invariants
    pub use crate::domain::invariants::limits;

    // Ports
    pub use crate::ports::inbound::{ActionDispatchApi, ActionRegistryApi};
    pub use crate::ports::outbound::{
        handler_fn, ActionHandler, HandlerModule, ModuleResolver, RegistryEventSink, StateStore,
    };

    // Errors
    pub use crate::errors::{ActionError, CallError, ErrorKind, HandlerError, ResolveError, StateError};

    // Events
    pub use crate::events::{ActionCall, CallOutcome, RegistryEvent};

    // Adapters
    pub use crate::adapters::{
        ActionCallHandler, InMemoryEventSink, InMemoryModuleResolver, InMemoryStateStore,
        NoopEventSink,
    };

    // Service
    pub use crate::service::{create_test_service, ActionCoreService, ServiceConfig, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Component name used in logs and as the default registry identity.
pub const COMPONENT_NAME: &str = "action_core";

// =============================================================================
// TESTS
// =============================================================================
