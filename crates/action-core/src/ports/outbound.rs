//! # Driven Ports (SPI - Outbound)
//!
//! These are the interfaces the action core depends on.
//! External adapters implement these traits to provide:
//! - The shared key/value state handlers mutate
//! - Resolution of handler modules by identifier
//! - Delivery of registry events
//!
//! Handler modules themselves are modelled here too: a module is a named set
//! of exported functions, each described by a [`FunctionSignature`] and backed
//! by an [`ActionHandler`].

use crate::domain::entities::{missing_signatures, FunctionSignature};
use crate::domain::value_objects::{HandlerId, Payload, PrincipalId, Value};
use crate::errors::{HandlerError, ResolveError, StateError};
use crate::events::RegistryEvent;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// SHARED STATE STORE
// =============================================================================

/// Interface to the shared, globally visible key/value state.
///
/// The core passes this straight through to handlers. It imposes no key
/// namespacing and never rolls back writes.
pub trait StateStore: Send + Sync {
    /// Get the value stored under `key`.
    ///
    /// # Returns
    ///
    /// * `Some(Value)` - If the key has been written
    /// * `None` - If the key is absent
    fn get(&self, key: &str) -> Result<Option<Value>, StateError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StateError>;

    /// Check whether `key` is present.
    fn contains(&self, key: &str) -> Result<bool, StateError> {
        Ok(self.get(key)?.is_some())
    }
}

// =============================================================================
// HANDLER ENTRYPOINT
// =============================================================================

/// An exported handler function: `interact(payload, state, caller)`.
///
/// Handlers are independently authored. Whatever they return is handed back
/// to the dispatcher's caller unmodified, and so are their errors.
pub trait ActionHandler: Send + Sync {
    /// Process `payload` against the shared `state` on behalf of `caller`.
    fn interact(
        &self,
        payload: &Payload,
        state: &mut dyn StateStore,
        caller: &PrincipalId,
    ) -> Result<Value, HandlerError>;
}

impl<F> ActionHandler for F
where
    F: Fn(&Payload, &mut dyn StateStore, &PrincipalId) -> Result<Value, HandlerError>
        + Send
        + Sync,
{
    fn interact(
        &self,
        payload: &Payload,
        state: &mut dyn StateStore,
        caller: &PrincipalId,
    ) -> Result<Value, HandlerError> {
        self(payload, state, caller)
    }
}

/// Pins a closure to the handler call shape so its argument types are inferred.
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&Payload, &mut dyn StateStore, &PrincipalId) -> Result<Value, HandlerError>
        + Send
        + Sync,
{
    f
}

// =============================================================================
// HANDLER MODULE
// =============================================================================

/// A function exported by a module.
#[derive(Clone)]
struct ExportedFunction {
    signature: FunctionSignature,
    body: Arc<dyn ActionHandler>,
}

/// A loadable handler module: a name plus its exported functions.
#[derive(Clone)]
pub struct HandlerModule {
    name: HandlerId,
    exports: Vec<ExportedFunction>,
}

impl HandlerModule {
    /// Creates a module with no exports.
    #[must_use]
    pub fn new(name: impl Into<HandlerId>) -> Self {
        Self {
            name: name.into(),
            exports: Vec::new(),
        }
    }

    /// Creates a module exporting `handler` as `interact(payload, state, caller)`.
    #[must_use]
    pub fn with_interact(name: impl Into<HandlerId>, handler: impl ActionHandler + 'static) -> Self {
        Self::new(name).export(FunctionSignature::interact(), handler)
    }

    /// Adds an exported function.
    #[must_use]
    pub fn export(
        mut self,
        signature: FunctionSignature,
        handler: impl ActionHandler + 'static,
    ) -> Self {
        self.exports.push(ExportedFunction {
            signature,
            body: Arc::new(handler),
        });
        self
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &HandlerId {
        &self.name
    }

    /// Signatures of every exported function, in export order.
    #[must_use]
    pub fn signatures(&self) -> Vec<FunctionSignature> {
        self.exports.iter().map(|f| f.signature.clone()).collect()
    }

    /// Exported function exactly matching `signature`.
    #[must_use]
    pub fn function(&self, signature: &FunctionSignature) -> Option<&dyn ActionHandler> {
        self.exports
            .iter()
            .find(|f| &f.signature == signature)
            .map(|f| f.body.as_ref())
    }

    /// The `interact(payload, state, caller)` entrypoint, if exported.
    #[must_use]
    pub fn entrypoint(&self) -> Option<&dyn ActionHandler> {
        self.function(&FunctionSignature::interact())
    }
}

impl fmt::Debug for HandlerModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exports: Vec<String> = self.exports.iter().map(|e| e.signature.to_string()).collect();
        f.debug_struct("HandlerModule")
            .field("name", &self.name)
            .field("exports", &exports)
            .finish()
    }
}

// =============================================================================
// MODULE RESOLVER
// =============================================================================

/// Interface to the environment that loads handler modules.
///
/// ## Implementation Notes
///
/// Resolution must be side-effect free: the registry resolves a module
/// before deciding whether to accept it.
pub trait ModuleResolver: Send + Sync {
    /// Load the module submitted under `handler_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(module)` - If a module exists under this identifier
    /// * `Err(ResolveError::ModuleNotFound)` - Otherwise
    fn resolve(&self, handler_id: &HandlerId) -> Result<Arc<HandlerModule>, ResolveError>;

    /// Current owner of `module`, or `None` if it has no governor.
    fn owner_of(&self, module: &HandlerModule) -> Option<PrincipalId>;

    /// Check that `module` exports every signature in `required`.
    fn satisfies_interface(&self, module: &HandlerModule, required: &[FunctionSignature]) -> bool {
        missing_signatures(&module.signatures(), required).is_empty()
    }
}

// =============================================================================
// REGISTRY EVENT SINK
// =============================================================================

/// Receives registry events after each committed mutation.
pub trait RegistryEventSink: Send + Sync {
    /// Deliver one event.
    fn publish(&mut self, event: RegistryEvent);
}

// =============================================================================
// TESTS
// =============================================================================
