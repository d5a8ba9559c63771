//! # Driving Ports (API - Inbound)
//!
//! These are the interfaces exposed by the action core.
//!
//! - `ActionRegistryApi`: owner-gated registration (plus read accessors)
//! - `ActionDispatchApi`: open to any caller
//!
//! Every operation receives the caller's identity explicitly. The identity is
//! assumed to be verified by whoever hosts the core.

use crate::domain::value_objects::{ActionName, HandlerId, Payload, PrincipalId, Value};
use crate::errors::ActionError;

// =============================================================================
// ACTION REGISTRY API
// =============================================================================

/// Owner-gated management of the action table.
///
/// ## Access Control
///
/// `change_owner`, `register_action` and `unregister_action` fail with
/// `ActionError::Unauthorized` unless `caller` is the current owner. A failed
/// call leaves owner and table untouched.
pub trait ActionRegistryApi {
    /// Current owner.
    fn owner(&self) -> &PrincipalId;

    /// Replace the owner.
    fn change_owner(
        &mut self,
        caller: &PrincipalId,
        new_owner: PrincipalId,
    ) -> Result<(), ActionError>;

    /// Bind `action` to the module resolved from `handler_id`.
    ///
    /// Preconditions, checked in order:
    /// 1. `caller` is the owner
    /// 2. `action` is not already bound
    /// 3. the module resolves
    /// 4. the module is owned by the registry
    /// 5. the module exports `interact(payload, state, caller)`
    fn register_action(
        &mut self,
        caller: &PrincipalId,
        action: ActionName,
        handler_id: HandlerId,
    ) -> Result<(), ActionError>;

    /// Remove the binding for `action` entirely.
    fn unregister_action(
        &mut self,
        caller: &PrincipalId,
        action: &ActionName,
    ) -> Result<(), ActionError>;

    /// Handler bound to `action`, if any.
    fn handler_for(&self, action: &ActionName) -> Option<&HandlerId>;

    /// True if `action` is bound.
    fn is_registered(&self, action: &ActionName) -> bool {
        self.handler_for(action).is_some()
    }

    /// All bound action names, sorted.
    fn actions(&self) -> Vec<ActionName>;
}

// =============================================================================
// ACTION DISPATCH API
// =============================================================================

/// Dispatch of payloads to registered handlers.
pub trait ActionDispatchApi {
    /// Run the handler bound to `action` with `payload`.
    ///
    /// # Returns
    ///
    /// * `Value` - Whatever the handler returned, unmodified
    ///
    /// # Errors
    ///
    /// * `ActionError::ActionNotFound` - `action` is not bound
    /// * `ActionError::Handler` - the handler failed; its partial writes stay
    fn interact(
        &mut self,
        caller: &PrincipalId,
        action: &ActionName,
        payload: &Payload,
    ) -> Result<Value, ActionError>;

    /// Run `interact` for each payload in order.
    ///
    /// Later payloads observe the writes of earlier ones. The first failure
    /// is returned immediately; payloads after it never run, and writes made
    /// before it are kept.
    fn bulk_interact(
        &mut self,
        caller: &PrincipalId,
        action: &ActionName,
        payloads: &[Payload],
    ) -> Result<(), ActionError>;
}
