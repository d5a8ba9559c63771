//! # Event Schema
//!
//! Serialized forms of the calls the core accepts and the events it emits.
//!
//! - **Calls** name a function and carry its keyword arguments, the shape a
//!   transaction submitted to the hosting environment takes.
//! - **Events** are published to the `RegistryEventSink` after a registry
//!   mutation commits. Rejected operations publish nothing.
//! - Caller identity never appears in a call; it comes from the envelope.

use crate::domain::value_objects::{ActionName, HandlerId, Payload, PrincipalId, Value};
use serde::{Deserialize, Serialize};

// =============================================================================
// INBOUND CALLS
// =============================================================================

/// A call against the action core.
///
/// ```json
/// {"function": "interact", "kwargs": {"action": "thing", "payload": {"key": "k", "value": 1}}}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", content = "kwargs", rename_all = "snake_case")]
pub enum ActionCall {
    /// Transfer ownership of the registry.
    ChangeOwner {
        /// Principal that becomes owner.
        new_owner: PrincipalId,
    },
    /// Bind an action name to a handler module.
    RegisterAction {
        /// Action name.
        action: ActionName,
        /// Identifier of the handler module.
        contract: HandlerId,
    },
    /// Remove an action binding.
    UnregisterAction {
        /// Action name.
        action: ActionName,
    },
    /// Dispatch one payload.
    Interact {
        /// Action name.
        action: ActionName,
        /// Payload handed to the handler.
        #[serde(default)]
        payload: Payload,
    },
    /// Dispatch payloads in order, halting at the first failure.
    BulkInteract {
        /// Action name.
        action: ActionName,
        /// Payloads, processed in sequence.
        payloads: Vec<Payload>,
    },
}

impl ActionCall {
    /// Function name as it appears on the wire.
    #[must_use]
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::ChangeOwner { .. } => "change_owner",
            Self::RegisterAction { .. } => "register_action",
            Self::UnregisterAction { .. } => "unregister_action",
            Self::Interact { .. } => "interact",
            Self::BulkInteract { .. } => "bulk_interact",
        }
    }

    /// True for calls restricted to the owner.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            Self::ChangeOwner { .. } | Self::RegisterAction { .. } | Self::UnregisterAction { .. }
        )
    }
}

/// Result of a handled call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CallOutcome {
    /// Registry mutation succeeded.
    Unit,
    /// Value returned by the handler.
    Value {
        /// Handler return value.
        value: Value,
    },
    /// Every payload in the batch was processed.
    Batch {
        /// Number of payloads processed.
        processed: usize,
    },
}

// =============================================================================
// OUTBOUND EVENTS
// =============================================================================

/// Event published after a registry mutation commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// Ownership moved to a new principal.
    OwnerChanged {
        /// Owner before the transfer.
        previous: PrincipalId,
        /// Owner after the transfer.
        new: PrincipalId,
    },
    /// An action was bound.
    ActionRegistered {
        /// Action name.
        action: ActionName,
        /// Handler module it now dispatches to.
        handler_id: HandlerId,
    },
    /// An action binding was removed.
    ActionUnregistered {
        /// Action name.
        action: ActionName,
        /// Handler module it used to dispatch to.
        handler_id: HandlerId,
    },
}

impl RegistryEvent {
    /// Topic name for log and metric labels.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::OwnerChanged { .. } => topics::OWNER_CHANGED,
            Self::ActionRegistered { .. } => topics::ACTION_REGISTERED,
            Self::ActionUnregistered { .. } => topics::ACTION_UNREGISTERED,
        }
    }
}

/// Event topic names.
pub mod topics {
    /// Ownership transferred.
    pub const OWNER_CHANGED: &str = "action_core.owner_changed";
    /// Action bound.
    pub const ACTION_REGISTERED: &str = "action_core.action_registered";
    /// Action removed.
    pub const ACTION_UNREGISTERED: &str = "action_core.action_unregistered";
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_interact_call() {
        let call: ActionCall = serde_json::from_value(json!({
            "function": "interact",
            "kwargs": {"action": "thing", "payload": {"key": "test", "value": "blah"}}
        }))
        .unwrap();

        match &call {
            ActionCall::Interact { action, payload } => {
                assert_eq!(action.as_str(), "thing");
                assert_eq!(payload.get("key"), Some(&json!("test")));
            }
            other => panic!("Expected Interact, got {other:?}"),
        }
        assert_eq!(call.function_name(), "interact");
        assert!(!call.is_privileged());
    }

    #[test]
    fn test_decode_register_call() {
        let call: ActionCall = serde_json::from_value(json!({
            "function": "register_action",
            "kwargs": {"action": "thing", "contract": "example_action"}
        }))
        .unwrap();

        assert_eq!(
            call,
            ActionCall::RegisterAction {
                action: ActionName::new("thing"),
                contract: HandlerId::new("example_action"),
            }
        );
        assert!(call.is_privileged());
    }

    #[test]
    fn test_unknown_function_rejected() {
        let result = serde_json::from_value::<ActionCall>(json!({
            "function": "seed",
            "kwargs": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_event_wire_format() {
        let event = RegistryEvent::OwnerChanged {
            previous: PrincipalId::new("sys"),
            new: PrincipalId::new("stu"),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "owner_changed", "previous": "sys", "new": "stu"})
        );
        assert_eq!(event.topic(), topics::OWNER_CHANGED);
    }

    #[test]
    fn test_outcome_wire_format() {
        assert_eq!(
            serde_json::to_value(CallOutcome::Batch { processed: 3 }).unwrap(),
            json!({"outcome": "batch", "processed": 3})
        );
    }
}
