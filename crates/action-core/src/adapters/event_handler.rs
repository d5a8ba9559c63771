//! # Call Handler Adapter
//!
//! Decodes serialized `ActionCall`s and routes them into the core.
//!
//! - Caller identity comes from the envelope, never from the call body
//! - Decode failures are reported before any operation runs
//! - Privileged calls are routed unchanged; the core enforces ownership

use crate::domain::value_objects::PrincipalId;
use crate::errors::CallError;
use crate::events::{ActionCall, CallOutcome};
use crate::ports::inbound::{ActionDispatchApi, ActionRegistryApi};
use tracing::{debug, warn};

/// Routes decoded calls to an action core.
pub struct ActionCallHandler<T> {
    core: T,
}

impl<T: ActionRegistryApi + ActionDispatchApi> ActionCallHandler<T> {
    /// Wrap a core.
    pub fn new(core: T) -> Self {
        Self { core }
    }

    /// The wrapped core.
    pub fn core(&self) -> &T {
        &self.core
    }

    /// The wrapped core, mutably.
    pub fn core_mut(&mut self) -> &mut T {
        &mut self.core
    }

    /// Unwrap the core.
    pub fn into_inner(self) -> T {
        self.core
    }

    /// Handle a decoded call on behalf of `caller`.
    pub fn handle(
        &mut self,
        caller: &PrincipalId,
        call: ActionCall,
    ) -> Result<CallOutcome, CallError> {
        let function = call.function_name();
        debug!(caller = %caller, function, privileged = call.is_privileged(), "Handling call");

        let outcome = match call {
            ActionCall::ChangeOwner { new_owner } => {
                self.core.change_owner(caller, new_owner)?;
                CallOutcome::Unit
            }
            ActionCall::RegisterAction { action, contract } => {
                self.core.register_action(caller, action, contract)?;
                CallOutcome::Unit
            }
            ActionCall::UnregisterAction { action } => {
                self.core.unregister_action(caller, &action)?;
                CallOutcome::Unit
            }
            ActionCall::Interact { action, payload } => {
                let value = self.core.interact(caller, &action, &payload)?;
                CallOutcome::Value { value }
            }
            ActionCall::BulkInteract { action, payloads } => {
                self.core.bulk_interact(caller, &action, &payloads)?;
                CallOutcome::Batch {
                    processed: payloads.len(),
                }
            }
        };

        Ok(outcome)
    }

    /// Decode a JSON call and handle it.
    pub fn handle_json(&mut self, caller: &PrincipalId, raw: &str) -> Result<CallOutcome, CallError> {
        let call: ActionCall = serde_json::from_str(raw).map_err(|e| {
            warn!(caller = %caller, error = %e, "Rejected undecodable call");
            CallError::from(e)
        })?;
        self.handle(caller, call)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ActionName, Payload};
    use crate::errors::{ActionError, ErrorKind};
    use crate::ports::outbound::{handler_fn, HandlerModule};
    use crate::service::create_test_service;
    use serde_json::{json, Value};

    fn handler() -> ActionCallHandler<
        crate::service::ActionCoreService<
            crate::adapters::InMemoryModuleResolver,
            crate::adapters::InMemoryStateStore,
            crate::adapters::InMemoryEventSink,
        >,
    > {
        let mut service = create_test_service();
        service.resolver_mut().submit_owned(
            HandlerModule::with_interact(
                "counter",
                handler_fn(|payload, state, _caller| {
                    let by = payload.get("by").and_then(Value::as_i64).unwrap_or(1);
                    let current = state.get("count")?.and_then(|v| v.as_i64()).unwrap_or(0);
                    state.set("count", json!(current + by))?;
                    Ok(json!(current + by))
                }),
            ),
            "action_core",
        );
        ActionCallHandler::new(service)
    }

    fn sys() -> PrincipalId {
        PrincipalId::new("sys")
    }

    #[test]
    fn test_json_register_and_interact() {
        let mut handler = handler();

        let outcome = handler
            .handle_json(
                &sys(),
                r#"{"function": "register_action", "kwargs": {"action": "count", "contract": "counter"}}"#,
            )
            .unwrap();
        assert_eq!(outcome, CallOutcome::Unit);

        let outcome = handler
            .handle_json(
                &PrincipalId::new("anyone"),
                r#"{"function": "interact", "kwargs": {"action": "count", "payload": {"by": 5}}}"#,
            )
            .unwrap();
        assert_eq!(outcome, CallOutcome::Value { value: json!(5) });
    }

    #[test]
    fn test_interact_payload_defaults_to_empty() {
        let mut handler = handler();
        handler
            .handle(
                &sys(),
                ActionCall::RegisterAction {
                    action: ActionName::new("count"),
                    contract: "counter".into(),
                },
            )
            .unwrap();

        let outcome = handler
            .handle_json(&sys(), r#"{"function": "interact", "kwargs": {"action": "count"}}"#)
            .unwrap();
        assert_eq!(outcome, CallOutcome::Value { value: json!(1) });
    }

    #[test]
    fn test_bulk_reports_processed() {
        let mut handler = handler();
        handler
            .handle(
                &sys(),
                ActionCall::RegisterAction {
                    action: ActionName::new("count"),
                    contract: "counter".into(),
                },
            )
            .unwrap();

        let outcome = handler
            .handle(
                &sys(),
                ActionCall::BulkInteract {
                    action: ActionName::new("count"),
                    payloads: vec![Payload::new(), Payload::new(), Payload::new()],
                },
            )
            .unwrap();
        assert_eq!(outcome, CallOutcome::Batch { processed: 3 });
        assert_eq!(
            handler.core().state().value("count"),
            Some(&json!(3))
        );
    }

    #[test]
    fn test_privileged_call_from_stranger() {
        let mut handler = handler();
        let err = handler
            .handle_json(
                &PrincipalId::new("not_sys"),
                r#"{"function": "change_owner", "kwargs": {"new_owner": "not_sys"}}"#,
            )
            .unwrap_err();

        match err {
            CallError::Action(inner) => assert_eq!(inner.kind(), ErrorKind::Authorization),
            other => panic!("Expected authorization failure, got {other:?}"),
        }
        assert_eq!(handler.core().owner(), &sys());
    }

    #[test]
    fn test_unknown_function_rejected() {
        let mut handler = handler();
        let err = handler
            .handle_json(&sys(), r#"{"function": "self_destruct", "kwargs": {}}"#)
            .unwrap_err();
        assert!(matches!(err, CallError::Decode(_)));
        assert_eq!(handler.core().stats().rejected_requests, 0);
    }

    #[test]
    fn test_unregister_unknown_via_call() {
        let mut handler = handler();
        let err = handler
            .handle(
                &sys(),
                ActionCall::UnregisterAction {
                    action: ActionName::new("missing"),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CallError::Action(ActionError::ActionNotFound { .. })
        ));
    }
}
