//! # Domain Invariants
//!
//! Guards evaluated at the top of every registry and dispatch operation.
//! Each returns the first violated precondition as an [`ActionError`] so
//! callers can `?` straight out before anything is mutated.
//!
//! - INVARIANT-1: Owner Gate (only the owner mutates the registry)
//! - INVARIANT-2: Unique Action Names (no silent re-binding)
//! - INVARIANT-3: Registry Governance (handlers are owned by the registry)
//! - INVARIANT-4: Interface Conformance (handlers export `interact`)
//! - INVARIANT-5: Bounded Batches

use crate::domain::entities::{missing_signatures, ActionTable, FunctionSignature};
use crate::domain::value_objects::{ActionName, HandlerId, PrincipalId};
use crate::errors::ActionError;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Owner Gate
///
/// The caller of a privileged operation must be the current owner.
pub fn ensure_owner(caller: &PrincipalId, owner: &PrincipalId) -> Result<(), ActionError> {
    if caller == owner {
        Ok(())
    } else {
        Err(ActionError::Unauthorized {
            caller: caller.clone(),
            owner: owner.clone(),
        })
    }
}

/// Action names must not be empty or whitespace only.
pub fn ensure_valid_action_name(action: &ActionName) -> Result<(), ActionError> {
    if action.is_blank() {
        return Err(ActionError::InvalidAction {
            reason: "action name must not be empty or whitespace".to_string(),
        });
    }
    Ok(())
}

/// INVARIANT-2: Unique Action Names
pub fn ensure_unregistered(table: &ActionTable, action: &ActionName) -> Result<(), ActionError> {
    if table.contains(action.as_str()) {
        return Err(ActionError::AlreadyRegistered {
            action: action.clone(),
        });
    }
    Ok(())
}

/// The action must currently be bound; returns its handler.
pub fn ensure_registered<'a>(
    table: &'a ActionTable,
    action: &ActionName,
) -> Result<&'a HandlerId, ActionError> {
    table
        .get(action.as_str())
        .ok_or_else(|| ActionError::ActionNotFound {
            action: action.clone(),
        })
}

/// INVARIANT-3: Registry Governance
///
/// A handler module is accepted only when the registry itself owns it.
pub fn ensure_governed(
    handler_id: &HandlerId,
    module_owner: Option<&PrincipalId>,
    registry_id: &PrincipalId,
) -> Result<(), ActionError> {
    if module_owner == Some(registry_id) {
        Ok(())
    } else {
        Err(ActionError::NotGoverned {
            handler_id: handler_id.clone(),
            registry: registry_id.clone(),
            owner: module_owner.cloned(),
        })
    }
}

/// INVARIANT-4: Interface Conformance
///
/// Builds the rejection for a module the resolver reported as
/// non-conforming. Lists every required signature the module fails to
/// export; if its descriptors look complete, the whole required set is named.
#[must_use]
pub fn interface_violation(
    handler_id: &HandlerId,
    exported: &[FunctionSignature],
    required: &[FunctionSignature],
) -> ActionError {
    let mut missing: Vec<String> = missing_signatures(exported, required)
        .iter()
        .map(ToString::to_string)
        .collect();
    if missing.is_empty() {
        missing = required.iter().map(ToString::to_string).collect();
    }
    ActionError::InterfaceViolation {
        handler_id: handler_id.clone(),
        missing,
    }
}

/// INVARIANT-5: Bounded Batches
///
/// Checked before the first item runs, so an oversized batch has no effects.
pub fn ensure_batch_size(size: usize, max: usize) -> Result<(), ActionError> {
    if size > max {
        return Err(ActionError::BatchTooLarge { size, max });
    }
    Ok(())
}

// =============================================================================
// LIMITS
// =============================================================================

/// Default limits.
pub mod limits {
    /// Maximum payloads accepted by a single `bulk_interact`.
    pub const MAX_BATCH_SIZE: usize = 10_000;

    /// Identity the registry uses when none is configured.
    pub const DEFAULT_REGISTRY_ID: &str = "action_core";
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{action_interface, ParamRole};
    use crate::errors::ErrorKind;

    #[test]
    fn test_owner_gate() {
        let sys = PrincipalId::new("sys");
        assert!(ensure_owner(&sys, &sys).is_ok());

        let err = ensure_owner(&PrincipalId::new("not_sys"), &sys).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn test_blank_action_name_rejected() {
        let err = ensure_valid_action_name(&ActionName::new("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        // Whitespace-only names are rejected like empty ones
        let err = ensure_valid_action_name(&ActionName::new(" \t ")).unwrap_err();
        assert!(err.to_string().contains("empty or whitespace"));

        assert!(ensure_valid_action_name(&ActionName::new("thing")).is_ok());
        assert!(ensure_valid_action_name(&ActionName::new(" thing ")).is_ok());
    }

    #[test]
    fn test_unique_and_registered() {
        let mut table = ActionTable::new();
        let thing = ActionName::new("thing");

        assert!(ensure_unregistered(&table, &thing).is_ok());
        assert_eq!(
            ensure_registered(&table, &thing).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        table.insert_new(thing.clone(), HandlerId::new("example_action"));

        assert_eq!(
            ensure_unregistered(&table, &thing).unwrap_err().kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            ensure_registered(&table, &thing).unwrap(),
            &HandlerId::new("example_action")
        );
    }

    #[test]
    fn test_governance() {
        let registry = PrincipalId::new("action_core");
        let handler = HandlerId::new("example_action");

        assert!(ensure_governed(&handler, Some(&registry), &registry).is_ok());
        assert!(ensure_governed(&handler, None, &registry).is_err());

        let other = PrincipalId::new("sys");
        let err = ensure_governed(&handler, Some(&other), &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn test_interface_violation_lists_missing() {
        let handler = HandlerId::new("bad_action");
        let bad = vec![FunctionSignature::new(
            "not_interact",
            vec![ParamRole::Payload, ParamRole::State, ParamRole::Caller],
        )];

        match interface_violation(&handler, &bad, &action_interface()) {
            ActionError::InterfaceViolation { handler_id, missing } => {
                assert_eq!(handler_id, handler);
                assert_eq!(missing, vec!["interact(payload, state, caller)".to_string()]);
            }
            other => panic!("Expected InterfaceViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_interface_violation_falls_back_to_required_set() {
        let handler = HandlerId::new("example_action");
        let err = interface_violation(&handler, &action_interface(), &action_interface());
        assert_eq!(err.kind(), ErrorKind::InterfaceViolation);
        assert!(err.to_string().contains("interact(payload, state, caller)"));
    }

    #[test]
    fn test_batch_size() {
        assert!(ensure_batch_size(0, 3).is_ok());
        assert!(ensure_batch_size(3, 3).is_ok());
        assert!(matches!(
            ensure_batch_size(4, 3),
            Err(ActionError::BatchTooLarge { size: 4, max: 3 })
        ));
    }
}
