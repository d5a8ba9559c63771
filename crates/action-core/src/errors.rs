//! # Error Types
//!
//! All error types for action registration and dispatch.

use crate::domain::value_objects::{ActionName, HandlerId, PrincipalId};
use thiserror::Error;

// =============================================================================
// ERROR KIND
// =============================================================================

/// Coarse classification of an [`ActionError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller is not the owner, or a module is not governed by the registry.
    Authorization,
    /// Action name already registered.
    Conflict,
    /// Unknown action, or the resolver cannot locate a handler module.
    NotFound,
    /// Candidate module does not expose the required interface.
    InterfaceViolation,
    /// Failure raised by a handler (or its state writes) during `interact`.
    Handler,
    /// Malformed request (blank action name, oversized batch).
    InvalidInput,
}

// =============================================================================
// ACTION ERRORS
// =============================================================================

/// Errors returned by registry and dispatch operations.
#[derive(Debug, Error, Clone)]
pub enum ActionError {
    /// Owner-only operation invoked by someone else.
    #[error("only owner can call: caller {caller} is not owner {owner}")]
    Unauthorized {
        caller: PrincipalId,
        owner: PrincipalId,
    },

    /// Handler module is not owned by this registry.
    #[error("registry {registry} must control the action contract {handler_id} (owner: {owner:?})")]
    NotGoverned {
        handler_id: HandlerId,
        registry: PrincipalId,
        owner: Option<PrincipalId>,
    },

    /// Action name already present in the action table.
    #[error("action already registered: {action}")]
    AlreadyRegistered { action: ActionName },

    /// Action name absent from the action table.
    #[error("action does not exist: {action}")]
    ActionNotFound { action: ActionName },

    /// Module resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Handler module does not follow the required interface.
    #[error("action contract {handler_id} does not follow the required interface, missing: {}", .missing.join(", "))]
    InterfaceViolation {
        handler_id: HandlerId,
        missing: Vec<String>,
    },

    /// Action name rejected before touching the table.
    #[error("invalid action: {reason}")]
    InvalidAction { reason: String },

    /// Batch exceeds the configured maximum.
    #[error("batch too large: {size} > {max} payloads")]
    BatchTooLarge { size: usize, max: usize },

    /// Error raised by a handler, passed through untouched.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl ActionError {
    /// Maps this error onto the coarse taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } | Self::NotGoverned { .. } => ErrorKind::Authorization,
            Self::AlreadyRegistered { .. } => ErrorKind::Conflict,
            Self::ActionNotFound { .. } | Self::Resolve(ResolveError::ModuleNotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::InterfaceViolation { .. } => ErrorKind::InterfaceViolation,
            Self::Handler(_) => ErrorKind::Handler,
            Self::InvalidAction { .. } | Self::BatchTooLarge { .. } => ErrorKind::InvalidInput,
        }
    }
}

// =============================================================================
// RESOLVE ERRORS
// =============================================================================

/// Errors from the module resolver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No module has been submitted under this identifier.
    #[error("module not found: {0}")]
    ModuleNotFound(HandlerId),
}

// =============================================================================
// HANDLER ERRORS
// =============================================================================

/// Errors a handler may raise from `interact`.
#[derive(Debug, Error, Clone)]
pub enum HandlerError {
    /// Payload lacks a field the handler requires.
    #[error("payload is missing field `{0}`")]
    MissingField(String),

    /// Payload field has the wrong shape.
    #[error("payload field `{field}` is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    /// Handler refused to process the payload.
    #[error("{0}")]
    Rejected(String),

    /// Shared state access failed.
    #[error(transparent)]
    State(#[from] StateError),
}

// =============================================================================
// STATE ERRORS
// =============================================================================

/// Errors from the external shared state store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Store cannot be reached.
    #[error("state store unavailable")]
    Unavailable,

    /// Store refused the access.
    #[error("state access denied for key: {0}")]
    AccessDenied(String),

    /// Other store error.
    #[error("state error: {0}")]
    Other(String),
}

// =============================================================================
// CALL ERRORS
// =============================================================================

/// Errors from the serialized call adapter.
#[derive(Debug, Error, Clone)]
pub enum CallError {
    /// Call could not be decoded.
    #[error("call decode failed: {0}")]
    Decode(String),

    /// Call decoded but the operation failed.
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl From<serde_json::Error> for CallError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::AlreadyRegistered {
            action: ActionName::new("thing"),
        };
        assert_eq!(err.to_string(), "action already registered: thing");

        let err = ActionError::Unauthorized {
            caller: PrincipalId::new("not_sys"),
            owner: PrincipalId::new("sys"),
        };
        assert!(err.to_string().contains("only owner can call"));
        assert!(err.to_string().contains("not_sys"));
    }

    #[test]
    fn test_error_kinds() {
        let not_found: ActionError =
            ResolveError::ModuleNotFound(HandlerId::new("doesnt_exist")).into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let governed = ActionError::NotGoverned {
            handler_id: HandlerId::new("example_action"),
            registry: PrincipalId::new("action_core"),
            owner: None,
        };
        assert_eq!(governed.kind(), ErrorKind::Authorization);

        let violation = ActionError::InterfaceViolation {
            handler_id: HandlerId::new("bad_action"),
            missing: vec!["interact(payload, state, caller)".to_string()],
        };
        assert_eq!(violation.kind(), ErrorKind::InterfaceViolation);
        assert!(violation.to_string().contains("interact(payload, state, caller)"));
    }

    #[test]
    fn test_handler_error_passes_through_unchanged() {
        let inner = HandlerError::Rejected("second item refused".to_string());
        let err: ActionError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.kind(), ErrorKind::Handler);
    }

    #[test]
    fn test_state_error_conversion() {
        let handler_err: HandlerError = StateError::Unavailable.into();
        assert!(matches!(handler_err, HandlerError::State(StateError::Unavailable)));
    }

    #[test]
    fn test_call_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CallError = json_err.into();
        assert!(matches!(err, CallError::Decode(_)));
    }
}
