//! # Core Domain Entities
//!
//! The action table and the capability descriptors used to verify handler
//! modules before they are accepted.

use crate::domain::value_objects::{ActionName, HandlerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// FUNCTION SIGNATURE
// =============================================================================

/// Role of a parameter in an exported function.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRole {
    /// The request payload mapping.
    Payload,
    /// Handle to the shared state store.
    State,
    /// Identity of the invoking principal.
    Caller,
    /// Any other named parameter.
    Named(String),
}

impl ParamRole {
    /// Parameter name as written in a signature.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Payload => "payload",
            Self::State => "state",
            Self::Caller => "caller",
            Self::Named(name) => name,
        }
    }
}

/// Data description of an exported function: its name plus ordered
/// parameter roles.
///
/// Two signatures match only if name, arity and every role agree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// Function name.
    pub name: String,
    /// Ordered parameter roles.
    pub params: Vec<ParamRole>,
}

impl FunctionSignature {
    /// Name of the dispatch entrypoint every handler must export.
    pub const INTERACT: &'static str = "interact";

    /// Creates a signature.
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<ParamRole>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// The required handler entrypoint: `interact(payload, state, caller)`.
    #[must_use]
    pub fn interact() -> Self {
        Self::new(
            Self::INTERACT,
            vec![ParamRole::Payload, ParamRole::State, ParamRole::Caller],
        )
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(param.name())?;
        }
        f.write_str(")")
    }
}

/// The interface every action handler must satisfy.
#[must_use]
pub fn action_interface() -> Vec<FunctionSignature> {
    vec![FunctionSignature::interact()]
}

/// Returns the required signatures that `exported` does not provide.
#[must_use]
pub fn missing_signatures<'a>(
    exported: &[FunctionSignature],
    required: &'a [FunctionSignature],
) -> Vec<&'a FunctionSignature> {
    required
        .iter()
        .filter(|sig| !exported.contains(sig))
        .collect()
}

// =============================================================================
// ACTION TABLE
// =============================================================================

/// Mapping from action name to handler identifier.
///
/// Removal deletes the entry: a removed action is indistinguishable from one
/// that was never registered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionTable {
    entries: HashMap<ActionName, HandlerId>,
}

impl ActionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler bound to `action`, if any.
    #[must_use]
    pub fn get(&self, action: &str) -> Option<&HandlerId> {
        self.entries.get(action)
    }

    /// True if `action` is bound.
    #[must_use]
    pub fn contains(&self, action: &str) -> bool {
        self.entries.contains_key(action)
    }

    /// Binds `action` to `handler` unless it is already bound.
    ///
    /// Returns false, leaving the existing binding untouched, on conflict.
    pub fn insert_new(&mut self, action: ActionName, handler: HandlerId) -> bool {
        use std::collections::hash_map::Entry;

        match self.entries.entry(action) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(handler);
                true
            }
        }
    }

    /// Removes `action`, returning the handler it was bound to.
    pub fn remove(&mut self, action: &str) -> Option<HandlerId> {
        self.entries.remove(action)
    }

    /// Number of bound actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bound action names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<ActionName> {
        let mut names: Vec<ActionName> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interact_signature_display() {
        assert_eq!(
            FunctionSignature::interact().to_string(),
            "interact(payload, state, caller)"
        );
    }

    #[test]
    fn test_signature_match_requires_name_and_roles() {
        let exact = FunctionSignature::interact();
        let renamed = FunctionSignature::new(
            "not_interact",
            vec![ParamRole::Payload, ParamRole::State, ParamRole::Caller],
        );
        let short = FunctionSignature::new("interact", vec![ParamRole::Payload, ParamRole::State]);
        let reordered = FunctionSignature::new(
            "interact",
            vec![ParamRole::State, ParamRole::Payload, ParamRole::Caller],
        );

        let required = action_interface();
        assert!(missing_signatures(&[exact], &required).is_empty());
        assert_eq!(missing_signatures(&[renamed], &required).len(), 1);
        assert_eq!(missing_signatures(&[short], &required).len(), 1);
        assert_eq!(missing_signatures(&[reordered], &required).len(), 1);
    }

    #[test]
    fn test_extra_exports_are_allowed() {
        let exported = vec![
            FunctionSignature::new("helper", vec![ParamRole::Named("x".to_string())]),
            FunctionSignature::interact(),
        ];
        assert!(missing_signatures(&exported, &action_interface()).is_empty());
    }

    #[test]
    fn test_table_insert_new_conflict_keeps_original() {
        let mut table = ActionTable::new();
        assert!(table.insert_new("thing".into(), "h1".into()));
        assert!(!table.insert_new("thing".into(), "h2".into()));
        assert_eq!(table.get("thing"), Some(&HandlerId::new("h1")));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_remove_is_full_removal() {
        let mut table = ActionTable::new();
        table.insert_new("thing".into(), "h1".into());

        assert_eq!(table.remove("thing"), Some(HandlerId::new("h1")));
        assert!(!table.contains("thing"));
        assert!(table.get("thing").is_none());
        assert!(table.is_empty());
        assert!(table.names().is_empty());

        // Re-registration after removal behaves like a fresh insert
        assert!(table.insert_new("thing".into(), "h2".into()));
    }

    #[test]
    fn test_table_names_sorted() {
        let mut table = ActionTable::new();
        table.insert_new("thing2".into(), "h".into());
        table.insert_new("thing1".into(), "h".into());
        assert_eq!(
            table.names(),
            vec![ActionName::new("thing1"), ActionName::new("thing2")]
        );
    }
}
