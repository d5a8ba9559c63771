//! # State Adapter
//!
//! In-memory shared state for tests and embedding.
//! A production deployment plugs its persistent key/value store in instead.

use crate::domain::value_objects::Value;
use crate::errors::StateError;
use crate::ports::outbound::StateStore;
use std::collections::HashMap;

/// In-memory key/value state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStateStore {
    entries: HashMap<String, Value>,
}

impl InMemoryStateStore {
    /// Create a new empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the value under `key` without cloning.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of keys written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Written keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StateError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StateError> {
        Ok(self.entries.contains_key(key))
    }
}

// =============================================================================
// TESTS
// =============================================================================
