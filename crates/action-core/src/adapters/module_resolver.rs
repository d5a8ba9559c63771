//! # Module Resolver Adapter
//!
//! In-memory module catalogue. Modules are submitted under their name with an
//! optional owner, the way a hosting environment records who governs a
//! submitted contract.

use crate::domain::value_objects::{HandlerId, PrincipalId};
use crate::errors::ResolveError;
use crate::ports::outbound::{HandlerModule, ModuleResolver};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct Submission {
    module: Arc<HandlerModule>,
    owner: Option<PrincipalId>,
}

/// In-memory resolver keyed by module name.
#[derive(Debug, Default)]
pub struct InMemoryModuleResolver {
    modules: HashMap<HandlerId, Submission>,
}

impl InMemoryModuleResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a module with no owner.
    ///
    /// Returns the module previously submitted under the same name, if any.
    pub fn submit(&mut self, module: HandlerModule) -> Option<Arc<HandlerModule>> {
        self.insert(module, None)
    }

    /// Submit a module governed by `owner`.
    pub fn submit_owned(
        &mut self,
        module: HandlerModule,
        owner: impl Into<PrincipalId>,
    ) -> Option<Arc<HandlerModule>> {
        self.insert(module, Some(owner.into()))
    }

    /// Remove a module.
    pub fn withdraw(&mut self, handler_id: &HandlerId) -> Option<Arc<HandlerModule>> {
        self.modules.remove(handler_id).map(|s| s.module)
    }

    /// Number of submitted modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True if nothing has been submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn insert(
        &mut self,
        module: HandlerModule,
        owner: Option<PrincipalId>,
    ) -> Option<Arc<HandlerModule>> {
        let name = module.name().clone();
        debug!(module = %name, owner = ?owner, "Module submitted");
        self.modules
            .insert(
                name,
                Submission {
                    module: Arc::new(module),
                    owner,
                },
            )
            .map(|previous| previous.module)
    }
}

impl ModuleResolver for InMemoryModuleResolver {
    fn resolve(&self, handler_id: &HandlerId) -> Result<Arc<HandlerModule>, ResolveError> {
        self.modules
            .get(handler_id)
            .map(|s| Arc::clone(&s.module))
            .ok_or_else(|| ResolveError::ModuleNotFound(handler_id.clone()))
    }

    fn owner_of(&self, module: &HandlerModule) -> Option<PrincipalId> {
        self.modules
            .get(module.name())
            .and_then(|s| s.owner.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::action_interface;
    use crate::ports::outbound::handler_fn;
    use serde_json::Value;

    fn noop_module(name: &str) -> HandlerModule {
        HandlerModule::with_interact(name, handler_fn(|_, _, _| Ok(Value::Null)))
    }

    #[test]
    fn test_resolve_missing() {
        let resolver = InMemoryModuleResolver::new();
        let err = resolver
            .resolve(&HandlerId::new("doesnt_exist"))
            .unwrap_err();
        assert_eq!(err, ResolveError::ModuleNotFound(HandlerId::new("doesnt_exist")));
    }

    #[test]
    fn test_owner_recorded() {
        let mut resolver = InMemoryModuleResolver::new();
        resolver.submit(noop_module("unowned"));
        resolver.submit_owned(noop_module("owned"), "action_core");

        let unowned = resolver.resolve(&HandlerId::new("unowned")).unwrap();
        let owned = resolver.resolve(&HandlerId::new("owned")).unwrap();

        assert_eq!(resolver.owner_of(&unowned), None);
        assert_eq!(
            resolver.owner_of(&owned),
            Some(PrincipalId::new("action_core"))
        );
        assert!(resolver.satisfies_interface(&owned, &action_interface()));
    }

    #[test]
    fn test_resubmit_replaces() {
        let mut resolver = InMemoryModuleResolver::new();
        assert!(resolver.submit(noop_module("m")).is_none());
        assert!(resolver.submit_owned(noop_module("m"), "action_core").is_some());
        assert_eq!(resolver.len(), 1);

        let module = resolver.resolve(&HandlerId::new("m")).unwrap();
        assert_eq!(resolver.owner_of(&module), Some(PrincipalId::new("action_core")));
    }

    #[test]
    fn test_withdraw() {
        let mut resolver = InMemoryModuleResolver::new();
        resolver.submit(noop_module("m"));
        assert!(resolver.withdraw(&HandlerId::new("m")).is_some());
        assert!(resolver.is_empty());
        assert!(resolver.resolve(&HandlerId::new("m")).is_err());
    }
}
