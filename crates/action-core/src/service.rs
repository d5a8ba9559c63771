//! # Action Core Service
//!
//! The registry and dispatcher. Owns the owner principal and the action
//! table, holds the resolver, state and event sink collaborators, and
//! implements both driving ports.
//!
//! ## Execution Model
//!
//! Every operation takes `&mut self` and runs to completion synchronously.
//! Serializing concurrent callers is the host's job (wrap the service in a
//! mutex, or drive it from a single task); the service adds no locking.
//!
//! ## Security
//!
//! - Privileged operations check `caller == owner` before anything else
//! - Handler modules must be owned by `ServiceConfig::registry_id`

use crate::adapters::{InMemoryEventSink, InMemoryModuleResolver, InMemoryStateStore, NoopEventSink};
use crate::domain::entities::{action_interface, ActionTable, FunctionSignature};
use crate::domain::invariants::{
    ensure_batch_size, ensure_governed, ensure_owner, ensure_registered, ensure_unregistered,
    ensure_valid_action_name, interface_violation, limits,
};
use crate::domain::value_objects::{ActionName, HandlerId, Payload, PrincipalId, Value};
use crate::errors::ActionError;
use crate::events::RegistryEvent;
use crate::metrics;
use crate::ports::inbound::{ActionDispatchApi, ActionRegistryApi};
use crate::ports::outbound::{ModuleResolver, RegistryEventSink, StateStore};

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Action core configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// The registry's own identity. Handler modules must be owned by it.
    pub registry_id: PrincipalId,
    /// Maximum payloads accepted by one `bulk_interact`.
    pub max_batch_size: usize,
    /// Signatures a handler module must export to be registered.
    ///
    /// `interact(payload, state, caller)` is always required on top of these;
    /// see [`ServiceConfig::interface`].
    pub required_interface: Vec<FunctionSignature>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            registry_id: PrincipalId::new(limits::DEFAULT_REGISTRY_ID),
            max_batch_size: limits::MAX_BATCH_SIZE,
            required_interface: action_interface(),
        }
    }
}

impl ServiceConfig {
    /// Override the registry identity.
    #[must_use]
    pub fn with_registry_id(mut self, registry_id: impl Into<PrincipalId>) -> Self {
        self.registry_id = registry_id.into();
        self
    }

    /// Override the batch limit.
    #[must_use]
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Signatures checked at registration: `required_interface` plus the
    /// dispatch entrypoint if it was left out.
    #[must_use]
    pub fn interface(&self) -> Vec<FunctionSignature> {
        let entrypoint = FunctionSignature::interact();
        let mut interface = self.required_interface.clone();
        if !interface.contains(&entrypoint) {
            interface.insert(0, entrypoint);
        }
        interface
    }
}

/// Statistics for the action core.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Ownership transfers.
    pub owner_changes: u64,
    /// Successful registrations.
    pub registrations: u64,
    /// Registrations rejected after the owner check passed.
    pub failed_registrations: u64,
    /// Successful unregistrations.
    pub unregistrations: u64,
    /// Handler invocations that returned successfully.
    pub interactions_executed: u64,
    /// Dispatches that failed (unknown action or handler error).
    pub failed_interactions: u64,
    /// Batches where every payload succeeded.
    pub batches_executed: u64,
    /// Batches stopped by a failing payload.
    pub batches_halted: u64,
    /// Privileged calls rejected because the caller was not the owner.
    pub rejected_requests: u64,
}

/// The action registry and dispatcher.
pub struct ActionCoreService<R: ModuleResolver, S: StateStore, E: RegistryEventSink = NoopEventSink>
{
    /// Service configuration.
    config: ServiceConfig,
    /// Principal allowed to mutate the registry.
    owner: PrincipalId,
    /// Action name to handler bindings.
    actions: ActionTable,
    /// Module resolver adapter.
    resolver: R,
    /// Shared state handed to handlers.
    state: S,
    /// Registry event sink.
    events: E,
    /// Service statistics.
    stats: ServiceStats,
}

impl<R: ModuleResolver, S: StateStore> ActionCoreService<R, S, NoopEventSink> {
    /// Create a service with default configuration that discards events.
    pub fn with_defaults(owner: impl Into<PrincipalId>, resolver: R, state: S) -> Self {
        Self::new(owner, resolver, state, NoopEventSink, ServiceConfig::default())
    }
}

impl<R: ModuleResolver, S: StateStore, E: RegistryEventSink> ActionCoreService<R, S, E> {
    /// Create a new action core owned by `owner`, the initializing principal.
    pub fn new(
        owner: impl Into<PrincipalId>,
        resolver: R,
        state: S,
        events: E,
        config: ServiceConfig,
    ) -> Self {
        let owner = owner.into();
        info!(
            owner = %owner,
            registry_id = %config.registry_id,
            "Action core initialized"
        );

        Self {
            config,
            owner,
            actions: ActionTable::new(),
            resolver,
            state,
            events,
            stats: ServiceStats::default(),
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The registry's own identity.
    pub fn registry_id(&self) -> &PrincipalId {
        &self.config.registry_id
    }

    /// Current statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.clone()
    }

    /// The action table.
    pub fn action_table(&self) -> &ActionTable {
        &self.actions
    }

    /// Shared state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Shared state, mutably.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Module resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Module resolver, mutably (to submit modules).
    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    /// Event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Event sink, mutably.
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Owner gate shared by every privileged operation.
    fn guard_owner(&mut self, caller: &PrincipalId) -> Result<(), ActionError> {
        if let Err(err) = ensure_owner(caller, &self.owner) {
            warn!(
                caller = %caller,
                owner = %self.owner,
                "Rejected privileged call from non-owner"
            );
            self.stats.rejected_requests += 1;
            return Err(err);
        }
        Ok(())
    }

    /// Checks every registration precondition after the owner gate, then binds.
    fn bind(&mut self, action: &ActionName, handler_id: &HandlerId) -> Result<(), ActionError> {
        ensure_valid_action_name(action)?;
        ensure_unregistered(&self.actions, action)?;

        // Resolution errors propagate as-is
        let module = self.resolver.resolve(handler_id)?;

        let module_owner = self.resolver.owner_of(&module);
        ensure_governed(handler_id, module_owner.as_ref(), &self.config.registry_id)?;

        let interface = self.config.interface();
        if !self.resolver.satisfies_interface(&module, &interface) {
            return Err(interface_violation(
                handler_id,
                &module.signatures(),
                &interface,
            ));
        }

        let inserted = self.actions.insert_new(action.clone(), handler_id.clone());
        debug_assert!(inserted, "uniqueness was checked above");
        Ok(())
    }

    /// Resolves `action` and runs its handler's `interact`.
    fn dispatch(
        &mut self,
        caller: &PrincipalId,
        action: &ActionName,
        payload: &Payload,
    ) -> Result<Value, ActionError> {
        let handler_id = ensure_registered(&self.actions, action)?.clone();
        let module = self.resolver.resolve(&handler_id)?;
        let entrypoint = module.entrypoint().ok_or_else(|| {
            interface_violation(
                &handler_id,
                &module.signatures(),
                &[FunctionSignature::interact()],
            )
        })?;

        debug!(handler = %handler_id, "Dispatching to handler");

        // Handler errors pass through untouched; writes made before the
        // failure stay in the store.
        Ok(entrypoint.interact(payload, &mut self.state, caller)?)
    }

    /// One dispatch plus bookkeeping. Shared by single and batch entrypoints.
    fn run_interaction(
        &mut self,
        caller: &PrincipalId,
        action: &ActionName,
        payload: &Payload,
    ) -> Result<Value, ActionError> {
        // Only owner-bound names become metric labels
        let label = if self.actions.contains(action.as_str()) {
            action.as_str()
        } else {
            metrics::UNKNOWN_ACTION
        };

        let result = self.dispatch(caller, action, payload);

        match &result {
            Ok(_) => {
                self.stats.interactions_executed += 1;
                metrics::interaction(label, metrics::SUCCESS);
            }
            Err(err) => {
                self.stats.failed_interactions += 1;
                metrics::interaction(label, metrics::FAILURE);
                debug!(error = %err, kind = ?err.kind(), "Interaction failed");
            }
        }

        result
    }
}

/// Create a service with in-memory adapters (for testing).
///
/// The owner is `sys` and the registry identity is `action_core`.
#[must_use]
pub fn create_test_service(
) -> ActionCoreService<InMemoryModuleResolver, InMemoryStateStore, InMemoryEventSink> {
    ActionCoreService::new(
        "sys",
        InMemoryModuleResolver::new(),
        InMemoryStateStore::new(),
        InMemoryEventSink::new(),
        ServiceConfig::default(),
    )
}

// =============================================================================
// ActionRegistryApi Implementation
// =============================================================================

impl<R: ModuleResolver, S: StateStore, E: RegistryEventSink> ActionRegistryApi
    for ActionCoreService<R, S, E>
{
    fn owner(&self) -> &PrincipalId {
        &self.owner
    }

    #[instrument(skip_all, fields(caller = %caller, new_owner = %new_owner))]
    fn change_owner(
        &mut self,
        caller: &PrincipalId,
        new_owner: PrincipalId,
    ) -> Result<(), ActionError> {
        self.guard_owner(caller)?;

        let previous = std::mem::replace(&mut self.owner, new_owner);
        self.stats.owner_changes += 1;
        info!(previous = %previous, "Ownership transferred");

        self.events.publish(RegistryEvent::OwnerChanged {
            previous,
            new: self.owner.clone(),
        });
        Ok(())
    }

    #[instrument(skip_all, fields(caller = %caller, action = %action, handler = %handler_id))]
    fn register_action(
        &mut self,
        caller: &PrincipalId,
        action: ActionName,
        handler_id: HandlerId,
    ) -> Result<(), ActionError> {
        self.guard_owner(caller)?;

        if let Err(err) = self.bind(&action, &handler_id) {
            warn!(error = %err, kind = ?err.kind(), "Action registration rejected");
            self.stats.failed_registrations += 1;
            metrics::registration(metrics::FAILURE);
            return Err(err);
        }

        self.stats.registrations += 1;
        metrics::registration(metrics::SUCCESS);
        metrics::action_bound();
        info!(registered = self.actions.len(), "Action registered");

        self.events.publish(RegistryEvent::ActionRegistered { action, handler_id });
        Ok(())
    }

    #[instrument(skip_all, fields(caller = %caller, action = %action))]
    fn unregister_action(
        &mut self,
        caller: &PrincipalId,
        action: &ActionName,
    ) -> Result<(), ActionError> {
        self.guard_owner(caller)?;

        let Some(handler_id) = self.actions.remove(action.as_str()) else {
            warn!("Cannot unregister unknown action");
            return Err(ActionError::ActionNotFound {
                action: action.clone(),
            });
        };

        self.stats.unregistrations += 1;
        metrics::action_unbound();
        info!(handler = %handler_id, "Action unregistered");

        self.events.publish(RegistryEvent::ActionUnregistered {
            action: action.clone(),
            handler_id,
        });
        Ok(())
    }

    fn handler_for(&self, action: &ActionName) -> Option<&HandlerId> {
        self.actions.get(action.as_str())
    }

    fn actions(&self) -> Vec<ActionName> {
        self.actions.names()
    }
}

// =============================================================================
// ActionDispatchApi Implementation
// =============================================================================

impl<R: ModuleResolver, S: StateStore, E: RegistryEventSink> ActionDispatchApi
    for ActionCoreService<R, S, E>
{
    #[instrument(
        skip_all,
        fields(caller = %caller, action = %action, interaction_id = %Uuid::new_v4())
    )]
    fn interact(
        &mut self,
        caller: &PrincipalId,
        action: &ActionName,
        payload: &Payload,
    ) -> Result<Value, ActionError> {
        self.run_interaction(caller, action, payload)
    }

    #[instrument(
        skip_all,
        fields(caller = %caller, action = %action, batch_id = %Uuid::new_v4(), size = payloads.len())
    )]
    fn bulk_interact(
        &mut self,
        caller: &PrincipalId,
        action: &ActionName,
        payloads: &[Payload],
    ) -> Result<(), ActionError> {
        ensure_batch_size(payloads.len(), self.config.max_batch_size)?;
        metrics::batch_size(payloads.len());

        for (index, payload) in payloads.iter().enumerate() {
            if let Err(err) = self.run_interaction(caller, action, payload) {
                // No rollback: items before `index` keep their writes
                error!(
                    index,
                    committed = index,
                    skipped = payloads.len() - index - 1,
                    error = %err,
                    "Batch halted"
                );
                self.stats.batches_halted += 1;
                return Err(err);
            }
        }

        self.stats.batches_executed += 1;
        debug!("Batch completed");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
