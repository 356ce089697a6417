use std::sync::Mutex;

use hearth_graph::TenantGraph;
use tokio::sync::RwLock;

use crate::error::EngineError;
use crate::hub::SubscriptionHub;
use crate::lifecycle::TenantState;
use crate::metrics::LearningMetrics;
use crate::scheduler::CycleScheduler;
use crate::sync::lock_unpoisoned;

/// Everything the engine holds for one household.
///
/// The graph sits behind a tokio `RwLock`: writes and cycles serialize
/// per tenant, reads clone snapshots, and tenants never contend with
/// each other.
pub struct TenantHandle {
    id: String,
    pub(crate) graph: RwLock<TenantGraph>,
    state: Mutex<TenantState>,
    /// Serializes the one-time load so two first-touches cannot both
    /// run the Loading phase.
    pub(crate) init: tokio::sync::Mutex<()>,
    pub(crate) scheduler: CycleScheduler,
    pub(crate) hub: SubscriptionHub,
    pub(crate) metrics: LearningMetrics,
}

impl TenantHandle {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            graph: RwLock::new(TenantGraph::default()),
            state: Mutex::new(TenantState::Uninitialized),
            init: tokio::sync::Mutex::new(()),
            scheduler: CycleScheduler::new(),
            hub: SubscriptionHub::new(),
            metrics: LearningMetrics::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> TenantState {
        *lock_unpoisoned(&self.state)
    }

    /// Direct read access to the cached graph.
    pub async fn read_graph(&self) -> tokio::sync::RwLockReadGuard<'_, TenantGraph> {
        self.graph.read().await
    }

    /// Background cycles currently running for this tenant.
    pub fn running_cycles(&self) -> usize {
        self.scheduler.running_count()
    }

    /// Roll a failed load back to `Uninitialized` so the next touch can
    /// retry. Only legal from `Loading`, bypasses the transition table.
    pub(crate) fn reset_failed_load(&self) {
        let mut state = lock_unpoisoned(&self.state);
        if *state == TenantState::Loading {
            *state = TenantState::Uninitialized;
        }
    }

    /// Apply a lifecycle transition, rejecting illegal ones.
    pub(crate) fn transition(&self, next: TenantState) -> Result<(), EngineError> {
        let mut state = lock_unpoisoned(&self.state);
        if !state.can_transition_to(next) {
            return Err(EngineError::State { tenant: self.id.clone(), state: state.as_str() });
        }
        *state = next;
        Ok(())
    }
}
