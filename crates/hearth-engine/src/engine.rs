//! # HearthEngine
//!
//! The public facade. One engine serves many households; each tenant
//! gets its own graph, lifecycle state, background cycles, and
//! subscription hub. Tenants are partitioned in a `DashMap`, so
//! cross-tenant traffic never contends.
//!
//! ## Write protocol
//!
//! 1. First touch loads the tenant graph from persistence (bounded)
//! 2. Commands require a `Ready` tenant
//! 3. Writes serialize on the tenant's `RwLock`; a contended lock is
//!    retried once, then surfaces `ConcurrencyConflict`
//! 4. Durable appends are spawned off the write path and only logged

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use hearth_graph::{
    decay_pass, snapshot, synchronize_all, Clock, DecayParams, Entity, Jitter, Millis,
    QuantumParams, Relationship, RelationshipRegistry, RelationshipRequest, StrengthParams,
    SystemClock, TenantGraph, UpsertRequest,
};
use hearth_insight::{InsightConfig, InsightGenerator};
use hearth_patterns::{Pattern, PatternConfig, PatternDetector};
use hearth_predict::{PredictConfig, Prediction, PredictionEngine};
use serde::Serialize;
use tokio::time::{interval, timeout};
use tracing::{debug, info, warn};

use crate::bootstrap::derive_relationships;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::hub::Subscription;
use crate::lifecycle::TenantState;
use crate::metrics::MetricsView;
use crate::persistence::PersistenceAdapter;
use crate::sync::lock_unpoisoned;
use crate::tenant::TenantHandle;

// ─────────────────────────────────────────────
// GraphStateView
// ─────────────────────────────────────────────

/// Aggregate summary of one tenant's graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStateView {
    pub tenant: String,
    pub state: &'static str,
    pub entity_count: usize,
    pub relationship_count: usize,
    /// Mean quantum energy over active entities; 0.0 when empty.
    pub mean_energy: f32,
    /// Mean coherence over active entities; 0.0 when empty.
    pub mean_coherence: f32,
    pub last_updated: Millis,
    pub metrics: MetricsView,
}

// ─────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────

pub struct HearthEngine {
    config: EngineConfig,
    tenants: DashMap<String, Arc<TenantHandle>>,
    persistence: Arc<dyn PersistenceAdapter>,
    clock: Arc<dyn Clock>,
    detector: Arc<PatternDetector>,
    predictor: Arc<PredictionEngine>,
    insights: Arc<InsightGenerator>,
    quantum: QuantumParams,
    strength: StrengthParams,
    decay: DecayParams,
    jitter: Mutex<Jitter>,
}

impl HearthEngine {
    pub fn new(config: EngineConfig, persistence: Arc<dyn PersistenceAdapter>) -> Self {
        Self::with_clock(config, persistence, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: EngineConfig,
        persistence: Arc<dyn PersistenceAdapter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            tenants: DashMap::new(),
            persistence,
            clock,
            detector: Arc::new(PatternDetector::new(PatternConfig::default())),
            predictor: Arc::new(PredictionEngine::new(PredictConfig::default())),
            insights: Arc::new(InsightGenerator::template(InsightConfig::default())),
            quantum: QuantumParams::default(),
            strength: StrengthParams::default(),
            decay: DecayParams::default(),
            jitter: Mutex::new(Jitter::from_entropy()),
        }
    }

    /// Engine with every knob read from the environment.
    pub fn from_env(persistence: Arc<dyn PersistenceAdapter>) -> Self {
        let mut engine = Self::new(EngineConfig::from_env(), persistence);
        engine.detector = Arc::new(PatternDetector::new(PatternConfig::from_env()));
        engine.predictor = Arc::new(PredictionEngine::new(PredictConfig::from_env()));
        engine.insights = Arc::new(InsightGenerator::template(InsightConfig::from_env()));
        engine
    }

    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = Mutex::new(jitter);
        self
    }

    pub fn with_insight_generator(mut self, generator: InsightGenerator) -> Self {
        self.insights = Arc::new(generator);
        self
    }

    pub fn with_detector(mut self, detector: PatternDetector) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    // ── Commands ──────────────────────────────

    pub async fn upsert_entity(
        &self,
        tenant: &str,
        req: UpsertRequest,
    ) -> Result<Entity, EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        handle.state().require_ready(tenant)?;
        let now = self.clock.now_ms();
        let entity = {
            let mut graph = self.write_graph(&handle).await?;
            let mut jitter = lock_unpoisoned(&self.jitter);
            let entity =
                hearth_graph::upsert_entity(&mut graph, req, &self.quantum, &mut jitter, now)?;
            graph.last_updated = now;
            entity
        };
        self.spawn_append_entity(tenant, &entity);
        Ok(entity)
    }

    pub async fn create_relationship(
        &self,
        tenant: &str,
        req: RelationshipRequest,
    ) -> Result<Relationship, EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        handle.state().require_ready(tenant)?;
        let now = self.clock.now_ms();
        let relationship = {
            let mut graph = self.write_graph(&handle).await?;
            let mut jitter = lock_unpoisoned(&self.jitter);
            let relationship = hearth_graph::create_relationship(
                &mut graph,
                req,
                &RelationshipRegistry,
                &self.strength,
                &mut jitter,
                now,
            )?;
            graph.last_updated = now;
            relationship
        };
        self.spawn_append_relationship(tenant, &relationship);
        Ok(relationship)
    }

    // ── Queries ───────────────────────────────

    pub async fn graph_state(&self, tenant: &str) -> Result<GraphStateView, EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        let state = self.require_readable(tenant, &handle)?;

        let graph = handle.graph.read().await;
        let (mut energy, mut coherence, mut active) = (0.0f32, 0.0f32, 0usize);
        for entity in graph.entities.values().filter(|e| !e.retired) {
            energy += entity.quantum.energy;
            coherence += entity.quantum.coherence;
            active += 1;
        }
        let denom = active.max(1) as f32;
        Ok(GraphStateView {
            tenant: tenant.to_string(),
            state: state.as_str(),
            entity_count: graph.entities.len(),
            relationship_count: graph.relationships.len(),
            mean_energy: if active == 0 { 0.0 } else { energy / denom },
            mean_coherence: if active == 0 { 0.0 } else { coherence / denom },
            last_updated: graph.last_updated,
            metrics: handle.metrics.view(),
        })
    }

    /// Currently active patterns, best first. `limit` tightens the
    /// detector's own top-N cap; `None` returns everything the detector
    /// kept.
    pub async fn active_patterns(
        &self,
        tenant: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Pattern>, EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        self.require_readable(tenant, &handle)?;
        let snap = {
            let graph = handle.graph.read().await;
            snapshot(&graph, self.clock.now_ms())
        };
        let mut patterns = self.detector.detect(&snap);
        if let Some(limit) = limit {
            patterns.truncate(limit);
        }
        Ok(patterns)
    }

    pub async fn predictions(
        &self,
        tenant: &str,
        horizon_days: Option<i64>,
    ) -> Result<Vec<Prediction>, EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        self.require_readable(tenant, &handle)?;
        let snap = {
            let graph = handle.graph.read().await;
            snapshot(&graph, self.clock.now_ms())
        };
        Ok(self.predictor.predict(&snap, horizon_days.unwrap_or(self.config.horizon_days)))
    }

    pub async fn metrics(&self, tenant: &str) -> Result<MetricsView, EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        Ok(handle.metrics.view())
    }

    pub fn tenant_state(&self, tenant: &str) -> TenantState {
        self.tenants
            .get(tenant)
            .map(|h| h.state())
            .unwrap_or(TenantState::Uninitialized)
    }

    /// Handle for a tenant the engine has already seen.
    pub fn tenant_handle(&self, tenant: &str) -> Option<Arc<TenantHandle>> {
        self.tenants.get(tenant).map(|h| h.value().clone())
    }

    // ── Subscriptions ─────────────────────────

    pub async fn subscribe_patterns(
        &self,
        tenant: &str,
        callback: impl Fn(&[Pattern]) + Send + Sync + 'static,
    ) -> Result<Subscription, EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        self.require_readable(tenant, &handle)?;
        Ok(handle.hub.subscribe_patterns(callback))
    }

    pub async fn subscribe_insights(
        &self,
        tenant: &str,
        callback: impl Fn(&[hearth_insight::Insight]) + Send + Sync + 'static,
    ) -> Result<Subscription, EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        self.require_readable(tenant, &handle)?;
        Ok(handle.hub.subscribe_insights(callback))
    }

    // ── Lifecycle ─────────────────────────────

    pub async fn enable_processing(&self, tenant: &str) -> Result<(), EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        if handle.state() == TenantState::Disabled {
            handle.transition(TenantState::Ready)?;
            info!(tenant, "processing re-enabled");
        }
        handle.state().require_ready(tenant)?;
        self.start_cycles(&handle);
        Ok(())
    }

    pub async fn disable_processing(&self, tenant: &str) -> Result<(), EngineError> {
        let handle = self.ensure_loaded(tenant).await?;
        if handle.state() == TenantState::Ready {
            handle.transition(TenantState::Disabled)?;
            handle.scheduler.cancel_all();
            info!(tenant, "processing disabled, cache retained");
        }
        Ok(())
    }

    /// Stop every tenant's cycles. Graphs stay readable.
    pub fn shutdown(&self) {
        for entry in self.tenants.iter() {
            entry.value().scheduler.cancel_all();
        }
    }

    // ── Internals ─────────────────────────────

    fn handle(&self, tenant: &str) -> Arc<TenantHandle> {
        self.tenants
            .entry(tenant.to_string())
            .or_insert_with(|| Arc::new(TenantHandle::new(tenant.to_string())))
            .clone()
    }

    /// Get-or-load the tenant. First touch runs the Loading phase under
    /// the handle's init lock; concurrent callers wait rather than load
    /// twice. A failed load rolls back so a later touch can retry.
    async fn ensure_loaded(&self, tenant: &str) -> Result<Arc<TenantHandle>, EngineError> {
        let handle = self.handle(tenant);
        if matches!(handle.state(), TenantState::Ready | TenantState::Disabled) {
            return Ok(handle);
        }

        let _init = handle.init.lock().await;
        if handle.state() != TenantState::Uninitialized {
            return Ok(handle.clone());
        }

        handle.transition(TenantState::Loading)?;
        let budget = Duration::from_millis(self.config.load_timeout_ms);
        let loaded: TenantGraph =
            match timeout(budget, self.persistence.load_tenant_graph(tenant)).await {
                Ok(Ok(graph)) => graph,
                Ok(Err(source)) => {
                    handle.reset_failed_load();
                    return Err(EngineError::Load { tenant: tenant.to_string(), source });
                }
                Err(_) => {
                    handle.reset_failed_load();
                    return Err(EngineError::LoadTimeout {
                        tenant: tenant.to_string(),
                        timeout_ms: self.config.load_timeout_ms,
                    });
                }
            };

        {
            let mut graph = handle.graph.write().await;
            *graph = loaded;
            let now = self.clock.now_ms();
            let derived = {
                let mut jitter = lock_unpoisoned(&self.jitter);
                derive_relationships(
                    &mut graph,
                    &RelationshipRegistry,
                    &self.strength,
                    &mut jitter,
                    now,
                )
            };
            graph.last_updated = now;
            info!(
                tenant,
                entities = graph.entities.len(),
                relationships = graph.relationships.len(),
                derived,
                "tenant graph loaded"
            );
        }

        handle.transition(TenantState::Ready)?;
        self.start_cycles(&handle);
        Ok(handle.clone())
    }

    fn require_readable(
        &self,
        tenant: &str,
        handle: &TenantHandle,
    ) -> Result<TenantState, EngineError> {
        let state = handle.state();
        match state {
            TenantState::Ready | TenantState::Disabled => Ok(state),
            other => {
                Err(EngineError::State { tenant: tenant.to_string(), state: other.as_str() })
            }
        }
    }

    async fn write_graph<'a>(
        &self,
        handle: &'a TenantHandle,
    ) -> Result<tokio::sync::RwLockWriteGuard<'a, TenantGraph>, EngineError> {
        let budget = Duration::from_millis(self.config.lock_timeout_ms);
        match timeout(budget, handle.graph.write()).await {
            Ok(guard) => Ok(guard),
            Err(_) => {
                warn!(tenant = handle.id(), "tenant write lock contended, retrying once");
                timeout(budget, handle.graph.write())
                    .await
                    .map_err(|_| EngineError::ConcurrencyConflict(handle.id().to_string()))
            }
        }
    }

    fn spawn_append_entity(&self, tenant: &str, entity: &Entity) {
        let persistence = self.persistence.clone();
        let tenant = tenant.to_string();
        let entity = entity.clone();
        tokio::spawn(async move {
            if let Err(e) = persistence.append_entity(&tenant, &entity).await {
                warn!(tenant = %tenant, error = %e, "entity append failed");
            }
        });
    }

    fn spawn_append_relationship(&self, tenant: &str, relationship: &Relationship) {
        let persistence = self.persistence.clone();
        let tenant = tenant.to_string();
        let relationship = relationship.clone();
        tokio::spawn(async move {
            if let Err(e) = persistence.append_relationship(&tenant, &relationship).await {
                warn!(tenant = %tenant, error = %e, "relationship append failed");
            }
        });
    }

    // ── Cycles ────────────────────────────────

    /// Spawn the tenant's background cycles. The scheduler refuses
    /// duplicates, so calling this on an already-running tenant is a
    /// no-op.
    fn start_cycles(&self, handle: &Arc<TenantHandle>) {
        {
            let h = handle.clone();
            let clock = self.clock.clone();
            let every = Duration::from_millis(self.config.sync_interval_ms);
            handle.scheduler.start("entangle-sync", move || {
                tokio::spawn(async move {
                    let mut ticker = interval(every);
                    loop {
                        ticker.tick().await;
                        let now = clock.now_ms();
                        let synced = {
                            let mut graph = h.graph.write().await;
                            synchronize_all(&mut graph, now)
                        };
                        if synced > 0 {
                            debug!(tenant = h.id(), synced, "entanglements synchronized");
                        }
                    }
                })
            });
        }

        {
            let h = handle.clone();
            let clock = self.clock.clone();
            let detector = self.detector.clone();
            let every = Duration::from_millis(self.config.pattern_interval_ms);
            handle.scheduler.start("pattern", move || {
                tokio::spawn(async move {
                    let mut ticker = interval(every);
                    loop {
                        ticker.tick().await;
                        let snap = {
                            let graph = h.graph.read().await;
                            snapshot(&graph, clock.now_ms())
                        };
                        let patterns = detector.significant(&snap);
                        h.metrics.record_cycle();
                        h.metrics.record_patterns(patterns.len());
                        h.hub.deliver_patterns(&patterns);
                    }
                })
            });
        }

        {
            let h = handle.clone();
            let clock = self.clock.clone();
            let detector = self.detector.clone();
            let predictor = self.predictor.clone();
            let insights = self.insights.clone();
            let horizon = self.config.horizon_days;
            let every = Duration::from_millis(self.config.prediction_interval_ms);
            handle.scheduler.start("prediction", move || {
                tokio::spawn(async move {
                    let mut ticker = interval(every);
                    loop {
                        ticker.tick().await;
                        let snap = {
                            let graph = h.graph.read().await;
                            snapshot(&graph, clock.now_ms())
                        };
                        let predictions = predictor.predict(&snap, horizon);
                        let patterns = detector.detect(&snap);
                        let generated = insights.generate(&patterns, &predictions).await;
                        h.metrics.record_predictions(predictions.len());
                        h.metrics.record_insights(generated.len());
                        h.hub.deliver_insights(&generated);
                    }
                })
            });
        }

        {
            let h = handle.clone();
            let clock = self.clock.clone();
            let params = self.decay.clone();
            let every = Duration::from_millis(self.config.decay_interval_ms);
            handle.scheduler.start("decay", move || {
                tokio::spawn(async move {
                    let mut ticker = interval(every);
                    loop {
                        ticker.tick().await;
                        let report = {
                            let mut graph = h.graph.write().await;
                            decay_pass(&mut graph, &params, clock.now_ms())
                        };
                        h.metrics
                            .record_decay(report.relationships_decayed, report.entities_retired);
                        let view = h.metrics.view();
                        info!(
                            tenant = h.id(),
                            cycles = view.cycles_run,
                            patterns = view.patterns_detected,
                            predictions = view.predictions_made,
                            insights = view.insights_generated,
                            decayed = view.relationships_decayed,
                            retired = view.entities_retired,
                            "learning metrics"
                        );
                    }
                })
            });
        }
    }
}
