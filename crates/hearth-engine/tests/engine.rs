//! End-to-end exercises of the engine facade: lifecycle, cycles,
//! subscriptions, and graceful degradation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hearth_engine::{
    EngineConfig, EngineError, HearthEngine, MemoryPersistence, NullPersistence,
    PersistenceAdapter, PersistenceError, TenantState,
};
use hearth_graph::{
    EntityKind, EntityPayload, HouseholdRole, Jitter, ManualClock, QuantumParams, TenantGraph,
    UpsertRequest,
};

fn fast_config() -> EngineConfig {
    EngineConfig {
        sync_interval_ms: 25,
        pattern_interval_ms: 25,
        prediction_interval_ms: 25,
        decay_interval_ms: 50,
        load_timeout_ms: 1_000,
        lock_timeout_ms: 50,
        horizon_days: 7,
    }
}

fn seed_entity(graph: &mut TenantGraph, jitter: &mut Jitter, req: UpsertRequest) {
    hearth_graph::upsert_entity(graph, req, &QuantumParams::default(), jitter, 1_000)
        .expect("seed upsert");
}

fn person(name: &str, role: HouseholdRole) -> UpsertRequest {
    UpsertRequest::new(
        EntityKind::Person,
        EntityPayload::Person { name: name.to_string(), role: Some(role), age: None },
    )
}

fn shared_event(title: &str, starts_at: i64, attendees: &[&str]) -> UpsertRequest {
    UpsertRequest::new(
        EntityKind::Event,
        EntityPayload::Event {
            title: title.to_string(),
            starts_at: Some(starts_at),
            attendees: attendees.iter().map(|a| a.to_string()).collect(),
            category: None,
            location: None,
            quality: None,
        },
    )
}

/// A household with three members and four fully shared events; enough
/// signal for the collaboration pattern to clear the significance bar.
fn seeded_household() -> TenantGraph {
    let mut graph = TenantGraph::default();
    let mut jitter = Jitter::seeded(11);
    seed_entity(&mut graph, &mut jitter, person("Alma", HouseholdRole::Parent));
    seed_entity(&mut graph, &mut jitter, person("Beto", HouseholdRole::Child));
    seed_entity(&mut graph, &mut jitter, person("Cata", HouseholdRole::Child));
    for i in 0..4 {
        seed_entity(
            &mut graph,
            &mut jitter,
            shared_event(&format!("outing {i}"), 2_000 + i, &["alma", "beto", "cata"]),
        );
    }
    graph
}

#[tokio::test]
async fn first_touch_loads_seeds_and_derives_relationships() {
    let persistence = Arc::new(MemoryPersistence::new());
    persistence.seed("fam-1", seeded_household()).await;
    let engine = HearthEngine::with_clock(fast_config(), persistence, ManualClock::at(10_000))
        .with_jitter(Jitter::seeded(3));

    let view = engine.graph_state("fam-1").await.expect("loads");
    assert_eq!(view.state, "ready");
    assert_eq!(view.entity_count, 7);
    // 4 events × 3 attendees + parent_of and child_of for each child.
    assert_eq!(view.relationship_count, 16);
    assert!(view.mean_energy > 0.0);
    assert!(view.mean_coherence > 0.0);
    assert_eq!(engine.tenant_state("fam-1"), TenantState::Ready);
}

#[tokio::test]
async fn empty_tenant_is_ready_and_degrades_gracefully() {
    let engine = HearthEngine::with_clock(
        fast_config(),
        Arc::new(NullPersistence),
        ManualClock::at(10_000),
    );

    let patterns = engine.active_patterns("fam-empty", None).await.expect("ready");
    assert!(patterns.is_empty());

    let predictions = engine.predictions("fam-empty", None).await.expect("ready");
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].domain, "general");
    assert!(predictions[0].confidence <= 0.8);

    let view = engine.graph_state("fam-empty").await.expect("ready");
    assert_eq!(view.entity_count, 0);
    assert_eq!(view.mean_energy, 0.0);
}

#[tokio::test]
async fn disabled_tenant_rejects_writes_but_keeps_reads() {
    let engine = HearthEngine::with_clock(
        fast_config(),
        Arc::new(NullPersistence),
        ManualClock::at(10_000),
    );
    engine
        .upsert_entity("fam-2", person("Alma", HouseholdRole::Parent))
        .await
        .expect("ready tenant accepts writes");

    engine.disable_processing("fam-2").await.expect("disable");
    let err = engine
        .upsert_entity("fam-2", person("Beto", HouseholdRole::Child))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::State { .. }));

    let view = engine.graph_state("fam-2").await.expect("reads survive disable");
    assert_eq!(view.state, "disabled");
    assert_eq!(view.entity_count, 1);

    engine.enable_processing("fam-2").await.expect("re-enable");
    engine
        .upsert_entity("fam-2", person("Beto", HouseholdRole::Child))
        .await
        .expect("writes resume");
}

#[tokio::test]
async fn reenabling_does_not_duplicate_cycles() {
    let engine = HearthEngine::with_clock(
        fast_config(),
        Arc::new(NullPersistence),
        ManualClock::at(10_000),
    );
    engine.graph_state("fam-3").await.expect("load");
    let handle = engine.tenant_handle("fam-3").expect("handle");
    assert_eq!(handle.running_cycles(), 4);

    engine.disable_processing("fam-3").await.expect("disable");
    assert_eq!(handle.running_cycles(), 0);

    engine.enable_processing("fam-3").await.expect("enable");
    engine.enable_processing("fam-3").await.expect("enable again");
    assert_eq!(handle.running_cycles(), 4);
}

#[tokio::test]
async fn pattern_cycle_delivers_until_unsubscribe() {
    let persistence = Arc::new(MemoryPersistence::new());
    persistence.seed("fam-4", seeded_household()).await;
    let engine = HearthEngine::with_clock(fast_config(), persistence, ManualClock::at(10_000))
        .with_jitter(Jitter::seeded(5));

    let deliveries = Arc::new(AtomicUsize::new(0));
    let counter = deliveries.clone();
    let sub = engine
        .subscribe_patterns("fam-4", move |patterns| {
            assert!(!patterns.is_empty());
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .expect("subscribe");

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(deliveries.load(Ordering::SeqCst) > 0, "cycle should have delivered");

    sub.unsubscribe();
    let frozen = deliveries.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(deliveries.load(Ordering::SeqCst), frozen);
    engine.shutdown();
}

#[tokio::test]
async fn insight_cycle_reaches_subscribers_with_prose() {
    let persistence = Arc::new(MemoryPersistence::new());
    persistence.seed("fam-5", seeded_household()).await;
    let engine = HearthEngine::with_clock(fast_config(), persistence, ManualClock::at(10_000))
        .with_jitter(Jitter::seeded(5));

    let got_recommendation = Arc::new(AtomicBool::new(false));
    let flag = got_recommendation.clone();
    let _sub = engine
        .subscribe_insights("fam-5", move |insights| {
            if insights.iter().any(|i| !i.recommendation.is_empty()) {
                flag.store(true, Ordering::SeqCst);
            }
        })
        .await
        .expect("subscribe");

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(got_recommendation.load(Ordering::SeqCst));
    engine.shutdown();
}

#[tokio::test]
async fn relationship_commands_mirror_and_append() {
    let persistence = Arc::new(MemoryPersistence::new());
    let engine =
        HearthEngine::with_clock(fast_config(), persistence.clone(), ManualClock::at(10_000));

    let parent = engine
        .upsert_entity("fam-6", person("Alma", HouseholdRole::Parent))
        .await
        .expect("upsert");
    let kid = engine
        .upsert_entity("fam-6", person("Beto", HouseholdRole::Child))
        .await
        .expect("upsert");

    let rel = engine
        .create_relationship(
            "fam-6",
            hearth_graph::RelationshipRequest {
                source: parent.id.clone(),
                target: kid.id.clone(),
                kind: "teaches".to_string(),
                hints: Default::default(),
            },
        )
        .await
        .expect("relationship");
    assert_eq!(rel.kind, "teaches");

    // teaches is bidirectional: forward edge plus one mirror.
    let view = engine.graph_state("fam-6").await.expect("state");
    assert_eq!(view.relationship_count, 2);

    // Appends are fire-and-forget; give them a beat.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(persistence.appended_entity_count().await, 2);
    assert_eq!(persistence.appended_relationship_count().await, 1);
    engine.shutdown();
}

struct FlakyLoad {
    failed_once: AtomicBool,
}

#[async_trait]
impl PersistenceAdapter for FlakyLoad {
    async fn load_tenant_graph(&self, tenant: &str) -> Result<TenantGraph, PersistenceError> {
        if !self.failed_once.swap(true, Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(tenant.to_string()));
        }
        Ok(TenantGraph::default())
    }

    async fn append_entity(
        &self,
        _tenant: &str,
        _entity: &hearth_graph::Entity,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn append_relationship(
        &self,
        _tenant: &str,
        _relationship: &hearth_graph::Relationship,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[tokio::test]
async fn failed_load_rolls_back_and_the_next_touch_retries() {
    let engine = HearthEngine::with_clock(
        fast_config(),
        Arc::new(FlakyLoad { failed_once: AtomicBool::new(false) }),
        ManualClock::at(10_000),
    );

    let err = engine.graph_state("fam-7").await.unwrap_err();
    assert!(matches!(err, EngineError::Load { .. }));
    assert_eq!(engine.tenant_state("fam-7"), TenantState::Uninitialized);

    let view = engine.graph_state("fam-7").await.expect("retry succeeds");
    assert_eq!(view.state, "ready");
}

#[tokio::test]
async fn contended_write_lock_conflicts_after_one_retry() {
    let engine = HearthEngine::with_clock(
        fast_config(),
        Arc::new(NullPersistence),
        ManualClock::at(10_000),
    );
    engine.graph_state("fam-8").await.expect("load");
    let handle = engine.tenant_handle("fam-8").expect("handle");

    let guard = handle.read_graph().await;
    let err = engine
        .upsert_entity("fam-8", person("Alma", HouseholdRole::Parent))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ConcurrencyConflict(_)));
    drop(guard);

    engine
        .upsert_entity("fam-8", person("Alma", HouseholdRole::Parent))
        .await
        .expect("released lock accepts writes");
    engine.shutdown();
}

#[tokio::test]
async fn active_patterns_honors_the_caller_limit() {
    let persistence = Arc::new(MemoryPersistence::new());
    persistence.seed("fam-9", seeded_household()).await;
    let engine = HearthEngine::with_clock(fast_config(), persistence, ManualClock::at(10_000))
        .with_jitter(Jitter::seeded(5));

    let all = engine.active_patterns("fam-9", None).await.expect("patterns");
    assert!(all.len() >= 2, "seeded household should show several patterns");

    let one = engine.active_patterns("fam-9", Some(1)).await.expect("patterns");
    assert_eq!(one.len(), 1);
    // Truncation keeps the ranking: the survivor is the best-ranked one.
    assert_eq!(one[0].id, all[0].id);
    engine.shutdown();
}

#[tokio::test]
async fn tenants_do_not_share_graphs_or_subscriptions() {
    let engine = HearthEngine::with_clock(
        fast_config(),
        Arc::new(NullPersistence),
        ManualClock::at(10_000),
    );
    engine
        .upsert_entity("fam-a", person("Alma", HouseholdRole::Parent))
        .await
        .expect("upsert");

    let view_a = engine.graph_state("fam-a").await.expect("state");
    let view_b = engine.graph_state("fam-b").await.expect("state");
    assert_eq!(view_a.entity_count, 1);
    assert_eq!(view_b.entity_count, 0);
    engine.shutdown();
}
