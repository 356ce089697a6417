//! Write path for a tenant graph: entity upsert and relationship creation,
//! including the side effects the registry flags demand (mirroring,
//! entanglement, cascade records).
//!
//! All functions here mutate a [`TenantGraph`] synchronously; the engine
//! crate provides the per-tenant locking discipline around them.

use tracing::debug;

use crate::clock::Millis;
use crate::entangle;
use crate::error::GraphError;
use crate::jitter::Jitter;
use crate::model::{
    EffectKind, EffectRecord, Effects, Entity, EntityId, EntityKind, EntityPayload, GraphSnapshot,
    Phase, Relationship, TenantGraph, MAX_EXTRA_KEYS,
};
use crate::quantum::{calculate_quantum_state, ObservationContext, QuantumParams};
use crate::registry::RelationshipRegistry;
use crate::strength::{relationship_strength, RelationshipHints, StrengthParams};

// ─────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────

/// One observation of a logical subject.
///
/// `entity_id = None` mints a fresh id; passing an existing id routes the
/// observation to that entity (merge + state recompute). The store never
/// deduplicates by content — routing is the caller's job.
#[derive(Debug, Clone)]
pub struct UpsertRequest {
    pub entity_id: Option<EntityId>,
    pub kind: EntityKind,
    pub payload: EntityPayload,
    pub extra: std::collections::HashMap<String, serde_json::Value>,
    pub state_hint: Option<Phase>,
    pub context: ObservationContext,
}

impl UpsertRequest {
    pub fn new(kind: EntityKind, payload: EntityPayload) -> Self {
        Self {
            entity_id: None,
            kind,
            payload,
            extra: Default::default(),
            state_hint: None,
            context: ObservationContext::default(),
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.entity_id = Some(id);
        self
    }

    pub fn with_state(mut self, phase: Phase) -> Self {
        self.state_hint = Some(phase);
        self
    }

    pub fn with_context(mut self, context: ObservationContext) -> Self {
        self.context = context;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RelationshipRequest {
    pub source: EntityId,
    pub target: EntityId,
    /// Registry key; must exist in the catalog.
    pub kind: String,
    pub hints: RelationshipHints,
}

// ─────────────────────────────────────────────
// Entity upsert
// ─────────────────────────────────────────────

/// Create an entity on first observation, or merge a later observation of
/// the same logical subject: payload replaced (unless `Generic`), extension
/// map merged, `last_observed` bumped, quantum state recomputed against the
/// current connection count.
pub fn upsert_entity(
    graph: &mut TenantGraph,
    req: UpsertRequest,
    params: &QuantumParams,
    jitter: &mut Jitter,
    now_ms: Millis,
) -> Result<Entity, GraphError> {
    if !req.payload.matches_kind(req.kind) {
        return Err(GraphError::PayloadMismatch {
            kind: req.kind.as_str().to_string(),
            payload: req.payload.variant_name().to_string(),
        });
    }

    let id = match req.entity_id {
        Some(id) => EntityId::parse(id.as_str())?,
        None => EntityId::mint(req.kind, now_ms, req.context.hash32(), &jitter.nonce()),
    };

    // Validate the merged extension size before touching anything, so a
    // rejected request leaves the stored entity exactly as it was.
    let merged_keys = match graph.entities.get(&id) {
        Some(entity) => {
            entity.extra.len()
                + req.extra.keys().filter(|k| !entity.extra.contains_key(*k)).count()
        }
        None => req.extra.len(),
    };
    if merged_keys > MAX_EXTRA_KEYS {
        return Err(GraphError::ExtensionTooLarge { max: MAX_EXTRA_KEYS, got: merged_keys });
    }

    let existed = graph.entities.contains_key(&id);
    let entity = graph
        .entities
        .entry(id.clone())
        .or_insert_with(|| Entity::new(id.clone(), req.kind, req.payload.clone(), now_ms));

    if existed {
        // Merge: `Generic` carries no new payload information.
        if !matches!(req.payload, EntityPayload::Generic) {
            entity.payload = req.payload;
        }
        entity.observations = entity.observations.saturating_add(1);
    }
    for (k, v) in req.extra {
        entity.extra.insert(k, v);
    }
    entity.last_observed = now_ms;
    entity.retired = false;

    let connections = connection_count(graph, &id);
    let entity = graph.entities.get_mut(&id).expect("just inserted");
    let phase = req.state_hint.unwrap_or(entity.quantum.phase);
    entity.quantum = calculate_quantum_state(phase, &req.context, connections, params);

    graph.last_updated = now_ms;
    Ok(entity.clone())
}

/// Count live relationship endpoints touching `id` (mirrors excluded, so a
/// bidirectional pair counts once per direction it was asked for).
pub fn connection_count(graph: &TenantGraph, id: &EntityId) -> usize {
    graph
        .relationships
        .iter()
        .filter(|r| !r.reverse && (&r.source == id || &r.target == id))
        .count()
}

// ─────────────────────────────────────────────
// Relationship creation
// ─────────────────────────────────────────────

/// Create a relationship between two existing entities.
///
/// Side effects, per registry flags:
/// - `bidirectional` → exactly one mirrored reverse edge with equal weight,
///   marked `reverse` so the mirror never mirrors again.
/// - `quantum` → entanglement created and states synchronized.
/// - `cascading` → a diminished (×0.5) cascade effect recorded when it
///   clears the 0.1 floor.
pub fn create_relationship(
    graph: &mut TenantGraph,
    req: RelationshipRequest,
    registry: &RelationshipRegistry,
    params: &StrengthParams,
    jitter: &mut Jitter,
    now_ms: Millis,
) -> Result<Relationship, GraphError> {
    let spec = registry.require(&req.kind)?;

    if !graph.entities.contains_key(&req.source) {
        return Err(GraphError::EntityNotFound(req.source.to_string()));
    }
    if !graph.entities.contains_key(&req.target) {
        return Err(GraphError::EntityNotFound(req.target.to_string()));
    }

    let strength = relationship_strength(spec, &req.hints, params, jitter);
    let weight = spec.weight * strength;

    let mut effects = Effects::default();
    effects.immediate.push(EffectRecord {
        at: now_ms,
        kind: EffectKind::Creation,
        magnitude: weight,
    });
    if spec.flags.cascading {
        let cascade = weight * 0.5;
        if cascade.abs() > 0.1 {
            effects.cascading.push(EffectRecord {
                at: now_ms,
                kind: EffectKind::Cascade,
                magnitude: cascade,
            });
        }
    }

    let forward = Relationship {
        id: format!("rel_{}_{}_{}", req.kind, now_ms, jitter.nonce()),
        source: req.source.clone(),
        target: req.target.clone(),
        kind: req.kind.clone(),
        weight,
        energy: strength,
        resonance: 0.0,
        phase: 0.0,
        flags: spec.flags,
        reverse: false,
        effects,
        created_at: now_ms,
        last_interaction: now_ms,
    };

    graph.relationships.push(forward.clone());

    // Mirror exactly once; the mirror copies the computed weight so both
    // halves stay equal (the strength jitter is not re-rolled).
    if spec.flags.bidirectional {
        let mut mirror = forward.clone();
        mirror.id = format!("rel_{}_{}_{}", req.kind, now_ms, jitter.nonce());
        mirror.source = forward.target.clone();
        mirror.target = forward.source.clone();
        mirror.reverse = true;
        graph.relationships.push(mirror);
    }

    if spec.flags.quantum {
        entangle::entangle(graph, &req.source, &req.target, now_ms)?;
        entangle::synchronize(graph, &req.source, &req.target)?;
    }

    graph.last_updated = now_ms;
    debug!(kind = %req.kind, weight, "relationship created");
    Ok(forward)
}

// ─────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────

pub fn get_entity<'g>(graph: &'g TenantGraph, id: &EntityId) -> Option<&'g Entity> {
    graph.entities.get(id)
}

pub fn list_by_kind<'g>(graph: &'g TenantGraph, kind: EntityKind) -> Vec<&'g Entity> {
    graph.entities.values().filter(|e| e.kind == kind).collect()
}

/// Take an immutable, consistent copy for background analysis.
pub fn snapshot(graph: &TenantGraph, now_ms: Millis) -> GraphSnapshot {
    GraphSnapshot {
        entities: graph.entities.values().cloned().collect(),
        relationships: graph.relationships.clone(),
        taken_at: now_ms,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuantumState;

    fn deps() -> (QuantumParams, StrengthParams, RelationshipRegistry, Jitter) {
        (
            QuantumParams::default(),
            StrengthParams::default(),
            RelationshipRegistry,
            Jitter::seeded(11),
        )
    }

    fn person(graph: &mut TenantGraph, name: &str, now: Millis) -> EntityId {
        let (qp, _, _, mut jitter) = deps();
        let req = UpsertRequest::new(
            EntityKind::Person,
            EntityPayload::Person { name: name.into(), role: None, age: None },
        );
        upsert_entity(graph, req, &qp, &mut jitter, now).unwrap().id
    }

    #[test]
    fn first_observation_creates_entity() {
        let mut graph = TenantGraph::default();
        let id = person(&mut graph, "ada", 1_000);
        let entity = get_entity(&graph, &id).unwrap();
        assert_eq!(entity.kind, EntityKind::Person);
        assert_eq!(entity.observations, 1);
        assert!(entity.quantum.is_bounded());
    }

    #[test]
    fn later_observation_merges_and_bumps() {
        let (qp, _, _, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let id = person(&mut graph, "ada", 1_000);

        let req = UpsertRequest::new(
            EntityKind::Person,
            EntityPayload::Person { name: "ada l.".into(), role: None, age: Some(36) },
        )
        .with_id(id.clone())
        .with_state(Phase::Active);
        let updated = upsert_entity(&mut graph, req, &qp, &mut jitter, 2_000).unwrap();

        assert_eq!(updated.last_observed, 2_000);
        assert!(updated.observations >= 2);
        assert_eq!(updated.quantum.phase, Phase::Active);
        match updated.payload {
            EntityPayload::Person { ref name, age, .. } => {
                assert_eq!(name, "ada l.");
                assert_eq!(age, Some(36));
            }
            _ => panic!("expected person payload"),
        }
    }

    #[test]
    fn quantum_state_bounded_after_every_upsert() {
        let (qp, sp, reg, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let a = person(&mut graph, "a", 100);
        // Pile on connections, then re-observe: bounds must hold.
        for i in 0..30 {
            let b = person(&mut graph, &format!("p{i}"), 101 + i);
            create_relationship(
                &mut graph,
                RelationshipRequest {
                    source: a.clone(),
                    target: b,
                    kind: "supports".into(),
                    hints: Default::default(),
                },
                &reg,
                &sp,
                &mut jitter,
                200 + i,
            )
            .unwrap();
        }
        let req = UpsertRequest::new(EntityKind::Person, EntityPayload::Generic).with_id(a.clone());
        let updated = upsert_entity(&mut graph, req, &qp, &mut jitter, 5_000).unwrap();
        assert!(updated.quantum.is_bounded());
    }

    #[test]
    fn rejected_overcap_upsert_leaves_entity_untouched() {
        let (qp, _, _, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let id = person(&mut graph, "ada", 1_000);
        let before = get_entity(&graph, &id).unwrap().clone();

        let mut req = UpsertRequest::new(
            EntityKind::Person,
            EntityPayload::Person { name: "renamed".into(), role: None, age: Some(9) },
        )
        .with_id(id.clone());
        for i in 0..MAX_EXTRA_KEYS + 8 {
            req.extra.insert(format!("k{i}"), serde_json::json!(i));
        }

        let err = upsert_entity(&mut graph, req, &qp, &mut jitter, 2_000).unwrap_err();
        assert!(matches!(err, GraphError::ExtensionTooLarge { .. }));

        let after = get_entity(&graph, &id).unwrap();
        assert!(after.extra.is_empty());
        assert_eq!(after.observations, before.observations);
        assert_eq!(after.last_observed, before.last_observed);
        match &after.payload {
            EntityPayload::Person { name, .. } => assert_eq!(name, "ada"),
            _ => panic!("expected person payload"),
        }

        // Not wedged: a clean follow-up observation still succeeds.
        let req = UpsertRequest::new(EntityKind::Person, EntityPayload::Generic).with_id(id);
        let updated = upsert_entity(&mut graph, req, &qp, &mut jitter, 3_000).unwrap();
        assert_eq!(updated.last_observed, 3_000);
    }

    #[test]
    fn overcap_first_observation_creates_nothing() {
        let (qp, _, _, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let mut req = UpsertRequest::new(
            EntityKind::Person,
            EntityPayload::Person { name: "x".into(), role: None, age: None },
        );
        for i in 0..MAX_EXTRA_KEYS + 1 {
            req.extra.insert(format!("k{i}"), serde_json::json!(i));
        }
        assert!(matches!(
            upsert_entity(&mut graph, req, &qp, &mut jitter, 1),
            Err(GraphError::ExtensionTooLarge { .. })
        ));
        assert!(graph.entities.is_empty());
    }

    #[test]
    fn payload_mismatch_rejected() {
        let (qp, _, _, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let req = UpsertRequest::new(
            EntityKind::Event,
            EntityPayload::Person { name: "x".into(), role: None, age: None },
        );
        assert!(matches!(
            upsert_entity(&mut graph, req, &qp, &mut jitter, 1),
            Err(GraphError::PayloadMismatch { .. })
        ));
    }

    #[test]
    fn unknown_relationship_kind_rejected() {
        let (_, sp, reg, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let a = person(&mut graph, "a", 1);
        let b = person(&mut graph, "b", 2);
        let err = create_relationship(
            &mut graph,
            RelationshipRequest { source: a, target: b, kind: "osmoses_with".into(), hints: Default::default() },
            &reg,
            &sp,
            &mut jitter,
            3,
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::UnknownRelationshipKind(_)));
        assert!(graph.relationships.is_empty());
    }

    #[test]
    fn bidirectional_creates_exactly_one_mirror_with_equal_weight() {
        let (_, sp, reg, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let a = person(&mut graph, "parent", 1);
        let b = person(&mut graph, "kid", 2);
        create_relationship(
            &mut graph,
            RelationshipRequest { source: a.clone(), target: b.clone(), kind: "teaches".into(), hints: Default::default() },
            &reg,
            &sp,
            &mut jitter,
            10,
        )
        .unwrap();

        assert_eq!(graph.relationships.len(), 2);
        let fwd = &graph.relationships[0];
        let rev = &graph.relationships[1];
        assert!(!fwd.reverse);
        assert!(rev.reverse);
        assert_eq!(fwd.weight, rev.weight);
        assert_eq!(rev.source, b);
        assert_eq!(rev.target, a);
    }

    #[test]
    fn quantum_kind_entangles_and_synchronizes() {
        let (_, sp, reg, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let a = person(&mut graph, "a", 1);
        let b = person(&mut graph, "b", 2);

        // Skew the states so synchronization is visible.
        graph.entities.get_mut(&a).unwrap().quantum = QuantumState {
            energy: 1.0,
            ..QuantumState::default()
        };
        graph.entities.get_mut(&b).unwrap().quantum = QuantumState {
            energy: 0.0,
            ..QuantumState::default()
        };

        create_relationship(
            &mut graph,
            RelationshipRequest { source: a.clone(), target: b.clone(), kind: "entangles_with".into(), hints: Default::default() },
            &reg,
            &sp,
            &mut jitter,
            10,
        )
        .unwrap();

        assert_eq!(graph.entities[&a].entanglements.len(), 1);
        assert_eq!(graph.entities[&b].entanglements.len(), 1);
        assert!((graph.entities[&a].quantum.energy - 0.5).abs() < 1e-6);
        assert!((graph.entities[&b].quantum.energy - 0.5).abs() < 1e-6);
    }

    #[test]
    fn relationship_to_missing_entity_fails() {
        let (_, sp, reg, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let a = person(&mut graph, "a", 1);
        let ghost = EntityId::mint(EntityKind::Place, 5, 0, "gg");
        assert!(matches!(
            create_relationship(
                &mut graph,
                RelationshipRequest { source: a, target: ghost, kind: "visits".into(), hints: Default::default() },
                &reg,
                &sp,
                &mut jitter,
                3,
            ),
            Err(GraphError::EntityNotFound(_))
        ));
    }

    #[test]
    fn creation_effect_recorded() {
        let (_, sp, reg, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let a = person(&mut graph, "a", 1);
        let b = person(&mut graph, "b", 2);
        let rel = create_relationship(
            &mut graph,
            RelationshipRequest { source: a, target: b, kind: "models".into(), hints: Default::default() },
            &reg,
            &sp,
            &mut jitter,
            42,
        )
        .unwrap();
        assert_eq!(rel.effects.immediate.len(), 1);
        assert_eq!(rel.effects.immediate[0].kind, EffectKind::Creation);
        // "models" cascades with ×0.5 diminution.
        assert_eq!(rel.effects.cascading.len(), 1);
        assert!((rel.effects.cascading[0].magnitude - rel.weight * 0.5).abs() < 1e-6);
    }

    #[test]
    fn snapshot_is_detached_from_graph() {
        let (qp, _, _, mut jitter) = deps();
        let mut graph = TenantGraph::default();
        let id = person(&mut graph, "a", 1);
        let snap = snapshot(&graph, 50);

        // Mutate after snapshotting.
        let req = UpsertRequest::new(EntityKind::Person, EntityPayload::Generic).with_id(id);
        upsert_entity(&mut graph, req, &qp, &mut jitter, 99).unwrap();

        assert_eq!(snap.entities[0].last_observed, 1);
        assert_eq!(snap.taken_at, 50);
    }
}
