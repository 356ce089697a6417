//! Entanglement management.
//!
//! An entanglement is a symmetric pairing between two entities: both carry
//! a reciprocal entry under the same entanglement id, with the second
//! partner's phase offset by π (phase opposition). Synchronization pulls
//! the pair's energy and coherence to their pairwise average — an
//! operation, not a stored value, applied on demand.

use std::f32::consts::PI;

use crate::clock::Millis;
use crate::error::GraphError;
use crate::model::{EffectKind, EffectRecord, Entanglement, Entity, EntityId, TenantGraph};

/// Create a reciprocal entanglement between two entities.
///
/// Idempotent per pair: if the two are already entangled, the existing
/// entanglement id is returned and no duplicate entry is appended.
pub fn entangle(
    graph: &mut TenantGraph,
    a: &EntityId,
    b: &EntityId,
    now_ms: Millis,
) -> Result<String, GraphError> {
    if !graph.entities.contains_key(a) {
        return Err(GraphError::EntityNotFound(a.to_string()));
    }
    if !graph.entities.contains_key(b) {
        return Err(GraphError::EntityNotFound(b.to_string()));
    }

    if let Some(existing) = existing_entanglement(graph, a, b) {
        return Ok(existing);
    }

    let id = format!("ent_{}_{:x}", now_ms, pair_tag(a, b));

    let ent_a = graph.entities.get_mut(a).expect("checked above");
    ent_a.entanglements.push(Entanglement {
        id: id.clone(),
        partner: b.clone(),
        phase: 0.0,
    });

    let ent_b = graph.entities.get_mut(b).expect("checked above");
    ent_b.entanglements.push(Entanglement {
        id: id.clone(),
        partner: a.clone(),
        phase: PI,
    });

    Ok(id)
}

/// Synchronize the quantum state of two entangled entities: both ends take
/// the pairwise average of energy and coherence.
///
/// Idempotent (a second application is a no-op) and commutative (argument
/// order does not matter).
pub fn synchronize(graph: &mut TenantGraph, a: &EntityId, b: &EntityId) -> Result<(), GraphError> {
    let (avg_energy, avg_coherence) = {
        let ea = get(graph, a)?;
        let eb = get(graph, b)?;
        (
            (ea.quantum.energy + eb.quantum.energy) / 2.0,
            (ea.quantum.coherence + eb.quantum.coherence) / 2.0,
        )
    };

    for id in [a, b] {
        let entity = graph.entities.get_mut(id).expect("checked above");
        entity.quantum.energy = avg_energy;
        entity.quantum.coherence = avg_coherence;
        entity.quantum.clamp();
    }
    Ok(())
}

/// Run one synchronization pass over every entangled pair in the graph,
/// recording a `Sync` effect on relationships that requested entanglement.
/// Returns the number of pairs synchronized.
pub fn synchronize_all(graph: &mut TenantGraph, now_ms: Millis) -> usize {
    let pairs: Vec<(EntityId, EntityId)> = graph
        .entities
        .values()
        .flat_map(|e| {
            e.entanglements
                .iter()
                // phase 0.0 side owns the pair, so each is visited once
                .filter(|ent| ent.phase == 0.0)
                .map(|ent| (e.id.clone(), ent.partner.clone()))
                .collect::<Vec<_>>()
        })
        .collect();

    let mut synced = 0;
    for (a, b) in &pairs {
        if synchronize(graph, a, b).is_ok() {
            synced += 1;
        }
    }

    if synced > 0 {
        for rel in graph.relationships.iter_mut().filter(|r| r.flags.quantum && !r.reverse) {
            rel.effects.quantum.push(EffectRecord {
                at: now_ms,
                kind: EffectKind::Sync,
                magnitude: rel.energy,
            });
        }
    }
    synced
}

fn get<'g>(graph: &'g TenantGraph, id: &EntityId) -> Result<&'g Entity, GraphError> {
    graph
        .entities
        .get(id)
        .ok_or_else(|| GraphError::EntityNotFound(id.to_string()))
}

fn existing_entanglement(graph: &TenantGraph, a: &EntityId, b: &EntityId) -> Option<String> {
    graph
        .entities
        .get(a)?
        .entanglements
        .iter()
        .find(|e| &e.partner == b)
        .map(|e| e.id.clone())
}

fn pair_tag(a: &EntityId, b: &EntityId) -> u32 {
    let mut hash: u32 = 0;
    // Order-independent: same tag regardless of argument order.
    for s in [a.as_str().min(b.as_str()), a.as_str().max(b.as_str())] {
        for byte in s.bytes() {
            hash = hash.wrapping_mul(31).wrapping_add(byte as u32);
        }
    }
    hash
}
