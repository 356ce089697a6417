//! Relationship derivation for bulk-loaded graphs.
//!
//! Persistence backends store entities; most edges are implied by the
//! data itself. After a bulk load the engine derives:
//!
//! - `participates_in` from event attendee lists
//! - `parent_of` / `child_of` between household roles
//! - `responded_by` from check-ins tagged with a member

use std::collections::HashMap;

use hearth_graph::{
    create_relationship, EntityId, EntityKind, EntityPayload, HouseholdRole, Jitter, Millis,
    RelationshipHints, RelationshipRegistry, RelationshipRequest, StrengthParams, TenantGraph,
};
use tracing::warn;

fn has_edge(graph: &TenantGraph, source: &EntityId, target: &EntityId, kind: &str) -> bool {
    graph
        .relationships
        .iter()
        .any(|r| &r.source == source && &r.target == target && r.kind == kind)
}

fn link(
    graph: &mut TenantGraph,
    source: EntityId,
    target: EntityId,
    kind: &str,
    registry: &RelationshipRegistry,
    params: &StrengthParams,
    jitter: &mut Jitter,
    now_ms: Millis,
) -> usize {
    if has_edge(graph, &source, &target, kind) {
        return 0;
    }
    let req = RelationshipRequest {
        source,
        target,
        kind: kind.to_string(),
        hints: RelationshipHints::default(),
    };
    match create_relationship(graph, req, registry, params, jitter, now_ms) {
        Ok(_) => 1,
        Err(e) => {
            warn!(kind, error = %e, "skipping derived relationship");
            0
        }
    }
}

/// Derive the implied edges of a freshly loaded graph. Returns how many
/// relationships were created. Safe to call repeatedly.
pub fn derive_relationships(
    graph: &mut TenantGraph,
    registry: &RelationshipRegistry,
    params: &StrengthParams,
    jitter: &mut Jitter,
    now_ms: Millis,
) -> usize {
    let mut people: HashMap<String, EntityId> = HashMap::new();
    let mut parents: Vec<EntityId> = Vec::new();
    let mut children: Vec<EntityId> = Vec::new();
    for entity in graph.entities.values() {
        if let EntityPayload::Person { name, role, .. } = &entity.payload {
            people.insert(name.to_lowercase(), entity.id.clone());
            match role {
                Some(HouseholdRole::Parent) | Some(HouseholdRole::Guardian) => {
                    parents.push(entity.id.clone());
                }
                Some(HouseholdRole::Child) => children.push(entity.id.clone()),
                _ => {}
            }
        }
    }

    let mut created = 0;

    // Attendance edges.
    let mut attendance: Vec<(EntityId, EntityId)> = Vec::new();
    for entity in graph.entities.values() {
        if entity.kind != EntityKind::Event {
            continue;
        }
        for attendee in entity.event_attendees() {
            if let Some(person) = people.get(&attendee.to_lowercase()) {
                attendance.push((person.clone(), entity.id.clone()));
            }
        }
    }
    for (person, event) in attendance {
        created +=
            link(graph, person, event, "participates_in", registry, params, jitter, now_ms);
    }

    // Household structure.
    for parent in &parents {
        for child in &children {
            created += link(
                graph,
                parent.clone(),
                child.clone(),
                "parent_of",
                registry,
                params,
                jitter,
                now_ms,
            );
            created += link(
                graph,
                child.clone(),
                parent.clone(),
                "child_of",
                registry,
                params,
                jitter,
                now_ms,
            );
        }
    }

    // Check-in responses, keyed by the optional "member" tag.
    let mut responses: Vec<(EntityId, EntityId)> = Vec::new();
    for entity in graph.entities.values() {
        if entity.kind != EntityKind::Checkin {
            continue;
        }
        let member = entity.extra.get("member").and_then(|v| v.as_str());
        if let Some(person) = member.and_then(|m| people.get(&m.to_lowercase())) {
            responses.push((entity.id.clone(), person.clone()));
        }
    }
    for (checkin, person) in responses {
        created +=
            link(graph, checkin, person, "responded_by", registry, params, jitter, now_ms);
    }

    created
}
