//! Relationship decay and entity retirement.
//!
//! The decay pass models fading relevance: every tick, each relationship's
//! weight shrinks toward zero by its registry decay rate. Entities are
//! never hard-deleted — once an entity has no live relationship and has
//! not been observed within the retention horizon it is marked retired,
//! which removes it from active pattern/prediction consideration while
//! keeping its history intact. Re-observation un-retires it.
//!
//! A single pass is idempotent with respect to retirement (re-running it
//! at the same instant retires nothing new) and safe to interleave with
//! enable/disable toggling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Millis, MILLIS_PER_DAY};
use crate::model::{EffectKind, EffectRecord, TenantGraph};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayParams {
    /// Weight magnitude below which a relationship no longer counts as live.
    pub weight_floor: f32,
    /// Days without observation after which an unconnected entity retires.
    pub retention_days: i64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            weight_floor: 0.05,
            retention_days: 90,
        }
    }
}

/// Summary of one decay pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecayReport {
    pub relationships_decayed: usize,
    pub relationships_dormant: usize,
    pub entities_retired: usize,
}

/// Run one decay tick over the whole tenant graph.
pub fn decay_pass(graph: &mut TenantGraph, params: &DecayParams, now_ms: Millis) -> DecayReport {
    let mut report = DecayReport::default();

    for rel in graph.relationships.iter_mut() {
        if rel.weight == 0.0 {
            continue;
        }
        let before = rel.weight;
        rel.weight *= 1.0 - rel_decay_rate(&rel.kind);
        if rel.weight.abs() < 1e-4 {
            rel.weight = 0.0;
        }
        report.relationships_decayed += 1;
        if before.abs() >= params.weight_floor && rel.weight.abs() < params.weight_floor {
            report.relationships_dormant += 1;
            rel.effects.delayed.push(EffectRecord {
                at: now_ms,
                kind: EffectKind::Decay,
                magnitude: rel.weight,
            });
        }
    }

    // Retirement: no live edge and stale last_observed.
    let horizon = now_ms - params.retention_days * MILLIS_PER_DAY;
    let live_ids: std::collections::HashSet<&str> = graph
        .relationships
        .iter()
        .filter(|r| r.is_live(params.weight_floor))
        .flat_map(|r| [r.source.as_str(), r.target.as_str()])
        .collect();

    let mut retired = Vec::new();
    for entity in graph.entities.values_mut() {
        if entity.retired {
            continue;
        }
        if entity.last_observed < horizon && !live_ids.contains(entity.id.as_str()) {
            entity.retired = true;
            retired.push(entity.id.clone());
        }
    }
    report.entities_retired = retired.len();

    if report.entities_retired > 0 || report.relationships_dormant > 0 {
        debug!(
            retired = report.entities_retired,
            dormant = report.relationships_dormant,
            "decay pass"
        );
    }
    graph.last_updated = now_ms;
    report
}

fn rel_decay_rate(kind: &str) -> f32 {
    crate::registry::RelationshipRegistry
        .get(kind)
        .map(|s| s.decay)
        .unwrap_or(0.01)
}
