//! Static catalog of relationship kinds.
//!
//! Each entry carries a signed base weight, a per-decay-tick rate, and the
//! semantic flags the write path consults for side effects (mirroring,
//! entanglement, cascades). Creating a relationship with a kind absent from
//! this catalog is a validation error.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::GraphError;
use crate::model::RelationshipFlags;

/// Catalog entry for one relationship kind.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipSpec {
    pub kind: &'static str,
    /// Signed base weight. Negative kinds (e.g. `prevents`) pull down.
    pub weight: f32,
    /// Fraction of weight lost per decay tick.
    pub decay: f32,
    pub flags: RelationshipFlags,
}

const fn flags() -> RelationshipFlags {
    RelationshipFlags {
        temporal: false,
        emotional: false,
        quantum: false,
        bidirectional: false,
        cascading: false,
        family: false,
        spatial: false,
    }
}

const fn temporal() -> RelationshipFlags {
    RelationshipFlags { temporal: true, ..flags() }
}

const fn emotional() -> RelationshipFlags {
    RelationshipFlags { emotional: true, ..flags() }
}

const fn spatial() -> RelationshipFlags {
    RelationshipFlags { spatial: true, ..flags() }
}

#[rustfmt::skip]
static SPECS: &[RelationshipSpec] = &[
    // Causal
    RelationshipSpec { kind: "causes",           weight:  0.9,  decay: 0.010, flags: flags() },
    RelationshipSpec { kind: "prevents",         weight: -0.8,  decay: 0.020, flags: flags() },
    RelationshipSpec { kind: "amplifies",        weight:  1.2,  decay: 0.005, flags: RelationshipFlags { cascading: true, ..flags() } },
    RelationshipSpec { kind: "dampens",          weight: -0.6,  decay: 0.030, flags: flags() },
    RelationshipSpec { kind: "affects",          weight:  0.75, decay: 0.015, flags: flags() },

    // Temporal
    RelationshipSpec { kind: "precedes",         weight:  0.7,  decay: 0.010, flags: temporal() },
    RelationshipSpec { kind: "follows",          weight:  0.7,  decay: 0.010, flags: temporal() },
    RelationshipSpec { kind: "coincides_with",   weight:  0.8,  decay: 0.010, flags: temporal() },
    RelationshipSpec { kind: "cycles_with",      weight:  0.9,  decay: 0.005, flags: temporal() },

    // Emotional
    RelationshipSpec { kind: "inspires",         weight:  1.0,  decay: 0.010, flags: emotional() },
    RelationshipSpec { kind: "frustrates",       weight: -0.7,  decay: 0.015, flags: emotional() },
    RelationshipSpec { kind: "calms",            weight:  0.8,  decay: 0.010, flags: emotional() },
    RelationshipSpec { kind: "energizes",        weight:  0.9,  decay: 0.010, flags: emotional() },

    // Learning
    RelationshipSpec { kind: "teaches",          weight:  0.85, decay: 0.010, flags: RelationshipFlags { bidirectional: true, ..flags() } },
    RelationshipSpec { kind: "models",           weight:  0.9,  decay: 0.010, flags: RelationshipFlags { cascading: true, ..flags() } },
    RelationshipSpec { kind: "reinforces",       weight:  0.8,  decay: 0.010, flags: flags() },
    RelationshipSpec { kind: "challenges",       weight:  0.6,  decay: 0.015, flags: flags() },

    // Quantum
    RelationshipSpec { kind: "entangles_with",   weight:  1.5,  decay: 0.005, flags: RelationshipFlags { quantum: true, bidirectional: true, ..flags() } },
    RelationshipSpec { kind: "resonates_with",   weight:  1.3,  decay: 0.005, flags: RelationshipFlags { quantum: true, emotional: true, ..flags() } },
    RelationshipSpec { kind: "synchronizes_with", weight: 1.1,  decay: 0.008, flags: RelationshipFlags { quantum: true, temporal: true, ..flags() } },
    RelationshipSpec { kind: "potentiates",      weight:  1.4,  decay: 0.008, flags: RelationshipFlags { quantum: true, cascading: true, ..flags() } },

    // Habit
    RelationshipSpec { kind: "practices_habit",  weight:  0.9,  decay: 0.010, flags: flags() },
    RelationshipSpec { kind: "supports",         weight:  0.8,  decay: 0.010, flags: flags() },
    RelationshipSpec { kind: "motivates",        weight:  0.85, decay: 0.010, flags: emotional() },

    // Participation / ownership
    RelationshipSpec { kind: "participates_in",  weight:  0.7,  decay: 0.015, flags: flags() },
    RelationshipSpec { kind: "assigned_to",      weight:  0.6,  decay: 0.020, flags: flags() },
    RelationshipSpec { kind: "created_by",       weight:  0.5,  decay: 0.020, flags: flags() },
    RelationshipSpec { kind: "responded_by",     weight:  0.5,  decay: 0.020, flags: flags() },

    // Family
    RelationshipSpec { kind: "parent_of",        weight:  1.0,  decay: 0.001, flags: RelationshipFlags { family: true, ..flags() } },
    RelationshipSpec { kind: "child_of",         weight:  1.0,  decay: 0.001, flags: RelationshipFlags { family: true, ..flags() } },

    // Spatial
    RelationshipSpec { kind: "visits",           weight:  0.7,  decay: 0.015, flags: spatial() },
    RelationshipSpec { kind: "frequents",        weight:  0.9,  decay: 0.010, flags: spatial() },
    RelationshipSpec { kind: "works_at",         weight:  1.0,  decay: 0.005, flags: spatial() },
    RelationshipSpec { kind: "studies_at",       weight:  1.0,  decay: 0.005, flags: spatial() },
    RelationshipSpec { kind: "located_at",       weight:  0.8,  decay: 0.010, flags: spatial() },
    RelationshipSpec { kind: "near_to",          weight:  0.5,  decay: 0.020, flags: spatial() },
    RelationshipSpec { kind: "travels_from",     weight:  0.6,  decay: 0.015, flags: spatial() },
    RelationshipSpec { kind: "travels_to",       weight:  0.6,  decay: 0.015, flags: spatial() },
];

static BY_KIND: Lazy<HashMap<&'static str, &'static RelationshipSpec>> =
    Lazy::new(|| SPECS.iter().map(|s| (s.kind, s)).collect());

/// Read-only view over the static catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipRegistry;

impl RelationshipRegistry {
    /// Look up a kind, or fail with `UnknownRelationshipKind`.
    pub fn require(&self, kind: &str) -> Result<&'static RelationshipSpec, GraphError> {
        BY_KIND
            .get(kind)
            .copied()
            .ok_or_else(|| GraphError::UnknownRelationshipKind(kind.to_string()))
    }

    pub fn get(&self, kind: &str) -> Option<&'static RelationshipSpec> {
        BY_KIND.get(kind).copied()
    }

    pub fn contains(&self, kind: &str) -> bool {
        BY_KIND.contains_key(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static RelationshipSpec> {
        SPECS.iter()
    }

    pub fn len(&self) -> usize {
        SPECS.len()
    }

    pub fn is_empty(&self) -> bool {
        SPECS.is_empty()
    }
}
