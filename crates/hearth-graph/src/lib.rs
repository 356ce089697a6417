//! `hearth-graph` — typed, in-memory household relationship graph.
//!
//! One [`TenantGraph`] per household holds entities (people, events,
//! habits, places, …) and the weighted, decaying relationships between
//! them. This crate owns:
//!
//! - the data model and structured entity ids
//! - the static [`RelationshipRegistry`] catalog
//! - the write path (`upsert_entity`, `create_relationship`) and its
//!   registry-driven side effects
//! - quantum-state calculation, entanglement + synchronization
//! - the periodic decay/retirement pass
//!
//! Scheduling, per-tenant locking, and subscriptions live in
//! `hearth-engine`; analysis lives in `hearth-patterns` / `hearth-predict`.

pub mod clock;
pub mod decay;
pub mod entangle;
pub mod error;
pub mod jitter;
pub mod model;
pub mod quantum;
pub mod registry;
pub mod store;
pub mod strength;

pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use decay::{decay_pass, DecayParams, DecayReport};
pub use entangle::{entangle, synchronize, synchronize_all};
pub use error::GraphError;
pub use jitter::Jitter;
pub use model::{
    EffectKind, EffectRecord, Effects, Entanglement, Entity, EntityId, EntityKind, EntityPayload,
    GraphSnapshot, HouseholdRole, MessageChannel, Phase, QuantumState, Relationship,
    RelationshipFlags, TenantGraph,
};
pub use quantum::{calculate_quantum_state, ObservationContext, QuantumParams};
pub use registry::{RelationshipRegistry, RelationshipSpec};
pub use store::{
    connection_count, create_relationship, get_entity, list_by_kind, snapshot, upsert_entity,
    RelationshipRequest, UpsertRequest,
};
pub use strength::{relationship_strength, RelationshipHints, StrengthParams};
