use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::clock::Millis;
use crate::error::GraphError;

/// Upper bound on the open-extension map carried by an entity.
/// Enforced at the write boundary; anything structured beyond this belongs
/// in a typed payload variant.
pub const MAX_EXTRA_KEYS: usize = 32;

// ─────────────────────────────────────────────
// EntityId
// ─────────────────────────────────────────────

/// Structured entity identifier: `{kind}_{timestamp_ms}_{ctx_hash}_{nonce}`.
///
/// Ids are minted once and never reused. The caller is responsible for
/// routing repeated observations of the same logical subject to the same
/// id — the store does not deduplicate by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn mint(kind: EntityKind, ts_ms: Millis, ctx_hash: u32, nonce: &str) -> Self {
        Self(format!("{}_{}_{:08x}_{}", kind.as_str(), ts_ms, ctx_hash, nonce))
    }

    /// Validate an externally supplied id.
    ///
    /// Accepts any id of the minted shape; rejects empty strings, ids with
    /// an unknown kind segment, or ids missing the timestamp segment.
    pub fn parse(raw: &str) -> Result<Self, GraphError> {
        let mut parts = raw.splitn(4, '_');
        let kind = parts.next().unwrap_or_default();
        let ts = parts.next().unwrap_or_default();
        if EntityKind::from_str(kind).is_none() || ts.parse::<i64>().is_err() {
            return Err(GraphError::MalformedId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> Option<EntityKind> {
        EntityKind::from_str(self.0.split('_').next().unwrap_or_default())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────
// EntityKind
// ─────────────────────────────────────────────

/// Taxonomy of household entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Event,
    Habit,
    Insight,
    Pattern,
    Emotion,
    Goal,
    Memory,
    Trigger,
    Place,
    Flow,
    Resonance,
    Potential,
    Message,
    Checkin,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Event => "event",
            Self::Habit => "habit",
            Self::Insight => "insight",
            Self::Pattern => "pattern",
            Self::Emotion => "emotion",
            Self::Goal => "goal",
            Self::Memory => "memory",
            Self::Trigger => "trigger",
            Self::Place => "place",
            Self::Flow => "flow",
            Self::Resonance => "resonance",
            Self::Potential => "potential",
            Self::Message => "message",
            Self::Checkin => "checkin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "person" => Self::Person,
            "event" => Self::Event,
            "habit" => Self::Habit,
            "insight" => Self::Insight,
            "pattern" => Self::Pattern,
            "emotion" => Self::Emotion,
            "goal" => Self::Goal,
            "memory" => Self::Memory,
            "trigger" => Self::Trigger,
            "place" => Self::Place,
            "flow" => Self::Flow,
            "resonance" => Self::Resonance,
            "potential" => Self::Potential,
            "message" => Self::Message,
            "checkin" => Self::Checkin,
            _ => return None,
        })
    }
}

// ─────────────────────────────────────────────
// Payloads
// ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdRole {
    Parent,
    Child,
    Guardian,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageChannel {
    Email,
    Sms,
    Chat,
}

/// Typed per-kind payload. Kinds without structured fields fall back to
/// [`EntityPayload::Generic`]; free-form detail goes in the entity's
/// bounded `extra` map, validated at the write boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "payload", rename_all = "snake_case")]
pub enum EntityPayload {
    Person {
        name: String,
        role: Option<HouseholdRole>,
        age: Option<u8>,
    },
    Event {
        title: String,
        /// Scheduled start, ms since epoch. `None` for undated events.
        starts_at: Option<Millis>,
        /// Ids (or names) of attending household members.
        attendees: Vec<String>,
        category: Option<String>,
        location: Option<String>,
        /// Post-hoc harmony/quality score ∈ [0,1].
        quality: Option<f32>,
    },
    Habit {
        name: String,
        streak: u32,
        cadence: Option<String>,
    },
    Message {
        channel: MessageChannel,
        sent_at: Millis,
        sender: Option<String>,
    },
    Checkin {
        answered_at: Millis,
        /// Normalized response score ∈ [0,1], if the check-in was scored.
        score: Option<f32>,
        positive: bool,
    },
    Place {
        name: String,
        category: Option<String>,
        visits: u32,
    },
    Generic,
}

impl EntityPayload {
    /// Kinds a payload variant is valid for.
    pub fn matches_kind(&self, kind: EntityKind) -> bool {
        match self {
            Self::Person { .. } => kind == EntityKind::Person,
            Self::Event { .. } => kind == EntityKind::Event,
            Self::Habit { .. } => kind == EntityKind::Habit,
            Self::Message { .. } => kind == EntityKind::Message,
            Self::Checkin { .. } => kind == EntityKind::Checkin,
            Self::Place { .. } => kind == EntityKind::Place,
            Self::Generic => true,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Person { .. } => "person",
            Self::Event { .. } => "event",
            Self::Habit { .. } => "habit",
            Self::Message { .. } => "message",
            Self::Checkin { .. } => "checkin",
            Self::Place { .. } => "place",
            Self::Generic => "generic",
        }
    }
}

// ─────────────────────────────────────────────
// QuantumState
// ─────────────────────────────────────────────

/// Named base-state template an entity is observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Dormant,
    Emerging,
    Active,
    Peak,
    Transforming,
    Stabilized,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Emerging
    }
}

/// Per-entity energetic state. Invariant: every bounded field stays in
/// [0,1] after every mutation — callers go through [`QuantumState::clamp`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumState {
    pub phase: Phase,
    pub energy: f32,
    pub potential: f32,
    pub coherence: f32,
    pub resonance: f32,
}

impl Default for QuantumState {
    fn default() -> Self {
        Self {
            phase: Phase::Emerging,
            energy: 0.3,
            potential: 0.7,
            coherence: 1.0,
            resonance: 0.5,
        }
    }
}

impl QuantumState {
    /// Re-establish the [0,1] bound on every field.
    pub fn clamp(&mut self) {
        self.energy = self.energy.clamp(0.0, 1.0);
        self.potential = self.potential.clamp(0.0, 1.0);
        self.coherence = self.coherence.clamp(0.0, 1.0);
        self.resonance = self.resonance.clamp(0.0, 1.0);
    }

    pub fn is_bounded(&self) -> bool {
        let in01 = |x: f32| (0.0..=1.0).contains(&x);
        in01(self.energy) && in01(self.potential) && in01(self.coherence) && in01(self.resonance)
    }
}

// ─────────────────────────────────────────────
// Entanglement
// ─────────────────────────────────────────────

/// One side of a symmetric pairing between two entities.
///
/// Both partners carry an entry with the same `id`; the second entry's
/// phase is offset by π (phase opposition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entanglement {
    pub id: String,
    pub partner: EntityId,
    pub phase: f32,
}

// ─────────────────────────────────────────────
// Entity
// ─────────────────────────────────────────────

/// A typed node in the per-tenant household graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub payload: EntityPayload,
    /// Bounded open-extension map (≤ [`MAX_EXTRA_KEYS`] keys).
    pub extra: HashMap<String, serde_json::Value>,
    pub quantum: QuantumState,
    pub entanglements: Vec<Entanglement>,
    pub created_at: Millis,
    pub last_observed: Millis,
    /// How many times this logical subject has been observed.
    pub observations: u32,
    /// Set by the decay pass when the entity has no live relationship and
    /// has not been observed within the retention horizon. Retired entities
    /// drop out of pattern/prediction consideration but are never deleted.
    pub retired: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, payload: EntityPayload, now_ms: Millis) -> Self {
        Self {
            id,
            kind,
            payload,
            extra: HashMap::new(),
            quantum: QuantumState::default(),
            entanglements: Vec::new(),
            created_at: now_ms,
            last_observed: now_ms,
            observations: 1,
            retired: false,
        }
    }

    pub fn event_starts_at(&self) -> Option<Millis> {
        match &self.payload {
            EntityPayload::Event { starts_at, .. } => *starts_at,
            _ => None,
        }
    }

    pub fn event_attendees(&self) -> &[String] {
        match &self.payload {
            EntityPayload::Event { attendees, .. } => attendees,
            _ => &[],
        }
    }

    pub fn event_quality(&self) -> Option<f32> {
        match &self.payload {
            EntityPayload::Event { quality, .. } => *quality,
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────
// Relationship
// ─────────────────────────────────────────────

/// Semantic flags inherited from the registry entry at creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipFlags {
    pub temporal: bool,
    pub emotional: bool,
    pub quantum: bool,
    pub bidirectional: bool,
    pub cascading: bool,
    pub family: bool,
    pub spatial: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Creation,
    Cascade,
    Sync,
    Decay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub at: Millis,
    pub kind: EffectKind,
    pub magnitude: f32,
}

/// Effect history bucketed the way the original write path records it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub immediate: Vec<EffectRecord>,
    pub delayed: Vec<EffectRecord>,
    pub cascading: Vec<EffectRecord>,
    pub quantum: Vec<EffectRecord>,
}

/// A typed, weighted, directed edge between two entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub source: EntityId,
    pub target: EntityId,
    /// Registry key, e.g. `"participates_in"`. Guaranteed present in the
    /// registry — creation fails otherwise.
    pub kind: String,
    /// Signed weight: registry base weight × computed strength.
    /// Decays toward zero over time.
    pub weight: f32,
    /// The raw computed strength ∈ [0.1, 1.0].
    pub energy: f32,
    pub resonance: f32,
    pub phase: f32,
    pub flags: RelationshipFlags,
    /// Marks the mirrored half of a bidirectional pair. Guards against
    /// infinite mirror recursion.
    pub reverse: bool,
    pub effects: Effects,
    pub created_at: Millis,
    pub last_interaction: Millis,
}

impl Relationship {
    /// A relationship still participating in pattern/prediction scoring.
    pub fn is_live(&self, weight_floor: f32) -> bool {
        self.weight.abs() >= weight_floor
    }
}

// ─────────────────────────────────────────────
// TenantGraph + snapshot
// ─────────────────────────────────────────────

/// Aggregate root: one household's entire graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantGraph {
    pub entities: HashMap<EntityId, Entity>,
    pub relationships: Vec<Relationship>,
    pub last_updated: Millis,
}

/// Immutable copy of a tenant graph taken under the tenant lock.
///
/// Pattern and prediction cycles run entirely against a snapshot so that
/// synchronous reads and writes never contend with a running cycle.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub taken_at: Millis,
}

impl GraphSnapshot {
    /// Entities still participating in analysis (not retired).
    pub fn active_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.retired)
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.active_entities().filter(move |e| e.kind == kind)
    }

    pub fn events(&self) -> impl Iterator<Item = &Entity> {
        self.of_kind(EntityKind::Event)
    }

    pub fn people(&self) -> impl Iterator<Item = &Entity> {
        self.of_kind(EntityKind::Person)
    }

    pub fn messages(&self) -> impl Iterator<Item = &Entity> {
        self.of_kind(EntityKind::Message)
    }

    pub fn checkins(&self) -> impl Iterator<Item = &Entity> {
        self.of_kind(EntityKind::Checkin)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_id_round_trips() {
        let id = EntityId::mint(EntityKind::Person, 1_700_000_000_000, 0xdeadbeef, "a1b2c3d4");
        let parsed = EntityId::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.kind(), Some(EntityKind::Person));
    }

    #[test]
    fn malformed_ids_rejected() {
        assert!(EntityId::parse("").is_err());
        assert!(EntityId::parse("widget_123_ff_x").is_err()); // unknown kind
        assert!(EntityId::parse("person_notatimestamp_ff_x").is_err());
    }

    #[test]
    fn clamp_restores_bounds() {
        let mut q = QuantumState {
            phase: Phase::Peak,
            energy: 1.7,
            potential: -0.2,
            coherence: 0.5,
            resonance: 2.0,
        };
        q.clamp();
        assert!(q.is_bounded());
        assert_eq!(q.energy, 1.0);
        assert_eq!(q.potential, 0.0);
    }

    #[test]
    fn payload_kind_matching() {
        let p = EntityPayload::Event {
            title: "dinner".into(),
            starts_at: None,
            attendees: vec![],
            category: None,
            location: None,
            quality: None,
        };
        assert!(p.matches_kind(EntityKind::Event));
        assert!(!p.matches_kind(EntityKind::Person));
        assert!(EntityPayload::Generic.matches_kind(EntityKind::Goal));
    }

    #[test]
    fn kind_str_round_trip() {
        for kind in [
            EntityKind::Person,
            EntityKind::Event,
            EntityKind::Checkin,
            EntityKind::Potential,
        ] {
            assert_eq!(EntityKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn snapshot_filters_retired() {
        let mut graph = TenantGraph::default();
        let a = EntityId::mint(EntityKind::Person, 1, 0, "aa");
        let b = EntityId::mint(EntityKind::Person, 2, 0, "bb");
        let mut ent_a = Entity::new(a.clone(), EntityKind::Person, EntityPayload::Generic, 1);
        ent_a.retired = true;
        graph.entities.insert(a, ent_a);
        graph
            .entities
            .insert(b.clone(), Entity::new(b, EntityKind::Person, EntityPayload::Generic, 2));

        let snap = GraphSnapshot {
            entities: graph.entities.values().cloned().collect(),
            relationships: vec![],
            taken_at: 3,
        };
        assert_eq!(snap.active_entities().count(), 1);
    }
}
