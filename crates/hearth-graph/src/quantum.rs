//! Quantum-state calculation.
//!
//! An entity's energetic state is derived from three inputs:
//!
//! 1. A base `{energy, potential}` template chosen by its [`Phase`].
//! 2. Contextual modifiers from the observation context (time of day,
//!    mood, social setting).
//! 3. A connection bonus that grows with the entity's degree, capped, with
//!    coherence falling as more links attach (decoherence).
//!
//! Every produced field is clamped to [0,1].

use serde::{Deserialize, Serialize};

use crate::model::{Phase, QuantumState};

// ─────────────────────────────────────────────
// ObservationContext
// ─────────────────────────────────────────────

/// Context dimensions attached to an observation. All free-text values;
/// the calculator only reacts to the handful it knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationContext {
    /// e.g. "morning", "afternoon", "evening", "night"
    pub temporal: Option<String>,
    /// e.g. "stressed", "neutral", "happy", "joyful"
    pub emotional: Option<String>,
    /// e.g. "exhausted", "normal", "energized"
    pub energy: Option<String>,
    /// e.g. "alone", "partner", "family", "community"
    pub social: Option<String>,
    /// e.g. "home", "work", "school", "travel"
    pub location: Option<String>,
}

impl ObservationContext {
    pub fn is_empty(&self) -> bool {
        self.temporal.is_none()
            && self.emotional.is_none()
            && self.energy.is_none()
            && self.social.is_none()
            && self.location.is_none()
    }

    /// Stable 32-bit hash over the context, used as an id segment.
    pub fn hash32(&self) -> u32 {
        let s = serde_json::to_string(self).unwrap_or_default();
        let mut hash: u32 = 0;
        for b in s.bytes() {
            hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(b as u32);
        }
        hash
    }
}

// ─────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────

/// Named, tunable knobs for the state calculation. The defaults reproduce
/// the historical constants; nothing downstream assumes these exact values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantumParams {
    /// Energy multiplier when the observation context reports a happy mood.
    pub happy_energy_mult: f32,
    /// Potential multiplier for morning observations.
    pub morning_potential_mult: f32,
    /// Energy multiplier for family-setting observations.
    pub family_energy_mult: f32,
    /// Energy bonus per connection.
    pub connection_bonus: f32,
    /// Cap on the total connection energy bonus.
    pub connection_bonus_cap: f32,
    /// Coherence lost per connection (decoherence rate).
    pub decoherence_per_connection: f32,
}

impl Default for QuantumParams {
    fn default() -> Self {
        Self {
            happy_energy_mult: 1.2,
            morning_potential_mult: 1.1,
            family_energy_mult: 1.15,
            connection_bonus: 0.1,
            connection_bonus_cap: 0.5,
            decoherence_per_connection: 0.05,
        }
    }
}

/// Base `{energy, potential}` per phase template.
pub fn phase_template(phase: Phase) -> (f32, f32) {
    match phase {
        Phase::Dormant => (0.1, 0.9),
        Phase::Emerging => (0.3, 0.7),
        Phase::Active => (0.7, 0.5),
        Phase::Peak => (0.9, 0.8),
        Phase::Transforming => (0.5, 1.0),
        Phase::Stabilized => (0.6, 0.4),
    }
}

// ─────────────────────────────────────────────
// Calculation
// ─────────────────────────────────────────────

/// Compute the quantum state for an entity observed in `phase` with
/// `connection_count` live links.
pub fn calculate_quantum_state(
    phase: Phase,
    context: &ObservationContext,
    connection_count: usize,
    params: &QuantumParams,
) -> QuantumState {
    let (mut energy, mut potential) = phase_template(phase);

    if context.emotional.as_deref() == Some("happy") {
        energy *= params.happy_energy_mult;
    }
    if context.temporal.as_deref() == Some("morning") {
        potential *= params.morning_potential_mult;
    }
    if context.social.as_deref() == Some("family") {
        energy *= params.family_energy_mult;
    }

    let bonus = (connection_count as f32 * params.connection_bonus).min(params.connection_bonus_cap);
    energy += bonus;
    potential += bonus * 0.5;

    let coherence = 1.0 - params.decoherence_per_connection * connection_count as f32;

    let mut state = QuantumState {
        phase,
        energy,
        potential,
        coherence,
        resonance: 0.5,
    };
    state.clamp();
    state
}
