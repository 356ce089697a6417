//! Relationship strength scoring.
//!
//! A base score, flag multipliers from the registry entry, property hints,
//! and a small jitter, clamped to [0.1, 1.0]. The individual constants are
//! uncalibrated; they live in [`StrengthParams`] as named, tunable
//! parameters rather than contractual values.

use serde::{Deserialize, Serialize};

use crate::jitter::Jitter;
use crate::registry::RelationshipSpec;

/// Caller-supplied hints about the relationship being created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipHints {
    /// e.g. "high"
    pub importance: Option<String>,
    /// e.g. "daily"
    pub frequency: Option<String>,
    /// e.g. "permanent"
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrengthParams {
    pub base: f32,
    /// Added when the registry base weight is positive.
    pub positive_weight_bonus: f32,
    pub quantum_mult: f32,
    /// Emotional kinds vary in `[emotional_mult_lo, emotional_mult_hi)`.
    pub emotional_mult_lo: f32,
    pub emotional_mult_hi: f32,
    /// Family kinds pin the strength here before hints and jitter.
    pub family_strength: f32,
    pub importance_high_mult: f32,
    pub frequency_daily_mult: f32,
    pub duration_permanent_mult: f32,
    /// Half-width of the final uniform jitter.
    pub jitter: f32,
    pub floor: f32,
    pub ceiling: f32,
}

impl Default for StrengthParams {
    fn default() -> Self {
        Self {
            base: 0.5,
            positive_weight_bonus: 0.2,
            quantum_mult: 1.3,
            emotional_mult_lo: 0.8,
            emotional_mult_hi: 1.2,
            family_strength: 0.9,
            importance_high_mult: 1.2,
            frequency_daily_mult: 1.1,
            duration_permanent_mult: 1.15,
            jitter: 0.05,
            floor: 0.1,
            ceiling: 1.0,
        }
    }
}

/// Compute the strength of a new relationship.
pub fn relationship_strength(
    spec: &RelationshipSpec,
    hints: &RelationshipHints,
    params: &StrengthParams,
    jitter: &mut Jitter,
) -> f32 {
    let mut strength = params.base;

    if spec.weight > 0.0 {
        strength += params.positive_weight_bonus;
    }
    if spec.flags.quantum {
        strength *= params.quantum_mult;
    }
    if spec.flags.emotional {
        strength *= jitter.uniform(params.emotional_mult_lo, params.emotional_mult_hi);
    }
    if spec.flags.family {
        strength = params.family_strength;
    }

    if hints.importance.as_deref() == Some("high") {
        strength *= params.importance_high_mult;
    }
    if hints.frequency.as_deref() == Some("daily") {
        strength *= params.frequency_daily_mult;
    }
    if hints.duration.as_deref() == Some("permanent") {
        strength *= params.duration_permanent_mult;
    }

    strength += jitter.symmetric(params.jitter);
    strength.clamp(params.floor, params.ceiling)
}
