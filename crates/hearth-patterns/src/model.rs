use serde::{Deserialize, Serialize};

/// A detected statistical regularity in a tenant graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Domain tags, e.g. `["social", "collaboration", "family"]`.
    pub domains: Vec<String>,
    /// Normalized ratio ∈ [0,1].
    pub strength: f32,
    /// Grows with sample size, capped below 1.0.
    pub confidence: f32,
}

impl Pattern {
    /// Ranking key: patterns are ordered by `strength × confidence`.
    pub fn score(&self) -> f32 {
        self.strength * self.confidence
    }
}
