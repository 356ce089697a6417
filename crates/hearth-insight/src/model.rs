use serde::{Deserialize, Serialize};

/// A human-readable takeaway derived from a pattern or prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    pub title: String,
    pub description: String,
    pub confidence: f32,
    /// Expected effect size ∈ [0,1], inherited from the source.
    pub impact: f32,
    pub recommendation: String,
}

/// Prose produced by a narrative collaborator for one insight.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub description: String,
    pub recommendation: String,
}
