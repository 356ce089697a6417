use serde::{Deserialize, Serialize};

/// A forward-looking statement about the household, with an expected
/// effect size and probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    /// Life domain the prediction concerns, e.g. `"stress"`, `"habits"`.
    pub domain: String,
    /// Short headline, e.g. `"Busy day ahead"`.
    pub prediction: String,
    pub description: String,
    pub confidence: f32,
    /// Human-readable horizon, e.g. `"next 7 days"`.
    pub timeframe: String,
    /// Expected effect size ∈ [0,1].
    pub impact: f32,
    /// Probability estimate ∈ [0,1].
    pub likelihood: f32,
}

impl Prediction {
    /// Ranking key: predictions are ordered by `impact × likelihood`.
    pub fn score(&self) -> f32 {
        self.impact * self.likelihood
    }
}
