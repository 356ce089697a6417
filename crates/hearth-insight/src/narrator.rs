use async_trait::async_trait;
use hearth_patterns::Pattern;
use hearth_predict::Prediction;

use crate::error::InsightError;
use crate::model::Narrative;

/// Seam for an external prose generator (an LLM sidecar in deployment).
///
/// Implementations may be slow or flaky; callers wrap every invocation
/// in a timeout and fall back to [`TemplateNarrator`] output, so a
/// collaborator failure can never surface to engine callers.
#[async_trait]
pub trait NarrativeCollaborator: Send + Sync {
    async fn narrate_pattern(&self, pattern: &Pattern) -> Result<Narrative, InsightError>;

    async fn narrate_prediction(
        &self,
        prediction: &Prediction,
    ) -> Result<Narrative, InsightError>;
}

/// Deterministic template prose. The default collaborator and the
/// fallback when a real one misbehaves.
pub struct TemplateNarrator;

impl TemplateNarrator {
    pub fn pattern_narrative(pattern: &Pattern) -> Narrative {
        Narrative {
            description: format!(
                "{} keeps showing up in your household: {}",
                pattern.name, pattern.description
            ),
            recommendation: format!(
                "Lean into it: keeping this rhythm going tends to pay off in {}",
                pattern.domains.first().map(String::as_str).unwrap_or("daily life")
            ),
        }
    }

    pub fn prediction_narrative(prediction: &Prediction) -> Narrative {
        Narrative {
            description: format!(
                "{} ({}): {}",
                prediction.prediction, prediction.timeframe, prediction.description
            ),
            recommendation: match prediction.domain.as_str() {
                "stress" => "Consider moving one commitment to a lighter day".to_string(),
                "habits" => "Keep the streak visible; momentum compounds".to_string(),
                "planning" => "A good slot for something the household keeps postponing"
                    .to_string(),
                "connection" => "Protect the shared time already on the calendar".to_string(),
                _ => "No action needed; keep observing".to_string(),
            },
        }
    }
}

#[async_trait]
impl NarrativeCollaborator for TemplateNarrator {
    async fn narrate_pattern(&self, pattern: &Pattern) -> Result<Narrative, InsightError> {
        Ok(Self::pattern_narrative(pattern))
    }

    async fn narrate_prediction(
        &self,
        prediction: &Prediction,
    ) -> Result<Narrative, InsightError> {
        Ok(Self::prediction_narrative(prediction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pattern() -> Pattern {
        Pattern {
            id: "pattern-time-1000".to_string(),
            name: "Peak Activity Hour".to_string(),
            description: "Activity concentrates around 09:00".to_string(),
            domains: vec!["time".to_string()],
            strength: 0.8,
            confidence: 0.85,
        }
    }

    #[test]
    fn template_prose_is_deterministic() {
        let a = TemplateNarrator::pattern_narrative(&sample_pattern());
        let b = TemplateNarrator::pattern_narrative(&sample_pattern());
        assert_eq!(a, b);
        assert!(a.description.contains("Peak Activity Hour"));
    }
}
