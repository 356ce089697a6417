use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hearth_patterns::Pattern;
use hearth_predict::Prediction;
use tracing::warn;

use crate::config::InsightConfig;
use crate::error::InsightError;
use crate::model::{Insight, Narrative};
use crate::narrator::{NarrativeCollaborator, TemplateNarrator};

/// Turns patterns and predictions into [`Insight`]s.
///
/// Prose comes from the configured [`NarrativeCollaborator`], each call
/// bounded by the configured timeout. On error or timeout the generator
/// logs, substitutes [`TemplateNarrator`] prose, and carries on; insight
/// generation itself never fails.
pub struct InsightGenerator {
    collaborator: Arc<dyn NarrativeCollaborator>,
    config: InsightConfig,
}

impl InsightGenerator {
    pub fn new(collaborator: Arc<dyn NarrativeCollaborator>, config: InsightConfig) -> Self {
        Self { collaborator, config }
    }

    /// Generator backed by deterministic templates only.
    pub fn template(config: InsightConfig) -> Self {
        Self::new(Arc::new(TemplateNarrator), config)
    }

    pub async fn from_pattern(&self, pattern: &Pattern) -> Insight {
        let narrative = self
            .narrate(self.collaborator.narrate_pattern(pattern))
            .await
            .unwrap_or_else(|e| {
                warn!(source = %pattern.id, error = %e, "collaborator failed, using template");
                TemplateNarrator::pattern_narrative(pattern)
            });
        Insight {
            id: format!("insight-{}", pattern.id),
            title: pattern.name.clone(),
            description: narrative.description,
            confidence: pattern.confidence,
            impact: pattern.score(),
            recommendation: narrative.recommendation,
        }
    }

    pub async fn from_prediction(&self, prediction: &Prediction) -> Insight {
        let narrative = self
            .narrate(self.collaborator.narrate_prediction(prediction))
            .await
            .unwrap_or_else(|e| {
                warn!(source = %prediction.id, error = %e, "collaborator failed, using template");
                TemplateNarrator::prediction_narrative(prediction)
            });
        Insight {
            id: format!("insight-{}", prediction.id),
            title: prediction.prediction.clone(),
            description: narrative.description,
            confidence: prediction.confidence,
            impact: prediction.impact,
            recommendation: narrative.recommendation,
        }
    }

    /// One insight per pattern, then one per prediction, in input order.
    pub async fn generate(
        &self,
        patterns: &[Pattern],
        predictions: &[Prediction],
    ) -> Vec<Insight> {
        let mut insights = Vec::with_capacity(patterns.len() + predictions.len());
        for pattern in patterns {
            insights.push(self.from_pattern(pattern).await);
        }
        for prediction in predictions {
            insights.push(self.from_prediction(prediction).await);
        }
        insights
    }

    async fn narrate<F>(&self, fut: F) -> Result<Narrative, InsightError>
    where
        F: Future<Output = Result<Narrative, InsightError>>,
    {
        let budget = Duration::from_millis(self.config.collaborator_timeout_ms);
        match tokio::time::timeout(budget, fut).await {
            Ok(result) => result,
            Err(_) => Err(InsightError::CollaboratorTimeout(self.config.collaborator_timeout_ms)),
        }
    }
}
