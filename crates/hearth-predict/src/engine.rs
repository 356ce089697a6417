use hearth_graph::GraphSnapshot;
use tracing::warn;

use crate::config::PredictConfig;
use crate::model::Prediction;
use crate::rules::{default_rules, prediction_id, PredictionRule};

/// Runs every prediction rule, ranks by `impact × likelihood`, and
/// truncates to the top N.
///
/// Degrades rather than fails: a rule error is logged and skipped, and a
/// snapshot with no usable history yields exactly one conservative
/// fallback instead of an error or an empty answer.
pub struct PredictionEngine {
    rules: Vec<Box<dyn PredictionRule>>,
    config: PredictConfig,
}

impl PredictionEngine {
    pub fn new(config: PredictConfig) -> Self {
        Self { rules: default_rules(), config }
    }

    pub fn with_rules(config: PredictConfig, rules: Vec<Box<dyn PredictionRule>>) -> Self {
        Self { rules, config }
    }

    pub fn config(&self) -> &PredictConfig {
        &self.config
    }

    pub fn predict(&self, snap: &GraphSnapshot, horizon_days: i64) -> Vec<Prediction> {
        if Self::no_history(snap) {
            return vec![self.fallback(snap, horizon_days)];
        }

        let mut found = Vec::new();
        for rule in &self.rules {
            match rule.predict(snap, horizon_days, &self.config) {
                Ok(Some(prediction)) => found.push(prediction),
                Ok(None) => {}
                Err(e) => {
                    warn!(rule = rule.name(), error = %e, "prediction rule failed, skipping");
                }
            }
        }
        if found.is_empty() {
            return vec![self.fallback(snap, horizon_days)];
        }

        found.sort_by(|a, b| {
            b.score().partial_cmp(&a.score()).unwrap_or(std::cmp::Ordering::Equal)
        });
        found.truncate(self.config.top_n);
        found
    }

    /// No events, messages, or check-ins to reason from.
    fn no_history(snap: &GraphSnapshot) -> bool {
        snap.events().next().is_none()
            && snap.messages().next().is_none()
            && snap.checkins().next().is_none()
    }

    fn fallback(&self, snap: &GraphSnapshot, horizon_days: i64) -> Prediction {
        Prediction {
            id: prediction_id("baseline", snap.taken_at),
            domain: "general".to_string(),
            prediction: "Current patterns continue".to_string(),
            description: "Not enough history yet; expecting the household to \
                          carry on as it has been"
                .to_string(),
            confidence: self.config.fallback_confidence.min(0.8),
            timeframe: format!("next {horizon_days} days"),
            impact: 0.4,
            likelihood: 0.7,
        }
    }
}
