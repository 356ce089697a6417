use hearth_graph::GraphSnapshot;

use crate::config::PredictConfig;
use crate::error::PredictError;
use crate::model::Prediction;
use crate::rules::{prediction_id, PredictionRule};

/// Reads the shared-event ratio as a proxy for household connection.
pub struct FamilyConnectionRule;

impl PredictionRule for FamilyConnectionRule {
    fn name(&self) -> &str {
        "connection"
    }

    fn predict(
        &self,
        snap: &GraphSnapshot,
        horizon_days: i64,
        config: &PredictConfig,
    ) -> Result<Option<Prediction>, PredictError> {
        let members = snap.people().count();
        if members < 2 {
            return Ok(None);
        }

        let mut total = 0usize;
        let mut shared = 0usize;
        for event in snap.events() {
            total += 1;
            if event.event_attendees().len() >= 2 {
                shared += 1;
            }
        }
        if total == 0 {
            return Ok(None);
        }

        let ratio = shared as f32 / total as f32;
        if ratio < config.connection_shared_ratio {
            return Ok(None);
        }

        Ok(Some(Prediction {
            id: prediction_id(self.name(), snap.taken_at),
            domain: "connection".to_string(),
            prediction: "Strong household connection".to_string(),
            description: format!(
                "{shared} of {total} events are shared across {members} members"
            ),
            confidence: (0.6 + 0.3 * ratio).min(0.9),
            timeframe: format!("next {horizon_days} days"),
            impact: 0.7,
            likelihood: (0.5 + 0.4 * ratio).min(0.9),
        }))
    }
}
