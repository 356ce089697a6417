use hearth_graph::clock::MILLIS_PER_DAY;
use hearth_graph::{EntityPayload, GraphSnapshot};

use crate::config::PredictConfig;
use crate::error::PredictError;
use crate::model::Prediction;
use crate::rules::{prediction_id, PredictionRule};

/// Projects habit momentum from recent check-in positivity.
pub struct HabitMomentumRule;

impl PredictionRule for HabitMomentumRule {
    fn name(&self) -> &str {
        "habit"
    }

    fn predict(
        &self,
        snap: &GraphSnapshot,
        horizon_days: i64,
        config: &PredictConfig,
    ) -> Result<Option<Prediction>, PredictError> {
        let cutoff = snap.taken_at - config.checkin_window_days * MILLIS_PER_DAY;
        let mut recent = 0usize;
        let mut positive = 0usize;
        for checkin in snap.checkins() {
            if let EntityPayload::Checkin { answered_at, positive: p, .. } = &checkin.payload {
                if *answered_at >= cutoff {
                    recent += 1;
                    if *p {
                        positive += 1;
                    }
                }
            }
        }
        if recent < config.habit_min_checkins {
            return Ok(None);
        }

        let ratio = positive as f32 / recent as f32;
        if ratio <= config.habit_positive_ratio {
            return Ok(None);
        }

        Ok(Some(Prediction {
            id: prediction_id(self.name(), snap.taken_at),
            domain: "habits".to_string(),
            prediction: "Habit momentum building".to_string(),
            description: format!(
                "{positive} of {recent} recent check-ins were positive ({:.0}%)",
                ratio * 100.0
            ),
            confidence: (0.6 + 0.3 * ratio).min(0.9),
            timeframe: format!("next {horizon_days} days"),
            impact: 0.6,
            likelihood: ratio.min(0.95),
        }))
    }
}
