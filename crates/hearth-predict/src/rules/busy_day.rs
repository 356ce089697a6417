use std::collections::HashMap;

use hearth_graph::clock::{day_of_week, DAY_NAMES, MILLIS_PER_DAY};
use hearth_graph::GraphSnapshot;

use crate::config::PredictConfig;
use crate::error::PredictError;
use crate::model::Prediction;
use crate::rules::{prediction_id, PredictionRule};

/// Flags an upcoming day stacked with events as a likely stress point.
pub struct BusyDayStressRule;

impl PredictionRule for BusyDayStressRule {
    fn name(&self) -> &str {
        "busy-day"
    }

    fn predict(
        &self,
        snap: &GraphSnapshot,
        horizon_days: i64,
        config: &PredictConfig,
    ) -> Result<Option<Prediction>, PredictError> {
        let start = snap.taken_at;
        let end = start + horizon_days * MILLIS_PER_DAY;

        let mut by_day: HashMap<i64, usize> = HashMap::new();
        for event in snap.events() {
            if let Some(ts) = event.event_starts_at() {
                if ts >= start && ts < end {
                    *by_day.entry(ts.div_euclid(MILLIS_PER_DAY)).or_default() += 1;
                }
            }
        }

        let Some((day, count)) = by_day.into_iter().max_by_key(|(_, n)| *n) else {
            return Ok(None);
        };
        if count < config.busy_day_events {
            return Ok(None);
        }

        let day_name = DAY_NAMES[day_of_week(day * MILLIS_PER_DAY) as usize];
        let over = count.saturating_sub(config.busy_day_events) as f32;
        Ok(Some(Prediction {
            id: prediction_id(self.name(), snap.taken_at),
            domain: "stress".to_string(),
            prediction: "Busy day ahead".to_string(),
            description: format!("{count} events scheduled for {day_name}"),
            confidence: (0.7 + 0.05 * over).min(0.9),
            timeframe: format!("next {horizon_days} days"),
            impact: 0.8,
            likelihood: (0.6 + 0.1 * over).min(0.95),
        }))
    }
}
