use std::collections::HashSet;

use hearth_graph::clock::{day_of_week, is_weekend, DAY_NAMES, MILLIS_PER_DAY};
use hearth_graph::GraphSnapshot;

use crate::config::PredictConfig;
use crate::error::PredictError;
use crate::model::Prediction;
use crate::rules::{prediction_id, PredictionRule};

/// Spots the first free weekday inside the horizon as planning space.
///
/// Only speaks up when the calendar is otherwise in use; a completely
/// empty calendar carries no signal (the engine's fallback covers it).
pub struct FreeWeekdayRule;

impl PredictionRule for FreeWeekdayRule {
    fn name(&self) -> &str {
        "free-day"
    }

    fn predict(
        &self,
        snap: &GraphSnapshot,
        horizon_days: i64,
        _config: &PredictConfig,
    ) -> Result<Option<Prediction>, PredictError> {
        let start = snap.taken_at;
        let end = start + horizon_days * MILLIS_PER_DAY;

        let mut occupied: HashSet<i64> = HashSet::new();
        let mut in_horizon = 0usize;
        for event in snap.events() {
            if let Some(ts) = event.event_starts_at() {
                if ts >= start && ts < end {
                    occupied.insert(ts.div_euclid(MILLIS_PER_DAY));
                    in_horizon += 1;
                }
            }
        }
        if in_horizon == 0 {
            return Ok(None);
        }

        let first_day = start.div_euclid(MILLIS_PER_DAY) + 1;
        let free = (first_day..first_day + horizon_days).find(|day| {
            let ts = day * MILLIS_PER_DAY;
            !is_weekend(ts) && !occupied.contains(day)
        });
        let Some(day) = free else {
            return Ok(None);
        };

        let day_name = DAY_NAMES[day_of_week(day * MILLIS_PER_DAY) as usize];
        Ok(Some(Prediction {
            id: prediction_id(self.name(), snap.taken_at),
            domain: "planning".to_string(),
            prediction: "Open weekday coming up".to_string(),
            description: format!("{day_name} has nothing scheduled yet"),
            confidence: 0.7,
            timeframe: format!("next {horizon_days} days"),
            impact: 0.5,
            likelihood: 0.7,
        }))
    }
}

#[cfg(test)]
mod tests {
    use hearth_graph::{Entity, EntityId, EntityKind, EntityPayload};

    use super::*;

    fn event_at(idx: u32, ts: i64) -> Entity {
        Entity::new(
            EntityId::mint(EntityKind::Event, ts, idx, "cccc2222"),
            EntityKind::Event,
            EntityPayload::Event {
                title: format!("event {idx}"),
                starts_at: Some(ts),
                attendees: vec![],
                category: None,
                location: None,
                quality: None,
            },
            ts,
        )
    }

    fn snapshot(entities: Vec<Entity>, taken_at: i64) -> GraphSnapshot {
        GraphSnapshot { entities, relationships: vec![], taken_at }
    }

    #[test]
    fn gap_in_a_used_calendar_is_reported() {
        // Day 102 is a Monday (epoch day 0 = Thursday). Book Monday and
        // Wednesday, leave Tuesday free.
        let now = 100 * MILLIS_PER_DAY;
        let entities = vec![
            event_at(0, 102 * MILLIS_PER_DAY),
            event_at(1, 104 * MILLIS_PER_DAY),
        ];
        let p = FreeWeekdayRule
            .predict(&snapshot(entities, now), 7, &PredictConfig::default())
            .unwrap()
            .expect("free day prediction");
        assert!(p.description.starts_with("Tuesday"));
    }

    #[test]
    fn empty_calendar_carries_no_signal() {
        let now = 100 * MILLIS_PER_DAY;
        assert!(FreeWeekdayRule
            .predict(&snapshot(vec![], now), 7, &PredictConfig::default())
            .unwrap()
            .is_none());
    }
}
