use hearth_graph::clock::is_weekend;
use hearth_graph::GraphSnapshot;

use crate::config::PatternConfig;
use crate::error::PatternError;
use crate::model::Pattern;
use crate::rules::{pattern_id, PatternRule};

/// Detects a weekly rhythm: calendar weight skewed toward weekends or
/// toward the working week.
pub struct WeeklyRhythmRule;

impl PatternRule for WeeklyRhythmRule {
    fn name(&self) -> &str {
        "rhythm"
    }

    fn detect(
        &self,
        snap: &GraphSnapshot,
        config: &PatternConfig,
    ) -> Result<Option<Pattern>, PatternError> {
        let mut weekend = 0usize;
        let mut weekday = 0usize;
        for event in snap.events() {
            match event.event_starts_at() {
                Some(ts) if is_weekend(ts) => weekend += 1,
                Some(_) => weekday += 1,
                None => {}
            }
        }
        let total = weekend + weekday;
        if total < config.rhythm_min_events {
            return Ok(None);
        }

        // Two weekend days vs five weekdays: compare per-day rates.
        let weekend_rate = weekend as f32 / 2.0;
        let weekday_rate = weekday as f32 / 5.0;
        let (name, description, strength) = if weekend_rate > weekday_rate * 2.0 {
            (
                "Weekend Focus",
                format!("{weekend} of {total} events land on weekends"),
                (weekend as f32 / total as f32).min(0.9),
            )
        } else if weekday_rate > weekend_rate * 2.0 {
            (
                "Weekday Routine",
                format!("{weekday} of {total} events land on weekdays"),
                (weekday as f32 / total as f32).min(0.9),
            )
        } else {
            return Ok(None);
        };

        let confidence = (0.65 + 0.01 * total as f32).min(0.9);
        Ok(Some(Pattern {
            id: pattern_id(self.name(), snap.taken_at),
            name: name.to_string(),
            description,
            domains: vec!["time".into(), "rhythm".into(), "planning".into()],
            strength,
            confidence,
        }))
    }
}

#[cfg(test)]
mod tests {
    use hearth_graph::clock::MILLIS_PER_DAY;
    use hearth_graph::{Entity, EntityId, EntityKind, EntityPayload, GraphSnapshot};

    use super::*;

    // Epoch day 0 was a Thursday; day 2 is the first Saturday.
    const SATURDAY: i64 = 2 * MILLIS_PER_DAY;
    const MONDAY: i64 = 4 * MILLIS_PER_DAY;

    fn event_on(idx: u32, ts: i64) -> Entity {
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

    fn snapshot(entities: Vec<Entity>) -> GraphSnapshot {
        GraphSnapshot { entities, relationships: vec![], taken_at: 3_000 }
    }

    #[test]
    fn weekend_heavy_calendar_detected() {
        let mut entities: Vec<Entity> =
            (0..9).map(|i| event_on(i, SATURDAY + i as i64)).collect();
        entities.push(event_on(9, MONDAY));

        let pattern = WeeklyRhythmRule
            .detect(&snapshot(entities), &PatternConfig::default())
            .unwrap()
            .expect("weekend pattern");
        assert_eq!(pattern.name, "Weekend Focus");
        assert!(pattern.strength > 0.8);
    }

    #[test]
    fn weekday_heavy_calendar_detected() {
        let mut entities: Vec<Entity> =
            (0..11).map(|i| event_on(i, MONDAY + i as i64)).collect();
        entities.push(event_on(11, SATURDAY));

        let pattern = WeeklyRhythmRule
            .detect(&snapshot(entities), &PatternConfig::default())
            .unwrap()
            .expect("weekday pattern");
        assert_eq!(pattern.name, "Weekday Routine");
    }

    #[test]
    fn balanced_or_sparse_calendar_stays_silent() {
        let entities: Vec<Entity> = (0..4).map(|i| event_on(i, MONDAY + i as i64)).collect();
        assert!(WeeklyRhythmRule
            .detect(&snapshot(entities), &PatternConfig::default())
            .unwrap()
            .is_none());
    }
}
