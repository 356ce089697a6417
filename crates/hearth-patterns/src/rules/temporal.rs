use hearth_graph::clock::hour_of_day;
use hearth_graph::GraphSnapshot;

use crate::config::PatternConfig;
use crate::error::PatternError;
use crate::model::Pattern;
use crate::rules::{pattern_id, PatternRule};

/// Detects a peak activity hour: events clustering in one hour of the day.
pub struct TemporalClusteringRule;

impl PatternRule for TemporalClusteringRule {
    fn name(&self) -> &str {
        "time"
    }

    fn detect(
        &self,
        snap: &GraphSnapshot,
        config: &PatternConfig,
    ) -> Result<Option<Pattern>, PatternError> {
        let mut by_hour = [0usize; 24];
        let mut total = 0usize;
        for event in snap.events() {
            if let Some(ts) = event.event_starts_at() {
                by_hour[hour_of_day(ts) as usize] += 1;
                total += 1;
            }
        }
        if total == 0 {
            return Ok(None);
        }

        let (peak_hour, peak) = by_hour
            .iter()
            .enumerate()
            .max_by_key(|(_, n)| **n)
            .map(|(h, n)| (h, *n))
            .unwrap_or((0, 0));
        if peak <= config.temporal_min_support {
            return Ok(None);
        }

        let strength = ((peak as f32 / total as f32) * 2.0).min(0.95);
        let confidence = (0.7 + 0.05 * peak as f32).min(0.95);
        Ok(Some(Pattern {
            id: pattern_id(self.name(), snap.taken_at),
            name: "Peak Activity Hour".to_string(),
            description: format!(
                "Activity concentrates around {peak_hour:02}:00 ({peak} of {total} events)"
            ),
            domains: vec!["time".into(), "schedule".into(), "activities".into()],
            strength,
            confidence,
        }))
    }
}

#[cfg(test)]
mod tests {
    use hearth_graph::clock::MILLIS_PER_HOUR;
    use hearth_graph::{Entity, EntityId, EntityKind, EntityPayload, GraphSnapshot};

    use super::*;

    fn event_at(idx: u32, ts: i64) -> Entity {
        Entity::new(
            EntityId::mint(EntityKind::Event, ts, idx, "aaaa0000"),
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
    fn clustered_mornings_produce_a_pattern() {
        // Four events at 09:00, one at 15:00.
        let nine = 9 * MILLIS_PER_HOUR;
        let mut entities: Vec<Entity> =
            (0..4).map(|i| event_at(i, nine + i as i64)).collect();
        entities.push(event_at(9, 15 * MILLIS_PER_HOUR));

        let snap = snapshot(entities, 1_000);
        let pattern = TemporalClusteringRule
            .detect(&snap, &PatternConfig::default())
            .unwrap()
            .expect("peak hour pattern");
        assert!(pattern.description.contains("09:00"));
        assert!(pattern.strength > 0.0 && pattern.strength <= 0.95);
        assert!(pattern.confidence >= 0.7);
    }

    #[test]
    fn sparse_calendar_stays_silent() {
        let snap = snapshot(vec![event_at(0, MILLIS_PER_HOUR)], 0);
        assert!(TemporalClusteringRule
            .detect(&snap, &PatternConfig::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn empty_snapshot_stays_silent() {
        let snap = snapshot(vec![], 0);
        assert!(TemporalClusteringRule
            .detect(&snap, &PatternConfig::default())
            .unwrap()
            .is_none());
    }
}
