use hearth_graph::clock::MILLIS_PER_DAY;
use hearth_graph::{EntityPayload, GraphSnapshot};

use crate::config::PatternConfig;
use crate::error::PatternError;
use crate::model::Pattern;
use crate::rules::{pattern_id, PatternRule};

/// Detects a sustained check-in habit over the trailing month.
pub struct CheckinCadenceRule;

impl PatternRule for CheckinCadenceRule {
    fn name(&self) -> &str {
        "checkin"
    }

    fn detect(
        &self,
        snap: &GraphSnapshot,
        config: &PatternConfig,
    ) -> Result<Option<Pattern>, PatternError> {
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
        if recent <= config.checkin_min_count {
            return Ok(None);
        }

        let strength = (recent as f32 / 20.0).min(0.85);
        let confidence = (0.7 + 0.02 * recent as f32).min(0.88);
        Ok(Some(Pattern {
            id: pattern_id(self.name(), snap.taken_at),
            name: "Regular Check-ins".to_string(),
            description: format!(
                "{recent} check-ins in the last {} days, {positive} positive",
                config.checkin_window_days
            ),
            domains: vec!["wellbeing".into(), "reflection".into()],
            strength,
            confidence,
        }))
    }
}
