use hearth_graph::GraphSnapshot;

use crate::config::PatternConfig;
use crate::error::PatternError;
use crate::model::Pattern;
use crate::rules::{pattern_id, PatternRule};

/// Detects collaboration density: a run of events shared by several
/// household members.
pub struct CollaborationRule;

impl PatternRule for CollaborationRule {
    fn name(&self) -> &str {
        "collab"
    }

    fn detect(
        &self,
        snap: &GraphSnapshot,
        config: &PatternConfig,
    ) -> Result<Option<Pattern>, PatternError> {
        let shared: Vec<usize> = snap
            .events()
            .map(|e| e.event_attendees().len())
            .filter(|n| *n >= 2)
            .collect();
        if shared.len() < config.collab_min_shared {
            return Ok(None);
        }

        let avg_attendees = shared.iter().sum::<usize>() as f32 / shared.len() as f32;
        let strength = (avg_attendees / config.collab_norm_attendees).min(0.9);
        let confidence = (0.75 + 0.02 * shared.len() as f32).min(0.92);
        Ok(Some(Pattern {
            id: pattern_id(self.name(), snap.taken_at),
            name: "Household Collaboration".to_string(),
            description: format!(
                "{} shared events averaging {:.1} attendees",
                shared.len(),
                avg_attendees
            ),
            domains: vec!["social".into(), "collaboration".into(), "family".into()],
            strength,
            confidence,
        }))
    }
}
