use hearth_graph::clock::MILLIS_PER_DAY;
use hearth_graph::{EntityPayload, GraphSnapshot};

use crate::config::PatternConfig;
use crate::error::PatternError;
use crate::model::Pattern;
use crate::rules::{pattern_id, PatternRule};

/// Detects an active communication cadence inside a trailing window.
pub struct CommunicationCadenceRule;

impl PatternRule for CommunicationCadenceRule {
    fn name(&self) -> &str {
        "comm"
    }

    fn detect(
        &self,
        snap: &GraphSnapshot,
        config: &PatternConfig,
    ) -> Result<Option<Pattern>, PatternError> {
        let cutoff = snap.taken_at - config.comm_window_days * MILLIS_PER_DAY;
        let recent = snap
            .messages()
            .filter(|m| match &m.payload {
                EntityPayload::Message { sent_at, .. } => *sent_at >= cutoff,
                _ => false,
            })
            .count();
        if recent <= config.comm_min_messages {
            return Ok(None);
        }

        let strength = (recent as f32 / 10.0).min(0.9);
        let confidence = (0.75 + 0.02 * recent as f32).min(0.9);
        Ok(Some(Pattern {
            id: pattern_id(self.name(), snap.taken_at),
            name: "Active Communication".to_string(),
            description: format!(
                "{recent} messages exchanged in the last {} days",
                config.comm_window_days
            ),
            domains: vec!["communication".into(), "connection".into()],
            strength,
            confidence,
        }))
    }
}
