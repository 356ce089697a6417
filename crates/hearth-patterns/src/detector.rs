use hearth_graph::GraphSnapshot;
use tracing::warn;

use crate::config::PatternConfig;
use crate::model::Pattern;
use crate::rules::{default_rules, PatternRule};

/// Runs every registered rule over a snapshot and ranks the survivors.
///
/// Rules degrade independently: a rule error is logged and skipped so a
/// single bad rule never hides what the others found. On an empty graph
/// detection succeeds with an empty list.
pub struct PatternDetector {
    rules: Vec<Box<dyn PatternRule>>,
    config: PatternConfig,
}

impl PatternDetector {
    pub fn new(config: PatternConfig) -> Self {
        Self { rules: default_rules(), config }
    }

    pub fn with_rules(config: PatternConfig, rules: Vec<Box<dyn PatternRule>>) -> Self {
        Self { rules, config }
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Detect patterns, ranked by `strength × confidence`, truncated to
    /// the configured top N.
    pub fn detect(&self, snap: &GraphSnapshot) -> Vec<Pattern> {
        let mut found = Vec::new();
        for rule in &self.rules {
            match rule.detect(snap, &self.config) {
                Ok(Some(pattern)) => found.push(pattern),
                Ok(None) => {}
                Err(e) => {
                    warn!(rule = rule.name(), error = %e, "pattern rule failed, skipping");
                }
            }
        }

        found.retain(|p| p.strength > 0.0 && p.confidence >= self.config.confidence_floor);
        found.sort_by(|a, b| {
            b.score().partial_cmp(&a.score()).unwrap_or(std::cmp::Ordering::Equal)
        });
        found.truncate(self.config.top_n);
        found
    }

    /// Patterns strong enough to push to subscribers on scheduled runs.
    pub fn significant(&self, snap: &GraphSnapshot) -> Vec<Pattern> {
        let mut patterns = self.detect(snap);
        patterns.retain(|p| p.score() >= self.config.importance_threshold);
        patterns
    }
}
