//! # Pattern Rules
//!
//! Each rule inspects a read-only [`GraphSnapshot`] and emits at most one
//! [`Pattern`]. Rules are independent: a failing rule is logged and skipped
//! by the detector, never aborting the run.
//!
//! ## Protocol
//!
//! 1. Gather the slice of the snapshot the rule cares about
//! 2. Check the support threshold from [`PatternConfig`]
//! 3. Below threshold, return `Ok(None)`
//! 4. Otherwise compute strength (a normalized ratio) and confidence
//!    (grows with sample size, capped below 1.0)

use hearth_graph::GraphSnapshot;

use crate::config::PatternConfig;
use crate::error::PatternError;
use crate::model::Pattern;

mod checkin;
mod collaboration;
mod communication;
mod rhythm;
mod temporal;

pub use checkin::CheckinCadenceRule;
pub use collaboration::CollaborationRule;
pub use communication::CommunicationCadenceRule;
pub use rhythm::WeeklyRhythmRule;
pub use temporal::TemporalClusteringRule;

/// A single pattern detection rule.
pub trait PatternRule: Send + Sync {
    /// Stable rule name, used in pattern ids and logs.
    fn name(&self) -> &str;

    /// Inspect the snapshot; `Ok(None)` means "nothing significant".
    fn detect(
        &self,
        snap: &GraphSnapshot,
        config: &PatternConfig,
    ) -> Result<Option<Pattern>, PatternError>;
}

/// The built-in rule set, in evaluation order.
pub fn default_rules() -> Vec<Box<dyn PatternRule>> {
    vec![
        Box::new(TemporalClusteringRule),
        Box::new(CollaborationRule),
        Box::new(WeeklyRhythmRule),
        Box::new(CommunicationCadenceRule),
        Box::new(CheckinCadenceRule),
    ]
}

pub(crate) fn pattern_id(rule: &str, taken_at: i64) -> String {
    format!("pattern-{rule}-{taken_at}")
}
