//! `hearth-patterns` — statistical pattern detection over graph snapshots.
//!
//! A [`PatternDetector`] runs a fixed set of independent [`PatternRule`]s
//! against a read-only [`hearth_graph::GraphSnapshot`], then filters by
//! confidence, ranks by `strength × confidence`, and returns the top N.
//! Rules never mutate the graph and a failing rule is skipped, not fatal.

pub mod config;
pub mod detector;
pub mod error;
pub mod model;
pub mod rules;

pub use config::PatternConfig;
pub use detector::PatternDetector;
pub use error::PatternError;
pub use model::Pattern;
pub use rules::{
    default_rules, CheckinCadenceRule, CollaborationRule, CommunicationCadenceRule, PatternRule,
    WeeklyRhythmRule, TemporalClusteringRule,
};
