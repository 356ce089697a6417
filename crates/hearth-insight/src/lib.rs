//! `hearth-insight` — human-readable takeaways from patterns and
//! predictions.
//!
//! [`InsightGenerator`] pairs each source item with prose from a
//! [`NarrativeCollaborator`]. Collaborator calls are bounded by a
//! timeout and fall back to deterministic [`TemplateNarrator`] output,
//! so generation never fails and never blocks on a flaky sidecar.

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod narrator;

pub use config::InsightConfig;
pub use error::InsightError;
pub use generator::InsightGenerator;
pub use model::{Insight, Narrative};
pub use narrator::{NarrativeCollaborator, TemplateNarrator};
