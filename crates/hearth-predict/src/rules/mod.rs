//! # Prediction Rules
//!
//! Each rule reads a [`GraphSnapshot`] and the look-ahead horizon and
//! emits at most one [`Prediction`]. The engine handles ranking,
//! truncation, and the zero-history fallback.

use hearth_graph::GraphSnapshot;

use crate::config::PredictConfig;
use crate::error::PredictError;
use crate::model::Prediction;

mod busy_day;
mod connection;
mod free_day;
mod habit;

pub use busy_day::BusyDayStressRule;
pub use connection::FamilyConnectionRule;
pub use free_day::FreeWeekdayRule;
pub use habit::HabitMomentumRule;

/// A single forward-looking rule.
pub trait PredictionRule: Send + Sync {
    /// Stable rule name, used in prediction ids and logs.
    fn name(&self) -> &str;

    fn predict(
        &self,
        snap: &GraphSnapshot,
        horizon_days: i64,
        config: &PredictConfig,
    ) -> Result<Option<Prediction>, PredictError>;
}

/// The built-in rule set, in evaluation order.
pub fn default_rules() -> Vec<Box<dyn PredictionRule>> {
    vec![
        Box::new(BusyDayStressRule),
        Box::new(HabitMomentumRule),
        Box::new(FreeWeekdayRule),
        Box::new(FamilyConnectionRule),
    ]
}

pub(crate) fn prediction_id(rule: &str, taken_at: i64) -> String {
    format!("prediction-{rule}-{taken_at}")
}
