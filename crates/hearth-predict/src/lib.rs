//! `hearth-predict` — forward-looking predictions from graph snapshots.
//!
//! A [`PredictionEngine`] runs independent [`PredictionRule`]s over a
//! read-only snapshot and a look-ahead horizon, ranks survivors by
//! `impact × likelihood`, and returns the top N. A snapshot with no
//! usable history degrades to a single conservative baseline prediction
//! rather than erroring.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod rules;

pub use config::PredictConfig;
pub use engine::PredictionEngine;
pub use error::PredictError;
pub use model::Prediction;
pub use rules::{
    default_rules, BusyDayStressRule, FamilyConnectionRule, FreeWeekdayRule, HabitMomentumRule,
    PredictionRule,
};
