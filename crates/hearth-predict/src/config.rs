/// Tunables for the prediction engine and its rules.
#[derive(Debug, Clone)]
pub struct PredictConfig {
    /// Maximum predictions returned per run.
    pub top_n: usize,
    /// Default look-ahead horizon in days.
    pub horizon_days: i64,

    // -- Busy-day stress --
    /// Events on a single upcoming day before the rule fires.
    pub busy_day_events: usize,

    // -- Habit momentum --
    /// Minimum recent check-ins before momentum is judged.
    pub habit_min_checkins: usize,
    /// Positive ratio above which momentum is called "building".
    pub habit_positive_ratio: f32,
    /// Trailing window for recent check-ins, in days.
    pub checkin_window_days: i64,

    // -- Family connection --
    /// Shared-event ratio above which connection is called strong.
    pub connection_shared_ratio: f32,

    /// Confidence assigned to the zero-history fallback. Kept at or
    /// below 0.8 so a guess never outranks an evidence-backed prediction.
    pub fallback_confidence: f32,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            horizon_days: 7,
            busy_day_events: 3,
            habit_min_checkins: 5,
            habit_positive_ratio: 0.6,
            checkin_window_days: 30,
            connection_shared_ratio: 0.3,
            fallback_confidence: 0.75,
        }
    }
}

impl PredictConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        fn env_usize(key: &str, default: usize) -> usize {
            std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
        }
        fn env_i64(key: &str, default: i64) -> i64 {
            std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
        }
        fn env_f32(key: &str, default: f32) -> f32 {
            std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
        }

        Self {
            top_n:                   env_usize("HEARTH_PREDICT_TOP_N", 5),
            horizon_days:            env_i64("HEARTH_PREDICT_HORIZON_DAYS", 7),
            busy_day_events:         env_usize("HEARTH_PREDICT_BUSY_EVENTS", 3),
            habit_min_checkins:      env_usize("HEARTH_PREDICT_HABIT_MIN", 5),
            habit_positive_ratio:    env_f32("HEARTH_PREDICT_HABIT_RATIO", 0.6),
            checkin_window_days:     env_i64("HEARTH_PREDICT_CHECKIN_WINDOW", 30),
            connection_shared_ratio: env_f32("HEARTH_PREDICT_CONNECTION_RATIO", 0.3),
            fallback_confidence:     env_f32("HEARTH_PREDICT_FALLBACK_CONF", 0.75),
        }
    }
}
