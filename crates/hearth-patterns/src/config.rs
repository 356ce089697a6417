/// Tunables for the pattern detector and its rules.
#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// Maximum patterns returned per detection run.
    pub top_n: usize,
    /// Patterns below this confidence are discarded.
    pub confidence_floor: f32,
    /// Patterns at or above this score are pushed to subscribers on
    /// scheduled runs.
    pub importance_threshold: f32,

    // -- Temporal clustering --
    /// Minimum events in the peak hour before a pattern is emitted.
    pub temporal_min_support: usize,

    // -- Collaboration density --
    /// Minimum shared events (≥2 attendees) before the rule fires.
    pub collab_min_shared: usize,
    /// Average attendee count the strength is normalized against.
    pub collab_norm_attendees: f32,

    // -- Weekday/weekend skew --
    /// Minimum total events before the rhythm rule fires.
    pub rhythm_min_events: usize,

    // -- Communication cadence --
    /// Trailing window in days.
    pub comm_window_days: i64,
    /// Minimum messages inside the window.
    pub comm_min_messages: usize,

    // -- Check-in cadence --
    pub checkin_window_days: i64,
    pub checkin_min_count: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            confidence_floor: 0.5,
            importance_threshold: 0.6,
            temporal_min_support: 3,
            collab_min_shared: 3,
            collab_norm_attendees: 4.0,
            rhythm_min_events: 10,
            comm_window_days: 7,
            comm_min_messages: 3,
            checkin_window_days: 30,
            checkin_min_count: 5,
        }
    }
}

impl PatternConfig {
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
            top_n:                env_usize("HEARTH_PATTERN_TOP_N", 5),
            confidence_floor:     env_f32("HEARTH_PATTERN_CONFIDENCE_FLOOR", 0.5),
            importance_threshold: env_f32("HEARTH_PATTERN_IMPORTANCE", 0.6),
            temporal_min_support: env_usize("HEARTH_PATTERN_TEMPORAL_SUPPORT", 3),
            collab_min_shared:    env_usize("HEARTH_PATTERN_COLLAB_MIN", 3),
            collab_norm_attendees: env_f32("HEARTH_PATTERN_COLLAB_NORM", 4.0),
            rhythm_min_events:    env_usize("HEARTH_PATTERN_RHYTHM_MIN", 10),
            comm_window_days:     env_i64("HEARTH_PATTERN_COMM_WINDOW", 7),
            comm_min_messages:    env_usize("HEARTH_PATTERN_COMM_MIN", 3),
            checkin_window_days:  env_i64("HEARTH_PATTERN_CHECKIN_WINDOW", 30),
            checkin_min_count:    env_usize("HEARTH_PATTERN_CHECKIN_MIN", 5),
        }
    }
}
