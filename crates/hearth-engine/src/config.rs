/// Engine-wide tunables: cycle cadences and timeouts.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Entanglement synchronization cadence.
    pub sync_interval_ms: u64,
    /// Pattern detection cadence.
    pub pattern_interval_ms: u64,
    /// Prediction + insight cadence.
    pub prediction_interval_ms: u64,
    /// Decay / learning-metrics cadence.
    pub decay_interval_ms: u64,
    /// Budget for one persistence bulk load.
    pub load_timeout_ms: u64,
    /// Budget for acquiring a tenant write lock before the single retry.
    pub lock_timeout_ms: u64,
    /// Default prediction horizon.
    pub horizon_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sync_interval_ms: 30_000,
            pattern_interval_ms: 60_000,
            prediction_interval_ms: 120_000,
            decay_interval_ms: 300_000,
            load_timeout_ms: 5_000,
            lock_timeout_ms: 2_000,
            horizon_days: 7,
        }
    }
}

impl EngineConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        fn env_u64(key: &str, default: u64) -> u64 {
            std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
        }
        fn env_i64(key: &str, default: i64) -> i64 {
            std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
        }

        Self {
            sync_interval_ms:       env_u64("HEARTH_ENGINE_SYNC_INTERVAL_MS", 30_000),
            pattern_interval_ms:    env_u64("HEARTH_ENGINE_PATTERN_INTERVAL_MS", 60_000),
            prediction_interval_ms: env_u64("HEARTH_ENGINE_PREDICT_INTERVAL_MS", 120_000),
            decay_interval_ms:      env_u64("HEARTH_ENGINE_DECAY_INTERVAL_MS", 300_000),
            load_timeout_ms:        env_u64("HEARTH_ENGINE_LOAD_TIMEOUT_MS", 5_000),
            lock_timeout_ms:        env_u64("HEARTH_ENGINE_LOCK_TIMEOUT_MS", 2_000),
            horizon_days:           env_i64("HEARTH_ENGINE_HORIZON_DAYS", 7),
        }
    }
}
