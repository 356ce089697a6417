/// Tunables for insight generation.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// Budget for one narrative collaborator call, in milliseconds.
    pub collaborator_timeout_ms: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self { collaborator_timeout_ms: 1_500 }
    }
}

impl InsightConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        fn env_u64(key: &str, default: u64) -> u64 {
            std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
        }

        Self {
            collaborator_timeout_ms: env_u64("HEARTH_INSIGHT_COLLAB_TIMEOUT_MS", 1_500),
        }
    }
}
