//! Seedable randomness for scoring jitter.
//!
//! All random variation in relationship scoring flows through [`Jitter`]
//! instead of ad hoc `thread_rng()` calls, so strength computations can be
//! replayed exactly in tests by seeding.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct Jitter {
    rng: StdRng,
}

impl Jitter {
    /// Deterministic source for tests and replay.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// OS-entropy source for production.
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Uniform sample in `[lo, hi)`.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Symmetric jitter in `[-half_width, +half_width)`.
    pub fn symmetric(&mut self, half_width: f32) -> f32 {
        self.uniform(-half_width, half_width)
    }

    /// Short random nonce for id minting (8 hex chars).
    pub fn nonce(&mut self) -> String {
        format!("{:08x}", self.rng.gen::<u32>())
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::from_entropy()
    }
}
