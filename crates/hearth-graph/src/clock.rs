//! Injectable time source.
//!
//! Every timestamp and trailing-window computation in the engine goes
//! through a [`Clock`] rather than calling `SystemTime::now()` inline, so
//! decay passes and cadence rules can be tested deterministically.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

pub const MILLIS_PER_HOUR: i64 = 3_600_000;
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Abstraction over wall-clock time.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> Millis;
}

/// Production clock backed by `SystemTime`.
#[derive(Debug, Default, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

/// Manually advanced clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(now_ms: Millis) -> Arc<Self> {
        Arc::new(Self { now: AtomicI64::new(now_ms) })
    }

    pub fn advance(&self, delta_ms: Millis) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: Millis) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}

/// Hour of day (0–23) for a millisecond timestamp, UTC.
pub fn hour_of_day(ts_ms: Millis) -> u32 {
    (((ts_ms.rem_euclid(MILLIS_PER_DAY)) / MILLIS_PER_HOUR) as u32).min(23)
}

/// Day of week for a millisecond timestamp, UTC. 0 = Sunday … 6 = Saturday.
///
/// The Unix epoch (1970-01-01) was a Thursday (= 4).
pub fn day_of_week(ts_ms: Millis) -> u32 {
    let days = ts_ms.div_euclid(MILLIS_PER_DAY);
    ((days + 4).rem_euclid(7)) as u32
}

pub fn is_weekend(ts_ms: Millis) -> bool {
    let d = day_of_week(ts_ms);
    d == 0 || d == 6
}

pub const DAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::at(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
    }

    #[test]
    fn epoch_was_a_thursday() {
        assert_eq!(day_of_week(0), 4);
        assert_eq!(DAY_NAMES[day_of_week(0) as usize], "Thursday");
    }

    #[test]
    fn hour_of_day_wraps() {
        assert_eq!(hour_of_day(0), 0);
        assert_eq!(hour_of_day(MILLIS_PER_HOUR * 23), 23);
        assert_eq!(hour_of_day(MILLIS_PER_DAY + MILLIS_PER_HOUR * 7), 7);
    }

    #[test]
    fn weekend_detection() {
        // 1970-01-03 was a Saturday, 1970-01-04 a Sunday.
        assert!(is_weekend(2 * MILLIS_PER_DAY));
        assert!(is_weekend(3 * MILLIS_PER_DAY));
        assert!(!is_weekend(4 * MILLIS_PER_DAY));
    }
}
