//! Named background tickers, one scheduler per tenant.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::sync::lock_unpoisoned;

/// Tracks the `JoinHandle` of each named cycle so tickers can be
/// cancelled individually and never started twice.
#[derive(Default)]
pub struct CycleScheduler {
    tasks: Mutex<HashMap<&'static str, JoinHandle<()>>>,
}

impl CycleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a named cycle unless one with the same name is already
    /// running. Returns whether the factory was invoked.
    pub fn start<F>(&self, name: &'static str, spawn: F) -> bool
    where
        F: FnOnce() -> JoinHandle<()>,
    {
        let mut tasks = lock_unpoisoned(&self.tasks);
        if let Some(existing) = tasks.get(name) {
            if !existing.is_finished() {
                debug!(cycle = name, "cycle already running, not restarting");
                return false;
            }
        }
        tasks.insert(name, spawn());
        true
    }

    /// Abort a named cycle. No-op when the cycle is absent or finished.
    pub fn cancel(&self, name: &'static str) {
        if let Some(handle) = lock_unpoisoned(&self.tasks).remove(name) {
            handle.abort();
        }
    }

    /// Abort everything. Used on disable and teardown.
    pub fn cancel_all(&self) {
        for (_, handle) in lock_unpoisoned(&self.tasks).drain() {
            handle.abort();
        }
    }

    pub fn running_count(&self) -> usize {
        lock_unpoisoned(&self.tasks).values().filter(|h| !h.is_finished()).count()
    }

    pub fn is_running(&self, name: &'static str) -> bool {
        lock_unpoisoned(&self.tasks).get(name).is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CycleScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
