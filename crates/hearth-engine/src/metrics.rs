use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters accumulated across a tenant's background cycles.
#[derive(Default)]
pub struct LearningMetrics {
    cycles_run: AtomicU64,
    patterns_detected: AtomicU64,
    predictions_made: AtomicU64,
    insights_generated: AtomicU64,
    relationships_decayed: AtomicU64,
    entities_retired: AtomicU64,
}

/// Point-in-time copy of [`LearningMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsView {
    pub cycles_run: u64,
    pub patterns_detected: u64,
    pub predictions_made: u64,
    pub insights_generated: u64,
    pub relationships_decayed: u64,
    pub entities_retired: u64,
}

impl LearningMetrics {
    pub fn record_cycle(&self) {
        self.cycles_run.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_patterns(&self, n: usize) {
        self.patterns_detected.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn record_predictions(&self, n: usize) {
        self.predictions_made.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn record_insights(&self, n: usize) {
        self.insights_generated.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn record_decay(&self, relationships: usize, retired: usize) {
        self.relationships_decayed.fetch_add(relationships as u64, Ordering::Relaxed);
        self.entities_retired.fetch_add(retired as u64, Ordering::Relaxed);
    }

    pub fn view(&self) -> MetricsView {
        MetricsView {
            cycles_run: self.cycles_run.load(Ordering::Relaxed),
            patterns_detected: self.patterns_detected.load(Ordering::Relaxed),
            predictions_made: self.predictions_made.load(Ordering::Relaxed),
            insights_generated: self.insights_generated.load(Ordering::Relaxed),
            relationships_decayed: self.relationships_decayed.load(Ordering::Relaxed),
            entities_retired: self.entities_retired.load(Ordering::Relaxed),
        }
    }
}
