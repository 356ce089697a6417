//! `hearth-engine` — multi-tenant orchestration over the household graph.
//!
//! Owns what the analysis crates deliberately do not: tenant lifecycle
//! (`Uninitialized → Loading → Ready ⇄ Disabled`), per-tenant locking,
//! named background cycles, the subscription hub, and the persistence
//! seam. The [`HearthEngine`] facade is the single entry point callers
//! see.

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod hub;
pub mod lifecycle;
pub mod metrics;
pub mod persistence;
pub mod scheduler;
mod sync;
pub mod tenant;

pub use bootstrap::derive_relationships;
pub use config::EngineConfig;
pub use engine::{GraphStateView, HearthEngine};
pub use error::EngineError;
pub use hub::{Subscription, SubscriptionHub};
pub use lifecycle::TenantState;
pub use metrics::{LearningMetrics, MetricsView};
pub use persistence::{MemoryPersistence, NullPersistence, PersistenceAdapter, PersistenceError};
pub use scheduler::CycleScheduler;
pub use tenant::TenantHandle;
