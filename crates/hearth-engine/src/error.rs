use hearth_graph::GraphError;
use thiserror::Error;

use crate::persistence::PersistenceError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Bad input at the write boundary. Carries the graph-level cause.
    #[error(transparent)]
    Validation(#[from] GraphError),

    #[error("tenant {tenant} is {state}; operation requires a ready tenant")]
    State { tenant: String, state: &'static str },

    #[error("tenant {0}: lock contention persisted after retry")]
    ConcurrencyConflict(String),

    #[error("tenant {tenant}: persistence load failed: {source}")]
    Load {
        tenant: String,
        #[source]
        source: PersistenceError,
    },

    #[error("tenant {tenant}: persistence load timed out after {timeout_ms} ms")]
    LoadTimeout { tenant: String, timeout_ms: u64 },
}
