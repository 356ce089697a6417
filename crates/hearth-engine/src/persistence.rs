//! Persistence seam.
//!
//! The engine is an in-memory system; durability is someone else's job,
//! reached through [`PersistenceAdapter`]. Bulk load happens once per
//! tenant under a timeout. Appends are best-effort: spawned off the
//! write path, failures logged, never surfaced to the caller.

use std::collections::HashMap;

use async_trait::async_trait;
use hearth_graph::{Entity, Relationship, TenantGraph};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record for tenant {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Bulk-load a tenant's graph. An unknown tenant returns an empty
    /// graph, not an error.
    async fn load_tenant_graph(&self, tenant: &str) -> Result<TenantGraph, PersistenceError>;

    async fn append_entity(&self, tenant: &str, entity: &Entity)
        -> Result<(), PersistenceError>;

    async fn append_relationship(
        &self,
        tenant: &str,
        relationship: &Relationship,
    ) -> Result<(), PersistenceError>;
}

/// Adapter for deployments that run purely in memory.
pub struct NullPersistence;

#[async_trait]
impl PersistenceAdapter for NullPersistence {
    async fn load_tenant_graph(&self, _tenant: &str) -> Result<TenantGraph, PersistenceError> {
        Ok(TenantGraph::default())
    }

    async fn append_entity(
        &self,
        _tenant: &str,
        _entity: &Entity,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn append_relationship(
        &self,
        _tenant: &str,
        _relationship: &Relationship,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// In-memory adapter used by tests and demos: seeded graphs plus a
/// record of every append.
#[derive(Default)]
pub struct MemoryPersistence {
    seeded: Mutex<HashMap<String, TenantGraph>>,
    appended_entities: Mutex<Vec<(String, Entity)>>,
    appended_relationships: Mutex<Vec<(String, Relationship)>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, tenant: &str, graph: TenantGraph) {
        self.seeded.lock().await.insert(tenant.to_string(), graph);
    }

    pub async fn appended_entity_count(&self) -> usize {
        self.appended_entities.lock().await.len()
    }

    pub async fn appended_relationship_count(&self) -> usize {
        self.appended_relationships.lock().await.len()
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryPersistence {
    async fn load_tenant_graph(&self, tenant: &str) -> Result<TenantGraph, PersistenceError> {
        Ok(self.seeded.lock().await.get(tenant).cloned().unwrap_or_default())
    }

    async fn append_entity(
        &self,
        tenant: &str,
        entity: &Entity,
    ) -> Result<(), PersistenceError> {
        self.appended_entities.lock().await.push((tenant.to_string(), entity.clone()));
        Ok(())
    }

    async fn append_relationship(
        &self,
        tenant: &str,
        relationship: &Relationship,
    ) -> Result<(), PersistenceError> {
        self.appended_relationships
            .lock()
            .await
            .push((tenant.to_string(), relationship.clone()));
        Ok(())
    }
}
