use std::collections::BTreeMap;

use async_trait::async_trait;
use ontosync_core::CanonicalEntity;

use super::{EntityStore, EntitySummary, StoreError};

/// In-memory store keyed by qualified name.
///
/// Used for dry runs, optionally seeded from a snapshot of a real store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entities: BTreeMap<String, CanonicalEntity>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store. Later entries win on duplicate names.
    pub fn from_entities(entities: impl IntoIterator<Item = CanonicalEntity>) -> Self {
        Self {
            entities: entities
                .into_iter()
                .map(|e| (e.qualified_name.clone(), e))
                .collect(),
            writes: 0,
        }
    }

    pub fn get(&self, qualified_name: &str) -> Option<&CanonicalEntity> {
        self.entities.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of successful writes since creation.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Stored entities ordered by qualified name.
    pub fn entities(&self) -> Vec<CanonicalEntity> {
        self.entities.values().cloned().collect()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn fetch(&mut self, qualified_name: &str) -> Result<Option<CanonicalEntity>, StoreError> {
        Ok(self.entities.get(qualified_name).cloned())
    }

    async fn write(&mut self, entity: &CanonicalEntity) -> Result<(), StoreError> {
        self.entities
            .insert(entity.qualified_name.clone(), entity.clone());
        self.writes += 1;
        Ok(())
    }

    async fn list(&mut self) -> Result<Vec<EntitySummary>, StoreError> {
        Ok(self.entities.values().map(EntitySummary::from).collect())
    }

    async fn fetch_all(&mut self) -> Result<Vec<CanonicalEntity>, StoreError> {
        Ok(self.entities())
    }

    async fn finish(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
