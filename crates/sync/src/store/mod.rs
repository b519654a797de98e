//! Persistence seam for canonical entities.
//!
//! The sync runner only talks to [`EntityStore`]. [`PgEntityStore`] is the
//! production backend; [`MemoryStore`] backs dry runs and tests.

mod error;
mod memory;
mod postgres;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::{connect_options, PgEntityStore};

use async_trait::async_trait;
use ontosync_core::CanonicalEntity;

/// One line of the store listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySummary {
    pub qualified_name: String,
    pub domains: Vec<String>,
    pub tier: i32,
    pub status: String,
}

impl From<&CanonicalEntity> for EntitySummary {
    fn from(e: &CanonicalEntity) -> Self {
        Self {
            qualified_name: e.qualified_name.clone(),
            domains: e.domains.iter().cloned().collect(),
            tier: e.tier,
            status: e.status.clone(),
        }
    }
}

/// Keyed access to canonical entities by qualified name.
///
/// Each `fetch`/`write` is its own unit of work: a failure leaves the store
/// as it was before that call and does not affect earlier successful calls.
/// Nothing is durable until [`EntityStore::finish`].
#[async_trait]
pub trait EntityStore: Send {
    /// Load the stored record for `qualified_name`.
    async fn fetch(&mut self, qualified_name: &str) -> Result<Option<CanonicalEntity>, StoreError>;

    /// Persist `entity` as the complete next state of its qualified name.
    async fn write(&mut self, entity: &CanonicalEntity) -> Result<(), StoreError>;

    /// All stored entities, ordered by qualified name.
    async fn list(&mut self) -> Result<Vec<EntitySummary>, StoreError>;

    /// Every stored record in full, ordered by qualified name.
    async fn fetch_all(&mut self) -> Result<Vec<CanonicalEntity>, StoreError>;

    /// Commit every successful write of the batch.
    async fn finish(&mut self) -> Result<(), StoreError>;
}
