use thiserror::Error;

/// Errors produced by [`EntityStore`](super::EntityStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to decode stored entity '{name}': {reason}")]
    Decode { name: String, reason: String },
    #[error("{0}")]
    Other(String),
}
