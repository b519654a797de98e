use std::path::PathBuf;

use thiserror::Error;

/// Axiom definitions could not be loaded. Always fatal for a validation run.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("axiom definitions not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A predicate query failed to produce a count.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("query failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("result is not a count: {0}")]
    NotACount(String),
}
