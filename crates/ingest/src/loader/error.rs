//! Error types and load result structures for the registry loader.

use std::path::PathBuf;

use ontosync_core::EntityDescriptor;

/// Errors that abort registry loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The registry file does not exist.
    #[error("registry not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Result alias for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// A registry entry that could not be turned into a domain descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDomain {
    pub domain_id: String,
    pub reason: String,
}

/// Outcome of loading one domain's entity index.
#[derive(Debug)]
pub struct IndexLoad {
    /// Resolved location of the index file.
    pub path: PathBuf,
    /// Status of the load attempt.
    pub status: IndexStatus,
}

/// Status of a single index load attempt.
#[derive(Debug)]
pub enum IndexStatus {
    /// Index was read; may hold zero entities.
    Loaded { entities: Vec<EntityDescriptor> },
    /// Index file is missing.
    Skipped { reason: String },
    /// Index file exists but could not be read or parsed.
    Failed { error: String },
}

impl IndexLoad {
    /// Entities of a successfully loaded index, `None` otherwise.
    pub fn into_entities(self) -> Option<Vec<EntityDescriptor>> {
        match self.status {
            IndexStatus::Loaded { entities } => Some(entities),
            _ => None,
        }
    }
}
