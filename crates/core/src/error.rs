use thiserror::Error;

/// Errors reading or writing canonical entity snapshots.
#[derive(Error, Debug)]
pub enum OntoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for OntoError {
    fn from(e: serde_json::Error) -> Self {
        OntoError::Serialize(e.to_string())
    }
}
