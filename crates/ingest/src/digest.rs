use sha2::{Digest, Sha256};

/// Change-detection digest of an entity's documents.
///
/// SHA-256 hex over `semantic || agentic`, with an absent document
/// contributing the empty string. Only ever compared for equality against
/// the stored digest; it is not an identity.
pub fn content_digest(semantic: Option<&str>, agentic: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(semantic.unwrap_or("").as_bytes());
    hasher.update(agentic.unwrap_or("").as_bytes());
    format!("{:x}", hasher.finalize())
}
