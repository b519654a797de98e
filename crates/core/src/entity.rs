use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::OntoError;

/// Metadata key naming the domain that contributed the latest write.
pub const META_SOURCE_DOMAIN: &str = "source_domain";
/// Metadata key holding the document references as declared in the index.
pub const META_ORIGINAL_DOC_REFS: &str = "original_doc_refs";

/// Free-form entity metadata, shallow-merged across syncs.
pub type Metadata = IndexMap<String, serde_json::Value>;

/// A domain listed in the registry, with its index reference already chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainDescriptor {
    pub id: String,
    pub root_path: PathBuf,
    pub index_reference: PathBuf,
}

impl DomainDescriptor {
    /// Location of the entity index: absolute references are used verbatim,
    /// relative ones are joined to the domain root.
    pub fn index_path(&self) -> PathBuf {
        if self.index_reference.is_absolute() {
            self.index_reference.clone()
        } else {
            self.root_path.join(&self.index_reference)
        }
    }
}

fn default_status() -> String {
    "ACTIVE".to_string()
}

/// One entry of a per-domain entity index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    #[serde(rename = "id")]
    pub qualified_name: String,
    #[serde(rename = "semantic_doc", default, skip_serializing_if = "Option::is_none")]
    pub semantic_doc_ref: Option<String>,
    #[serde(rename = "agentic_doc", default, skip_serializing_if = "Option::is_none")]
    pub agentic_doc_ref: Option<String>,
    #[serde(default)]
    pub domains: BTreeSet<String>,
    pub tier: i32,
    #[serde(default = "default_status")]
    pub status: String,
}

/// Which grammar produced an [`AxiomRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxiomSource {
    /// `> [!TAG] text` block-quote callout.
    Callout,
    /// `### N.M. Title` numbered subsection.
    Section,
}

impl fmt::Display for AxiomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxiomSource::Callout => write!(f, "callout"),
            AxiomSource::Section => write!(f, "section"),
        }
    }
}

/// A rule mined out of entity documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxiomRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    pub source: AxiomSource,
}

/// The persisted, reconciled view of one knowledge entity.
///
/// `qualified_name` is the global primary key. A freshly resolved entity uses
/// the same shape before it is merged into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub qualified_name: String,
    pub domains: BTreeSet<String>,
    pub tier: i32,
    pub semantic_content: Option<String>,
    pub agentic_content: Option<String>,
    pub axioms: Vec<AxiomRecord>,
    pub status: String,
    pub metadata: Metadata,
    pub content_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced_at: DateTime<Utc>,
}

impl CanonicalEntity {
    /// Domain recorded as the contributor of this record, if any.
    pub fn source_domain(&self) -> Option<&str> {
        self.metadata
            .get(META_SOURCE_DOMAIN)
            .and_then(|v| v.as_str())
    }

    /// True when neither document resolved to content.
    pub fn is_incomplete(&self) -> bool {
        self.semantic_content.is_none() && self.agentic_content.is_none()
    }
}

/// Read a JSON array of canonical entities.
pub fn read_snapshot(path: &Path) -> Result<Vec<CanonicalEntity>, OntoError> {
    let json = std::fs::read_to_string(path)?;
    let entities = serde_json::from_str(&json)?;
    Ok(entities)
}

/// Write canonical entities as a pretty-printed JSON array.
pub fn write_snapshot(path: &Path, entities: &[CanonicalEntity]) -> Result<(), OntoError> {
    let json = serde_json::to_string_pretty(entities)?;
    std::fs::write(path, json)?;
    Ok(())
}
