//! Document resolution and assembly of a freshly resolved entity.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use ontosync_core::{
    CanonicalEntity, DomainDescriptor, EntityDescriptor, Metadata, META_ORIGINAL_DOC_REFS,
    META_SOURCE_DOMAIN,
};

use crate::dates::DocumentDates;
use crate::digest::content_digest;
use crate::extract::extract_axioms;

/// Content of an entity's two optional documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDocuments {
    pub semantic: Option<String>,
    pub agentic: Option<String>,
}

/// Absolute references are used verbatim; relative ones are joined to the domain root.
pub fn resolve_reference(root: &Path, reference: &str) -> PathBuf {
    let path = Path::new(reference);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Read one document. Missing files (and unset references) are absent, not errors.
fn read_document(root: &Path, reference: Option<&str>, entity: &str) -> Option<String> {
    let reference = reference.filter(|r| !r.trim().is_empty())?;
    let path = resolve_reference(root, reference);
    if !path.exists() {
        warn!(entity = %entity, path = %path.display(), "document not found");
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(content) => {
            debug!(entity = %entity, path = %path.display(), bytes = content.len(), "read document");
            Some(content)
        }
        Err(e) => {
            warn!(entity = %entity, path = %path.display(), error = %e, "failed to read document");
            None
        }
    }
}

/// Resolve both document references of `entity` against the domain root.
pub fn resolve_documents(domain: &DomainDescriptor, entity: &EntityDescriptor) -> ResolvedDocuments {
    let name = entity.qualified_name.as_str();
    ResolvedDocuments {
        semantic: read_document(&domain.root_path, entity.semantic_doc_ref.as_deref(), name),
        agentic: read_document(&domain.root_path, entity.agentic_doc_ref.as_deref(), name),
    }
}

/// Assemble the freshly resolved record for `entity` as contributed by `domain`.
///
/// Axioms are mined from the semantic document, then the agentic one. Date
/// markers come from the semantic document, or the agentic one when the
/// semantic document is absent; `now` fills in whatever is not declared.
pub fn build_entity(
    domain: &DomainDescriptor,
    entity: &EntityDescriptor,
    docs: ResolvedDocuments,
    now: DateTime<Utc>,
) -> CanonicalEntity {
    let mut axioms = docs.semantic.as_deref().map(extract_axioms).unwrap_or_default();
    if let Some(agentic) = docs.agentic.as_deref() {
        axioms.extend(extract_axioms(agentic));
    }

    let dates = docs
        .semantic
        .as_deref()
        .or(docs.agentic.as_deref())
        .map(DocumentDates::scan)
        .unwrap_or_default();

    let content_digest = content_digest(docs.semantic.as_deref(), docs.agentic.as_deref());

    let mut metadata = Metadata::new();
    metadata.insert(META_SOURCE_DOMAIN.to_string(), serde_json::Value::from(domain.id.clone()));
    metadata.insert(
        META_ORIGINAL_DOC_REFS.to_string(),
        serde_json::json!({
            "semantic": entity.semantic_doc_ref,
            "agentic": entity.agentic_doc_ref,
        }),
    );

    CanonicalEntity {
        qualified_name: entity.qualified_name.clone(),
        domains: entity.domains.clone(),
        tier: entity.tier,
        semantic_content: docs.semantic,
        agentic_content: docs.agentic,
        axioms,
        status: entity.status.clone(),
        metadata,
        content_digest,
        created_at: dates.created_at.unwrap_or(now),
        updated_at: dates.updated_at.unwrap_or(now),
        synced_at: now,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use tempfile::TempDir;

    use super::*;

    fn domain(root: &Path) -> DomainDescriptor {
        DomainDescriptor {
            id: "SAAS".into(),
            root_path: root.to_path_buf(),
            index_reference: PathBuf::from("index.yaml"),
        }
    }

    fn descriptor(semantic: Option<&str>, agentic: Option<&str>) -> EntityDescriptor {
        EntityDescriptor {
            qualified_name: "SAAS.CLINICS".into(),
            semantic_doc_ref: semantic.map(String::from),
            agentic_doc_ref: agentic.map(String::from),
            domains: BTreeSet::from(["SAAS".to_string()]),
            tier: 2,
            status: "ACTIVE".into(),
        }
    }

    #[test]
    fn relative_and_absolute_references() {
        let root = Path::new("/repos/saas");
        assert_eq!(resolve_reference(root, "docs/a.md"), PathBuf::from("/repos/saas/docs/a.md"));
        assert_eq!(resolve_reference(root, "/abs/a.md"), PathBuf::from("/abs/a.md"));
    }

    #[test]
    fn missing_documents_are_absent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sem.md"), "semantic body").unwrap();

        let docs = resolve_documents(&domain(dir.path()), &descriptor(Some("sem.md"), Some("gone.md")));
        assert_eq!(docs.semantic.as_deref(), Some("semantic body"));
        assert!(docs.agentic.is_none());

        let docs = resolve_documents(&domain(dir.path()), &descriptor(None, None));
        assert_eq!(docs, ResolvedDocuments::default());
    }

    #[test]
    fn absolute_reference_ignores_domain_root() {
        let docs_dir = TempDir::new().unwrap();
        let abs = docs_dir.path().join("agentic.md");
        fs::write(&abs, "agentic body").unwrap();

        let other_root = TempDir::new().unwrap();
        let docs = resolve_documents(
            &domain(other_root.path()),
            &descriptor(None, Some(abs.to_str().unwrap())),
        );
        assert_eq!(docs.agentic.as_deref(), Some("agentic body"));
    }

    #[test]
    fn build_entity_collects_axioms_digest_and_metadata() {
        let now = Utc::now();
        let docs = ResolvedDocuments {
            semantic: Some("Created: 2024-01-02\n> [!DANGER] Do not delete\n".into()),
            agentic: Some("### 1.1. Retry\nAlways retry twice.\n".into()),
        };
        let e = build_entity(
            &domain(Path::new("/r")),
            &descriptor(Some("sem.md"), Some("age.md")),
            docs,
            now,
        );

        assert_eq!(e.axioms.len(), 2);
        assert_eq!(e.axioms[0].kind, "DANGER");
        assert_eq!(e.axioms[1].title.as_deref(), Some("Retry"));
        assert_eq!(
            e.content_digest,
            content_digest(e.semantic_content.as_deref(), e.agentic_content.as_deref())
        );
        assert_eq!(e.source_domain(), Some("SAAS"));
        assert_eq!(e.metadata[META_ORIGINAL_DOC_REFS]["agentic"], "age.md");
        assert_eq!(e.created_at.format("%Y-%m-%d").to_string(), "2024-01-02");
        assert_eq!(e.updated_at, now);
        assert_eq!(e.synced_at, now);
    }

    #[test]
    fn entity_without_documents_is_incomplete() {
        let e = build_entity(
            &domain(Path::new("/r")),
            &descriptor(None, None),
            ResolvedDocuments::default(),
            Utc::now(),
        );
        assert!(e.is_incomplete());
        assert!(e.axioms.is_empty());
    }
}
