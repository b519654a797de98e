//! Registry → index → documents, read from a directory tree on disk.

use std::fs;
use std::path::Path;

use chrono::Utc;
use tempfile::TempDir;

use ontosync_ingest::{build_entity, resolve_documents, IndexStatus, LoadError, Registry};

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn full_registry_walk() {
    let dir = TempDir::new().unwrap();
    let saas = dir.path().join("saas");
    let fintech = dir.path().join("fintech");

    write(
        &dir.path().join("DOMAIN_REGISTRY.yaml"),
        &format!(
            "domains:\n  - id: SAAS\n    root_path: {}\n    ontology_index: _docs/ONTOLOGY_INDEX_SAAS.yaml\n    entity_index: _docs/ENTITY_INDEX.yaml\n  - id: FINTECH\n    root_path: {}\n    entity_index: ENTITY_INDEX.yaml\n  - id: LEGACY\n    root_path: /nowhere\n",
            saas.display(),
            fintech.display()
        ),
    );
    write(
        &saas.join("_docs/ONTOLOGY_INDEX_SAAS.yaml"),
        "entities:\n  - id: ECOSYSTEM.PATIENTS\n    semantic_doc: _docs/patients.md\n    agentic_doc: agentic/patients.md\n    domains: [SAAS, FINTECH]\n    tier: 1\n  - id: SAAS.CLINICS\n    semantic_doc: _docs/clinics.md\n    domains: [SAAS]\n    tier: 2\n    status: DEPRECATED\n",
    );
    write(
        &saas.join("_docs/patients.md"),
        "# Patients\nLast Updated: 2024-06-30\n> [!INVARIANT] A patient belongs to one clinic\n> at any point in time.\n\n### 2.1. Consent\nConsent is recorded before treatment.\n",
    );
    write(&saas.join("agentic/patients.md"), "> [!TIP] Query by external id\n");

    let registry = Registry::load(&dir.path().join("DOMAIN_REGISTRY.yaml")).unwrap();
    assert_eq!(registry.domains.len(), 2);
    assert_eq!(registry.skipped.len(), 1);
    assert_eq!(registry.skipped[0].domain_id, "LEGACY");

    // Newer-style reference wins over the legacy one.
    let load = Registry::load_index(&registry.domains[0]);
    assert!(load.path.ends_with("_docs/ONTOLOGY_INDEX_SAAS.yaml"));
    let entities = load.into_entities().unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].status, "ACTIVE");
    assert_eq!(entities[1].status, "DEPRECATED");

    let domain = &registry.domains[0];
    let docs = resolve_documents(domain, &entities[0]);
    let patients = build_entity(domain, &entities[0], docs, Utc::now());
    let kinds: Vec<_> = patients.axioms.iter().map(|a| a.kind.as_str()).collect();
    assert_eq!(kinds, ["INVARIANT", "BUSINESS_RULE", "TIP"]);
    assert_eq!(
        patients.axioms[0].description,
        "A patient belongs to one clinic at any point in time."
    );
    assert_eq!(patients.updated_at.format("%Y-%m-%d").to_string(), "2024-06-30");

    // Clinics references a document that does not exist.
    let docs = resolve_documents(domain, &entities[1]);
    let clinics = build_entity(domain, &entities[1], docs, Utc::now());
    assert!(clinics.is_incomplete());

    // FINTECH declares only a legacy index, which is missing.
    let load = Registry::load_index(&registry.domains[1]);
    assert!(matches!(load.status, IndexStatus::Skipped { .. }));
}

#[test]
fn missing_registry_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = Registry::load(&dir.path().join("DOMAIN_REGISTRY.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
}

#[test]
fn malformed_index_fails_that_domain_only() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("index.yaml"), "entities: [ {id: X, tier: ");
    let registry = Registry::parse(&format!(
        "domains:\n  - id: BAD\n    root_path: {}\n    ontology_index: index.yaml\n",
        dir.path().display()
    ))
    .unwrap();

    let load = Registry::load_index(&registry.domains[0]);
    assert!(matches!(load.status, IndexStatus::Failed { .. }));
}
