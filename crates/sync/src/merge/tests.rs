use std::collections::BTreeSet;

use chrono::{Duration, TimeZone, Utc};
use ontosync_core::{AxiomRecord, AxiomSource, Metadata, META_SOURCE_DOMAIN};
use ontosync_ingest::content_digest;

use super::*;

fn record(name: &str, domain: &str, semantic: Option<&str>, tier: i32) -> CanonicalEntity {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut metadata = Metadata::new();
    metadata.insert(META_SOURCE_DOMAIN.into(), domain.into());
    CanonicalEntity {
        qualified_name: name.into(),
        domains: BTreeSet::from([domain.to_string()]),
        tier,
        semantic_content: semantic.map(String::from),
        agentic_content: None,
        axioms: vec![AxiomRecord {
            kind: "DANGER".into(),
            title: None,
            description: format!("from {domain}"),
            source: AxiomSource::Callout,
        }],
        status: "ACTIVE".into(),
        metadata,
        content_digest: content_digest(semantic, None),
        created_at: now,
        updated_at: now,
        synced_at: now,
    }
}

fn updated(decision: MergeDecision) -> CanonicalEntity {
    match decision {
        MergeDecision::Update(e) => e,
        other => panic!("expected update, got {other:?}"),
    }
}

#[test]
fn absent_record_is_inserted_unchanged() {
    let r = Reconciler::default();
    let fresh = record("SAAS.X", "SAAS", Some("alpha"), 2);
    assert_eq!(r.reconcile(fresh.clone(), None), MergeDecision::Insert(fresh));
}

#[test]
fn private_entity_with_same_digest_is_skipped() {
    let r = Reconciler::default();
    let stored = record("SAAS.X", "SAAS", Some("alpha"), 2);
    let mut fresh = record("SAAS.X", "SAAS", Some("alpha"), 1);
    fresh.synced_at = stored.synced_at + Duration::hours(1);
    assert_eq!(
        r.reconcile(fresh, Some(&stored)),
        MergeDecision::Skip(SkipReason::DigestUnchanged)
    );
}

#[test]
fn private_entity_is_latest_write_wins() {
    let r = Reconciler::default();
    let stored = record("SAAS.X", "SAAS", Some("alpha"), 2);
    let mut fresh = record("SAAS.X", "FINTECH", Some("beta"), 2);
    fresh.agentic_content = Some("guide".into());
    fresh.status = "DEPRECATED".into();

    let next = updated(r.reconcile(fresh, Some(&stored)));
    assert_eq!(next.semantic_content.as_deref(), Some("beta"));
    assert_eq!(next.agentic_content.as_deref(), Some("guide"));
    assert_eq!(next.status, "DEPRECATED");
    assert_eq!(next.content_digest, content_digest(Some("beta"), None));
    assert_eq!(next.axioms.len(), 2);
    assert_eq!(next.source_domain(), Some("FINTECH"));
}

#[test]
fn domains_union_and_tier_minimum() {
    let r = Reconciler::default();

    let stored = record("SAAS.X", "A", Some("one"), 2);
    let next = updated(r.reconcile(record("SAAS.X", "B", Some("two"), 1), Some(&stored)));
    assert_eq!(next.domains, BTreeSet::from(["A".to_string(), "B".to_string()]));
    assert_eq!(next.tier, 1);

    let stored = record("SAAS.X", "A", Some("one"), 1);
    let next = updated(r.reconcile(record("SAAS.X", "B", Some("two"), 2), Some(&stored)));
    assert_eq!(next.tier, 1);
}

#[test]
fn shared_entity_accretes_with_provenance() {
    let r = Reconciler::default();
    let stored = record("ECOSYSTEM.X", "A", Some("alpha"), 2);
    let next = updated(r.reconcile(record("ECOSYSTEM.X", "B", Some("beta"), 2), Some(&stored)));

    let sem = next.semantic_content.unwrap();
    assert_eq!(sem, format!("alpha{}beta", provenance_separator("B")));
    assert!(sem.contains("--- [Merged from B] ---"));
}

#[test]
fn shared_entity_contained_content_is_kept_not_truncated() {
    let r = Reconciler::default();
    let accreted = format!("alpha{}beta", provenance_separator("B"));
    let mut stored = record("ECOSYSTEM.X", "A", Some(&accreted), 2);
    stored.axioms.clear();

    // Domain A re-syncs its original contribution.
    let mut fresh = record("ECOSYSTEM.X", "A", Some("alpha"), 2);
    fresh.axioms.clear();
    fresh.metadata = stored.metadata.clone();
    fresh.content_digest = stored.content_digest.clone();

    assert_eq!(
        r.reconcile(fresh, Some(&stored)),
        MergeDecision::Skip(SkipReason::NothingToAccrete)
    );
}

#[test]
fn shared_entity_is_reevaluated_despite_digest_match() {
    let r = Reconciler::default();
    let stored = record("ECOSYSTEM.X", "A", Some("alpha"), 2);
    let fresh = record("ECOSYSTEM.X", "A", Some("alpha"), 2);
    assert_eq!(fresh.content_digest, stored.content_digest);

    // The fresh axioms still accrete, so this is a write, but the content is not duplicated.
    let next = updated(r.reconcile(fresh, Some(&stored)));
    assert_eq!(next.semantic_content.as_deref(), Some("alpha"));
    assert_eq!(next.axioms.len(), 2);
}

#[test]
fn shared_entity_keeps_content_when_fresh_document_absent() {
    let r = Reconciler::default();
    let stored = record("ECOSYSTEM.X", "A", Some("alpha"), 2);
    let next = updated(r.reconcile(record("ECOSYSTEM.X", "B", None, 2), Some(&stored)));
    assert_eq!(next.semantic_content.as_deref(), Some("alpha"));
}

#[test]
fn agentic_content_is_replaced_even_when_shared() {
    let r = Reconciler::default();
    let mut stored = record("ECOSYSTEM.X", "A", Some("alpha"), 2);
    stored.agentic_content = Some("old guidance".into());
    let next = updated(r.reconcile(record("ECOSYSTEM.X", "B", Some("beta"), 2), Some(&stored)));
    assert!(next.agentic_content.is_none());
}

#[test]
fn metadata_is_shallow_merged_fresh_wins() {
    let r = Reconciler::default();
    let mut stored = record("SAAS.X", "A", Some("one"), 2);
    stored.metadata.insert("owner".into(), "team-a".into());
    let next = updated(r.reconcile(record("SAAS.X", "B", Some("two"), 2), Some(&stored)));
    assert_eq!(next.metadata["owner"], "team-a");
    assert_eq!(next.metadata[META_SOURCE_DOMAIN], "B");
}

#[test]
fn created_at_is_preserved_on_update() {
    let r = Reconciler::default();
    let stored = record("SAAS.X", "A", Some("one"), 2);
    let mut fresh = record("SAAS.X", "A", Some("two"), 2);
    fresh.created_at = stored.created_at + Duration::days(30);
    fresh.updated_at = stored.updated_at + Duration::days(30);

    let next = updated(r.reconcile(fresh, Some(&stored)));
    assert_eq!(next.created_at, stored.created_at);
    assert_eq!(next.updated_at, stored.updated_at + Duration::days(30));
}

#[test]
fn accrete_edge_cases() {
    assert_eq!(accrete(None, None, "A"), None);
    assert_eq!(accrete(Some("s"), None, "A").as_deref(), Some("s"));
    assert_eq!(accrete(None, Some("f"), "A").as_deref(), Some("f"));
    assert_eq!(accrete(Some(""), Some("f"), "A").as_deref(), Some("f"));
    assert_eq!(accrete(Some("xfx"), Some("f"), "A").as_deref(), Some("xfx"));
}

#[test]
fn reformatted_contribution_is_accreted_again() {
    // Documented limitation of verbatim containment.
    let stored = "alpha beta";
    assert!(!contains_verbatim(stored, "alpha  beta"));
    let next = accrete(Some(stored), Some("alpha  beta"), "A").unwrap();
    assert_eq!(next.matches("alpha").count(), 2);
}
