//! Conflict resolution between a freshly resolved entity and its stored record.
//!
//! [`Reconciler::reconcile`] is pure: it computes the complete next state in
//! memory and tells the caller whether to insert, update or leave the store
//! alone. The caller performs at most one write with the returned record.

use ontosync_core::config::OntologyConfig;
use ontosync_core::CanonicalEntity;

/// Contributor named in the accretion separator when the fresh record carries none.
const UNKNOWN_DOMAIN: &str = "unknown";

/// What the caller must do with the store for one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeDecision {
    /// No stored record: write the fresh record as-is.
    Insert(CanonicalEntity),
    /// Stored record exists: replace it with this merged next state.
    Update(CanonicalEntity),
    /// Nothing to write.
    Skip(SkipReason),
}

impl MergeDecision {
    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            MergeDecision::Insert(_) => "insert",
            MergeDecision::Update(_) => "update",
            MergeDecision::Skip(_) => "skip",
        }
    }

    /// The record to persist, if any.
    pub fn next_state(&self) -> Option<&CanonicalEntity> {
        match self {
            MergeDecision::Insert(e) | MergeDecision::Update(e) => Some(e),
            MergeDecision::Skip(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Domain-private entity whose content digest matches the stored one.
    DigestUnchanged,
    /// Shared entity whose merge produced the stored state again.
    NothingToAccrete,
}

/// Separator placed between accreted contributions of a shared entity.
pub fn provenance_separator(domain: &str) -> String {
    format!("\n\n--- [Merged from {domain}] ---\n\n")
}

/// Whether `fresh` already appears verbatim inside `stored`.
///
/// Known limitation: this is plain substring containment. A contribution
/// that was reordered, re-wrapped or reformatted no longer matches and gets
/// accreted a second time.
pub fn contains_verbatim(stored: &str, fresh: &str) -> bool {
    stored.contains(fresh)
}

/// Append-only merge of a shared entity's semantic content.
///
/// Stored content is never replaced or shortened: an absent or already
/// contained contribution leaves it untouched.
pub fn accrete(stored: Option<&str>, fresh: Option<&str>, domain: &str) -> Option<String> {
    match (stored, fresh) {
        (stored, None) => stored.map(str::to_string),
        (None | Some(""), Some(fresh)) => Some(fresh.to_string()),
        (Some(stored), Some(fresh)) if contains_verbatim(stored, fresh) => Some(stored.to_string()),
        (Some(stored), Some(fresh)) => {
            Some(format!("{stored}{}{fresh}", provenance_separator(domain)))
        }
    }
}

/// Merge engine for canonical entities.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    scope: OntologyConfig,
}

impl Reconciler {
    pub fn new(scope: OntologyConfig) -> Self {
        Self { scope }
    }

    pub fn is_shared(&self, qualified_name: &str) -> bool {
        self.scope.is_shared(qualified_name)
    }

    /// Decide the next persisted state of `fresh.qualified_name`.
    pub fn reconcile(
        &self,
        fresh: CanonicalEntity,
        existing: Option<&CanonicalEntity>,
    ) -> MergeDecision {
        let Some(current) = existing else {
            return MergeDecision::Insert(fresh);
        };

        let shared = self.is_shared(&fresh.qualified_name);
        if !shared && fresh.content_digest == current.content_digest {
            return MergeDecision::Skip(SkipReason::DigestUnchanged);
        }

        let next = merge(current, fresh, shared);
        if shared && same_persisted_state(current, &next) {
            return MergeDecision::Skip(SkipReason::NothingToAccrete);
        }
        MergeDecision::Update(next)
    }
}

fn merge(current: &CanonicalEntity, fresh: CanonicalEntity, shared: bool) -> CanonicalEntity {
    let contributor = fresh.source_domain().unwrap_or(UNKNOWN_DOMAIN).to_string();

    let mut domains = current.domains.clone();
    domains.extend(fresh.domains);

    let semantic_content = if shared {
        accrete(
            current.semantic_content.as_deref(),
            fresh.semantic_content.as_deref(),
            &contributor,
        )
    } else {
        fresh.semantic_content
    };

    let mut axioms = current.axioms.clone();
    axioms.extend(fresh.axioms);

    let mut metadata = current.metadata.clone();
    metadata.extend(fresh.metadata);

    CanonicalEntity {
        qualified_name: fresh.qualified_name,
        domains,
        tier: current.tier.min(fresh.tier),
        semantic_content,
        agentic_content: fresh.agentic_content,
        axioms,
        status: fresh.status,
        metadata,
        content_digest: fresh.content_digest,
        created_at: current.created_at,
        updated_at: fresh.updated_at,
        synced_at: fresh.synced_at,
    }
}

/// Equality on every persisted field except `synced_at`.
fn same_persisted_state(a: &CanonicalEntity, b: &CanonicalEntity) -> bool {
    CanonicalEntity {
        synced_at: b.synced_at,
        ..a.clone()
    } == *b
}

#[cfg(test)]
mod tests;
