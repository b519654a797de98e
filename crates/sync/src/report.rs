use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use ontosync_ingest::SkippedDomain;

/// What happened to one entity during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntityOutcome {
    Inserted,
    Updated,
    Unchanged,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    pub qualified_name: String,
    pub domain_id: String,
    #[serde(flatten)]
    pub outcome: EntityOutcome,
    /// Neither document resolved.
    pub incomplete: bool,
}

/// Accounting for one sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub dry_run: bool,
    pub entities: Vec<EntityReport>,
    pub skipped_domains: Vec<SkippedDomainReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDomainReport {
    pub domain_id: String,
    pub reason: String,
}

impl From<&SkippedDomain> for SkippedDomainReport {
    fn from(s: &SkippedDomain) -> Self {
        Self {
            domain_id: s.domain_id.clone(),
            reason: s.reason.clone(),
        }
    }
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            dry_run,
            entities: Vec::new(),
            skipped_domains: Vec::new(),
        }
    }

    fn count(&self, pred: impl Fn(&EntityOutcome) -> bool) -> usize {
        self.entities.iter().filter(|e| pred(&e.outcome)).count()
    }

    pub fn inserted(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::Inserted))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::Updated))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::Unchanged))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::Failed { .. }))
    }

    pub fn incomplete(&self) -> usize {
        self.entities.iter().filter(|e| e.incomplete).count()
    }

    /// Outcome recorded for `qualified_name`, last one wins.
    pub fn outcome_of(&self, qualified_name: &str) -> Option<&EntityOutcome> {
        self.entities
            .iter()
            .rev()
            .find(|e| e.qualified_name == qualified_name)
            .map(|e| &e.outcome)
    }

    pub fn log_summary(&self) {
        info!(
            run_id = %self.run_id,
            dry_run = self.dry_run,
            inserted = self.inserted(),
            updated = self.updated(),
            unchanged = self.unchanged(),
            failed = self.failed(),
            incomplete = self.incomplete(),
            skipped_domains = self.skipped_domains.len(),
            "sync finished"
        );
        for d in &self.skipped_domains {
            warn!(domain = %d.domain_id, reason = %d.reason, "domain skipped");
        }
    }
}
