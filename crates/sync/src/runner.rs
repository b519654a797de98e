//! Sequential registry walk: resolve, reconcile, write.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use ontosync_core::{DomainDescriptor, EntityDescriptor};
use ontosync_ingest::{build_entity, resolve_documents, IndexStatus, Registry};

use crate::merge::{MergeDecision, Reconciler};
use crate::report::{EntityOutcome, EntityReport, SkippedDomainReport, SyncReport};
use crate::store::{EntityStore, StoreError};

/// Drives one sync run over a registry.
///
/// Domains are processed in registry order, entities in index order. Each
/// entity is its own unit of work: a failing fetch or write is recorded and
/// the run moves on. Only a failure to finish the batch aborts the run.
#[derive(Debug, Clone, Default)]
pub struct SyncRunner {
    reconciler: Reconciler,
    dry_run: bool,
}

impl SyncRunner {
    pub fn new(reconciler: Reconciler) -> Self {
        Self {
            reconciler,
            dry_run: false,
        }
    }

    /// Mark the run as a dry run. Only affects logging and the report;
    /// the caller chooses a non-persistent store.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run<S: EntityStore>(
        &self,
        registry: &Registry,
        store: &mut S,
    ) -> Result<SyncReport, StoreError> {
        self.run_at(registry, store, Utc::now()).await
    }

    /// Run with a fixed clock for `synced_at` and undeclared dates.
    pub async fn run_at<S: EntityStore>(
        &self,
        registry: &Registry,
        store: &mut S,
        now: DateTime<Utc>,
    ) -> Result<SyncReport, StoreError> {
        let mut report = SyncReport::new(self.dry_run);
        report
            .skipped_domains
            .extend(registry.skipped.iter().map(SkippedDomainReport::from));

        info!(
            run_id = %report.run_id,
            dry_run = self.dry_run,
            domains = registry.domains.len(),
            "starting sync"
        );

        for domain in &registry.domains {
            let load = Registry::load_index(domain);
            let entities = match load.status {
                IndexStatus::Loaded { entities } => entities,
                IndexStatus::Skipped { reason } | IndexStatus::Failed { error: reason } => {
                    report.skipped_domains.push(SkippedDomainReport {
                        domain_id: domain.id.clone(),
                        reason,
                    });
                    continue;
                }
            };

            for entity in &entities {
                let entry = self.sync_entity(domain, entity, store, now).await;
                report.entities.push(entry);
            }
        }

        store.finish().await?;
        report.log_summary();
        Ok(report)
    }

    async fn sync_entity<S: EntityStore>(
        &self,
        domain: &DomainDescriptor,
        entity: &EntityDescriptor,
        store: &mut S,
        now: DateTime<Utc>,
    ) -> EntityReport {
        let name = entity.qualified_name.clone();
        let docs = resolve_documents(domain, entity);
        let fresh = build_entity(domain, entity, docs, now);
        let incomplete = fresh.is_incomplete();
        if incomplete {
            warn!(entity = %name, domain = %domain.id, "entity has no resolvable documents");
        }

        let report = |outcome| EntityReport {
            qualified_name: name.clone(),
            domain_id: domain.id.clone(),
            outcome,
            incomplete,
        };

        let digest = fresh.content_digest.clone();
        let axioms = fresh.axioms.len();

        let existing = match store.fetch(&name).await {
            Ok(existing) => existing,
            Err(e) => {
                error!(entity = %name, error = %e, "failed to fetch stored entity");
                return report(EntityOutcome::Failed { error: e.to_string() });
            }
        };

        let decision = self.reconciler.reconcile(fresh, existing.as_ref());
        if self.dry_run {
            info!(
                entity = %name,
                domain = %domain.id,
                decision = decision.label(),
                dry_run = true,
                axioms,
                digest = %digest,
                "reconciled"
            );
        } else {
            info!(entity = %name, domain = %domain.id, decision = decision.label(), "reconciled");
        }

        let outcome = match &decision {
            MergeDecision::Insert(_) => EntityOutcome::Inserted,
            MergeDecision::Update(_) => EntityOutcome::Updated,
            MergeDecision::Skip(reason) => {
                debug!(entity = %name, reason = ?reason, "write skipped");
                return report(EntityOutcome::Unchanged);
            }
        };

        let Some(next) = decision.next_state() else {
            return report(EntityOutcome::Unchanged);
        };
        match store.write(next).await {
            Ok(()) => report(outcome),
            Err(e) => {
                error!(entity = %name, error = %e, "failed to write entity, continuing");
                report(EntityOutcome::Failed { error: e.to_string() })
            }
        }
    }
}
