//! Reconciliation of resolved entities into the canonical store.
//!
//! - [`merge`]: the pure merge engine deciding insert, update or skip
//! - [`store`]: the persistence seam with PostgreSQL and in-memory backends
//! - [`runner`]: the sequential registry walk driving both
//! - [`report`]: per-run outcome accounting

pub mod merge;
pub mod report;
pub mod runner;
pub mod store;

pub use merge::{MergeDecision, Reconciler, SkipReason};
pub use report::{EntityOutcome, EntityReport, SyncReport};
pub use runner::SyncRunner;
pub use store::{EntityStore, EntitySummary, MemoryStore, PgEntityStore, StoreError};
