//! Front half of the ontology sync pipeline.
//!
//! This crate provides:
//! - Domain registry and per-domain entity index loading
//! - Document reference resolution against a domain root
//! - Axiom mining from resolved markdown (callouts and numbered subsections)
//! - Content digests and date-marker extraction
//! - Conversion of legacy entity indexes to the current index format

pub mod dates;
pub mod digest;
pub mod extract;
pub mod legacy;
pub mod loader;
pub mod resolver;

pub use digest::content_digest;
pub use extract::extract_axioms;
pub use loader::{IndexLoad, IndexStatus, LoadError, Registry, SkippedDomain};
pub use resolver::{build_entity, resolve_documents, ResolvedDocuments};
