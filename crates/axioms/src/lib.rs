//! Declarative axiom validation against the canonical store.
//!
//! Axiom definitions are loaded from YAML, each predicate query is executed
//! through a [`PredicateExecutor`], and the resulting violation count is
//! classified by the axiom's severity.

pub mod classify;
pub mod error;
pub mod executor;
pub mod loader;
pub mod schema;
pub mod validator;

pub use classify::{classify, ValidationStatus, ERROR_COUNT};
pub use error::{DefinitionError, ExecutorError};
pub use executor::{PgExecutor, PredicateExecutor};
pub use loader::load_definitions;
pub use schema::{AxiomDefinition, Severity};
pub use validator::{ValidationReport, ValidationResult, Validator};
