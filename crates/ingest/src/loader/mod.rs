//! Domain registry and entity index loading.
//!
//! The registry is the only mandatory input: a missing or unparseable registry
//! aborts the run before anything is written. Everything below it degrades
//! per domain: a missing index skips that domain, an empty index is valid.

mod core;
mod error;


pub use self::core::Registry;
pub use self::error::{IndexLoad, IndexStatus, LoadError, Result, SkippedDomain};
