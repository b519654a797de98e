use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ontology sync and axiom validation.
///
/// Reconciles per-domain entity documentation into the canonical store and
/// checks declarative axioms against it. Connection settings come from the
/// environment (`PG_*`, optionally prefixed by `ONTOSYNC_PROFILE`).
#[derive(Parser, Debug)]
#[command(name = "ontosync", version, about = "Ontology sync and axiom validation")]
pub struct CliArgs {
    /// Config profile, e.g. PROD
    #[arg(long, global = true, env = "ONTOSYNC_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile every registered domain into the canonical store
    Sync {
        /// Domain registry YAML (overrides ONTOSYNC_REGISTRY)
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Compute every decision without connecting to the database
        #[arg(long)]
        dry_run: bool,

        /// Seed the dry-run store from a JSON snapshot of canonical entities
        #[arg(long, requires = "dry_run")]
        snapshot: Option<PathBuf>,

        /// Write the dry-run store to a JSON snapshot afterwards
        #[arg(long, requires = "dry_run")]
        write_snapshot: Option<PathBuf>,
    },

    /// Evaluate axiom definitions against the canonical store
    Validate {
        /// Axiom definitions YAML (overrides ONTOSYNC_AXIOMS)
        #[arg(long)]
        axioms: Option<PathBuf>,
    },

    /// List stored entities
    Status {
        /// Also dump every stored entity to a JSON snapshot for `sync --dry-run --snapshot`
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Convert a legacy entity index to the current index format
    MigrateIndex {
        /// Domain owning the legacy index, e.g. SAAS
        #[arg(long)]
        domain: String,

        /// Legacy index file
        #[arg(long)]
        from: PathBuf,

        /// Output index file
        #[arg(long)]
        to: PathBuf,

        /// Legacy names promoted to the shared scope (comma separated)
        #[arg(long, value_delimiter = ',')]
        promote: Vec<String>,

        /// Partner domains owning promoted entities (comma separated)
        #[arg(long, value_delimiter = ',')]
        partner: Vec<String>,

        /// Shared-scope prefix (overrides ONTOSYNC_SHARED_PREFIX)
        #[arg(long)]
        shared_prefix: Option<String>,
    },
}
