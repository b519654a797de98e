mod cli;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use ontosync_axioms::{load_definitions, PgExecutor, Validator};
use ontosync_core::config::{load_dotenv, Config};
use ontosync_core::{read_snapshot, write_snapshot};
use ontosync_ingest::legacy::Migration;
use ontosync_ingest::Registry;
use ontosync_sync::{EntityStore, MemoryStore, PgEntityStore, Reconciler, SyncRunner};

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // RUST_LOG may come from .env.
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = Config::for_profile(args.profile.as_deref().unwrap_or_default());
    config.log_summary();

    match args.command {
        Command::Sync {
            registry,
            dry_run,
            snapshot,
            write_snapshot,
        } => {
            let registry = registry.unwrap_or_else(|| config.sources.registry_path.clone());
            sync(&config, registry, dry_run, snapshot, write_snapshot).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { axioms } => {
            let axioms = axioms.unwrap_or_else(|| config.sources.axioms_path.clone());
            validate(&config, axioms).await
        }
        Command::Status { snapshot } => {
            status(&config, snapshot).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::MigrateIndex {
            domain,
            from,
            to,
            promote,
            partner,
            shared_prefix,
        } => {
            let migration = Migration {
                domain_id: domain,
                shared_prefix: shared_prefix
                    .unwrap_or_else(|| config.ontology.shared_prefix.clone()),
                promoted: promote.into_iter().collect::<BTreeSet<_>>(),
                partners: partner.into_iter().collect::<BTreeSet<_>>(),
            };
            migration
                .run(&from, &to)
                .with_context(|| format!("failed to migrate '{}'", from.display()))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Connect to the entity store. Only `sync` applies migrations; the
/// read-only commands never change the schema.
async fn connect(config: &Config, migrate: bool) -> Result<PgEntityStore> {
    if !config.postgres.is_configured() {
        bail!("PostgreSQL is not configured: set PG_URL or PG_USERNAME");
    }
    let store = PgEntityStore::connect(&config.postgres, &config.ontology.entity_table)
        .await
        .context("failed to connect to PostgreSQL")?;
    if migrate {
        store.migrate().await.context("failed to apply migrations")?;
    }
    Ok(store)
}

async fn sync(
    config: &Config,
    registry_path: PathBuf,
    dry_run: bool,
    snapshot: Option<PathBuf>,
    snapshot_out: Option<PathBuf>,
) -> Result<()> {
    let registry = Registry::load(&registry_path)
        .with_context(|| format!("failed to load registry '{}'", registry_path.display()))?;
    let runner = SyncRunner::new(Reconciler::new(config.ontology.clone())).dry_run(dry_run);

    if dry_run {
        let mut store = match &snapshot {
            Some(path) => {
                let entities = read_snapshot(path)
                    .with_context(|| format!("failed to read snapshot '{}'", path.display()))?;
                info!(path = %path.display(), entities = entities.len(), "seeded dry-run store");
                MemoryStore::from_entities(entities)
            }
            None => MemoryStore::new(),
        };
        runner.run(&registry, &mut store).await?;
        if let Some(path) = snapshot_out {
            write_snapshot(&path, &store.entities())
                .with_context(|| format!("failed to write snapshot '{}'", path.display()))?;
            info!(path = %path.display(), entities = store.len(), "wrote dry-run snapshot");
        }
        return Ok(());
    }

    let mut store = connect(config, true).await?;
    store.begin().await?;
    let report = runner.run(&registry, &mut store).await?;
    if report.failed() > 0 {
        warn!(failed = report.failed(), "some entities were not written");
    }
    Ok(())
}

async fn validate(config: &Config, axioms_path: PathBuf) -> Result<ExitCode> {
    let axioms = load_definitions(&axioms_path)
        .with_context(|| format!("failed to load axioms '{}'", axioms_path.display()))?;
    let store = connect(config, false).await?;

    let mut validator = Validator::new(PgExecutor::new(store.pool().clone()));
    let report = validator.validate(&axioms).await;
    report.log_summary();

    Ok(if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn status(config: &Config, snapshot: Option<PathBuf>) -> Result<()> {
    let mut store = connect(config, false).await?;
    let entities = store.list().await?;
    for e in &entities {
        println!(
            "{} | {} | {} | {}",
            e.qualified_name,
            e.domains.join(","),
            e.tier,
            e.status
        );
    }
    info!(entities = entities.len(), "listed stored entities");

    if let Some(path) = snapshot {
        let records = store.fetch_all().await?;
        write_snapshot(&path, &records)
            .with_context(|| format!("failed to write snapshot '{}'", path.display()))?;
        info!(path = %path.display(), entities = records.len(), "wrote store snapshot");
    }
    Ok(())
}
