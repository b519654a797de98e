//! PostgreSQL backend for canonical entities.
//!
//! A batch runs inside one transaction opened by [`PgEntityStore::begin`].
//! Every `fetch` and `write` inside it runs under its own savepoint, so a
//! failing statement is rolled back alone and the batch keeps going.
//! [`EntityStore::finish`] commits the batch.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPoolOptions, PgSslMode};
use sqlx::{Connection, PgPool, Postgres, Transaction};
use tracing::{info, warn};

use ontosync_core::config::PostgresConfig;
use ontosync_core::{AxiomRecord, CanonicalEntity, Metadata};

use super::{EntityStore, EntitySummary, StoreError};

const COLUMNS: &str = "qualified_name, domains, tier, semantic_markdown, agentic_markdown, \
                       axioms_json, status, metadata, sync_hash, created_at, updated_at, synced_at";

/// Row shape of the entity table, decoded right after each query.
#[derive(Debug, sqlx::FromRow)]
struct EntityRow {
    qualified_name: String,
    domains: Vec<String>,
    tier: i32,
    semantic_markdown: Option<String>,
    agentic_markdown: Option<String>,
    axioms_json: serde_json::Value,
    status: String,
    metadata: serde_json::Value,
    sync_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    synced_at: DateTime<Utc>,
}

impl TryFrom<EntityRow> for CanonicalEntity {
    type Error = StoreError;

    fn try_from(row: EntityRow) -> Result<Self, Self::Error> {
        let decode = |field: &str, e: serde_json::Error| StoreError::Decode {
            name: row.qualified_name.clone(),
            reason: format!("{field}: {e}"),
        };
        let axioms: Vec<AxiomRecord> =
            serde_json::from_value(row.axioms_json.clone()).map_err(|e| decode("axioms_json", e))?;
        let metadata: Metadata = match &row.metadata {
            serde_json::Value::Null => Metadata::new(),
            value => serde_json::from_value(value.clone()).map_err(|e| decode("metadata", e))?,
        };
        Ok(CanonicalEntity {
            qualified_name: row.qualified_name,
            domains: row.domains.into_iter().collect(),
            tier: row.tier,
            semantic_content: row.semantic_markdown,
            agentic_content: row.agentic_markdown,
            axioms,
            status: row.status,
            metadata,
            content_digest: row.sync_hash.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            synced_at: row.synced_at,
        })
    }
}

/// Entity store over a PostgreSQL table.
pub struct PgEntityStore {
    pool: PgPool,
    table: String,
    batch: Option<Transaction<'static, Postgres>>,
}

/// Connection options for `config`.
///
/// `url` is used verbatim when set. Otherwise every field is set on its own,
/// so credentials containing URL-reserved characters need no escaping.
pub fn connect_options(config: &PostgresConfig) -> Result<PgConnectOptions, StoreError> {
    if let Some(url) = &config.url {
        return Ok(PgConnectOptions::from_str(url)?);
    }
    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .username(config.username.as_deref().unwrap_or("postgres"))
        .ssl_mode(PgSslMode::from_str(&config.ssl_mode)?);
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    Ok(options)
}

impl PgEntityStore {
    /// Connect without touching the schema.
    ///
    /// Any failure here is fatal for the run: without a connection no
    /// entity can be written.
    pub async fn connect(config: &PostgresConfig, table: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(connect_options(config)?)
            .await?;
        info!("PostgreSQL connected: {}", config.host);
        Ok(Self {
            pool,
            table: table.to_string(),
            batch: None,
        })
    }

    /// Apply the bundled migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Database migrations applied successfully");
        Ok(())
    }

    /// Open the batch transaction. Until then every call autocommits.
    pub async fn begin(&mut self) -> Result<(), StoreError> {
        if self.batch.is_none() {
            self.batch = Some(self.pool.begin().await?);
        }
        Ok(())
    }

    /// The underlying pool, shared with other readers of the store.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn select_sql(&self) -> String {
        format!("SELECT {COLUMNS} FROM {} WHERE qualified_name = $1", self.table)
    }

    fn upsert_sql(&self) -> String {
        format!(
            "INSERT INTO {} ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             ON CONFLICT (qualified_name) DO UPDATE SET
                 domains = EXCLUDED.domains,
                 tier = EXCLUDED.tier,
                 semantic_markdown = EXCLUDED.semantic_markdown,
                 agentic_markdown = EXCLUDED.agentic_markdown,
                 axioms_json = EXCLUDED.axioms_json,
                 status = EXCLUDED.status,
                 metadata = EXCLUDED.metadata,
                 sync_hash = EXCLUDED.sync_hash,
                 created_at = EXCLUDED.created_at,
                 updated_at = EXCLUDED.updated_at,
                 synced_at = EXCLUDED.synced_at",
            self.table
        )
    }
}

async fn fetch_on(
    conn: &mut PgConnection,
    sql: &str,
    qualified_name: &str,
) -> Result<Option<CanonicalEntity>, StoreError> {
    let row = sqlx::query_as::<_, EntityRow>(sql)
        .bind(qualified_name)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(CanonicalEntity::try_from).transpose()
}

async fn write_on(
    conn: &mut PgConnection,
    sql: &str,
    entity: &CanonicalEntity,
) -> Result<(), StoreError> {
    let domains: Vec<String> = entity.domains.iter().cloned().collect();
    let axioms = serde_json::to_value(&entity.axioms)?;
    let metadata = serde_json::to_value(&entity.metadata)?;
    sqlx::query(sql)
        .bind(&entity.qualified_name)
        .bind(&domains)
        .bind(entity.tier)
        .bind(&entity.semantic_content)
        .bind(&entity.agentic_content)
        .bind(&axioms)
        .bind(&entity.status)
        .bind(&metadata)
        .bind(&entity.content_digest)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .bind(entity.synced_at)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn fetch(&mut self, qualified_name: &str) -> Result<Option<CanonicalEntity>, StoreError> {
        let sql = self.select_sql();
        match self.batch.as_mut() {
            Some(tx) => {
                let mut sp = tx.begin().await?;
                let result = fetch_on(&mut sp, &sql, qualified_name).await;
                finish_savepoint(sp, result.is_ok()).await?;
                result
            }
            None => {
                let mut conn = self.pool.acquire().await?;
                fetch_on(&mut conn, &sql, qualified_name).await
            }
        }
    }

    async fn write(&mut self, entity: &CanonicalEntity) -> Result<(), StoreError> {
        let sql = self.upsert_sql();
        match self.batch.as_mut() {
            Some(tx) => {
                let mut sp = tx.begin().await?;
                let result = write_on(&mut sp, &sql, entity).await;
                finish_savepoint(sp, result.is_ok()).await?;
                result
            }
            None => {
                let mut conn = self.pool.acquire().await?;
                write_on(&mut conn, &sql, entity).await
            }
        }
    }

    async fn list(&mut self) -> Result<Vec<EntitySummary>, StoreError> {
        let sql = format!(
            "SELECT qualified_name, domains, tier, status FROM {} ORDER BY qualified_name",
            self.table
        );
        let rows = sqlx::query_as::<_, (String, Vec<String>, i32, String)>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(qualified_name, domains, tier, status)| EntitySummary {
                qualified_name,
                domains,
                tier,
                status,
            })
            .collect())
    }

    async fn fetch_all(&mut self) -> Result<Vec<CanonicalEntity>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM {} ORDER BY qualified_name", self.table);
        let rows = sqlx::query_as::<_, EntityRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(CanonicalEntity::try_from).collect()
    }

    async fn finish(&mut self) -> Result<(), StoreError> {
        if let Some(tx) = self.batch.take() {
            tx.commit().await?;
            info!("batch committed");
        }
        Ok(())
    }
}

/// Release the savepoint on success, roll back to it on failure.
async fn finish_savepoint(
    sp: Transaction<'_, Postgres>,
    succeeded: bool,
) -> Result<(), StoreError> {
    if succeeded {
        sp.commit().await?;
    } else {
        warn!("rolling back to savepoint");
        sp.rollback().await?;
    }
    Ok(())
}
