//! Execution of predicate queries.

use async_trait::async_trait;
use sqlx::{Column, PgPool, Row};

use crate::error::ExecutorError;

/// Runs a predicate query and returns its violation count.
#[async_trait]
pub trait PredicateExecutor: Send {
    /// The first column of the first row, or `None` when the query returns
    /// no row or a null value.
    async fn count(&mut self, query: &str) -> Result<Option<i64>, ExecutorError>;
}

/// Executes predicates against the canonical store.
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PredicateExecutor for PgExecutor {
    async fn count(&mut self, query: &str) -> Result<Option<i64>, ExecutorError> {
        let Some(row) = sqlx::query(query).fetch_optional(&self.pool).await? else {
            return Ok(None);
        };
        if row.columns().is_empty() {
            return Ok(None);
        }
        // COUNT(*) is BIGINT, hand-written predicates often return INTEGER.
        if let Ok(v) = row.try_get::<Option<i64>, _>(0) {
            return Ok(v);
        }
        if let Ok(v) = row.try_get::<Option<i32>, _>(0) {
            return Ok(v.map(i64::from));
        }
        if let Ok(v) = row.try_get::<Option<i16>, _>(0) {
            return Ok(v.map(i64::from));
        }
        Err(ExecutorError::NotACount(format!(
            "first column has type {}",
            row.columns()[0].type_info()
        )))
    }
}
