//! Postgres-backed conditional store.
//!
//! Each item lives in one row keyed by `(pk, sk)`. The conditional insert is a
//! single `INSERT ... ON CONFLICT (pk, sk) DO NOTHING` statement, so the
//! existence check and the write are one atomic step inside the database.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | Result |
//! |------------|----------------------|--------|
//! | none, 0 rows affected | N/A | `InsertOutcome::AlreadyExists` |
//! | Database (unique violation) | `23505` | `InsertOutcome::AlreadyExists` |
//! | Database (serialization failure / deadlock) | `40001` / `40P01` | `StoreError::Throttled` |
//! | Database (too many connections) | `53300` | `StoreError::Throttled` |
//! | Database (other) | Any other | `StoreError::Backend` |
//! | PoolTimedOut / PoolClosed / Io | N/A | `StoreError::Unavailable` |
//! | Other | N/A | `StoreError::Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::instrument;

use inventory_core::CompositeKey;

use super::r#trait::{ConditionalStore, InsertOutcome, StoreError};
use crate::config::TableName;

/// Conditional store over a Postgres table.
///
/// ## Thread Safety
///
/// Uses SQLx connection pool which is thread-safe (Arc + Send + Sync). Build one
/// instance per process and share it.
#[derive(Debug, Clone)]
pub struct PostgresConditionalStore {
    pool: Arc<PgPool>,
    table: TableName,
}

impl PostgresConditionalStore {
    pub fn new(pool: PgPool, table: TableName) -> Self {
        Self {
            pool: Arc::new(pool),
            table,
        }
    }

    /// Open a connection pool and wrap it.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        table: TableName,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool, table))
    }

    /// Create the backing table when it does not exist yet.
    #[instrument(skip(self), fields(table = %self.table), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                pk TEXT NOT NULL,
                sk TEXT NOT NULL,
                item JSONB NOT NULL,
                inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (pk, sk)
            )
            "#,
            table = self.table.quoted()
        );

        sqlx::query(&ddl)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl ConditionalStore for PostgresConditionalStore {
    #[instrument(
        skip(self, item),
        fields(
            operation = "insert_if_absent",
            pk = %key.partition_key,
            sk = %key.sort_key
        ),
        err
    )]
    async fn insert_if_absent(
        &self,
        key: &CompositeKey,
        item: &JsonValue,
    ) -> Result<InsertOutcome, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {table} (pk, sk, item)
            VALUES ($1, $2, $3)
            ON CONFLICT (pk, sk) DO NOTHING
            "#,
            table = self.table.quoted()
        );

        let result = sqlx::query(&sql)
            .bind(&key.partition_key)
            .bind(&key.sort_key)
            .bind(item)
            .execute(&*self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(InsertOutcome::AlreadyExists),
            Ok(_) => Ok(InsertOutcome::Inserted),
            // ON CONFLICT covers the primary key; a unique index added later
            // still means "occupied".
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::AlreadyExists),
            Err(e) => Err(map_sqlx_error("insert_if_absent", e)),
        }
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("40001") | Some("40P01") | Some("53300") => StoreError::Throttled(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_map_to_unavailable() {
        assert!(matches!(
            map_sqlx_error("insert_if_absent", sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error("insert_if_absent", sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn other_errors_map_to_backend() {
        let err = map_sqlx_error("insert_if_absent", sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(err.to_string().contains("insert_if_absent"));
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
