use sqlx::{PgConnection, PgPool};

use crate::DbError;

/// Arbitrary but fixed key for the Postgres advisory lock that serialises
/// migration runs so concurrent connections don't race.
pub const MIGRATION_LOCK_KEY: i64 = 0x7461_736b_7472_6163; // "tasktrac" as hex

/// Run pending migrations. The advisory lock is session-scoped, so the lock,
/// the migrations and the unlock all share one connection.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| DbError::Internal(e.to_string()))?;

    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *conn)
        .await
        .map_err(|e| DbError::Internal(e.to_string()))?;

    let result = run_inner(&mut conn).await;

    // Always release the advisory lock, even on error.
    let released: Result<bool, sqlx::Error> = sqlx::query_scalar("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .fetch_one(&mut *conn)
        .await;
    match released {
        Ok(true) => {}
        Ok(false) => tracing::warn!("migration lock was not held at unlock"),
        Err(e) => {
            // Dropping the session is the only other way to free the lock.
            tracing::warn!(error = %e, "failed to release migration lock; closing connection");
            drop(conn.detach());
        }
    }

    result
}

async fn run_inner(conn: &mut PgConnection) -> Result<(), DbError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await
    .map_err(|e| DbError::Internal(e.to_string()))?;

    let current: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| DbError::Internal(e.to_string()))?;

    if current < 1 {
        sqlx::raw_sql(include_str!("sql/V1__initial.sql"))
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?;
        tracing::debug!("applied postgres migration v1");
    }

    Ok(())
}
