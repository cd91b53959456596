//! Schema bootstrap from the static definition in `database/schema.sql`.

use crate::error::{AppError, ConfigError};
use sqlx::PgPool;
use std::path::Path;

/// The shipped schema, embedded at build time.
pub const SCHEMA_SQL: &str = include_str!("../database/schema.sql");

/// Read a schema file and execute it as one multi-statement script.
pub async fn apply_schema_file(pool: &PgPool, path: impl AsRef<Path>) -> Result<(), AppError> {
    let path = path.as_ref();
    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Schema(path.display().to_string(), e.to_string()))?;
    execute_script(pool, &sql).await?;
    tracing::info!(file = %path.display(), "schema applied");
    Ok(())
}

/// Apply the embedded schema. Safe to run repeatedly.
pub async fn apply_schema(pool: &PgPool) -> Result<(), AppError> {
    execute_script(pool, SCHEMA_SQL).await
}

async fn execute_script(pool: &PgPool, sql: &str) -> Result<(), AppError> {
    sqlx::raw_sql(sql).execute(pool).await.map_err(AppError::Db)?;
    Ok(())
}
