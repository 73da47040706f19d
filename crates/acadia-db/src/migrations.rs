//! Embedded SQL migrations.

use crate::error::DbError;
use sqlx::migrate::Migrator;
use sqlx::PgPool;

/// Compile-time embedded migrations from `./migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply all pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    MIGRATOR.run(pool).await.map_err(DbError::MigrationFailed)?;
    tracing::info!("Database migrations applied");
    Ok(())
}
