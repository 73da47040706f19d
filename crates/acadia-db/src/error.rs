//! Error types for the acadia-db crate.

use thiserror::Error;

/// Database operation errors.
///
/// Query failures surface as raw `sqlx::Error` from the model methods; only
/// migration application has its own wrapper.
#[derive(Debug, Error)]
pub enum DbError {
    /// A database migration failed to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),
}
