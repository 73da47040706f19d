//! Store seam: the traits the engine runs against.
//!
//! Both sides of a pass are [`UserStore`] implementations; the engine never
//! knows which concrete store it is reading from or writing to. Store clients
//! are constructed explicitly and passed in (no client singletons), which is
//! also what makes the engine testable against in-memory fakes.

pub mod d1;
pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::record::{RecordError, RecordFilter, RecordSet, UserRecord};

pub use d1::D1UserStore;
pub use local::LocalUserStore;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Primary store (Postgres) error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Edge store (D1 proxy) error.
    #[error("Edge store error: {0}")]
    Edge(#[from] acadia_edge::EdgeError),

    /// Boundary validation of a fetched row failed.
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Anything else (used by test fakes and adapters).
    #[error("{message}")]
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl StoreError {
    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Aggregate user counts per role, as reported by the status query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleCounts {
    /// Total user count across all roles.
    pub total_users: i64,
    /// Users with the STUDENT role.
    pub students: i64,
    /// Users with the DIRECTOR role.
    pub directors: i64,
    /// Users with the TEACHER role.
    pub teachers: i64,
}

impl RoleCounts {
    /// Build from `(role, count)` pairs; roles outside the three reported
    /// buckets still contribute to the total.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, i64)>,
    {
        let mut counts = Self::default();
        for (role, count) in pairs {
            counts.total_users += count;
            match role.as_str() {
                "STUDENT" => counts.students += count,
                "DIRECTOR" => counts.directors += count,
                "TEACHER" => counts.teachers += count,
                _ => {}
            }
        }
        counts
    }
}

/// A user store: one side of a reconciliation pass.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Short store label used in logs and failure messages.
    fn name(&self) -> &'static str;

    /// Fetch all rows matching the source-side filter, validating each into
    /// a record. Rows that fail validation come back rejected instead of
    /// failing the fetch; only the fetch itself can error.
    async fn fetch_users(&self, filter: &RecordFilter) -> StoreResult<RecordSet>;

    /// Look up one record by exact email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Existence probe by exact email. Stores that can answer this more
    /// cheaply than a full row fetch should override it.
    async fn exists(&self, email: &str) -> StoreResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Create the record, assigning a store-native identifier.
    async fn create_user(&self, record: &UserRecord) -> StoreResult<()>;

    /// Overwrite the mutable fields of the record matching `record.email`.
    async fn update_user(&self, record: &UserRecord) -> StoreResult<()>;

    /// Aggregate user counts grouped by role.
    async fn count_by_role(&self) -> StoreResult<RoleCounts>;
}

/// A new audit trail entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Actor user id, when known.
    pub user_id: Option<Uuid>,
    /// Opaque run identifier.
    pub session_id: String,
    /// Action discriminator.
    pub action: String,
    /// Human-readable summary.
    pub description: String,
}

/// Actor details joined onto a persisted audit entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditActor {
    /// Actor display name.
    pub name: Option<String>,
    /// Actor email.
    pub email: String,
    /// Actor role string.
    pub role: String,
}

/// A persisted audit entry, as returned by status listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Entry id.
    pub id: Uuid,
    /// Action discriminator.
    pub action: String,
    /// Human-readable summary.
    pub description: String,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
    /// The actor, when still resolvable.
    pub user: Option<AuditActor>,
}

/// Audit trail sink and query, backed by the primary store.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: &AuditEntry) -> StoreResult<()>;

    /// Most recent entries for an action, newest first.
    async fn recent(&self, action: &str, limit: i64) -> StoreResult<Vec<AuditRecord>>;
}

/// Reachability probe for a store behind a network boundary.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Cheap reachability check.
    async fn probe(&self) -> StoreResult<()>;
}

/// A ready-to-use edge store: the record interface plus its health probe.
#[derive(Clone)]
pub struct EdgeHandle {
    /// Record-level access.
    pub store: Arc<dyn UserStore>,
    /// Reachability probe.
    pub probe: Arc<dyn HealthProbe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_counts_bucket_known_roles_and_total_everything() {
        let counts = RoleCounts::from_pairs(vec![
            ("STUDENT".to_string(), 10),
            ("DIRECTOR".to_string(), 2),
            ("TEACHER".to_string(), 3),
            ("SUPER_ADMIN".to_string(), 1),
        ]);
        assert_eq!(counts.total_users, 16);
        assert_eq!(counts.students, 10);
        assert_eq!(counts.directors, 2);
        assert_eq!(counts.teachers, 3);
    }
}
