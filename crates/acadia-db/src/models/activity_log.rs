//! Activity log entity model.
//!
//! The audit trail for administrative operations. Each reconciliation run
//! persists exactly one row summarizing what it did.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A persisted activity log row.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLog {
    /// Row identifier.
    pub id: Uuid,
    /// User who performed the action, when known.
    pub user_id: Option<Uuid>,
    /// Opaque session/run identifier.
    pub session_id: String,
    /// Action discriminator (e.g. `D1_USER_SYNC`).
    pub action: String,
    /// Human-readable description of what happened.
    pub description: String,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

/// Field set for appending a new activity log row.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub user_id: Option<Uuid>,
    pub session_id: String,
    pub action: String,
    pub description: String,
}

/// An activity log row with its actor resolved, for status listings.
#[derive(Debug, Clone, FromRow)]
pub struct RecentActivity {
    /// Row identifier.
    pub id: Uuid,
    /// Action discriminator.
    pub action: String,
    /// Human-readable description.
    pub description: String,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
    /// Actor display name, when the actor still exists.
    pub actor_name: Option<String>,
    /// Actor email, when the actor still exists.
    pub actor_email: Option<String>,
    /// Actor role, when the actor still exists.
    pub actor_role: Option<String>,
}

impl ActivityLog {
    /// Append a new activity log row.
    pub async fn create(pool: &PgPool, entry: &NewActivityLog) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"INSERT INTO activity_logs (user_id, session_id, action, description)
            VALUES ($1, $2, $3, $4)",
        )
        .bind(entry.user_id)
        .bind(&entry.session_id)
        .bind(&entry.action)
        .bind(&entry.description)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Most recent rows for an action, newest first, with the actor joined.
    pub async fn recent_by_action(
        pool: &PgPool,
        action: &str,
        limit: i64,
    ) -> Result<Vec<RecentActivity>, sqlx::Error> {
        sqlx::query_as(
            r"SELECT l.id, l.action, l.description, l.created_at,
                u.name AS actor_name, u.email AS actor_email, u.role AS actor_role
            FROM activity_logs l
            LEFT JOIN users u ON u.id = l.user_id
            WHERE l.action = $1
            ORDER BY l.created_at DESC
            LIMIT $2",
        )
        .bind(action)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
