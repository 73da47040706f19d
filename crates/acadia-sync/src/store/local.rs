//! Primary-store adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use acadia_db::{ActivityLog, NewActivityLog, User};

use super::{
    AuditActor, AuditEntry, AuditLog, AuditRecord, RoleCounts, StoreResult, UserStore,
};
use crate::record::{RecordFilter, RecordSet, UserRecord};

/// [`UserStore`] over the transactional Postgres database.
///
/// The pool is shared across all records in a pass; pooling is the ORM
/// layer's concern, not the engine's.
#[derive(Debug, Clone)]
pub struct LocalUserStore {
    pool: PgPool,
}

impl LocalUserStore {
    /// Wrap a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for LocalUserStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn fetch_users(&self, filter: &RecordFilter) -> StoreResult<RecordSet> {
        let users = User::list_filtered(
            &self.pool,
            filter.role.as_deref(),
            filter.academy_id.as_deref(),
        )
        .await?;
        // Rows here are already typed; nothing to reject.
        Ok(RecordSet::from_records(
            users.into_iter().map(UserRecord::from).collect(),
        ))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let user = User::find_by_email(&self.pool, email).await?;
        Ok(user.map(UserRecord::from))
    }

    async fn create_user(&self, record: &UserRecord) -> StoreResult<()> {
        User::create(&self.pool, &record.to_new_user()).await?;
        Ok(())
    }

    async fn update_user(&self, record: &UserRecord) -> StoreResult<()> {
        User::update_by_email(&self.pool, &record.email, &record.to_changes()).await?;
        Ok(())
    }

    async fn count_by_role(&self) -> StoreResult<RoleCounts> {
        let rows = User::count_by_role(&self.pool).await?;
        Ok(RoleCounts::from_pairs(
            rows.into_iter().map(|row| (row.role, row.count)),
        ))
    }
}

#[async_trait]
impl AuditLog for LocalUserStore {
    async fn append(&self, entry: &AuditEntry) -> StoreResult<()> {
        ActivityLog::create(
            &self.pool,
            &NewActivityLog {
                user_id: entry.user_id,
                session_id: entry.session_id.clone(),
                action: entry.action.clone(),
                description: entry.description.clone(),
            },
        )
        .await?;
        Ok(())
    }

    async fn recent(&self, action: &str, limit: i64) -> StoreResult<Vec<AuditRecord>> {
        let rows = ActivityLog::recent_by_action(&self.pool, action, limit).await?;
        Ok(rows
            .into_iter()
            .map(|row| AuditRecord {
                id: row.id,
                action: row.action,
                description: row.description,
                created_at: row.created_at,
                user: row.actor_email.map(|email| AuditActor {
                    name: row.actor_name,
                    email,
                    role: row.actor_role.unwrap_or_default(),
                }),
            })
            .collect())
    }
}
