//! Edge-store adapter.
//!
//! Speaks the edge store's SQLite dialect through the stateless query proxy:
//! booleans cross as 0/1 integers, timestamps as text, and every returned row
//! is validated into a [`UserRecord`] at this boundary.

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use acadia_edge::D1Client;

use super::{HealthProbe, RoleCounts, StoreResult, UserStore};
use crate::coerce;
use crate::record::{RecordFilter, RecordSet, RejectedRecord, UserRecord};

/// [`UserStore`] over the D1 edge database.
#[derive(Debug, Clone)]
pub struct D1UserStore {
    client: D1Client,
}

impl D1UserStore {
    /// Wrap a D1 client.
    #[must_use]
    pub fn new(client: D1Client) -> Self {
        Self { client }
    }

    /// Generate a new edge-native identifier.
    ///
    /// The source record's id is never propagated across stores.
    fn new_edge_id() -> String {
        format!("user_{}", Uuid::new_v4().simple())
    }
}

#[async_trait]
impl UserStore for D1UserStore {
    fn name(&self) -> &'static str {
        "d1"
    }

    async fn fetch_users(&self, filter: &RecordFilter) -> StoreResult<RecordSet> {
        let mut sql = String::from("SELECT * FROM User WHERE 1=1");
        let mut params: Vec<Value> = Vec::new();
        if let Some(role) = &filter.role {
            sql.push_str(" AND role = ?");
            params.push(json!(role));
        }
        if let Some(academy_id) = &filter.academy_id {
            sql.push_str(" AND academyId = ?");
            params.push(json!(academy_id));
        }
        sql.push_str(" ORDER BY createdAt");

        let rows = self.client.query_all(&sql, &params).await?;
        let mut batch = RecordSet::default();
        for row in &rows {
            match UserRecord::from_edge_row(row) {
                Ok(record) => batch.records.push(record),
                // A malformed row fails on its own; the rest of the set
                // still syncs.
                Err(error) => batch.rejected.push(RejectedRecord {
                    email: row
                        .get("email")
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .unwrap_or("*")
                        .to_string(),
                    error,
                }),
            }
        }
        Ok(batch)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let row = self
            .client
            .query_first("SELECT * FROM User WHERE email = ?", &[json!(email)])
            .await?;
        row.as_ref()
            .map(UserRecord::from_edge_row)
            .transpose()
            .map_err(Into::into)
    }

    async fn exists(&self, email: &str) -> StoreResult<bool> {
        let row = self
            .client
            .query_first("SELECT id FROM User WHERE email = ?", &[json!(email)])
            .await?;
        Ok(row.is_some())
    }

    async fn create_user(&self, record: &UserRecord) -> StoreResult<()> {
        self.client
            .write(
                r"INSERT INTO User (
                    id, email, password, name, role, phone, grade, parentPhone,
                    studentCode, studentId, academyId, approved, aiChatEnabled,
                    aiHomeworkEnabled, aiStudyEnabled, points, emailVerified,
                    createdAt, updatedAt
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))",
                &[
                    json!(Self::new_edge_id()),
                    json!(record.email),
                    json!(record.password),
                    json!(record.name),
                    json!(record.role),
                    json!(record.phone),
                    json!(record.grade),
                    json!(record.parent_phone),
                    json!(record.student_code),
                    json!(record.student_id),
                    json!(record.academy_id),
                    json!(coerce::bool_to_int(record.approved)),
                    json!(coerce::bool_to_int(record.ai_chat_enabled)),
                    json!(coerce::bool_to_int(record.ai_homework_enabled)),
                    json!(coerce::bool_to_int(record.ai_study_enabled)),
                    json!(record.points),
                    json!(coerce::format_timestamp(record.email_verified)),
                ],
            )
            .await?;
        Ok(())
    }

    async fn update_user(&self, record: &UserRecord) -> StoreResult<()> {
        self.client
            .write(
                r"UPDATE User SET
                    name = ?, phone = ?, grade = ?, parentPhone = ?,
                    studentCode = ?, studentId = ?, academyId = ?, approved = ?,
                    aiChatEnabled = ?, aiHomeworkEnabled = ?, aiStudyEnabled = ?,
                    points = ?, updatedAt = datetime('now')
                WHERE email = ?",
                &[
                    json!(record.name),
                    json!(record.phone),
                    json!(record.grade),
                    json!(record.parent_phone),
                    json!(record.student_code),
                    json!(record.student_id),
                    json!(record.academy_id),
                    json!(coerce::bool_to_int(record.approved)),
                    json!(coerce::bool_to_int(record.ai_chat_enabled)),
                    json!(coerce::bool_to_int(record.ai_homework_enabled)),
                    json!(coerce::bool_to_int(record.ai_study_enabled)),
                    json!(record.points),
                    json!(record.email),
                ],
            )
            .await?;
        Ok(())
    }

    async fn count_by_role(&self) -> StoreResult<RoleCounts> {
        let rows = self
            .client
            .query_all("SELECT role, COUNT(*) AS count FROM User GROUP BY role", &[])
            .await?;
        Ok(RoleCounts::from_pairs(rows.iter().map(|row| {
            (
                row.get("role")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                row.get("count").and_then(Value::as_i64).unwrap_or(0),
            )
        })))
    }
}

#[async_trait]
impl HealthProbe for D1UserStore {
    async fn probe(&self) -> StoreResult<()> {
        self.client.probe().await?;
        Ok(())
    }
}
