//! User entity model.
//!
//! The user row is the entity reconciled against the edge store. `email` is
//! the natural key: unique here, unique on the edge side, and the only value
//! ever used to match records across stores.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

/// A user account in the primary store.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Primary-store identifier. Never propagated to the edge store.
    pub id: Uuid,

    /// Email address (globally unique).
    pub email: String,

    /// Password hash, treated as an opaque string.
    pub password: String,

    /// Display name.
    pub name: Option<String>,

    /// Contact phone.
    pub phone: Option<String>,

    /// Role string (`STUDENT`, `DIRECTOR`, `TEACHER`, `SUPER_ADMIN`).
    pub role: String,

    /// School grade.
    pub grade: Option<String>,

    /// Guardian contact phone.
    pub parent_phone: Option<String>,

    /// Academy-issued student code.
    pub student_code: Option<String>,

    /// External student identifier.
    pub student_id: Option<String>,

    /// Owning academy (tenant) id.
    pub academy_id: Option<String>,

    /// Whether the account has been approved by the academy.
    pub approved: bool,

    /// AI chat feature flag.
    pub ai_chat_enabled: bool,

    /// AI homework feature flag.
    pub ai_homework_enabled: bool,

    /// AI study feature flag.
    pub ai_study_enabled: bool,

    /// Reward point balance.
    pub points: i32,

    /// When the email was verified (None if not yet verified).
    pub email_verified: Option<DateTime<Utc>>,

    /// When the row was created.
    pub created_at: DateTime<Utc>,

    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Field set for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub grade: Option<String>,
    pub parent_phone: Option<String>,
    pub student_code: Option<String>,
    pub student_id: Option<String>,
    pub academy_id: Option<String>,
    pub approved: bool,
    pub ai_chat_enabled: bool,
    pub ai_homework_enabled: bool,
    pub ai_study_enabled: bool,
    pub points: i32,
    pub email_verified: Option<DateTime<Utc>>,
}

/// Mutable field set applied when overwriting an existing user.
///
/// `email`, `password`, `role` and `email_verified` are written on create
/// but never overwritten on update.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub grade: Option<String>,
    pub parent_phone: Option<String>,
    pub student_code: Option<String>,
    pub student_id: Option<String>,
    pub academy_id: Option<String>,
    pub approved: bool,
    pub ai_chat_enabled: bool,
    pub ai_homework_enabled: bool,
    pub ai_study_enabled: bool,
    pub points: i32,
}

/// Per-role user count row.
#[derive(Debug, Clone, FromRow)]
pub struct RoleCount {
    /// Role string.
    pub role: String,
    /// Number of users holding the role.
    pub count: i64,
}

impl User {
    /// Find a user by exact email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users matching the optional role and academy filters.
    pub async fn list_filtered(
        pool: &PgPool,
        role: Option<&str>,
        academy_id: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = QueryBuilder::new("SELECT * FROM users WHERE 1=1");
        if let Some(role) = role {
            query.push(" AND role = ").push_bind(role);
        }
        if let Some(academy_id) = academy_id {
            query.push(" AND academy_id = ").push_bind(academy_id);
        }
        query.push(" ORDER BY created_at");
        query.build_query_as().fetch_all(pool).await
    }

    /// Insert a new user, letting the database assign the id.
    pub async fn create(pool: &PgPool, user: &NewUser) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"INSERT INTO users (
                email, password, name, phone, role, grade, parent_phone,
                student_code, student_id, academy_id, approved, ai_chat_enabled,
                ai_homework_enabled, ai_study_enabled, points, email_verified
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.role)
        .bind(&user.grade)
        .bind(&user.parent_phone)
        .bind(&user.student_code)
        .bind(&user.student_id)
        .bind(&user.academy_id)
        .bind(user.approved)
        .bind(user.ai_chat_enabled)
        .bind(user.ai_homework_enabled)
        .bind(user.ai_study_enabled)
        .bind(user.points)
        .bind(user.email_verified)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Overwrite the mutable field set of the user identified by `email`.
    pub async fn update_by_email(
        pool: &PgPool,
        email: &str,
        changes: &UserChanges,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"UPDATE users SET
                name = $1, phone = $2, grade = $3, parent_phone = $4,
                student_code = $5, student_id = $6, academy_id = $7,
                approved = $8, ai_chat_enabled = $9, ai_homework_enabled = $10,
                ai_study_enabled = $11, points = $12, updated_at = NOW()
            WHERE email = $13",
        )
        .bind(&changes.name)
        .bind(&changes.phone)
        .bind(&changes.grade)
        .bind(&changes.parent_phone)
        .bind(&changes.student_code)
        .bind(&changes.student_id)
        .bind(&changes.academy_id)
        .bind(changes.approved)
        .bind(changes.ai_chat_enabled)
        .bind(changes.ai_homework_enabled)
        .bind(changes.ai_study_enabled)
        .bind(changes.points)
        .bind(email)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Count users grouped by role.
    pub async fn count_by_role(pool: &PgPool) -> Result<Vec<RoleCount>, sqlx::Error> {
        sqlx::query_as("SELECT role, COUNT(*) AS count FROM users GROUP BY role")
            .fetch_all(pool)
            .await
    }
}
