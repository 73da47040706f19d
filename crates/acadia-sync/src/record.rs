//! Typed intermediate schema for the reconciled user entity.
//!
//! Rows coming back from the edge store are loosely-typed JSON; they are
//! validated and coerced into [`UserRecord`] immediately after fetch so that
//! nothing downstream ever handles untyped maps. The record deliberately
//! carries no store identifier: ids are store-native and never cross.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::coerce;
use acadia_db::{NewUser, User, UserChanges};

/// Errors produced while validating a row at the store boundary.
#[derive(Debug, Clone, Error)]
pub enum RecordError {
    /// A required field is missing or null.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field is present but cannot be coerced.
    #[error("Invalid value for {field}: {message}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// What went wrong.
        message: String,
    },
}

/// Source-side filter applied when fetching the record set for a pass.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Role string to match, or `None` for all roles.
    pub role: Option<String>,
    /// Academy (tenant) id to match, or `None` for all academies.
    pub academy_id: Option<String>,
}

/// A source row rejected by boundary validation.
#[derive(Debug, Clone)]
pub struct RejectedRecord {
    /// Email of the offending row when it could be extracted, `*` otherwise.
    pub email: String,
    /// Why the row was rejected.
    pub error: RecordError,
}

/// Outcome of a source-side fetch: validated records plus rejected rows.
///
/// Rejection is per row; one malformed row never hides the rest of the set.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Rows that validated into records, in the store's return order.
    pub records: Vec<UserRecord>,
    /// Rows rejected at the boundary, in the store's return order.
    pub rejected: Vec<RejectedRecord>,
}

impl RecordSet {
    /// A set in which every row validated.
    #[must_use]
    pub fn from_records(records: Vec<UserRecord>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }
}

/// The reconciled user entity in its cross-store canonical shape.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Natural key. Exact, case-sensitive match across stores.
    pub email: String,
    /// Opaque password hash, copied verbatim, never rehashed.
    pub password: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Role string, carried verbatim.
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

impl UserRecord {
    /// Validate and coerce a loosely-typed edge store row.
    pub fn from_edge_row(row: &Value) -> Result<Self, RecordError> {
        let email = row
            .get("email")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(RecordError::MissingField { field: "email" })?
            .to_string();

        let email_verified = coerce::parse_timestamp(field(row, "emailVerified")).map_err(
            |message| RecordError::InvalidField {
                field: "emailVerified",
                message,
            },
        )?;

        Ok(Self {
            email,
            password: row
                .get("password")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            name: coerce::opt_string(field(row, "name")),
            phone: coerce::opt_string(field(row, "phone")),
            role: row
                .get("role")
                .and_then(Value::as_str)
                .unwrap_or("STUDENT")
                .to_string(),
            grade: coerce::opt_string(field(row, "grade")),
            parent_phone: coerce::opt_string(field(row, "parentPhone")),
            student_code: coerce::opt_string(field(row, "studentCode")),
            student_id: coerce::opt_string(field(row, "studentId")),
            academy_id: coerce::opt_string(field(row, "academyId")),
            approved: coerce::int_to_bool(field(row, "approved")),
            ai_chat_enabled: coerce::int_to_bool(field(row, "aiChatEnabled")),
            ai_homework_enabled: coerce::int_to_bool(field(row, "aiHomeworkEnabled")),
            ai_study_enabled: coerce::int_to_bool(field(row, "aiStudyEnabled")),
            points: coerce::points_or_zero(field(row, "points")),
            email_verified,
        })
    }

    /// Full field set for creating the record on the primary side.
    #[must_use]
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            email: self.email.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            role: self.role.clone(),
            grade: self.grade.clone(),
            parent_phone: self.parent_phone.clone(),
            student_code: self.student_code.clone(),
            student_id: self.student_id.clone(),
            academy_id: self.academy_id.clone(),
            approved: self.approved,
            ai_chat_enabled: self.ai_chat_enabled,
            ai_homework_enabled: self.ai_homework_enabled,
            ai_study_enabled: self.ai_study_enabled,
            points: self.points,
            email_verified: self.email_verified,
        }
    }

    /// Mutable field set for overwriting an existing primary-side record.
    #[must_use]
    pub fn to_changes(&self) -> UserChanges {
        UserChanges {
            name: self.name.clone(),
            phone: self.phone.clone(),
            grade: self.grade.clone(),
            parent_phone: self.parent_phone.clone(),
            student_code: self.student_code.clone(),
            student_id: self.student_id.clone(),
            academy_id: self.academy_id.clone(),
            approved: self.approved,
            ai_chat_enabled: self.ai_chat_enabled,
            ai_homework_enabled: self.ai_homework_enabled,
            ai_study_enabled: self.ai_study_enabled,
            points: self.points,
        }
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            password: user.password,
            name: user.name,
            phone: user.phone,
            role: user.role,
            grade: user.grade,
            parent_phone: user.parent_phone,
            student_code: user.student_code,
            student_id: user.student_id,
            academy_id: user.academy_id,
            approved: user.approved,
            ai_chat_enabled: user.ai_chat_enabled,
            ai_homework_enabled: user.ai_homework_enabled,
            ai_study_enabled: user.ai_study_enabled,
            points: user.points,
            email_verified: user.email_verified,
        }
    }
}

/// Field accessor returning `Null` for absent keys, so coercions treat
/// "column missing" and "column null" identically.
fn field<'a>(row: &'a Value, key: &str) -> &'a Value {
    row.get(key).unwrap_or(&Value::Null)
}
