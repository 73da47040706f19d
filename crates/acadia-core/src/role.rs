//! User role enumeration.
//!
//! Roles are stored as upper-case varchar in both the primary and the edge
//! store, so the string forms here are the canonical cross-store values.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "varchar", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Platform operator with cross-academy privileges.
    SuperAdmin,
    /// Academy owner.
    Director,
    /// Teaching staff.
    Teacher,
    /// Enrolled student.
    Student,
}

impl UserRole {
    /// Canonical string form as stored in both databases.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::Director => "DIRECTOR",
            UserRole::Teacher => "TEACHER",
            UserRole::Student => "STUDENT",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(UserRole::SuperAdmin),
            "DIRECTOR" => Ok(UserRole::Director),
            "TEACHER" => Ok(UserRole::Teacher),
            "STUDENT" => Ok(UserRole::Student),
            _ => Err(format!("Unknown user role: {s}")),
        }
    }
}
