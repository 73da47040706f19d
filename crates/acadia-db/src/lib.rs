//! Primary-store access for Acadia.
//!
//! Thin `sqlx` layer over the transactional Postgres database: the `users`
//! table (the entity shared with the edge store) and the `activity_logs`
//! audit trail. All access goes through an explicitly passed [`sqlx::PgPool`];
//! there is no client singleton.

pub mod error;
pub mod migrations;
pub mod models;

pub use error::DbError;
pub use migrations::run_migrations;
pub use models::activity_log::{ActivityLog, NewActivityLog, RecentActivity};
pub use models::user::{NewUser, RoleCount, User, UserChanges};
