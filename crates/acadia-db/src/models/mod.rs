//! Database entity models.

pub mod activity_log;
pub mod user;
