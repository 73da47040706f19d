//! Request middleware: identity extraction and role guards.

pub mod actor;
pub mod guard;

pub use actor::claims_from_headers;
pub use guard::super_admin_guard;
