//! Sync API: HTTP surface for the cross-store reconciliation engine.
//!
//! Routes:
//! - `POST /sync` — trigger a reconciliation run (super-admin only)
//! - `GET /sync` — health/status snapshot (authenticated)

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;

pub use error::ApiSyncError;
pub use middleware::{claims_from_headers, super_admin_guard};
pub use router::{sync_router, EdgeConfigState, SyncState};
