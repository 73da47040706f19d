//! Sync API router configuration.
//!
//! Routes:
//! - `POST /sync` - Trigger a reconciliation run (super-admin only)
//! - `GET /sync` - Status snapshot (any authenticated caller)

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{status_handler, trigger_handler};
use crate::middleware::super_admin_guard;
use acadia_sync::{AuditLog, EdgeHandle, UserStore};

/// Edge store availability, decided once at startup from the environment.
#[derive(Clone)]
pub enum EdgeConfigState {
    /// Credentials present; the edge store is usable.
    Ready(EdgeHandle),
    /// Credentials missing; the trigger endpoint answers 503 and the status
    /// endpoint reports `disconnected`.
    NotConfigured {
        /// Environment variables that must be set.
        missing: Vec<String>,
    },
}

/// Application state for the sync routes.
#[derive(Clone)]
pub struct SyncState {
    /// Primary store.
    pub local: Arc<dyn UserStore>,
    /// Audit trail, backed by the primary store.
    pub audit: Arc<dyn AuditLog>,
    /// Edge store, when configured.
    pub edge: EdgeConfigState,
}

/// Create the sync router.
///
/// The trigger route carries the super-admin guard; the status route only
/// needs authenticated claims, which the handler checks itself.
pub fn sync_router(state: SyncState) -> Router {
    let trigger = Router::new()
        .route("/sync", post(trigger_handler))
        .route_layer(middleware::from_fn(super_admin_guard));

    Router::new()
        .route("/sync", get(status_handler))
        .merge(trigger)
        .layer(axum::Extension(Arc::new(state)))
}
