//! Sync status endpoint handler.
//!
//! GET /sync - Report edge reachability, per-store role counts, and recent runs.

use axum::{Extension, Json};
use std::sync::Arc;

use crate::error::ApiSyncError;
use crate::models::StatusResponse;
use crate::router::{EdgeConfigState, SyncState};
use acadia_core::ActorClaims;
use acadia_sync::StatusService;

/// Returns the sync status snapshot.
///
/// Any authenticated caller may read the status. An unreachable or
/// unconfigured edge store degrades `workerStatus` to `disconnected`; the
/// request itself still succeeds.
#[utoipa::path(
    get,
    path = "/sync",
    responses(
        (status = 200, description = "Status snapshot", body = StatusResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "Sync"
)]
pub async fn status_handler(
    claims: Option<Extension<ActorClaims>>,
    Extension(state): Extension<Arc<SyncState>>,
) -> Result<Json<StatusResponse>, ApiSyncError> {
    if claims.is_none() {
        return Err(ApiSyncError::Unauthorized);
    }

    let edge = match &state.edge {
        EdgeConfigState::Ready(handle) => Some(handle.clone()),
        EdgeConfigState::NotConfigured { .. } => None,
    };

    let service = StatusService::new(state.local.clone(), state.audit.clone(), edge);
    let snapshot = service.snapshot().await?;

    Ok(Json(StatusResponse::from(snapshot)))
}
