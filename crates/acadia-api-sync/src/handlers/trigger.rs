//! Sync trigger endpoint handler.
//!
//! POST /sync - Run a reconciliation pass between the primary and edge stores.

use axum::{extract::Query, Extension, Json};
use std::sync::Arc;

use crate::error::ApiSyncError;
use crate::models::{SyncBody, SyncQuery, SyncResponse};
use crate::router::{EdgeConfigState, SyncState};
use acadia_core::ActorClaims;
use acadia_sync::{RawSyncRequest, RunReporter, SyncDirective, SyncEngine};

/// Runs a sync between the primary store and the edge store.
///
/// Direction, role filter and academy filter come from the query string; the
/// optional JSON body carries the `dryRun` flag. A dry run walks both stores
/// and counts the decisions it would apply without writing anything.
///
/// Per-record failures are counted and itemized in the response; only a
/// source fetch failure aborts a pass, and only that pass.
#[utoipa::path(
    post,
    path = "/sync",
    params(SyncQuery),
    request_body(content = SyncBody, description = "Optional run flags", content_type = "application/json"),
    responses(
        (status = 200, description = "Sync run completed", body = SyncResponse),
        (status = 400, description = "Invalid direction"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a super admin"),
        (status = 503, description = "Edge store not configured"),
    ),
    tag = "Sync"
)]
pub async fn trigger_handler(
    Extension(claims): Extension<ActorClaims>,
    Extension(state): Extension<Arc<SyncState>>,
    Query(query): Query<SyncQuery>,
    body: Option<Json<SyncBody>>,
) -> Result<Json<SyncResponse>, ApiSyncError> {
    let body = body.map(|Json(body)| body).unwrap_or_default();

    let directive = SyncDirective::build(RawSyncRequest {
        direction: query.direction,
        role: query.role,
        academy_id: query.academy_id,
        dry_run: Some(body.dry_run),
    })?;

    let edge = match &state.edge {
        EdgeConfigState::Ready(handle) => handle.clone(),
        EdgeConfigState::NotConfigured { missing } => {
            return Err(ApiSyncError::EdgeNotConfigured {
                missing: missing.clone(),
            });
        }
    };

    tracing::info!(
        direction = %directive.direction,
        role = directive.role_filter.as_str(),
        academy_id = ?directive.academy_id,
        dry_run = directive.dry_run,
        "Starting sync run"
    );

    let engine = SyncEngine::new(state.local.clone(), edge.store);
    let result = engine.run(&directive).await;

    let reporter = RunReporter::new(state.audit.clone());
    let report = reporter.finalize(result, &directive, claims.user_id).await;

    let role_filter = directive.role_filter.as_str().to_string();
    let academy_id = directive.academy_id.clone();
    Ok(Json(SyncResponse::from_report(report, role_filter, academy_id)))
}
