//! Response models.

use serde::Serialize;
use utoipa::ToSchema;

use acadia_sync::{AuditRecord, RoleCounts, RunReport, StatusSnapshot, SyncRunResult, WorkerStatus};

/// Response body for `POST /sync`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    /// Always `true`; failures surface as error responses instead.
    pub success: bool,
    /// Human-readable completion message.
    pub message: String,
    /// Whether this run was a simulation.
    pub dry_run: bool,
    /// Direction the run executed.
    pub direction: String,
    /// Role filter applied to source fetches.
    pub role_filter: String,
    /// Academy filter applied to source fetches; null when unfiltered.
    pub academy_id: Option<String>,
    /// Per-direction counters and failure detail.
    pub result: SyncRunResult,
}

impl SyncResponse {
    /// Build the response from a finalized run report.
    #[must_use]
    pub fn from_report(report: RunReport, role_filter: String, academy_id: Option<String>) -> Self {
        let message = if report.dry_run {
            "Sync simulation completed (no changes applied)".to_string()
        } else {
            "Sync completed".to_string()
        };
        Self {
            success: true,
            message,
            dry_run: report.dry_run,
            direction: report.direction.as_str().to_string(),
            role_filter,
            academy_id,
            result: report.result,
        }
    }
}

/// Response body for `GET /sync`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Always `true`; failures surface as error responses instead.
    pub success: bool,
    /// Edge store reachability.
    pub worker_status: WorkerStatus,
    /// Probe error message when disconnected.
    pub worker_error: String,
    /// Role counts from the primary store.
    pub local_stats: RoleCounts,
    /// Role counts from the edge store; null while disconnected.
    pub d1_stats: Option<RoleCounts>,
    /// Most recent sync runs, newest first.
    pub recent_syncs: Vec<AuditRecord>,
}

impl From<StatusSnapshot> for StatusResponse {
    fn from(snapshot: StatusSnapshot) -> Self {
        Self {
            success: true,
            worker_status: snapshot.worker_status,
            worker_error: snapshot.worker_error,
            local_stats: snapshot.local_stats,
            d1_stats: snapshot.d1_stats,
            recent_syncs: snapshot.recent_syncs,
        }
    }
}
