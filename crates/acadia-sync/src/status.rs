//! Sync status and health query.
//!
//! Read-only snapshot, independent of the engine: edge reachability, role
//! counts on both sides, and the most recent run reports. An unreachable
//! edge store degrades the snapshot to `disconnected`; it never fails the
//! whole request.

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

use crate::report::SYNC_ACTION;
use crate::store::{AuditLog, AuditRecord, EdgeHandle, RoleCounts, StoreResult, UserStore};

/// Number of recent run reports included in a snapshot.
const RECENT_SYNCS: i64 = 10;

/// Edge store reachability as reported by the status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    /// Probe succeeded.
    Connected,
    /// Probe failed or the edge store is not configured.
    Disconnected,
}

/// The health/status snapshot returned to the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Edge store reachability.
    pub worker_status: WorkerStatus,
    /// Probe error message when disconnected.
    pub worker_error: String,
    /// Role counts from the primary store.
    pub local_stats: RoleCounts,
    /// Role counts from the edge store; absent while disconnected.
    pub d1_stats: Option<RoleCounts>,
    /// Most recent sync run audit entries, newest first.
    pub recent_syncs: Vec<AuditRecord>,
}

/// Builds status snapshots from the stores and the audit trail.
pub struct StatusService {
    local: Arc<dyn UserStore>,
    audit: Arc<dyn AuditLog>,
    edge: Option<EdgeHandle>,
}

impl StatusService {
    /// Create a status service. `edge` is `None` when the edge store is not
    /// configured, which reports as permanently disconnected.
    #[must_use]
    pub fn new(local: Arc<dyn UserStore>, audit: Arc<dyn AuditLog>, edge: Option<EdgeHandle>) -> Self {
        Self { local, audit, edge }
    }

    /// Gather the current snapshot.
    ///
    /// Primary-store statistics and recent runs are always attempted; only
    /// edge statistics are conditional on a successful probe.
    pub async fn snapshot(&self) -> StoreResult<StatusSnapshot> {
        let (worker_status, worker_error) = self.probe_edge().await;

        let local_stats = self.local.count_by_role().await?;

        let d1_stats = match (&self.edge, worker_status) {
            (Some(edge), WorkerStatus::Connected) => {
                match edge.store.count_by_role().await {
                    Ok(stats) => Some(stats),
                    Err(err) => {
                        warn!(error = %err, "Edge statistics query failed");
                        None
                    }
                }
            }
            _ => None,
        };

        let recent_syncs = self.audit.recent(SYNC_ACTION, RECENT_SYNCS).await?;

        Ok(StatusSnapshot {
            worker_status,
            worker_error,
            local_stats,
            d1_stats,
            recent_syncs,
        })
    }

    async fn probe_edge(&self) -> (WorkerStatus, String) {
        let Some(edge) = &self.edge else {
            return (
                WorkerStatus::Disconnected,
                "Edge store is not configured".to_string(),
            );
        };
        match edge.probe.probe().await {
            Ok(()) => (WorkerStatus::Connected, String::new()),
            Err(err) => {
                warn!(error = %err, "Edge store probe failed");
                (WorkerStatus::Disconnected, err.to_string())
            }
        }
    }
}
