//! Pass results, run reports, and the run reporter.
//!
//! The engine owns pass results while a run is in flight; the reporter takes
//! over once the run completes, turning the counters into a human-readable
//! summary, persisting the audit row, and handing the structured report back
//! to the caller.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::directive::{SyncDirection, SyncDirective};
use crate::store::{AuditEntry, AuditLog};

/// Activity-log action under which sync runs are recorded.
pub const SYNC_ACTION: &str = "D1_USER_SYNC";

/// One failed record within a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SyncFailure {
    /// Natural key of the failed record (`*` for pass-level fetch failures).
    pub email: String,
    /// Error message.
    pub error: String,
}

/// Counters and failure detail for one directional pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PassResult {
    /// Records created on the destination.
    pub created: u32,
    /// Records overwritten on the destination.
    pub updated: u32,
    /// Records that failed to apply.
    pub failed: u32,
    /// Per-record failure detail, in source order.
    pub errors: Vec<SyncFailure>,
}

impl PassResult {
    /// Record one per-record failure; the pass keeps going.
    pub fn record_failure(&mut self, email: &str, error: &str) {
        self.failed += 1;
        self.errors.push(SyncFailure {
            email: email.to_string(),
            error: error.to_string(),
        });
    }

    /// Record a fatal source-fetch failure as one synthetic entry.
    pub fn record_fetch_failure(&mut self, error: &str) {
        self.record_failure("*", error);
    }

    /// Number of records applied (created or updated).
    #[must_use]
    pub fn applied(&self) -> u32 {
        self.created + self.updated
    }
}

/// Combined result of a run: one pass result per direction.
///
/// A direction that was not scheduled keeps its zeroed default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncRunResult {
    /// Edge-to-primary pass.
    pub from_d1_to_local: PassResult,
    /// Primary-to-edge pass.
    pub from_local_to_d1: PassResult,
}

/// The finalized, immutable report of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Human-readable per-direction summary (also the audit row text).
    pub description: String,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Direction the run executed.
    pub direction: SyncDirection,
    /// The per-direction counters and failures.
    pub result: SyncRunResult,
    /// Whether the audit row was persisted.
    pub persisted: bool,
}

/// Aggregates pass results into the persisted run report.
pub struct RunReporter {
    audit: Arc<dyn AuditLog>,
}

impl RunReporter {
    /// Create a reporter over the audit trail.
    #[must_use]
    pub fn new(audit: Arc<dyn AuditLog>) -> Self {
        Self { audit }
    }

    /// Finalize a run: describe it, persist the audit row (unless dry-run),
    /// and return the immutable report.
    ///
    /// Audit persistence failure is logged and swallowed; it never masks the
    /// sync result already computed.
    pub async fn finalize(
        &self,
        result: SyncRunResult,
        directive: &SyncDirective,
        actor: Option<Uuid>,
    ) -> RunReport {
        let description = describe(&result, directive.direction);
        let mut persisted = false;

        if directive.dry_run {
            tracing::info!(direction = %directive.direction, "Dry run; skipping audit row");
        } else {
            let entry = AuditEntry {
                user_id: actor,
                session_id: format!("d1-sync-{}", Utc::now().timestamp_millis()),
                action: SYNC_ACTION.to_string(),
                description: description.clone(),
            };
            match self.audit.append(&entry).await {
                Ok(()) => persisted = true,
                Err(err) => {
                    warn!(error = %err, "Failed to persist sync audit row");
                }
            }
        }

        RunReport {
            description,
            dry_run: directive.dry_run,
            direction: directive.direction,
            result,
            persisted,
        }
    }
}

/// Build the one-line per-direction summary.
fn describe(result: &SyncRunResult, direction: SyncDirection) -> String {
    format!(
        "D1 user sync completed ({direction}) - D1->Local: created {}, updated {}, failed {} | Local->D1: created {}, updated {}, failed {}",
        result.from_d1_to_local.created,
        result.from_d1_to_local.updated,
        result.from_d1_to_local.failed,
        result.from_local_to_d1.created,
        result.from_local_to_d1.updated,
        result.from_local_to_d1.failed,
    )
}
