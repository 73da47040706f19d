//! The reconciliation engine.
//!
//! Executes one or two directional passes over the shared `User` entity.
//! Each pass: fetch the filtered source set, match every record against the
//! destination by email, and apply create/update with per-record failure
//! isolation. A record present on both sides is always treated as an update;
//! the destination's mapped fields are overwritten wholesale from the source
//! (last-write-wins per record, no timestamp comparison).

use std::sync::Arc;
use tracing::{info, warn};

use crate::directive::{SyncDirective, SyncPass};
use crate::matcher::{MatchDecision, RecordMatcher};
use crate::record::UserRecord;
use crate::report::{PassResult, SyncRunResult};
use crate::store::{StoreError, UserStore};

/// Bidirectional reconciliation engine over two injected stores.
pub struct SyncEngine {
    local: Arc<dyn UserStore>,
    d1: Arc<dyn UserStore>,
}

impl SyncEngine {
    /// Create an engine over the primary and edge stores.
    #[must_use]
    pub fn new(local: Arc<dyn UserStore>, d1: Arc<dyn UserStore>) -> Self {
        Self { local, d1 }
    }

    /// Execute the directive and return the per-direction results.
    ///
    /// Passes run strictly sequentially in directive order; a fatal fetch
    /// failure aborts only its own pass, never the run.
    pub async fn run(&self, directive: &SyncDirective) -> SyncRunResult {
        let mut result = SyncRunResult::default();
        for pass in directive.passes() {
            let (source, destination): (&dyn UserStore, &dyn UserStore) = match pass {
                SyncPass::FromD1 => (&*self.d1, &*self.local),
                SyncPass::ToD1 => (&*self.local, &*self.d1),
            };
            let pass_result = self.run_pass(source, destination, directive).await;
            match pass {
                SyncPass::FromD1 => result.from_d1_to_local = pass_result,
                SyncPass::ToD1 => result.from_local_to_d1 = pass_result,
            }
        }
        result
    }

    /// Execute one directional pass.
    async fn run_pass(
        &self,
        source: &dyn UserStore,
        destination: &dyn UserStore,
        directive: &SyncDirective,
    ) -> PassResult {
        let mut outcome = PassResult::default();

        let filter = directive.record_filter();
        let batch = match source.fetch_users(&filter).await {
            Ok(batch) => batch,
            Err(err) => {
                warn!(
                    source = source.name(),
                    error = %err,
                    "Source fetch failed; aborting pass"
                );
                outcome.record_fetch_failure(&err.to_string());
                return outcome;
            }
        };

        // Rows the source rejected at the boundary fail individually, like
        // any other per-record error.
        for rejected in &batch.rejected {
            warn!(
                source = source.name(),
                email = rejected.email,
                error = %rejected.error,
                "Source row rejected; continuing pass"
            );
            outcome.record_failure(&rejected.email, &rejected.error.to_string());
        }

        info!(
            source = source.name(),
            destination = destination.name(),
            count = batch.records.len(),
            rejected = batch.rejected.len(),
            dry_run = directive.dry_run,
            "Starting sync pass"
        );

        let matcher = RecordMatcher::new(destination);
        for record in &batch.records {
            match self
                .apply_record(&matcher, destination, record, directive.dry_run)
                .await
            {
                Ok(MatchDecision::Create) => outcome.created += 1,
                Ok(MatchDecision::Update) => outcome.updated += 1,
                Err(err) => {
                    warn!(
                        destination = destination.name(),
                        email = record.email,
                        error = %err,
                        "Record failed to apply; continuing pass"
                    );
                    outcome.record_failure(&record.email, &err.to_string());
                }
            }
        }

        info!(
            source = source.name(),
            destination = destination.name(),
            created = outcome.created,
            updated = outcome.updated,
            failed = outcome.failed,
            "Sync pass finished"
        );
        outcome
    }

    /// Match one record and apply the decided write.
    ///
    /// Under dry-run the write is skipped but the decision still counts, so
    /// a dry run reports exactly what a real run would.
    async fn apply_record(
        &self,
        matcher: &RecordMatcher<'_>,
        destination: &dyn UserStore,
        record: &UserRecord,
        dry_run: bool,
    ) -> Result<MatchDecision, StoreError> {
        let decision = matcher.decide(&record.email).await?;
        if !dry_run {
            match decision {
                MatchDecision::Create => destination.create_user(record).await?,
                MatchDecision::Update => destination.update_user(record).await?,
            }
        }
        Ok(decision)
    }
}
