//! Cross-store user reconciliation engine.
//!
//! Keeps the primary Postgres store and the D1 edge store consistent for the
//! shared `User` entity. There is no shared transaction boundary and no
//! change feed between the two stores; instead, a manually triggered run
//! executes one or two directional passes, matching records by email and
//! applying last-write-wins create/update decisions with per-record failure
//! isolation.
//!
//! The engine never deletes: absence on one side is resolved by creation on
//! that side, and store-native identifiers never cross the boundary.

pub mod coerce;
pub mod directive;
pub mod engine;
pub mod matcher;
pub mod record;
pub mod report;
pub mod status;
pub mod store;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use directive::{
    DirectiveError, RawSyncRequest, RoleFilter, SyncDirection, SyncDirective, SyncPass,
};
pub use engine::SyncEngine;
pub use matcher::{MatchDecision, RecordMatcher};
pub use record::{RecordError, RecordFilter, RecordSet, RejectedRecord, UserRecord};
pub use report::{PassResult, RunReport, RunReporter, SyncFailure, SyncRunResult, SYNC_ACTION};
pub use status::{StatusService, StatusSnapshot, WorkerStatus};
pub use store::{
    AuditActor, AuditEntry, AuditLog, AuditRecord, D1UserStore, EdgeHandle, HealthProbe,
    LocalUserStore, RoleCounts, StoreError, StoreResult, UserStore,
};
