//! Record matcher: decides create vs. update against the destination.

use crate::store::{StoreResult, UserStore};

/// Outcome of matching one source record against the destination store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    /// No destination record with this email; the record will be created.
    Create,
    /// A destination record exists; it will be overwritten.
    Update,
}

/// Probes the destination store for a matching record.
///
/// Matching is by exact, case-sensitive email equality and is performed
/// independently for every source record; no existence cache is kept across
/// records.
pub struct RecordMatcher<'a> {
    destination: &'a dyn UserStore,
}

impl<'a> RecordMatcher<'a> {
    /// Create a matcher over the destination side of a pass.
    #[must_use]
    pub fn new(destination: &'a dyn UserStore) -> Self {
        Self { destination }
    }

    /// Decide whether the source record keyed by `email` maps to a create or
    /// an update on the destination.
    pub async fn decide(&self, email: &str) -> StoreResult<MatchDecision> {
        if self.destination.exists(email).await? {
            Ok(MatchDecision::Update)
        } else {
            Ok(MatchDecision::Create)
        }
    }
}
