//! Sync directive: the validated, immutable description of one run.
//!
//! Built once per request from the raw query/body values, consumed by the
//! engine, never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

use crate::record::RecordFilter;

/// Role filter value that means "no filter".
pub const ROLE_FILTER_ALL: &str = "ALL";

/// Errors from directive validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectiveError {
    /// The direction value is not one of the three enumerated forms.
    #[error("Invalid sync direction: {0} (expected from-d1, to-d1 or bidirectional)")]
    InvalidDirection(String),
}

/// Direction of a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    /// Edge store to primary store only.
    FromD1,
    /// Primary store to edge store only.
    ToD1,
    /// Both directions, edge-to-primary first.
    #[default]
    Bidirectional,
}

impl SyncDirection {
    /// Wire string form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::FromD1 => "from-d1",
            SyncDirection::ToD1 => "to-d1",
            SyncDirection::Bidirectional => "bidirectional",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SyncDirection {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "from-d1" => Ok(SyncDirection::FromD1),
            "to-d1" => Ok(SyncDirection::ToD1),
            "bidirectional" => Ok(SyncDirection::Bidirectional),
            other => Err(DirectiveError::InvalidDirection(other.to_string())),
        }
    }
}

/// One directional pass of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPass {
    /// Edge store is the source, primary store is the destination.
    FromD1,
    /// Primary store is the source, edge store is the destination.
    ToD1,
}

/// Role filter applied to source-side fetches.
///
/// Any value other than `ALL` is passed through verbatim to the source query;
/// the filter is never applied on the destination side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RoleFilter {
    /// No filtering.
    #[default]
    All,
    /// Only records whose role equals this string.
    Role(String),
}

impl RoleFilter {
    /// Parse the raw filter value; `ALL` (or absent) means no filter.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => RoleFilter::All,
            Some(value) if value == ROLE_FILTER_ALL => RoleFilter::All,
            Some(value) => RoleFilter::Role(value.to_string()),
        }
    }

    /// Wire string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            RoleFilter::All => ROLE_FILTER_ALL,
            RoleFilter::Role(role) => role,
        }
    }
}

/// Raw, unvalidated sync request values as they arrive on the wire.
#[derive(Debug, Clone, Default)]
pub struct RawSyncRequest {
    /// `direction` query parameter.
    pub direction: Option<String>,
    /// `role` query parameter.
    pub role: Option<String>,
    /// `academyId` query parameter.
    pub academy_id: Option<String>,
    /// `dryRun` body flag.
    pub dry_run: Option<bool>,
}

/// Validated, immutable description of what a sync run should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncDirective {
    /// Which passes to run.
    pub direction: SyncDirection,
    /// Source-side role filter.
    pub role_filter: RoleFilter,
    /// Source-side academy (tenant) filter.
    pub academy_id: Option<String>,
    /// When true, writes are replaced by counted no-ops on every pass.
    pub dry_run: bool,
}

impl SyncDirective {
    /// Validate a raw request into a directive. Pure value construction.
    pub fn build(raw: RawSyncRequest) -> Result<Self, DirectiveError> {
        let direction = match raw.direction.as_deref() {
            None | Some("") => SyncDirection::default(),
            Some(value) => value.parse()?,
        };
        Ok(Self {
            direction,
            role_filter: RoleFilter::parse(raw.role.as_deref()),
            academy_id: raw.academy_id.filter(|id| !id.is_empty()),
            dry_run: raw.dry_run.unwrap_or(false),
        })
    }

    /// The ordered passes this directive executes.
    ///
    /// Bidirectional runs are strictly sequential, edge-to-primary first: a
    /// record can be the source of one pass and the destination of the other
    /// within the same run, and sequencing removes that race without
    /// per-record locks.
    #[must_use]
    pub fn passes(&self) -> Vec<SyncPass> {
        match self.direction {
            SyncDirection::FromD1 => vec![SyncPass::FromD1],
            SyncDirection::ToD1 => vec![SyncPass::ToD1],
            SyncDirection::Bidirectional => vec![SyncPass::FromD1, SyncPass::ToD1],
        }
    }

    /// The source-side record filter for this run.
    #[must_use]
    pub fn record_filter(&self) -> RecordFilter {
        RecordFilter {
            role: match &self.role_filter {
                RoleFilter::All => None,
                RoleFilter::Role(role) => Some(role.clone()),
            },
            academy_id: self.academy_id.clone(),
        }
    }
}
