//! Request models.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters for `POST /sync`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SyncQuery {
    /// Sync direction: `from-d1`, `to-d1` or `bidirectional` (default).
    pub direction: Option<String>,
    /// Role filter: `ALL` (default) or a role string, passed through verbatim.
    pub role: Option<String>,
    /// Restrict the run to one academy.
    pub academy_id: Option<String>,
}

/// Request body for `POST /sync`. The body may be omitted entirely.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncBody {
    /// When true, simulate the run without mutating either store.
    #[serde(default)]
    pub dry_run: bool,
}
