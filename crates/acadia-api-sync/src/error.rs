//! Error types for the sync API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use acadia_sync::{DirectiveError, StoreError};

/// Error type for the sync API.
#[derive(Debug, thiserror::Error)]
pub enum ApiSyncError {
    /// Authentication required.
    #[error("Authentication required")]
    Unauthorized,

    /// Super-admin role required.
    #[error("Super-admin role required")]
    Forbidden,

    /// Request validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] DirectiveError),

    /// The edge store credentials are missing from the environment.
    #[error("Edge store is not configured")]
    EdgeNotConfigured {
        /// Environment variables that must be set.
        missing: Vec<String>,
    },

    /// A store operation failed outside the per-pass error handling.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiSyncError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiSyncError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "Authentication required."}),
            ),
            ApiSyncError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({"error": "Only a super admin can run the sync."}),
            ),
            ApiSyncError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                json!({"error": err.to_string()}),
            ),
            ApiSyncError::EdgeNotConfigured { missing } => {
                let hints: serde_json::Map<String, serde_json::Value> = missing
                    .iter()
                    .map(|name| (name.clone(), json!(env_hint(name))))
                    .collect();
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "error": "Edge store connection is not configured.",
                        "details": "Set the Cloudflare D1 credentials in the environment.",
                        "envVarsNeeded": hints,
                    }),
                )
            }
            ApiSyncError::Store(err) => {
                tracing::error!(error = %err, "Sync API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "An error occurred during the sync.", "details": err.to_string()}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Example value shown in the remediation hint for a missing variable.
fn env_hint(name: &str) -> &'static str {
    match name {
        "CLOUDFLARE_ACCOUNT_ID" => "your-cloudflare-account-id",
        "CLOUDFLARE_D1_DATABASE_ID" => "your-d1-database-id",
        _ => "your-d1-api-token",
    }
}
