//! Edge store error types.

use thiserror::Error;

/// Errors surfaced by the D1 client.
#[derive(Debug, Error)]
pub enum EdgeError {
    /// Required credentials are missing from the environment.
    #[error("Edge store is not configured; missing environment variables: {}", missing.join(", "))]
    NotConfigured {
        /// Names of the environment variables that must be set.
        missing: Vec<String>,
    },

    /// The HTTP request to the query endpoint failed outright.
    #[error("Edge store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("Edge store API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The endpoint answered 2xx but reported `success: false`.
    #[error("Edge store query failed: {0}")]
    QueryFailed(String),
}

/// Result type for edge store operations.
pub type EdgeResult<T> = Result<T, EdgeError>;
