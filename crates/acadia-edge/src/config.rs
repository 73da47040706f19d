//! Edge store configuration loaded from environment variables.

use crate::error::EdgeError;
use std::env;

/// Environment variable holding the Cloudflare account id.
pub const ENV_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
/// Environment variable holding the D1 database id.
pub const ENV_DATABASE_ID: &str = "CLOUDFLARE_D1_DATABASE_ID";
/// Environment variable holding the D1-scoped API token.
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_D1_API_TOKEN";
/// Fallback environment variable for an account-wide API token.
pub const ENV_API_TOKEN_FALLBACK: &str = "CLOUDFLARE_API_TOKEN";

/// Credentials and addressing for the D1 query endpoint.
#[derive(Debug, Clone)]
pub struct D1Config {
    /// Cloudflare account id.
    pub account_id: String,
    /// D1 database id.
    pub database_id: String,
    /// Bearer token for the query endpoint.
    pub api_token: String,
    /// Base URL of the Cloudflare API (overridable for tests).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl D1Config {
    /// Default Cloudflare API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.cloudflare.com/client/v4";

    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::NotConfigured`] listing every missing variable,
    /// so callers can surface actionable remediation hints.
    pub fn from_env() -> Result<Self, EdgeError> {
        let account_id = env::var(ENV_ACCOUNT_ID).ok().filter(|v| !v.is_empty());
        let database_id = env::var(ENV_DATABASE_ID).ok().filter(|v| !v.is_empty());
        let api_token = env::var(ENV_API_TOKEN)
            .or_else(|_| env::var(ENV_API_TOKEN_FALLBACK))
            .ok()
            .filter(|v| !v.is_empty());

        let mut missing = Vec::new();
        if account_id.is_none() {
            missing.push(ENV_ACCOUNT_ID.to_string());
        }
        if database_id.is_none() {
            missing.push(ENV_DATABASE_ID.to_string());
        }
        if api_token.is_none() {
            missing.push(ENV_API_TOKEN.to_string());
        }
        if !missing.is_empty() {
            return Err(EdgeError::NotConfigured { missing });
        }

        // All three are present once the missing check passes.
        Ok(Self {
            account_id: account_id.unwrap_or_default(),
            database_id: database_id.unwrap_or_default(),
            api_token: api_token.unwrap_or_default(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        })
    }

    /// Create a configuration with explicit values (used by tests).
    #[must_use]
    pub fn new(
        account_id: impl Into<String>,
        database_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            database_id: database_id.into(),
            api_token: api_token.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// URL of the query endpoint for this database.
    #[must_use]
    pub fn query_url(&self) -> String {
        format!(
            "{}/accounts/{}/d1/database/{}/query",
            self.base_url, self.account_id, self.database_id
        )
    }
}
