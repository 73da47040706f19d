//! Application configuration loaded from environment variables.
//!
//! Fail-fast loading: required variables must be present and valid, or the
//! application exits with a clear error message. Edge store credentials are
//! deliberately not required here; their absence degrades the service instead
//! of stopping it.

use std::env;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A variable is present but does not parse.
    #[error("Invalid value for {name}: {message}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Runtime configuration for the sync service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string.
    pub database_url: String,
    /// Listen address host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Log filter directive.
    pub rust_log: String,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar("DATABASE_URL"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("PORT") {
            Ok(value) => value.parse().map_err(|e| ConfigError::InvalidVar {
                name: "PORT",
                message: format!("{e}"),
            })?,
            Err(_) => 8080,
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_url,
            host,
            port,
            rust_log,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    // Env-var mutation is process-global, so the cases share one test.
    #[test]
    fn loads_defaults_and_rejects_bad_port() {
        env::set_var("DATABASE_URL", "postgres://localhost/acadia");
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("RUST_LOG");

        let config = Config::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");

        env::set_var("PORT", "not-a-port");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidVar { name: "PORT", .. })
        ));
        env::remove_var("PORT");

        env::remove_var("DATABASE_URL");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingVar("DATABASE_URL"))
        ));
    }
}
