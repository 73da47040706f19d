//! HTTP client for the D1 query endpoint.

use std::time::Duration;

use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::D1Config;
use crate::error::{EdgeError, EdgeResult};

/// Request body for the query endpoint.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    sql: &'a str,
    params: &'a [Value],
}

/// Response envelope returned by the query endpoint.
///
/// The D1 HTTP API wraps statement results in an outer envelope; each inner
/// result carries its own row set.
#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    success: bool,
    #[serde(default)]
    result: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    results: Vec<Value>,
}

/// Stateless client for the edge store's query endpoint.
///
/// Each call is one HTTP round trip; no connection affinity is required or
/// kept beyond reqwest's own pooling.
#[derive(Debug, Clone)]
pub struct D1Client {
    config: D1Config,
    client: Client,
}

impl D1Client {
    /// Build a client from the given configuration.
    pub fn new(config: D1Config) -> EdgeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Execute a statement and return all result rows.
    pub async fn query_all(&self, sql: &str, params: &[Value]) -> EdgeResult<Vec<Value>> {
        debug!(sql, param_count = params.len(), "Executing edge store query");

        let response = self
            .client
            .post(self.config.query_url())
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_token),
            )
            .json(&QueryRequest { sql, params })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Edge store returned error status");
            return Err(EdgeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: QueryEnvelope = response.json().await?;
        if !envelope.success {
            return Err(EdgeError::QueryFailed(
                serde_json::to_string(&envelope.errors).unwrap_or_default(),
            ));
        }

        Ok(envelope
            .result
            .into_iter()
            .flat_map(|r| r.results)
            .collect())
    }

    /// Execute a statement and return the first row, if any.
    pub async fn query_first(&self, sql: &str, params: &[Value]) -> EdgeResult<Option<Value>> {
        let mut rows = self.query_all(sql, params).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }

    /// Execute a write statement, discarding the result rows.
    pub async fn write(&self, sql: &str, params: &[Value]) -> EdgeResult<()> {
        self.query_all(sql, params).await?;
        Ok(())
    }

    /// Lightweight reachability probe (`SELECT 1`).
    pub async fn probe(&self) -> EdgeResult<()> {
        self.query_all("SELECT 1 AS test", &[]).await?;
        Ok(())
    }
}
