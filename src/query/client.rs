//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Status code mapping to query errors
//!
//! Requests are made once; retrying is left to the resolver's retry policy.

use crate::error::QueryError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("modup/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, QueryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, QueryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                QueryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { client })
    }

    /// Perform a GET request, mapping transport failures and error statuses
    pub async fn get(
        &self,
        url: &str,
        module: &str,
        source_name: &str,
    ) -> Result<reqwest::Response, QueryError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                QueryError::timeout(module, source_name)
            } else {
                QueryError::network_error(module, source_name, e.to_string())
            }
        })?;

        match response.status() {
            // The module proxy answers 410 Gone for modules it cannot serve
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                Err(QueryError::module_not_found(module, source_name))
            }
            status if !status.is_success() => Err(QueryError::network_error(
                module,
                source_name,
                format!("HTTP {}", status),
            )),
            _ => Ok(response),
        }
    }

    /// Perform a GET request and parse the JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        module: &str,
        source_name: &str,
    ) -> Result<T, QueryError> {
        let response = self.get(url, module, source_name).await?;
        response.json::<T>().await.map_err(|e| {
            QueryError::invalid_response(module, source_name, format!("failed to parse JSON: {}", e))
        })
    }
}
