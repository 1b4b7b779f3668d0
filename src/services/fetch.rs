// src/services/fetch.rs

//! HTTP fetching.
//!
//! Thin I/O wrapper: one GET with a bounded timeout, no retries.
//! Retry-by-rerun belongs to the external scheduler.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// HTTP fetcher for monitored pages.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher with the configured user agent and timeout.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::network("<client>", e))?;

        Ok(Self { client })
    }

    /// Fetch the raw HTML of a page.
    ///
    /// Timeout, connection failure, and non-success status all surface as
    /// [`AppError::Network`].
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::network(url, e))?;

        let response = response
            .error_for_status()
            .map_err(|e| AppError::network(url, e))?;

        response.text().await.map_err(|e| AppError::network(url, e))
    }
}
