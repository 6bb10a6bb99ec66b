//! HTTP client for the telemetry feed endpoint.
//!
//! The contract with the data source is a plain GET returning a 2xx status
//! and a JSON body in one of the normalizer-accepted shapes. Anything else is
//! mapped onto the [`FetchError`] taxonomy.
//!
//! # Example
//!
//! ```no_run
//! use verdant_core::FeedClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FeedClient::new("http://sensors.local/api/readings")?;
//! let payload = client.fetch_payload().await?;
//! println!("payload: {payload}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{FetchError, Result};
use crate::source::TelemetrySource;

/// Request timeout for a single fetch.
///
/// Kept below the polling interval so a hung request cannot block perceived
/// freshness past one cycle.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP client for a telemetry feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    endpoint: String,
}

impl FeedClient {
    /// Create a new feed client for the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the URL does not use an
    /// `http://` or `https://` scheme, and [`FetchError::Transport`] when the
    /// underlying HTTP client cannot be constructed.
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim_end_matches('/').to_string();

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(FetchError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {endpoint}"
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::transport)?;

        Ok(Self { client, endpoint })
    }

    /// Create a client with a custom reqwest [`Client`].
    pub fn with_client(endpoint: &str, client: Client) -> Result<Self> {
        let endpoint = endpoint.trim_end_matches('/').to_string();

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(FetchError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {endpoint}"
            )));
        }

        Ok(Self { client, endpoint })
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Perform one GET against the endpoint and decode the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Transport`] when the call cannot complete
    /// - [`FetchError::Status`] for a non-2xx response
    /// - [`FetchError::Decode`] when the body is not valid JSON
    pub async fn fetch_payload(&self) -> Result<Value> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }

        let body = response.text().await.map_err(FetchError::transport)?;
        debug!(bytes = body.len(), "fetched feed payload");

        let payload = serde_json::from_str(&body)?;
        Ok(payload)
    }
}

#[async_trait]
impl TelemetrySource for FeedClient {
    async fn fetch(&self) -> Result<Value> {
        self.fetch_payload().await
    }
}
