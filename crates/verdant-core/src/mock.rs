//! Mock telemetry source for testing.
//!
//! This module provides a mock feed that can be used for unit testing
//! without a live endpoint.
//!
//! # Features
//!
//! - **Scripted responses**: queue payloads or failures to be returned in order
//! - **Latency simulation**: per-call delays to exercise overlapping fetches
//! - **Call counting**: assert on how often the poller hit the source

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{FetchError, Result};
use crate::source::TelemetrySource;

/// One scripted outcome for a [`MockFeed`] call.
#[derive(Debug)]
pub struct MockResponse {
    outcome: Result<Value>,
    delay: Duration,
}

impl MockResponse {
    /// A successful payload, returned immediately.
    pub fn payload(value: Value) -> Self {
        Self {
            outcome: Ok(value),
            delay: Duration::ZERO,
        }
    }

    /// A failure, returned immediately.
    pub fn failure(error: FetchError) -> Self {
        Self {
            outcome: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Delay the outcome by the given duration.
    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A mock telemetry feed with scripted responses.
///
/// Responses are served in FIFO order; when the script runs dry the feed
/// falls back to its default payload (an empty array).
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use verdant_core::{MockFeed, MockResponse, TelemetrySource};
///
/// #[tokio::main]
/// async fn main() {
///     let feed = MockFeed::new();
///     feed.push(MockResponse::payload(json!([{"timestamp": 1}]))).await;
///
///     let payload = feed.fetch().await.unwrap();
///     assert_eq!(payload.as_array().unwrap().len(), 1);
///     assert_eq!(feed.call_count(), 1);
/// }
/// ```
#[derive(Debug)]
pub struct MockFeed {
    script: Mutex<VecDeque<MockResponse>>,
    default_payload: Value,
    call_count: AtomicU32,
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeed {
    /// Create a mock feed whose default payload is an empty array.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_payload: Value::Array(Vec::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Create a mock feed that always returns the given payload once the
    /// script is exhausted.
    pub fn with_default_payload(payload: Value) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_payload: payload,
            call_count: AtomicU32::new(0),
        }
    }

    /// Queue a scripted response.
    pub async fn push(&self, response: MockResponse) {
        self.script.lock().await.push_back(response);
    }

    /// Number of times [`fetch`](TelemetrySource::fetch) has been called.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TelemetrySource for MockFeed {
    async fn fetch(&self) -> Result<Value> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        let scripted = self.script.lock().await.pop_front();
        match scripted {
            Some(response) => {
                if !response.delay.is_zero() {
                    tokio::time::sleep(response.delay).await;
                }
                response.outcome
            }
            None => Ok(self.default_payload.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_responses_in_order() {
        let feed = MockFeed::new();
        feed.push(MockResponse::payload(json!([{"timestamp": 1}])))
            .await;
        feed.push(MockResponse::failure(FetchError::status(500)))
            .await;

        assert!(feed.fetch().await.is_ok());
        let err = feed.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500 }));
        assert_eq!(feed.call_count(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_script_returns_default() {
        let feed = MockFeed::with_default_payload(json!([{"timestamp": 9}]));
        let payload = feed.fetch().await.unwrap();
        assert_eq!(payload[0]["timestamp"], 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_response() {
        let feed = MockFeed::new();
        feed.push(MockResponse::payload(json!([])).after(Duration::from_secs(2)))
            .await;

        let started = tokio::time::Instant::now();
        feed.fetch().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
