//! Trait abstraction for telemetry data sources.
//!
//! This module provides the [`TelemetrySource`] trait that abstracts over the
//! real HTTP feed and mock feeds for testing.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Trait abstracting the remote telemetry endpoint.
///
/// The poller depends on this trait only, which enables exercising the full
/// refresh cycle against a [`MockFeed`](crate::MockFeed) without a network.
///
/// # Example
///
/// ```ignore
/// use verdant_core::{Result, TelemetrySource};
///
/// async fn count_elements<S: TelemetrySource>(source: &S) -> Result<usize> {
///     let payload = source.fetch().await?;
///     Ok(payload.as_array().map_or(0, |a| a.len()))
/// }
/// ```
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch one payload from the feed and decode it as JSON.
    ///
    /// Implementations surface transport problems, non-2xx statuses, and
    /// undecodable bodies as [`FetchError`](crate::FetchError)s; the shape of
    /// a successfully decoded payload is the normalizer's concern.
    async fn fetch(&self) -> Result<Value>;
}
