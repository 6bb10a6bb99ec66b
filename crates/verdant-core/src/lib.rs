//! Telemetry ingestion and analysis engine for environmental sensor feeds.
//!
//! This crate is the logic layer of a client-side telemetry viewer: it polls
//! a remote JSON endpoint for batches of sensor readings (soil moisture,
//! temperature, humidity, light), normalizes and orders them, derives rolling
//! statistics and short-term trends, evaluates threshold-based alerts, and
//! serializes the batch for tabular export. Presentation is someone else's
//! job; everything here is exposed as plain data through [`Snapshot`]s.
//!
//! # Architecture
//!
//! - [`Poller`] owns the refresh cycle and all mutable state
//! - [`normalize`](normalize::normalize) turns raw payloads into ordered batches
//! - [`stats`], [`trend`], and [`alerts`] are pure functions over a batch
//! - [`export`] renders a batch as delimited text
//! - [`FeedClient`] speaks HTTP; [`MockFeed`] stands in for it in tests
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use verdant_core::{FeedClient, Poller, PollerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeedClient::new("http://sensors.local/api/readings")?;
//!     let poller = Arc::new(Poller::new(client, PollerConfig::default())?);
//!     let handle = poller.spawn();
//!
//!     let snapshot = poller.snapshot().await;
//!     for summary in &snapshot.summaries {
//!         println!("{}: avg {} ({})", summary.field, summary.stats.avg, summary.trend);
//!     }
//!
//!     handle.close();
//!     Ok(())
//! }
//! ```

pub mod alerts;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod mock;
pub mod normalize;
pub mod poller;
pub mod snapshot;
pub mod source;
pub mod stats;
pub mod trend;

pub use alerts::{Alert, AlertThresholds};
pub use client::{FeedClient, REQUEST_TIMEOUT};
pub use config::{DEFAULT_MAX_READINGS, DEFAULT_POLL_INTERVAL, PollerConfig};
pub use error::{FetchError, Result};
pub use export::{CSV_MIME, csv_escape, export_file_name, serialize_csv};
pub use mock::{MockFeed, MockResponse};
pub use normalize::normalize;
pub use poller::{Poller, PollerHandle};
pub use snapshot::{FieldSummary, LastError, Snapshot};
pub use source::TelemetrySource;
pub use stats::{field_stats, field_stats_raw};
pub use trend::{DEAD_BAND, field_trend};

// Re-export the shared data types for downstream convenience.
pub use verdant_types::{FieldStats, Reading, ReadingBuilder, SensorField, Trend};
