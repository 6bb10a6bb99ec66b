//! Platform-agnostic types for the verdant telemetry engine.
//!
//! This crate provides the shared data types used by the ingestion engine
//! (`verdant-core`) and any front end consuming its snapshots.
//!
//! # Features
//!
//! - [`Reading`]: one timestamped sensor sample with optional measurements
//! - [`SensorField`]: the four measurement channels a feed may carry
//! - [`FieldStats`] and [`Trend`]: derived-value types
//! - [`ParseError`]: error type for payload-shaped data problems
//!
//! # Example
//!
//! ```
//! use verdant_types::{Reading, SensorField};
//!
//! let reading = Reading::builder()
//!     .timestamp(1_700_000_000_000)
//!     .device_id("greenhouse-1")
//!     .soil_moisture(42.0)
//!     .build();
//!
//! assert_eq!(reading.field(SensorField::SoilMoisture), Some(42.0));
//! assert_eq!(reading.field(SensorField::Temperature), None);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{FieldStats, Reading, ReadingBuilder, SensorField, Trend};
