//! Core types for verdant sensor data.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One measurement channel carried by the telemetry feed.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new channels
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum SensorField {
    /// Soil moisture as a percentage.
    SoilMoisture,
    /// Air temperature in degrees Celsius.
    Temperature,
    /// Relative humidity as a percentage.
    Humidity,
    /// Illuminance in lux.
    LightLux,
}

impl SensorField {
    /// All channels, in the order they appear in exports and summaries.
    pub const ALL: [SensorField; 4] = [
        SensorField::SoilMoisture,
        SensorField::Temperature,
        SensorField::Humidity,
        SensorField::LightLux,
    ];

    /// Human-readable label, without units.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SensorField::SoilMoisture => "Soil Moisture",
            SensorField::Temperature => "Temperature",
            SensorField::Humidity => "Humidity",
            SensorField::LightLux => "Light",
        }
    }

    /// Unit suffix for display.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            SensorField::SoilMoisture | SensorField::Humidity => "%",
            SensorField::Temperature => "°C",
            SensorField::LightLux => "lux",
        }
    }

    /// Column header used by the CSV export, label and unit combined.
    #[must_use]
    pub fn column_header(&self) -> &'static str {
        match self {
            SensorField::SoilMoisture => "Soil Moisture (%)",
            SensorField::Temperature => "Temperature (°C)",
            SensorField::Humidity => "Humidity (%)",
            SensorField::LightLux => "Light (lux)",
        }
    }
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single timestamped sensor sample.
///
/// Each measurement field may be absent (sensor fault or transient gap).
/// Downstream computation excludes absent values rather than substituting a
/// default of 0.
///
/// Readings are value types: they are created by the normalizer, never
/// mutated, and discarded in bulk when a newer batch replaces them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Milliseconds since the Unix epoch. The sole ordering key.
    pub timestamp: i64,
    /// Opaque device identifier; empty when the payload omits it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub device_id: String,
    /// Soil moisture percentage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub soil_moisture: Option<f64>,
    /// Temperature in degrees Celsius.
    #[cfg_attr(feature = "serde", serde(default))]
    pub temperature: Option<f64>,
    /// Relative humidity percentage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub humidity: Option<f64>,
    /// Illuminance in lux.
    #[cfg_attr(feature = "serde", serde(default))]
    pub light_lux: Option<f64>,
}

impl Reading {
    /// Get the value of a measurement channel, if present.
    #[must_use]
    pub fn field(&self, field: SensorField) -> Option<f64> {
        match field {
            SensorField::SoilMoisture => self.soil_moisture,
            SensorField::Temperature => self.temperature,
            SensorField::Humidity => self.humidity,
            SensorField::LightLux => self.light_lux,
        }
    }

    /// Convert the epoch-millisecond timestamp to an [`time::OffsetDateTime`].
    ///
    /// Returns `None` if the timestamp is outside the representable range.
    #[must_use]
    pub fn captured_at(&self) -> Option<time::OffsetDateTime> {
        time::OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.timestamp) * 1_000_000)
            .ok()
    }

    /// Create a builder for constructing a `Reading` with optional fields.
    pub fn builder() -> ReadingBuilder {
        ReadingBuilder::default()
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self {
            timestamp: 0,
            device_id: String::new(),
            soil_moisture: None,
            temperature: None,
            humidity: None,
            light_lux: None,
        }
    }
}

/// Builder for constructing [`Reading`] values.
#[derive(Debug, Default)]
#[must_use]
pub struct ReadingBuilder {
    reading: Reading,
}

impl ReadingBuilder {
    /// Set the timestamp (milliseconds since the Unix epoch).
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.reading.timestamp = timestamp;
        self
    }

    /// Set the device identifier.
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.reading.device_id = device_id.into();
        self
    }

    /// Set the soil moisture percentage.
    pub fn soil_moisture(mut self, value: f64) -> Self {
        self.reading.soil_moisture = Some(value);
        self
    }

    /// Set the temperature in degrees Celsius.
    pub fn temperature(mut self, value: f64) -> Self {
        self.reading.temperature = Some(value);
        self
    }

    /// Set the relative humidity percentage.
    pub fn humidity(mut self, value: f64) -> Self {
        self.reading.humidity = Some(value);
        self
    }

    /// Set the illuminance in lux.
    pub fn light_lux(mut self, value: f64) -> Self {
        self.reading.light_lux = Some(value);
        self
    }

    /// Build the `Reading`.
    #[must_use]
    pub fn build(self) -> Reading {
        self.reading
    }
}

/// Min/max/average triple over one measurement channel.
///
/// The degenerate case (no value present across the set) is the defined-zero
/// triple [`FieldStats::ZERO`], never NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldStats {
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
    /// Arithmetic mean of observed values.
    pub avg: f64,
}

impl FieldStats {
    /// The defined-zero triple returned when no value is present.
    pub const ZERO: FieldStats = FieldStats {
        min: 0.0,
        max: 0.0,
        avg: 0.0,
    };

    /// Round all three values to one decimal place for presentation.
    #[must_use]
    pub fn rounded(self) -> Self {
        fn round1(v: f64) -> f64 {
            (v * 10.0).round() / 10.0
        }
        Self {
            min: round1(self.min),
            max: round1(self.max),
            avg: round1(self.avg),
        }
    }
}

impl Default for FieldStats {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Short-term direction of a measurement channel.
///
/// Derived by comparing the two most recent readings with a dead-band, so
/// sensor noise does not register as movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Trend {
    /// Latest value is above the previous one by more than the dead-band.
    Up,
    /// Latest value is below the previous one by more than the dead-band.
    Down,
    /// Within the dead-band, missing data, or fewer than two readings.
    #[default]
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_builder() {
        let reading = Reading::builder()
            .timestamp(1_700_000_000_000)
            .device_id("d1")
            .soil_moisture(42.5)
            .temperature(21.0)
            .build();

        assert_eq!(reading.timestamp, 1_700_000_000_000);
        assert_eq!(reading.device_id, "d1");
        assert_eq!(reading.soil_moisture, Some(42.5));
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.light_lux, None);
    }

    #[test]
    fn test_field_dispatch() {
        let reading = Reading::builder()
            .timestamp(1)
            .humidity(55.0)
            .light_lux(800.0)
            .build();

        assert_eq!(reading.field(SensorField::Humidity), Some(55.0));
        assert_eq!(reading.field(SensorField::LightLux), Some(800.0));
        assert_eq!(reading.field(SensorField::SoilMoisture), None);
        assert_eq!(reading.field(SensorField::Temperature), None);
    }

    #[test]
    fn test_captured_at() {
        let reading = Reading::builder().timestamp(0).build();
        assert_eq!(
            reading.captured_at(),
            Some(time::OffsetDateTime::UNIX_EPOCH)
        );

        let reading = Reading::builder().timestamp(1_000).build();
        assert_eq!(
            reading.captured_at(),
            Some(time::OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(1))
        );
    }

    #[test]
    fn test_field_stats_rounded() {
        let stats = FieldStats {
            min: 1.24,
            max: 9.96,
            avg: 5.55,
        };
        let rounded = stats.rounded();
        assert_eq!(rounded.min, 1.2);
        assert_eq!(rounded.max, 10.0);
        assert_eq!(rounded.avg, 5.6);
    }

    #[test]
    fn test_field_stats_zero() {
        assert_eq!(FieldStats::default(), FieldStats::ZERO);
        assert_eq!(FieldStats::ZERO.rounded(), FieldStats::ZERO);
    }

    #[test]
    fn test_trend_display() {
        assert_eq!(Trend::Up.to_string(), "up");
        assert_eq!(Trend::Down.to_string(), "down");
        assert_eq!(Trend::Stable.to_string(), "stable");
    }

    #[test]
    fn test_sensor_field_headers() {
        assert_eq!(SensorField::SoilMoisture.column_header(), "Soil Moisture (%)");
        assert_eq!(SensorField::Temperature.unit(), "°C");
        assert_eq!(SensorField::LightLux.label(), "Light");
    }

    #[test]
    fn test_reading_deserializes_with_missing_fields() {
        let json = r#"{"timestamp": 100, "device_id": "d1", "temperature": 21.5}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.timestamp, 100);
        assert_eq!(reading.temperature, Some(21.5));
        assert_eq!(reading.soil_moisture, None);
    }

    #[test]
    fn test_reading_deserializes_null_measurements() {
        let json = r#"{"timestamp": 100, "humidity": null, "light_lux": 12.0}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.light_lux, Some(12.0));
        assert!(reading.device_id.is_empty());
    }
}
