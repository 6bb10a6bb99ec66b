//! Threshold-based alert evaluation.
//!
//! A fixed rule set is applied to the most recent reading; each rule
//! contributes its message independently, so several alerts can fire at once.
//! Absent fields never trigger their rule. The evaluator is pure with respect
//! to its input reading; the poller owns the visibility transitions.
//!
//! # Example
//!
//! ```
//! use verdant_core::alerts::AlertThresholds;
//! use verdant_types::Reading;
//!
//! let thresholds = AlertThresholds::default();
//! let reading = Reading::builder()
//!     .timestamp(0)
//!     .soil_moisture(25.0)
//!     .build();
//!
//! let alerts = thresholds.evaluate(&reading);
//! assert_eq!(alerts.len(), 1);
//! println!("{}", alerts[0].message());
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use verdant_types::Reading;

/// One triggered alert condition.
///
/// Variants are listed in evaluation order; [`AlertThresholds::evaluate`]
/// returns them in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alert {
    /// Soil moisture below the watering threshold.
    LowSoilMoisture,
    /// Temperature above the high threshold.
    HighTemperature,
    /// Temperature below the low threshold.
    LowTemperature,
    /// Relative humidity below the dryness threshold.
    LowHumidity,
}

impl Alert {
    /// Human-readable alert message.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Alert::LowSoilMoisture => "Low soil moisture - plants need water",
            Alert::HighTemperature => "High temperature detected",
            Alert::LowTemperature => "Low temperature detected",
            Alert::LowHumidity => "Low humidity detected",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Configurable thresholds for the alert rule set.
///
/// The defaults match the fixed rules the engine ships with; deployments with
/// different crops or climates can tune them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Soil moisture below this fires [`Alert::LowSoilMoisture`].
    pub soil_moisture_min: f64,
    /// Temperature above this fires [`Alert::HighTemperature`].
    pub temperature_max: f64,
    /// Temperature below this fires [`Alert::LowTemperature`].
    pub temperature_min: f64,
    /// Humidity below this fires [`Alert::LowHumidity`].
    pub humidity_min: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            soil_moisture_min: 30.0,
            temperature_max: 30.0,
            temperature_min: 15.0,
            humidity_min: 40.0,
        }
    }
}

impl AlertThresholds {
    /// Evaluate the rule set against one reading.
    ///
    /// Rules are checked in a fixed order and every rule that holds
    /// contributes an alert; the result is empty when nothing fires.
    #[must_use]
    pub fn evaluate(&self, reading: &Reading) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if reading
            .soil_moisture
            .is_some_and(|v| v < self.soil_moisture_min)
        {
            alerts.push(Alert::LowSoilMoisture);
        }
        if reading
            .temperature
            .is_some_and(|v| v > self.temperature_max)
        {
            alerts.push(Alert::HighTemperature);
        }
        if reading
            .temperature
            .is_some_and(|v| v < self.temperature_min)
        {
            alerts.push(Alert::LowTemperature);
        }
        if reading.humidity.is_some_and(|v| v < self.humidity_min) {
            alerts.push(Alert::LowHumidity);
        }

        alerts
    }
}
