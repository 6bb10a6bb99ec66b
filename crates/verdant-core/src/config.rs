//! Poller configuration.

use std::time::Duration;

use crate::alerts::AlertThresholds;
use crate::error::{FetchError, Result};

/// Default period between automatic refresh cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default cap on retained readings per cycle.
///
/// The feed replaces the whole batch every cycle with no cap of its own;
/// truncating at ingest bounds memory in long-running deployments.
pub const DEFAULT_MAX_READINGS: usize = 500;

/// Configuration for a [`Poller`](crate::Poller).
///
/// ```
/// use std::time::Duration;
/// use verdant_core::PollerConfig;
///
/// let config = PollerConfig::default()
///     .with_poll_interval(Duration::from_secs(10))
///     .with_max_readings(100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Period between automatic refresh cycles.
    pub poll_interval: Duration,
    /// Most recent readings retained after each ingest.
    pub max_readings: usize,
    /// Alert rule thresholds applied to the latest reading.
    pub thresholds: AlertThresholds,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_readings: DEFAULT_MAX_READINGS,
            thresholds: AlertThresholds::default(),
        }
    }
}

impl PollerConfig {
    /// Set the polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the retained-readings cap.
    #[must_use]
    pub fn with_max_readings(mut self, max: usize) -> Self {
        self.max_readings = max;
        self
    }

    /// Set the alert thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: AlertThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidConfig`] when the interval or the
    /// retained-readings cap is zero.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(FetchError::InvalidConfig(
                "poll_interval must be > 0".to_string(),
            ));
        }
        if self.max_readings == 0 {
            return Err(FetchError::InvalidConfig(
                "max_readings must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PollerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_readings, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_interval() {
        let config = PollerConfig::default().with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_cap() {
        let config = PollerConfig::default().with_max_readings(0);
        assert!(config.validate().is_err());
    }
}
