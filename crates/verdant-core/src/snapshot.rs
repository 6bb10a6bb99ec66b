//! Read-only engine snapshots.
//!
//! A [`Snapshot`] is the only surface the engine exposes to consumers:
//! rendering and export code read derived values from it as plain data and
//! never reach back into fetch internals. Snapshots are detached copies;
//! holding one across cycles observes nothing.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use verdant_types::{FieldStats, Reading, SensorField, Trend};

use crate::alerts::Alert;

/// Derived values for one measurement channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FieldSummary {
    /// The channel these values describe.
    pub field: SensorField,
    /// Min/max/average over the working set, rounded for presentation.
    pub stats: FieldStats,
    /// Short-term direction of the channel.
    pub trend: Trend,
}

/// The most recent failed fetch, kept until a later cycle succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastError {
    /// Human-readable failure message.
    pub message: String,
    /// When the failure was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

/// A per-cycle view of the engine's state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// The working reading set, sorted by timestamp descending.
    pub readings: Vec<Reading>,
    /// Per-channel stats and trend, in [`SensorField::ALL`] order.
    pub summaries: Vec<FieldSummary>,
    /// Alerts from the latest evaluation, in rule order.
    pub alerts: Vec<Alert>,
    /// Whether the alerts should currently be shown (false after dismissal).
    pub alerts_visible: bool,
    /// Time of the last successful update.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_updated: Option<OffsetDateTime>,
    /// The last failed fetch, if no success has happened since.
    pub last_error: Option<LastError>,
}

impl Snapshot {
    /// The most recent reading, if any data has been ingested.
    #[must_use]
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.first()
    }

    /// Derived values for one channel.
    #[must_use]
    pub fn summary(&self, field: SensorField) -> Option<&FieldSummary> {
        self.summaries.iter().find(|s| s.field == field)
    }

    /// Whether any data has been ingested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_accessors() {
        let snapshot = Snapshot {
            readings: vec![
                Reading::builder().timestamp(200).build(),
                Reading::builder().timestamp(100).build(),
            ],
            summaries: SensorField::ALL
                .into_iter()
                .map(|field| FieldSummary {
                    field,
                    stats: FieldStats::ZERO,
                    trend: Trend::Stable,
                })
                .collect(),
            alerts: Vec::new(),
            alerts_visible: false,
            last_updated: None,
            last_error: None,
        };

        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.latest().unwrap().timestamp, 200);
        assert!(snapshot.summary(SensorField::LightLux).is_some());
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = Snapshot {
            readings: Vec::new(),
            summaries: Vec::new(),
            alerts: Vec::new(),
            alerts_visible: false,
            last_updated: Some(OffsetDateTime::UNIX_EPOCH),
            last_error: Some(LastError {
                message: "server returned HTTP 502".into(),
                at: OffsetDateTime::UNIX_EPOCH,
            }),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("1970-01-01T00:00:00Z"));
        assert!(json.contains("HTTP 502"));
    }
}
