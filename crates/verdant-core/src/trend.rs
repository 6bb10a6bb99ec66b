//! Short-term trend classification.

use verdant_types::{Reading, SensorField, Trend};

/// Tolerance around the previous value that still counts as [`Trend::Stable`].
///
/// One unit in the channel's native scale. Without it every flicker of sensor
/// noise would register as a direction change.
pub const DEAD_BAND: f64 = 1.0;

/// Classify the short-term direction of a channel.
///
/// Expects a batch already sorted descending by timestamp and compares the
/// latest reading (`readings[0]`) to the previous one (`readings[1]`).
/// Returns [`Trend::Stable`] when there are fewer than two readings or when
/// either value is absent.
#[must_use]
pub fn field_trend(field: SensorField, readings: &[Reading]) -> Trend {
    let (Some(latest), Some(previous)) = (
        readings.first().and_then(|r| r.field(field)),
        readings.get(1).and_then(|r| r.field(field)),
    ) else {
        return Trend::Stable;
    };

    if latest > previous + DEAD_BAND {
        Trend::Up
    } else if latest < previous - DEAD_BAND {
        Trend::Down
    } else {
        Trend::Stable
    }
}
