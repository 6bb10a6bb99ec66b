//! Rolling statistics over a reading batch.

use verdant_types::{FieldStats, Reading, SensorField};

/// Compute min/max/average for one channel, rounded to one decimal place.
///
/// Readings where the channel is absent are excluded. When no reading carries
/// the channel the result is the defined-zero triple [`FieldStats::ZERO`], so
/// display code never divides by zero or renders NaN.
///
/// Rounding is a presentation concern; use [`field_stats_raw`] when the triple
/// feeds further computation.
#[must_use]
pub fn field_stats(field: SensorField, readings: &[Reading]) -> FieldStats {
    field_stats_raw(field, readings).rounded()
}

/// Compute min/max/average for one channel at full precision.
#[must_use]
pub fn field_stats_raw(field: SensorField, readings: &[Reading]) -> FieldStats {
    let mut count = 0usize;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;

    for value in readings.iter().filter_map(|r| r.field(field)) {
        count += 1;
        min = min.min(value);
        max = max.max(value);
        sum += value;
    }

    if count == 0 {
        return FieldStats::ZERO;
    }

    FieldStats {
        min,
        max,
        avg: sum / count as f64,
    }
}
