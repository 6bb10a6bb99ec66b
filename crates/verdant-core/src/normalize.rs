//! Payload normalization.
//!
//! A telemetry endpoint may hand back its readings in more than one envelope.
//! This module turns a decoded JSON value of unknown shape into an ordered
//! batch of [`Reading`]s, newest first, or reports a decode failure.
//!
//! Accepted shapes, checked in priority order:
//!
//! 1. A top-level array: every element is a candidate reading. Unknown fields
//!    are ignored, missing measurements stay absent, and elements without a
//!    usable integer `timestamp` are skipped.
//! 2. An object whose string field `body` parses as JSON to an array: the
//!    decoded array is normalized as in (1). A `body` that is not valid JSON
//!    is a decode failure.
//! 3. Anything else: an empty batch, meaning "no data yet". Distinct from a
//!    network failure.
//!
//! Normalization is a pure transformation with no side effects.

use serde_json::Value;
use tracing::debug;

use verdant_types::{ParseError, Reading};

use crate::error::Result;

/// Normalize a decoded JSON payload into a batch of readings.
///
/// The returned batch is stably sorted by `timestamp` descending: index 0 is
/// the most recent reading, and ties preserve their relative input order.
///
/// # Errors
///
/// Returns [`FetchError::Decode`](crate::FetchError::Decode) only when a
/// nested `body` field is present but is not valid JSON. Every other
/// unrecognized shape yields an empty batch.
pub fn normalize(payload: &Value) -> Result<Vec<Reading>> {
    let elements = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("body").and_then(Value::as_str) {
            Some(body) => {
                let inner: Value = serde_json::from_str(body)?;
                return normalize(&inner);
            }
            None => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    let mut readings = Vec::with_capacity(elements.len());
    for element in elements {
        match candidate(element) {
            Ok(reading) => readings.push(reading),
            Err(e) => debug!(error = %e, "skipping malformed payload element"),
        }
    }

    // Stable sort: equal timestamps keep their input order.
    readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(readings)
}

/// Interpret one payload element as a reading.
///
/// The `timestamp` field is required and must be an integer; everything else
/// is copied through when present and kept absent otherwise.
fn candidate(element: &Value) -> std::result::Result<Reading, ParseError> {
    let object = element
        .as_object()
        .ok_or(ParseError::MissingField("timestamp"))?;
    if !object.get("timestamp").is_some_and(Value::is_i64) {
        return Err(ParseError::MissingField("timestamp"));
    }

    serde_json::from_value(element.clone())
        .map_err(|e| ParseError::InvalidValue(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_top_level_array() {
        let payload = json!([
            {"timestamp": 100, "device_id": "d1", "soil_moisture": 40.0},
            {"timestamp": 300, "device_id": "d1", "temperature": 21.5},
            {"timestamp": 200, "device_id": "d1"},
        ]);

        let readings = normalize(&payload).unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].timestamp, 300);
        assert_eq!(readings[1].timestamp, 200);
        assert_eq!(readings[2].timestamp, 100);
        assert_eq!(readings[0].temperature, Some(21.5));
        assert_eq!(readings[2].soil_moisture, Some(40.0));
    }

    #[test]
    fn test_nested_body_string() {
        let payload = json!({
            "body": r#"[{"timestamp": 5, "humidity": 60.0}]"#
        });

        let readings = normalize(&payload).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].humidity, Some(60.0));
    }

    #[test]
    fn test_nested_body_empty_array() {
        let payload = json!({"body": "[]"});
        let readings = normalize(&payload).unwrap();
        assert!(readings.is_empty());
    }

    #[test]
    fn test_nested_body_invalid_json_is_decode_failure() {
        let payload = json!({"body": "not json at all"});
        let err = normalize(&payload).unwrap_err();
        assert!(matches!(err, crate::FetchError::Decode(_)));
    }

    #[test]
    fn test_unrecognized_shapes_yield_empty() {
        for payload in [
            json!(null),
            json!(42),
            json!("hello"),
            json!({"data": [1, 2, 3]}),
            json!({"body": 17}),
        ] {
            let readings = normalize(&payload).unwrap();
            assert!(readings.is_empty(), "payload {payload} should be empty");
        }
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let payload = json!([
            {"timestamp": 1, "device_id": "d1", "firmware": "2.1", "rssi": -60}
        ]);
        let readings = normalize(&payload).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].device_id, "d1");
    }

    #[test]
    fn test_elements_without_timestamp_skipped() {
        let payload = json!([
            {"device_id": "no-ts"},
            {"timestamp": "100"},
            {"timestamp": 7, "device_id": "ok"},
            "not an object",
        ]);
        let readings = normalize(&payload).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].device_id, "ok");
    }

    #[test]
    fn test_null_measurements_kept_absent() {
        let payload = json!([
            {"timestamp": 1, "soil_moisture": null, "light_lux": 300.0}
        ]);
        let readings = normalize(&payload).unwrap();
        assert_eq!(readings[0].soil_moisture, None);
        assert_eq!(readings[0].light_lux, Some(300.0));
    }

    #[test]
    fn test_ties_preserve_input_order() {
        let payload = json!([
            {"timestamp": 10, "device_id": "first"},
            {"timestamp": 10, "device_id": "second"},
            {"timestamp": 20, "device_id": "newest"},
            {"timestamp": 10, "device_id": "third"},
        ]);
        let readings = normalize(&payload).unwrap();
        let ids: Vec<&str> = readings.iter().map(|r| r.device_id.as_str()).collect();
        assert_eq!(ids, ["newest", "first", "second", "third"]);
    }

    proptest! {
        /// The output is sorted descending and is a permutation of the input.
        #[test]
        fn prop_sorted_descending_permutation(timestamps in prop::collection::vec(0i64..1_000_000, 0..50)) {
            let payload = serde_json::Value::Array(
                timestamps
                    .iter()
                    .map(|ts| json!({"timestamp": ts}))
                    .collect(),
            );
            let readings = normalize(&payload).unwrap();

            prop_assert_eq!(readings.len(), timestamps.len());
            for pair in readings.windows(2) {
                prop_assert!(pair[0].timestamp >= pair[1].timestamp);
            }

            let mut expected = timestamps.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            let actual: Vec<i64> = readings.iter().map(|r| r.timestamp).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
