//! Tabular export serialization.
//!
//! Renders a reading batch as comma-delimited text with a fixed column
//! schema. The caller passes the current working set, so rows come out newest
//! first. Free-form fields are quoted and escaped when they contain
//! delimiters, so a device id with an embedded comma cannot corrupt a row.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use verdant_types::{Reading, SensorField};

/// MIME type of the exported artifact.
pub const CSV_MIME: &str = "text/csv";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Serialize a reading batch as delimited text.
///
/// The header row is fixed; each reading becomes one row in the order given,
/// with the timestamp rendered as `YYYY-MM-DD HH:MM:SS` and absent
/// measurements as empty cells.
#[must_use]
pub fn serialize_csv(readings: &[Reading]) -> String {
    let mut out = String::new();
    out.push_str("Timestamp,Device ID");
    for field in SensorField::ALL {
        out.push(',');
        out.push_str(field.column_header());
    }
    out.push('\n');

    for reading in readings {
        out.push_str(&csv_escape(&format_timestamp(reading)));
        out.push(',');
        out.push_str(&csv_escape(&reading.device_id));
        for field in SensorField::ALL {
            out.push(',');
            if let Some(value) = reading.field(field) {
                out.push_str(&value.to_string());
            }
        }
        out.push('\n');
    }

    out
}

/// File name for an export performed on the given date: `readings-YYYY-MM-DD.csv`.
#[must_use]
pub fn export_file_name(date: time::Date) -> String {
    let formatted = date
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string());
    format!("readings-{formatted}.csv")
}

fn format_timestamp(reading: &Reading) -> String {
    match reading.captured_at() {
        Some(at) => at
            .format(TIMESTAMP_FORMAT)
            .unwrap_or_else(|_| reading.timestamp.to_string()),
        None => reading.timestamp.to_string(),
    }
}

/// Escape a string for CSV output.
///
/// Wraps the value in quotes if it contains commas, quotes, or newlines.
/// Double quotes are escaped by doubling them.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
