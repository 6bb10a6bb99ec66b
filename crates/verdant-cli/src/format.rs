//! Output formatting for snapshot rendering in text and JSON.

use anyhow::Result;
use owo_colors::OwoColorize;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use verdant_core::{Snapshot, Trend};
use verdant_types::{Reading, SensorField};

/// Output format selection for snapshot-printing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// Pretty-printed JSON snapshot.
    Json,
}

/// Wall-clock timestamps in text output.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// How many readings the text view lists before eliding the rest.
const TEXT_ROW_LIMIT: usize = 10;

/// Formatting options for snapshot output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
}

impl FormatOptions {
    #[must_use]
    pub fn new(no_color: bool) -> Self {
        Self { no_color }
    }

    /// Serialize a snapshot to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn as_json(&self, snapshot: &Snapshot) -> Result<String> {
        let json = serde_json::to_string_pretty(snapshot)?;
        Ok(json + "\n")
    }

    fn red(&self, s: &str) -> String {
        if self.no_color {
            s.to_string()
        } else {
            s.red().to_string()
        }
    }

    fn trend_label(&self, trend: Trend) -> String {
        if self.no_color {
            return trend.to_string();
        }
        match trend {
            Trend::Up => trend.green().to_string(),
            Trend::Down => trend.red().to_string(),
            Trend::Stable => trend.dimmed().to_string(),
        }
    }
}

/// Format a sensor value with one decimal place and its unit, or a
/// placeholder when the reading omitted the field.
#[must_use]
pub fn format_value(value: Option<f64>, field: SensorField) -> String {
    match value {
        Some(v) => format!("{:.1}{}", v, field.unit()),
        None => "--".to_string(),
    }
}

fn format_timestamp(reading: &Reading) -> String {
    reading
        .captured_at()
        .and_then(|ts| ts.format(TIMESTAMP_FORMAT).ok())
        .unwrap_or_else(|| reading.timestamp.to_string())
}

/// Render a snapshot as a human-readable text report.
#[must_use]
pub fn render_snapshot(snapshot: &Snapshot, opts: &FormatOptions) -> String {
    let mut out = String::new();

    match snapshot
        .last_updated
        .and_then(|ts| ts.format(TIMESTAMP_FORMAT).ok())
    {
        Some(ts) => out.push_str(&format!("Last updated: {ts} UTC\n")),
        None => out.push_str("Last updated: never\n"),
    }

    if let Some(err) = &snapshot.last_error {
        out.push_str(&opts.red(&format!("Last fetch failed: {}\n", err.message)));
    }

    if snapshot.is_empty() {
        out.push_str("No readings yet.\n");
        return out;
    }

    if snapshot.alerts_visible {
        for alert in &snapshot.alerts {
            out.push_str(&opts.red(&format!("ALERT: {}\n", alert.message())));
        }
    }

    out.push('\n');
    for summary in &snapshot.summaries {
        out.push_str(&format!(
            "{:<14} min {:>6.1}  max {:>6.1}  avg {:>6.1}  trend {}\n",
            summary.field.label(),
            summary.stats.min,
            summary.stats.max,
            summary.stats.avg,
            opts.trend_label(summary.trend),
        ));
    }

    out.push('\n');
    for reading in snapshot.readings.iter().take(TEXT_ROW_LIMIT) {
        out.push_str(&format!(
            "{}  {:>8}  {:>8}  {:>8}  {:>10}\n",
            format_timestamp(reading),
            format_value(reading.soil_moisture, SensorField::SoilMoisture),
            format_value(reading.temperature, SensorField::Temperature),
            format_value(reading.humidity, SensorField::Humidity),
            format_value(reading.light_lux, SensorField::LightLux),
        ));
    }
    if snapshot.readings.len() > TEXT_ROW_LIMIT {
        out.push_str(&format!(
            "... and {} more\n",
            snapshot.readings.len() - TEXT_ROW_LIMIT
        ));
    }

    out
}
