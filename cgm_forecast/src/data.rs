//! Raw CGM records, ingestion and validation
//!
//! A [`RawRecord`] is one row as it arrives from outside: a map from column
//! name to text or number. [`validate_records`] turns a sequence of them into
//! typed [`GlucoseReading`]s, checking timestamps and the CGM column once at
//! ingestion so feature computation never has to look at strings.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Timestamp column
pub const DATE_COLUMN: &str = "Date";

/// Glucose reading column
pub const CGM_COLUMN: &str = "CGM (mg/dl)";

/// Nutrition columns, in feature order
pub const NUTRITION_COLUMNS: [&str; 10] = [
    "Calories",
    "Total Fat",
    "Saturated Fat",
    "Trans Fat",
    "Cholesterol",
    "Sodium",
    "Total Carbohydrates",
    "Dietary Fiber",
    "Sugars",
    "Protein",
];

/// A single cell of a raw record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
}

impl FieldValue {
    /// Numeric value, or `None` if the cell is empty or not a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    /// Numeric value with a zero fallback
    pub fn as_f64_or_zero(&self) -> f64 {
        self.as_f64().unwrap_or(0.0)
    }

    /// Text rendering of the cell
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Number(value) => value.to_string(),
            FieldValue::Text(text) => text.clone(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// One observation: column name to cell value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value
    pub fn insert(&mut self, column: &str, value: impl Into<FieldValue>) {
        self.fields.insert(column.to_string(), value.into());
    }

    /// Look up a column
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Number of columns present
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<HashMap<String, String>> for RawRecord {
    fn from(row: HashMap<String, String>) -> Self {
        Self {
            fields: row
                .into_iter()
                .map(|(column, value)| (column, FieldValue::Text(value)))
                .collect(),
        }
    }
}

/// Validated observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlucoseReading {
    /// Wall-clock time of the reading
    pub timestamp: NaiveDateTime,
    /// Glucose in mg/dl
    pub cgm: f64,
    /// Nutrition values in [`NUTRITION_COLUMNS`] order
    pub nutrition: [f64; 10],
}

impl GlucoseReading {
    /// Minutes since midnight of the reading's wall clock
    pub fn minutes_since_midnight(&self) -> u32 {
        self.timestamp.hour() * 60 + self.timestamp.minute()
    }
}

/// Data loader for CGM CSV exports
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load raw records from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load raw records from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in reader.deserialize::<HashMap<String, String>>() {
            records.push(RawRecord::from(row?));
        }

        log::debug!("Loaded {} raw records", records.len());
        Ok(records)
    }
}

const DATE_TIME_FORMATS: [&str; 10] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// A parsed timestamp cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    /// Wall clock as written, used for time of day
    pub wall_clock: NaiveDateTime,
    /// Point in time used for ordering; UTC for offset-bearing cells, the
    /// wall clock otherwise
    pub instant: NaiveDateTime,
}

/// Parse a timestamp cell into a wall-clock date-time.
///
/// Offset-bearing timestamps keep the wall clock of their own offset.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    parse_timestamp_cell(raw).map(|parsed| parsed.wall_clock)
}

/// Parse a timestamp cell, keeping both its wall clock and its instant
pub fn parse_timestamp_cell(raw: &str) -> Option<ParsedTimestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(ParsedTimestamp {
            wall_clock: parsed.naive_local(),
            instant: parsed.naive_utc(),
        });
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            ["%Y-%m-%d", "%m/%d/%Y"]
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|wall_clock| ParsedTimestamp {
            wall_clock,
            instant: wall_clock,
        })
}

/// Validate raw records into readings.
///
/// Fails fast on the first row whose timestamp is missing or unparseable,
/// whose CGM column is absent, or whose timestamp is earlier than the row
/// before it. Offset-bearing timestamps are ordered by instant, so a
/// daylight-saving fall-back does not count as going backwards.
/// Non-numeric CGM and nutrition cells read as 0.
pub fn validate_records(records: &[RawRecord]) -> Result<Vec<GlucoseReading>> {
    let mut readings: Vec<GlucoseReading> = Vec::with_capacity(records.len());
    let mut previous: Option<ParsedTimestamp> = None;

    for (index, record) in records.iter().enumerate() {
        let row = index + 1;

        let raw_date = record
            .get(DATE_COLUMN)
            .ok_or_else(|| ForecastError::malformed(row, format!("missing '{}'", DATE_COLUMN)))?
            .as_text();
        let parsed = parse_timestamp_cell(&raw_date).ok_or_else(|| {
            ForecastError::malformed(row, format!("unparseable timestamp '{}'", raw_date))
        })?;

        let cgm_field = record
            .get(CGM_COLUMN)
            .ok_or_else(|| ForecastError::malformed(row, format!("missing '{}'", CGM_COLUMN)))?;
        let cgm = cgm_field.as_f64().unwrap_or_else(|| {
            log::debug!("Row {}: non-numeric CGM '{}' read as 0", row, cgm_field.as_text());
            0.0
        });

        let mut nutrition = [0.0; 10];
        for (slot, column) in nutrition.iter_mut().zip(NUTRITION_COLUMNS) {
            *slot = record.get(column).map_or(0.0, FieldValue::as_f64_or_zero);
        }

        if let Some(before) = previous {
            if parsed.instant < before.instant {
                return Err(ForecastError::malformed(
                    row,
                    format!(
                        "timestamp '{}' is earlier than the previous reading {}",
                        raw_date, before.wall_clock
                    ),
                ));
            }
        }
        previous = Some(parsed);

        readings.push(GlucoseReading {
            timestamp: parsed.wall_clock,
            cgm,
            nutrition,
        });
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-03-01 08:15:00"), Some(at(8, 15)));
        assert_eq!(parse_timestamp("2024-03-01 08:15"), Some(at(8, 15)));
        assert_eq!(parse_timestamp("2024-03-01T08:15:00"), Some(at(8, 15)));
        assert_eq!(parse_timestamp("2024-03-01T08:15:00+05:30"), Some(at(8, 15)));
        assert_eq!(parse_timestamp("03/01/2024 08:15"), Some(at(8, 15)));
        assert_eq!(parse_timestamp("03/01/2024 8:15 PM"), Some(at(20, 15)));
        assert_eq!(parse_timestamp("2024-03-01"), Some(at(0, 0)));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("  "), None);
    }

    #[test]
    fn test_field_value_parsing() {
        assert_eq!(FieldValue::from("  12.5 ").as_f64(), Some(12.5));
        assert_eq!(FieldValue::from("n/a").as_f64_or_zero(), 0.0);
        assert_eq!(FieldValue::from(3.0).as_f64(), Some(3.0));
    }

    #[test]
    fn test_minutes_since_midnight() {
        let reading = GlucoseReading {
            timestamp: at(13, 45),
            cgm: 110.0,
            nutrition: [0.0; 10],
        };
        assert_eq!(reading.minutes_since_midnight(), 825);
    }
}
