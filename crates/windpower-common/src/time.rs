//! Date handling for forecast observations.
//!
//! Observation dates arrive either as a timestamp or as a compact
//! `YYYYMMDDHH` string (e.g. `"2009070100"` = 2009-07-01 00:00).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// chrono format string equivalent of the compact observation date.
pub const DATE_FORMAT: &str = "%Y%m%d%H";

/// Length of a compact `YYYYMMDDHH` date string.
const DATE_LEN: usize = 10;

/// Error parsing a compact observation date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("date '{0}' does not match the YYYYMMDDHH format")]
    InvalidFormat(String),

    #[error("date '{0}' is not a valid calendar date and hour")]
    OutOfRange(String),
}

/// Parse a `YYYYMMDDHH` string into a naive (UTC) datetime.
///
/// Exactly ten ASCII digits are accepted; no separators, no trailing
/// minutes, no surrounding whitespace.
pub fn parse_forecast_date(s: &str) -> Result<NaiveDateTime, DateParseError> {
    if s.len() != DATE_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateParseError::InvalidFormat(s.to_string()));
    }

    // All bytes are ASCII digits, so slicing and parsing cannot fail.
    let year: i32 = s[0..4].parse().map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;
    let month: u32 = s[4..6].parse().map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;
    let day: u32 = s[6..8].parse().map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;
    let hour: u32 = s[8..10].parse().map_err(|_| DateParseError::InvalidFormat(s.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| DateParseError::OutOfRange(s.to_string()))
}

/// Format a datetime back into the compact `YYYYMMDDHH` form.
pub fn format_forecast_date(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

/// The `date` field of an observation.
///
/// Text dates are kept as supplied and only parsed when features are built,
/// so validation never rewrites the caller's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateField {
    /// A compact `YYYYMMDDHH` string
    Text(String),
    /// An already-parsed timestamp
    Timestamp(NaiveDateTime),
}

impl DateField {
    /// Resolve to a datetime, parsing text dates.
    pub fn resolve(&self) -> Result<NaiveDateTime, DateParseError> {
        match self {
            DateField::Text(s) => parse_forecast_date(s),
            DateField::Timestamp(dt) => Ok(*dt),
        }
    }
}

impl From<NaiveDateTime> for DateField {
    fn from(dt: NaiveDateTime) -> Self {
        DateField::Timestamp(dt)
    }
}

impl From<&str> for DateField {
    fn from(s: &str) -> Self {
        DateField::Text(s.to_string())
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Text(s) => f.write_str(s),
            DateField::Timestamp(dt) => write!(f, "{}", format_forecast_date(dt)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_midnight() {
        let dt = parse_forecast_date("2009070100").unwrap();
        assert_eq!(dt.year(), 2009);
        assert_eq!(dt.month(), 7);
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_last_hour() {
        let dt = parse_forecast_date("2012123123").unwrap();
        assert_eq!(dt.hour(), 23);
        assert_eq!(dt.ordinal(), 366);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(matches!(
            parse_forecast_date("20090701"),
            Err(DateParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_forecast_date("200907010000"),
            Err(DateParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_non_digits() {
        assert!(matches!(
            parse_forecast_date("2009-07-01"),
            Err(DateParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_forecast_date(" 200907010"),
            Err(DateParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            parse_forecast_date("2009130100"),
            Err(DateParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_forecast_date("2009070124"),
            Err(DateParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_forecast_date("2009022900"),
            Err(DateParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_date_field_resolve() {
        let text = DateField::from("2009070800");
        let parsed = parse_forecast_date("2009070800").unwrap();
        assert_eq!(text.resolve().unwrap(), parsed);
        assert_eq!(DateField::from(parsed).resolve().unwrap(), parsed);
        assert_eq!(DateField::from(parsed).to_string(), "2009070800");
    }
}
