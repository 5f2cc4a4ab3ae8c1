//! Tests for compact observation date handling.

use chrono::{Datelike, NaiveDate, Timelike};
use windpower_common::time::{format_forecast_date, parse_forecast_date, DateParseError};

// ============================================================================
// Round trip tests
// ============================================================================

#[test]
fn test_round_trip_every_hour_of_a_day() {
    for hour in 0..24 {
        let s = format!("20090701{:02}", hour);
        let dt = parse_forecast_date(&s).unwrap();
        assert_eq!(dt.hour(), hour);
        assert_eq!(format_forecast_date(&dt), s);
    }
}

#[test]
fn test_round_trip_every_day_of_leap_year() {
    let mut date = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
    let mut count = 0;
    while date.year() == 2012 {
        let s = format!("{}{:02}", date.format("%Y%m%d"), (count % 24) as u32);
        let dt = parse_forecast_date(&s).unwrap();
        assert_eq!(dt.date(), date);
        assert_eq!(format_forecast_date(&dt), s);
        date = date.succ_opt().unwrap();
        count += 1;
    }
    assert_eq!(count, 366);
}

#[test]
fn test_round_trip_zero_padded_years() {
    for s in ["0001010100", "0999123123", "9999123123"] {
        let dt = parse_forecast_date(s).unwrap();
        assert_eq!(format_forecast_date(&dt), s);
    }
}

// ============================================================================
// Rejection tests
// ============================================================================

#[test]
fn test_rejects_empty() {
    assert!(matches!(
        parse_forecast_date(""),
        Err(DateParseError::InvalidFormat(_))
    ));
}

#[test]
fn test_rejects_iso8601() {
    assert!(matches!(
        parse_forecast_date("2009-07-01T00:00:00Z"),
        Err(DateParseError::InvalidFormat(_))
    ));
}

#[test]
fn test_rejects_signed_number() {
    assert!(matches!(
        parse_forecast_date("+200907010"),
        Err(DateParseError::InvalidFormat(_))
    ));
}

#[test]
fn test_rejects_day_zero() {
    assert!(matches!(
        parse_forecast_date("2009070000"),
        Err(DateParseError::OutOfRange(_))
    ));
}

#[test]
fn test_error_message_names_input() {
    let err = parse_forecast_date("91919191").unwrap_err();
    assert!(err.to_string().contains("91919191"));
}
