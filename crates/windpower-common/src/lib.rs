//! Common types and utilities shared across the wind power forecast crates.

pub mod error;
pub mod time;

pub use error::{ForecastError, ForecastResult, SchemaError};
pub use time::{format_forecast_date, parse_forecast_date, DateField, DateParseError, DATE_FORMAT};
