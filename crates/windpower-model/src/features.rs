//! Feature engineering for the power model.
//!
//! The model consumes seven columns in this order:
//!
//! | idx | feature             | derivation                  |
//! |-----|---------------------|-----------------------------|
//! | 0   | `u`                 | raw                         |
//! | 1   | `v`                 | raw                         |
//! | 2   | `ws`                | raw                         |
//! | 3   | `hour_cos`          | `cos(2pi * hour / 24)`      |
//! | 4   | `day_of_year_cos`   | `cos(2pi * ordinal / 365)`  |
//! | 5   | `wd_cos`            | `cos(2pi * wd / 360)`       |
//! | 6   | `hors`              | raw                         |
//!
//! The day-of-year term uses the calendar's true ordinal day, so Dec 31 of a
//! leap year is day 366 over a 365 divisor.

use chrono::{Datelike, NaiveDateTime, Timelike};
use nalgebra::DMatrix;
use std::f64::consts::TAU;
use std::sync::Arc;
use windpower_common::{DateField, ForecastError, ForecastResult};

use crate::scaler::MinMaxScaler;
use crate::schema::ValidatedRow;

/// Number of model input columns.
pub const N_FEATURES: usize = 7;

/// Cosine of the hour of day.
pub fn hour_cos(dt: &NaiveDateTime) -> f64 {
    (TAU * dt.hour() as f64 / 24.0).cos()
}

/// Cosine of the 1-based day of year.
pub fn day_of_year_cos(dt: &NaiveDateTime) -> f64 {
    (TAU * dt.ordinal() as f64 / 365.0).cos()
}

/// Cosine of the wind direction in degrees.
pub fn direction_cos(wd: f64) -> f64 {
    (TAU * wd / 360.0).cos()
}

/// Unscaled model input for one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; N_FEATURES]);

impl FeatureVector {
    /// Assemble features from already-resolved fields.
    pub fn build(date: &NaiveDateTime, hors: i64, u: f64, v: f64, ws: f64, wd: f64) -> Self {
        Self([
            u,
            v,
            ws,
            hour_cos(date),
            day_of_year_cos(date),
            direction_cos(wd),
            hors as f64,
        ])
    }

    /// Assemble features from a validated row, parsing a text date.
    pub fn from_row(row: &ValidatedRow) -> ForecastResult<Self> {
        let date = row.date.resolve()?;
        Ok(Self::build(&date, row.hors, row.u, row.v, row.ws, row.wd))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn hour_cos(&self) -> f64 {
        self.0[3]
    }

    pub fn day_of_year_cos(&self) -> f64 {
        self.0[4]
    }

    pub fn wd_cos(&self) -> f64 {
        self.0[5]
    }
}

/// Builds scaled model inputs using the pretrained input scaler.
#[derive(Debug, Clone)]
pub struct FeaturePreprocessor {
    x_scaler: Arc<MinMaxScaler>,
}

impl FeaturePreprocessor {
    /// The scaler must have been fitted on the seven model columns.
    pub fn new(x_scaler: Arc<MinMaxScaler>) -> ForecastResult<Self> {
        if x_scaler.n_features() != N_FEATURES {
            return Err(ForecastError::FeatureMismatch {
                expected: N_FEATURES,
                got: x_scaler.n_features(),
            });
        }
        Ok(Self { x_scaler })
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.x_scaler
    }

    /// Build and scale one row. Returns a 1 x 7 matrix.
    pub fn preprocess(
        &self,
        date: &DateField,
        hors: i64,
        u: f64,
        v: f64,
        ws: f64,
        wd: f64,
    ) -> ForecastResult<DMatrix<f64>> {
        let date = date.resolve()?;
        let features = FeatureVector::build(&date, hors, u, v, ws, wd);
        let scaled = self.x_scaler.transform_row(features.as_slice())?;
        Ok(DMatrix::from_row_slice(1, N_FEATURES, &scaled))
    }

    /// Build and scale a validated row.
    pub fn preprocess_row(&self, row: &ValidatedRow) -> ForecastResult<DMatrix<f64>> {
        self.preprocess(&row.date, row.hors, row.u, row.v, row.ws, row.wd)
    }

    /// Build and scale each row independently, stacking them in order.
    pub fn preprocess_batch(&self, rows: &[ValidatedRow]) -> ForecastResult<DMatrix<f64>> {
        let mut values = Vec::with_capacity(rows.len() * N_FEATURES);
        for row in rows {
            let features = FeatureVector::from_row(row)?;
            values.extend(self.x_scaler.transform_row(features.as_slice())?);
        }
        Ok(DMatrix::from_row_slice(rows.len(), N_FEATURES, &values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windpower_common::parse_forecast_date;

    fn identity_preprocessor() -> FeaturePreprocessor {
        let scaler = MinMaxScaler::new(vec![0.0; N_FEATURES], vec![1.0; N_FEATURES]).unwrap();
        FeaturePreprocessor::new(Arc::new(scaler)).unwrap()
    }

    #[test]
    fn test_feature_order() {
        let date = parse_forecast_date("2009070100").unwrap();
        let features = FeatureVector::build(&date, 3, 2.34, -0.79, 2.47, 180.0);
        let values = features.as_slice();
        assert_eq!(values[0], 2.34);
        assert_eq!(values[1], -0.79);
        assert_eq!(values[2], 2.47);
        assert_eq!(values[3], 1.0);
        assert!((values[4] - (TAU * 182.0 / 365.0).cos()).abs() < 1e-12);
        assert!((values[5] + 1.0).abs() < 1e-12);
        assert_eq!(values[6], 3.0);
    }

    #[test]
    fn test_noon_hour_cos() {
        let date = parse_forecast_date("2009070112").unwrap();
        assert!((hour_cos(&date) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_leap_year_uses_true_ordinal() {
        let date = parse_forecast_date("2012123100").unwrap();
        assert_eq!(date.ordinal(), 366);
        assert!((day_of_year_cos(&date) - (TAU * 366.0 / 365.0).cos()).abs() < 1e-12);
    }

    #[test]
    fn test_preprocess_shape() {
        let scaled = identity_preprocessor()
            .preprocess(&DateField::from("2009070100"), 1, 2.34, -0.79, 2.47, 108.68)
            .unwrap();
        assert_eq!(scaled.shape(), (1, N_FEATURES));
    }

    #[test]
    fn test_preprocess_bad_date() {
        let err = identity_preprocessor()
            .preprocess(&DateField::from("2009/07/01"), 1, 0.0, 0.0, 0.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, ForecastError::Parse(_)));
    }

    #[test]
    fn test_rejects_wrong_width_scaler() {
        let scaler = MinMaxScaler::new(vec![0.0; 6], vec![1.0; 6]).unwrap();
        assert!(FeaturePreprocessor::new(Arc::new(scaler)).is_err());
    }
}
