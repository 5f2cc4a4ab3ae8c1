//! Pretrained min-max scaler.
//!
//! The transformation is given by:
//! ```text
//! X_scaled = (X - X_min) / (X_max - X_min) * (hi - lo) + lo
//! ```
//!
//! Parameters are learned at training time and stored as JSON:
//! ```json
//! {"data_min": [..], "data_max": [..], "feature_range": [0.0, 1.0]}
//! ```

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use windpower_common::{ForecastError, ForecastResult};

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Serialized parameters of a fitted scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    /// Minimum of each feature seen during training.
    #[serde(alias = "data_min_")]
    pub data_min: Vec<f64>,
    /// Maximum of each feature seen during training.
    #[serde(alias = "data_max_")]
    pub data_max: Vec<f64>,
    /// Target range.
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

/// Fitted per-column affine scaler, read-only after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    data_min: Vec<f64>,
    data_max: Vec<f64>,
    /// (hi - lo) / (max - min), or (hi - lo) for constant columns
    scale: Vec<f64>,
    range_min: f64,
    range_max: f64,
}

impl MinMaxScaler {
    /// Build a scaler from stored parameters.
    pub fn from_params(params: MinMaxScalerParams) -> ForecastResult<Self> {
        let MinMaxScalerParams {
            data_min,
            data_max,
            feature_range: (lo, hi),
        } = params;

        if data_min.is_empty() {
            return Err(ForecastError::config("scaler has no features"));
        }
        if data_min.len() != data_max.len() {
            return Err(ForecastError::config(format!(
                "scaler min/max length mismatch: {} vs {}",
                data_min.len(),
                data_max.len()
            )));
        }
        if !(hi > lo) {
            return Err(ForecastError::config(format!(
                "invalid feature range ({}, {})",
                lo, hi
            )));
        }

        let target = hi - lo;
        let scale = data_min
            .iter()
            .zip(&data_max)
            .map(|(&min, &max)| {
                let range = max - min;
                // Constant feature: divide by 1 instead of 0
                if range == 0.0 {
                    target
                } else {
                    target / range
                }
            })
            .collect();

        Ok(Self {
            data_min,
            data_max,
            scale,
            range_min: lo,
            range_max: hi,
        })
    }

    /// Convenience constructor with the default `[0, 1]` range.
    pub fn new(data_min: Vec<f64>, data_max: Vec<f64>) -> ForecastResult<Self> {
        Self::from_params(MinMaxScalerParams {
            data_min,
            data_max,
            feature_range: default_feature_range(),
        })
    }

    /// Load a scaler artifact from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> ForecastResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ForecastError::artifact(path, e))?;
        let params: MinMaxScalerParams =
            serde_json::from_slice(&bytes).map_err(|e| ForecastError::artifact(path, e))?;
        let scaler = Self::from_params(params).map_err(|e| ForecastError::artifact(path, e))?;

        info!(
            path = %path.display(),
            features = scaler.n_features(),
            "Loaded min-max scaler"
        );
        Ok(scaler)
    }

    /// Stored parameters, for saving.
    pub fn params(&self) -> MinMaxScalerParams {
        MinMaxScalerParams {
            data_min: self.data_min.clone(),
            data_max: self.data_max.clone(),
            feature_range: (self.range_min, self.range_max),
        }
    }

    /// Number of columns this scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.data_min.len()
    }

    fn check_columns(&self, got: usize) -> ForecastResult<()> {
        if got != self.n_features() {
            return Err(ForecastError::FeatureMismatch {
                expected: self.n_features(),
                got,
            });
        }
        Ok(())
    }

    /// Scale a single row.
    pub fn transform_row(&self, row: &[f64]) -> ForecastResult<Vec<f64>> {
        self.check_columns(row.len())?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &x)| (x - self.data_min[j]) * self.scale[j] + self.range_min)
            .collect())
    }

    /// Scale every row of a batch.
    pub fn transform(&self, data: &DMatrix<f64>) -> ForecastResult<DMatrix<f64>> {
        self.check_columns(data.ncols())?;
        Ok(DMatrix::from_fn(data.nrows(), data.ncols(), |i, j| {
            (data[(i, j)] - self.data_min[j]) * self.scale[j] + self.range_min
        }))
    }

    /// Map scaled values back to the original units.
    pub fn inverse_transform(&self, data: &DMatrix<f64>) -> ForecastResult<DMatrix<f64>> {
        self.check_columns(data.ncols())?;
        Ok(DMatrix::from_fn(data.nrows(), data.ncols(), |i, j| {
            (data[(i, j)] - self.range_min) / self.scale[j] + self.data_min[j]
        }))
    }
}
