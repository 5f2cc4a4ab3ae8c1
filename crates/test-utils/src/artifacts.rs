//! Deterministic model and scaler artifacts for tests.
//!
//! The fixture model is a single linear layer, so the expected prediction
//! for any feature row can be computed by hand with [`fixture_expected`].

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Input scaler minimum per model column.
pub const FIXTURE_X_MIN: [f64; 7] = [-20.0, -20.0, 0.0, -1.0, -1.0, -1.0, 1.0];

/// Input scaler maximum per model column.
pub const FIXTURE_X_MAX: [f64; 7] = [20.0, 20.0, 30.0, 1.0, 1.0, 1.0, 49.0];

/// Output scaler range (power in kW).
pub const FIXTURE_Y_RANGE: (f64, f64) = (0.0, 2000.0);

/// Linear layer weights, one per model column.
pub const FIXTURE_WEIGHTS: [f64; 7] = [0.30, -0.10, 0.45, 0.05, 0.02, 0.04, -0.08];

/// Linear layer bias.
pub const FIXTURE_BIAS: f64 = 0.01;

/// Expected model output for an unscaled feature row
/// `[u, v, ws, hour_cos, day_of_year_cos, wd_cos, hors]`.
pub fn fixture_expected(features: [f64; 7]) -> f64 {
    features
        .iter()
        .enumerate()
        .map(|(j, &x)| {
            let scaled = (x - FIXTURE_X_MIN[j]) / (FIXTURE_X_MAX[j] - FIXTURE_X_MIN[j]);
            scaled * FIXTURE_WEIGHTS[j]
        })
        .sum::<f64>()
        + FIXTURE_BIAS
}

/// Model artifact JSON for the fixture network.
pub fn fixture_model_json() -> Value {
    json!({
        "layers": [{
            "weights": FIXTURE_WEIGHTS.iter().map(|w| vec![*w]).collect::<Vec<_>>(),
            "bias": [FIXTURE_BIAS],
            "activation": "linear"
        }]
    })
}

/// Input scaler artifact JSON.
pub fn fixture_x_scaler_json() -> Value {
    json!({
        "data_min": FIXTURE_X_MIN,
        "data_max": FIXTURE_X_MAX,
        "feature_range": [0.0, 1.0]
    })
}

/// Output scaler artifact JSON.
pub fn fixture_y_scaler_json() -> Value {
    json!({
        "data_min": [FIXTURE_Y_RANGE.0],
        "data_max": [FIXTURE_Y_RANGE.1]
    })
}

/// Fixture artifacts written to a directory.
#[derive(Debug, Clone)]
pub struct FixtureArtifacts {
    pub model_path: PathBuf,
    pub x_scaler_path: PathBuf,
    pub y_scaler_path: PathBuf,
}

impl FixtureArtifacts {
    /// Write the three fixture artifacts into `dir`.
    pub fn write(dir: &Path) -> std::io::Result<Self> {
        let artifacts = Self {
            model_path: dir.join("best_model.json"),
            x_scaler_path: dir.join("minmax_x_scaler.json"),
            y_scaler_path: dir.join("minmax_y_scaler.json"),
        };

        std::fs::create_dir_all(dir)?;
        std::fs::write(&artifacts.model_path, fixture_model_json().to_string())?;
        std::fs::write(&artifacts.x_scaler_path, fixture_x_scaler_json().to_string())?;
        std::fs::write(&artifacts.y_scaler_path, fixture_y_scaler_json().to_string())?;

        Ok(artifacts)
    }

    /// Config whose paths point at the written artifacts (nothing to fetch).
    pub fn local_config(&self) -> Value {
        json!({
            "best_model_url": file_url(&self.model_path),
            "model_path": self.model_path,
            "minmax_x_scaler_url": file_url(&self.x_scaler_path),
            "minmax_x_scaler_path": self.x_scaler_path,
            "minmax_y_scaler_url": file_url(&self.y_scaler_path),
            "minmax_y_scaler_path": self.y_scaler_path,
        })
    }

    /// Config whose paths live under `dest` (not yet present), with
    /// `file://` URLs pointing at the written artifacts.
    pub fn remote_config(&self, dest: &Path) -> Value {
        json!({
            "best_model_url": file_url(&self.model_path),
            "model_path": dest.join("model").join("best_model.json"),
            "minmax_x_scaler_url": file_url(&self.x_scaler_path),
            "minmax_x_scaler_path": dest.join("scalers").join("minmax_x_scaler.json"),
            "minmax_y_scaler_url": file_url(&self.y_scaler_path),
            "minmax_y_scaler_path": dest.join("scalers").join("minmax_y_scaler.json"),
        })
    }
}

/// `file://` URL for a local path.
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::temp_test_dir;

    #[test]
    fn test_write_fixture_artifacts() {
        let dir = temp_test_dir();
        let artifacts = FixtureArtifacts::write(dir.path()).unwrap();
        assert!(artifacts.model_path.exists());
        assert!(artifacts.x_scaler_path.exists());
        assert!(artifacts.y_scaler_path.exists());

        let model: Value =
            serde_json::from_str(&std::fs::read_to_string(&artifacts.model_path).unwrap()).unwrap();
        assert_eq!(model["layers"][0]["weights"].as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn test_fixture_expected_at_minimum() {
        // Every column at its minimum scales to zero, leaving the bias.
        assert!((fixture_expected(FIXTURE_X_MIN) - FIXTURE_BIAS).abs() < 1e-12);
    }

    #[test]
    fn test_config_urls() {
        let artifacts = FixtureArtifacts {
            model_path: PathBuf::from("/tmp/a/best_model.json"),
            x_scaler_path: PathBuf::from("/tmp/a/x.json"),
            y_scaler_path: PathBuf::from("/tmp/a/y.json"),
        };
        let config = artifacts.remote_config(Path::new("/tmp/b"));
        assert_eq!(config["best_model_url"], "file:///tmp/a/best_model.json");
        assert_eq!(config["model_path"], "/tmp/b/model/best_model.json");
    }
}
