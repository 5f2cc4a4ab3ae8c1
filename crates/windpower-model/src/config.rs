//! Predictor configuration.
//!
//! Loaded from a YAML file or supplied as an in-memory mapping:
//!
//! ```yaml
//! best_model_url: https://host/best_model.json
//! model_path: models/best_model.json
//! minmax_x_scaler_url: https://host/minmax_x.json
//! minmax_x_scaler_path: models/minmax_x.json
//! minmax_y_scaler_url: https://host/minmax_y.json
//! minmax_y_scaler_path: models/minmax_y.json
//! inverse_scale_output: false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use windpower_common::{ForecastError, ForecastResult};

/// Locations of the model and scaler artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Where to fetch the model if it is not on disk.
    pub best_model_url: String,
    /// Local path of the model artifact.
    pub model_path: PathBuf,

    /// Where to fetch the input scaler if it is not on disk.
    pub minmax_x_scaler_url: String,
    /// Local path of the input scaler artifact.
    pub minmax_x_scaler_path: PathBuf,

    /// Where to fetch the output scaler if it is not on disk.
    pub minmax_y_scaler_url: String,
    /// Local path of the output scaler artifact.
    pub minmax_y_scaler_path: PathBuf,

    /// Map model output back through the output scaler.
    #[serde(default)]
    pub inverse_scale_output: bool,
}

/// One artifact the predictor needs locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactLocation<'a> {
    pub name: &'static str,
    pub url: &'a str,
    pub path: &'a Path,
}

/// Where a configuration comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Already typed
    Config(PredictorConfig),
    /// An untyped YAML value, expected to be a mapping
    Yaml(serde_yaml::Value),
    /// An untyped JSON value, expected to be an object
    Json(serde_json::Value),
    /// Path to a YAML file
    File(PathBuf),
}

impl From<PredictorConfig> for ConfigSource {
    fn from(config: PredictorConfig) -> Self {
        ConfigSource::Config(config)
    }
}

impl From<serde_yaml::Value> for ConfigSource {
    fn from(value: serde_yaml::Value) -> Self {
        ConfigSource::Yaml(value)
    }
}

impl From<serde_json::Value> for ConfigSource {
    fn from(value: serde_json::Value) -> Self {
        ConfigSource::Json(value)
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::File(path)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        ConfigSource::File(path.to_path_buf())
    }
}

impl From<&str> for ConfigSource {
    fn from(path: &str) -> Self {
        ConfigSource::File(PathBuf::from(path))
    }
}

impl PredictorConfig {
    /// Resolve a configuration from any supported source.
    pub fn load(source: impl Into<ConfigSource>) -> ForecastResult<Self> {
        match source.into() {
            ConfigSource::Config(config) => Ok(config),
            ConfigSource::Yaml(value) => Self::from_yaml_value(value),
            ConfigSource::Json(value) => Self::from_json_value(value),
            ConfigSource::File(path) => Self::from_yaml_file(&path),
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> ForecastResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ForecastError::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let value: serde_yaml::Value = serde_yaml::from_str(&content).map_err(|e| {
            ForecastError::config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        let config = Self::from_yaml_value(value)?;
        info!(path = %path.display(), "Loaded predictor configuration");
        Ok(config)
    }

    fn from_yaml_value(value: serde_yaml::Value) -> ForecastResult<Self> {
        if !value.is_mapping() {
            return Err(ForecastError::config(format!(
                "configuration must be a mapping, found {}",
                yaml_kind(&value)
            )));
        }
        serde_yaml::from_value(value).map_err(|e| ForecastError::config(e.to_string()))
    }

    fn from_json_value(value: serde_json::Value) -> ForecastResult<Self> {
        if !value.is_object() {
            return Err(ForecastError::config(format!(
                "configuration must be a mapping, found {}",
                value
            )));
        }
        serde_json::from_value(value).map_err(|e| ForecastError::config(e.to_string()))
    }

    /// The three artifacts in load order: model, input scaler, output scaler.
    pub fn artifacts(&self) -> [ArtifactLocation<'_>; 3] {
        [
            ArtifactLocation {
                name: "model",
                url: &self.best_model_url,
                path: &self.model_path,
            },
            ArtifactLocation {
                name: "minmax_x_scaler",
                url: &self.minmax_x_scaler_url,
                path: &self.minmax_x_scaler_path,
            },
            ArtifactLocation {
                name: "minmax_y_scaler",
                url: &self.minmax_y_scaler_url,
                path: &self.minmax_y_scaler_path,
            },
        ]
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_config() -> serde_json::Value {
        json!({
            "best_model_url": "https://artifacts.local/best_model.json",
            "model_path": "models/best_model.json",
            "minmax_x_scaler_url": "https://artifacts.local/x.json",
            "minmax_x_scaler_path": "models/x.json",
            "minmax_y_scaler_url": "https://artifacts.local/y.json",
            "minmax_y_scaler_path": "models/y.json"
        })
    }

    #[test]
    fn test_load_json_mapping() {
        let config = PredictorConfig::load(json_config()).unwrap();
        assert_eq!(config.model_path, PathBuf::from("models/best_model.json"));
        assert!(!config.inverse_scale_output);
        assert_eq!(config.artifacts()[1].name, "minmax_x_scaler");
        assert_eq!(config.artifacts()[2].path, Path::new("models/y.json"));
    }

    #[test]
    fn test_load_yaml_mapping() {
        let yaml = r#"
best_model_url: https://artifacts.local/best_model.json
model_path: models/best_model.json
minmax_x_scaler_url: https://artifacts.local/x.json
minmax_x_scaler_path: models/x.json
minmax_y_scaler_url: https://artifacts.local/y.json
minmax_y_scaler_path: models/y.json
inverse_scale_output: true
"#;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let config = PredictorConfig::load(value).unwrap();
        assert!(config.inverse_scale_output);
    }

    #[test]
    fn test_non_mapping_rejected() {
        let err = PredictorConfig::load(json!(["model_path"])).unwrap_err();
        assert!(matches!(err, ForecastError::Config(_)));

        let err = PredictorConfig::load(serde_yaml::Value::from(42)).unwrap_err();
        assert!(err.to_string().contains("a number"));
    }

    #[test]
    fn test_missing_key_rejected() {
        let mut value = json_config();
        value.as_object_mut().unwrap().remove("minmax_y_scaler_url");
        let err = PredictorConfig::load(value).unwrap_err();
        assert!(err.to_string().contains("minmax_y_scaler_url"));
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = PredictorConfig::load("/nonexistent/forecast.yaml").unwrap_err();
        assert!(matches!(err, ForecastError::Config(_)));
    }
}
