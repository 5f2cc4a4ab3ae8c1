//! Tests for the shipped predictor configuration.

use std::path::Path;

use test_utils::workspace_root;
use windpower_model::PredictorConfig;

#[test]
fn test_shipped_config_parses() {
    let path = workspace_root().join("config").join("forecast.yaml");
    let config = PredictorConfig::from_yaml_file(&path).expect("config/forecast.yaml should parse");

    assert!(!config.inverse_scale_output);
    assert_eq!(config.model_path, Path::new("models/best_model.json"));

    let names: Vec<_> = config.artifacts().iter().map(|a| a.name).collect();
    assert_eq!(names.len(), 3);
    for artifact in config.artifacts() {
        assert!(artifact.url.starts_with("https://"), "{} has no URL", artifact.name);
    }
}
