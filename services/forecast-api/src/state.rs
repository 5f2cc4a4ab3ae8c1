//! Application state for the forecast API.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use windpower_model::{Pipeline, Predictor};

/// Shared application state.
pub struct AppState {
    /// Loaded predictor, shared read-only by every request.
    pub predictor: Arc<Predictor>,

    /// Validate-then-predict pipeline over the predictor.
    pub pipeline: Pipeline,

    /// Prometheus recorder handle, when one is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the predictor from a YAML config, fetching artifacts as needed.
    pub async fn new(config_path: &Path, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let predictor = Predictor::from_config(config_path)
            .await
            .with_context(|| format!("Failed to build predictor from {}", config_path.display()))?;

        info!(
            layers = predictor.model().depth(),
            inverse_scale_output = predictor.inverse_scale_output(),
            "Predictor ready"
        );

        Ok(Self::with_predictor(predictor, prometheus))
    }

    /// Wrap an already-built predictor.
    pub fn with_predictor(predictor: Predictor, prometheus: Option<PrometheusHandle>) -> Self {
        let predictor = Arc::new(predictor);
        Self {
            pipeline: Pipeline::forecast(Arc::clone(&predictor)),
            predictor,
            prometheus,
        }
    }
}
