//! Wind power predictor.
//!
//! Owns the pretrained artifacts and runs
//! `validate -> preprocess -> infer -> (optional) inverse scale`.

use std::sync::Arc;

use nalgebra::DMatrix;
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use tracing::{debug, info, instrument};
use windpower_common::{DateField, ForecastError, ForecastResult};

use crate::artifacts::ArtifactFetcher;
use crate::config::{ConfigSource, PredictorConfig};
use crate::features::{FeaturePreprocessor, N_FEATURES};
use crate::network::{DenseNetwork, Regressor};
use crate::scaler::MinMaxScaler;
use crate::schema::{SchemaValidator, ValidatedInput};

/// Model output: one row per input observation, one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictions(DMatrix<f64>);

impl Predictions {
    pub fn new(matrix: DMatrix<f64>) -> Self {
        Self(matrix)
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.0
    }

    /// (rows, columns) of the output.
    pub fn shape(&self) -> (usize, usize) {
        self.0.shape()
    }

    pub fn len(&self) -> usize {
        self.0.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.0.nrows() == 0
    }

    /// Prediction for the i-th input row.
    pub fn get(&self, row: usize) -> Option<f64> {
        (row < self.0.nrows() && self.0.ncols() > 0).then(|| self.0[(row, 0)])
    }

    /// First-column values in input order.
    pub fn values(&self) -> Vec<f64> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }

    /// Nested rows, as serialized in responses.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.0
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

impl Serialize for Predictions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.nrows()))?;
        for row in self.to_rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

/// Serves predictions from a pretrained model and its scalers.
///
/// Everything is loaded at construction and read-only afterwards, so one
/// instance can be shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct Predictor {
    validator: SchemaValidator,
    preprocessor: FeaturePreprocessor,
    model: Arc<dyn Regressor>,
    x_scaler: Arc<MinMaxScaler>,
    y_scaler: Arc<MinMaxScaler>,
    inverse_scale_output: bool,
}

impl Predictor {
    /// Resolve configuration, fetch missing artifacts and load them.
    #[instrument(skip_all)]
    pub async fn from_config(source: impl Into<ConfigSource>) -> ForecastResult<Self> {
        let config = PredictorConfig::load(source)?;
        let fetcher = ArtifactFetcher::new()?;
        Self::with_fetcher(&config, &fetcher).await
    }

    /// Like [`Predictor::from_config`] with a caller-supplied fetcher.
    pub async fn with_fetcher(
        config: &PredictorConfig,
        fetcher: &ArtifactFetcher,
    ) -> ForecastResult<Self> {
        for artifact in config.artifacts() {
            info!(artifact = artifact.name, path = %artifact.path.display(), "Ensuring artifact");
            fetcher.ensure_local(artifact.url, artifact.path).await?;
        }
        Self::load_local(config)
    }

    /// Load artifacts that are already on disk.
    pub fn load_local(config: &PredictorConfig) -> ForecastResult<Self> {
        let model = DenseNetwork::load_from_file(&config.model_path)?;
        let x_scaler = MinMaxScaler::load_from_file(&config.minmax_x_scaler_path)?;
        let y_scaler = MinMaxScaler::load_from_file(&config.minmax_y_scaler_path)?;

        Self::from_parts(
            Arc::new(model),
            Arc::new(x_scaler),
            Arc::new(y_scaler),
            config.inverse_scale_output,
        )
    }

    /// Assemble a predictor from loaded parts, checking their shapes agree.
    pub fn from_parts(
        model: Arc<dyn Regressor>,
        x_scaler: Arc<MinMaxScaler>,
        y_scaler: Arc<MinMaxScaler>,
        inverse_scale_output: bool,
    ) -> ForecastResult<Self> {
        if model.n_features() != N_FEATURES {
            return Err(ForecastError::config(format!(
                "model expects {} inputs, features provide {}",
                model.n_features(),
                N_FEATURES
            )));
        }
        if model.n_outputs() != 1 {
            return Err(ForecastError::config(format!(
                "model produces {} outputs, expected 1",
                model.n_outputs()
            )));
        }
        if y_scaler.n_features() != model.n_outputs() {
            return Err(ForecastError::config(format!(
                "output scaler has {} columns, model produces {}",
                y_scaler.n_features(),
                model.n_outputs()
            )));
        }

        let preprocessor = FeaturePreprocessor::new(Arc::clone(&x_scaler))?;

        Ok(Self {
            validator: SchemaValidator::new(),
            preprocessor,
            model,
            x_scaler,
            y_scaler,
            inverse_scale_output,
        })
    }

    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    pub fn preprocessor(&self) -> &FeaturePreprocessor {
        &self.preprocessor
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn x_scaler(&self) -> &MinMaxScaler {
        &self.x_scaler
    }

    pub fn y_scaler(&self) -> &MinMaxScaler {
        &self.y_scaler
    }

    pub fn inverse_scale_output(&self) -> bool {
        self.inverse_scale_output
    }

    /// Build the scaled 1 x 7 model input for one observation.
    pub fn preprocess(
        &self,
        date: &DateField,
        hors: i64,
        u: f64,
        v: f64,
        ws: f64,
        wd: f64,
    ) -> ForecastResult<DMatrix<f64>> {
        self.preprocessor.preprocess(date, hors, u, v, ws, wd)
    }

    /// Predict for already-validated input.
    pub fn predict(&self, input: &ValidatedInput) -> ForecastResult<Predictions> {
        let batch = match input {
            ValidatedInput::Single(row) => self.preprocessor.preprocess_row(row)?,
            ValidatedInput::Batch(rows) => self.preprocessor.preprocess_batch(rows)?,
        };

        let mut output = self.model.predict(&batch)?;
        if self.inverse_scale_output {
            output = self.y_scaler.inverse_transform(&output)?;
        }

        debug!(rows = output.nrows(), "Prediction complete");
        Ok(Predictions::new(output))
    }

    /// Validate a raw JSON body, then predict.
    pub fn call(&self, payload: &Value) -> ForecastResult<Predictions> {
        let validated = self.validator.validate_value(payload)?;
        self.predict(&validated)
    }
}
