//! Wind power forecasting core.
//!
//! Turns untyped weather observations into power predictions:
//!
//! - [`schema`]: validates records against the fixed observation schema
//! - [`features`]: derives cyclical features and applies the input scaler
//! - [`scaler`] and [`network`]: the pretrained artifacts
//! - [`predictor`]: owns the artifacts and runs preprocessing and inference
//! - [`pipeline`]: sequential composition of stages
//! - [`config`] and [`artifacts`]: configuration loading and fetch-if-missing

pub mod artifacts;
pub mod config;
pub mod features;
pub mod network;
pub mod pipeline;
pub mod predictor;
pub mod scaler;
pub mod schema;

pub use artifacts::ArtifactFetcher;
pub use config::{ConfigSource, PredictorConfig};
pub use features::{FeaturePreprocessor, FeatureVector, N_FEATURES};
pub use network::{Activation, DenseLayer, DenseNetwork, Regressor};
pub use pipeline::{FnStage, Pipeline, PipelineData, Stage};
pub use predictor::{Predictions, Predictor};
pub use scaler::MinMaxScaler;
pub use schema::{FieldKind, Payload, SchemaValidator, ValidatedInput, ValidatedRow, SCHEMA};

pub use windpower_common::{DateField, ForecastError, ForecastResult, SchemaError};
