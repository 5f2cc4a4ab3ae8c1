//! Sequential composition of forecast stages.
//!
//! A [`Pipeline`] feeds each stage's output into the next stage, left to
//! right. Stages exchange [`PipelineData`]; a stage handed data it cannot
//! process fails at run time with [`ForecastError::StageMismatch`], and any
//! stage error is returned to the caller unchanged.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use windpower_common::{ForecastError, ForecastResult};

use crate::predictor::{Predictions, Predictor};
use crate::schema::{SchemaValidator, ValidatedInput};

/// Data passed between stages.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineData {
    /// An untyped request body
    Raw(Value),
    /// Validator output
    Validated(ValidatedInput),
    /// Model output
    Predictions(Predictions),
}

impl PipelineData {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineData::Raw(_) => "raw payload",
            PipelineData::Validated(_) => "validated input",
            PipelineData::Predictions(_) => "predictions",
        }
    }

    /// Unwrap final pipeline output.
    pub fn into_predictions(self) -> ForecastResult<Predictions> {
        match self {
            PipelineData::Predictions(p) => Ok(p),
            other => Err(ForecastError::StageMismatch {
                stage: "output".to_string(),
                got: other.kind(),
            }),
        }
    }
}

impl From<Value> for PipelineData {
    fn from(value: Value) -> Self {
        PipelineData::Raw(value)
    }
}

/// One unary transform in a pipeline.
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, input: PipelineData) -> ForecastResult<PipelineData>;
}

impl Stage for SchemaValidator {
    fn name(&self) -> &str {
        "validate"
    }

    fn apply(&self, input: PipelineData) -> ForecastResult<PipelineData> {
        match input {
            PipelineData::Raw(value) => Ok(PipelineData::Validated(self.validate_value(&value)?)),
            other => Err(mismatch(self, &other)),
        }
    }
}

impl Stage for Predictor {
    fn name(&self) -> &str {
        "predict"
    }

    fn apply(&self, input: PipelineData) -> ForecastResult<PipelineData> {
        match input {
            PipelineData::Validated(validated) => {
                Ok(PipelineData::Predictions(self.predict(&validated)?))
            }
            other => Err(mismatch(self, &other)),
        }
    }
}

fn mismatch(stage: &dyn Stage, got: &PipelineData) -> ForecastError {
    ForecastError::StageMismatch {
        stage: stage.name().to_string(),
        got: got.kind(),
    }
}

/// A named closure usable as a stage.
pub struct FnStage<F> {
    name: String,
    f: F,
}

impl<F> FnStage<F>
where
    F: Fn(PipelineData) -> ForecastResult<PipelineData> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Stage for FnStage<F>
where
    F: Fn(PipelineData) -> ForecastResult<PipelineData> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, input: PipelineData) -> ForecastResult<PipelineData> {
        (self.f)(input)
    }
}

/// Ordered list of stages applied left to right.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    /// Compose stages in order. No compatibility check is done here.
    pub fn new(stages: impl IntoIterator<Item = Arc<dyn Stage>>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// Validator followed by the predictor.
    pub fn forecast(predictor: Arc<Predictor>) -> Self {
        let validator: Arc<dyn Stage> = Arc::new(*predictor.validator());
        Self::new([validator, predictor as Arc<dyn Stage>])
    }

    /// Append a stage.
    pub fn then(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the input through every stage. An empty pipeline returns its input.
    pub fn run(&self, input: impl Into<PipelineData>) -> ForecastResult<PipelineData> {
        self.stages
            .iter()
            .try_fold(input.into(), |data, stage| stage.apply(data))
    }

    /// Run a raw body and unwrap the predictions.
    pub fn predict(&self, payload: Value) -> ForecastResult<Predictions> {
        self.run(payload)?.into_predictions()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
