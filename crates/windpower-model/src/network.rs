//! Pretrained dense regression network.
//!
//! The model artifact is a JSON document listing fully connected layers:
//! ```json
//! {"layers": [{"weights": [[..], ..], "bias": [..], "activation": "relu"}]}
//! ```
//! `weights` is stored input-major (one row per input, one column per unit),
//! the same layout as a Keras `Dense` kernel.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;
use windpower_common::{ForecastError, ForecastResult};

/// An inference-capable model mapping a feature batch to predictions.
pub trait Regressor: Send + Sync + fmt::Debug {
    /// Number of input columns expected.
    fn n_features(&self) -> usize;

    /// Number of output columns produced.
    fn n_outputs(&self) -> usize;

    /// Number of layers, for reporting.
    fn depth(&self) -> usize {
        1
    }

    /// Run inference on a (batch x features) matrix.
    fn predict(&self, batch: &DMatrix<f64>) -> ForecastResult<DMatrix<f64>>;
}

/// Element-wise activation applied after a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(&self, x: &mut DMatrix<f64>) {
        match self {
            Activation::Linear => {}
            Activation::Relu => x.apply(|v| *v = v.max(0.0)),
            Activation::Sigmoid => x.apply(|v| *v = 1.0 / (1.0 + (-*v).exp())),
            Activation::Tanh => x.apply(|v| *v = v.tanh()),
        }
    }
}

/// Serialized layer as stored in the model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayerSpec {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

/// Serialized model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetworkSpec {
    pub layers: Vec<DenseLayerSpec>,
}

/// A fully connected layer: `activation(x * W + b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    weights: DMatrix<f64>,
    bias: DVector<f64>,
    activation: Activation,
}

impl DenseLayer {
    pub fn from_spec(spec: &DenseLayerSpec) -> ForecastResult<Self> {
        let inputs = spec.weights.len();
        let units = spec.bias.len();

        if inputs == 0 || units == 0 {
            return Err(ForecastError::config("dense layer has no weights"));
        }
        if let Some(row) = spec.weights.iter().find(|row| row.len() != units) {
            return Err(ForecastError::config(format!(
                "dense layer weight row has {} columns, bias has {}",
                row.len(),
                units
            )));
        }

        Ok(Self {
            weights: DMatrix::from_fn(inputs, units, |i, j| spec.weights[i][j]),
            bias: DVector::from_column_slice(&spec.bias),
            activation: spec.activation,
        })
    }

    pub fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn units(&self) -> usize {
        self.weights.ncols()
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    fn forward(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        let mut out = x * &self.weights;
        for (j, &b) in self.bias.iter().enumerate() {
            out.column_mut(j).add_scalar_mut(b);
        }
        self.activation.apply(&mut out);
        out
    }
}

/// Feed-forward network loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Build from a spec, checking that consecutive layer shapes chain.
    pub fn from_spec(spec: &DenseNetworkSpec) -> ForecastResult<Self> {
        if spec.layers.is_empty() {
            return Err(ForecastError::config("model has no layers"));
        }

        let layers = spec
            .layers
            .iter()
            .map(DenseLayer::from_spec)
            .collect::<ForecastResult<Vec<_>>>()?;

        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].units() != pair[1].inputs() {
                return Err(ForecastError::config(format!(
                    "layer {} outputs {} units but layer {} expects {} inputs",
                    i,
                    pair[0].units(),
                    i + 1,
                    pair[1].inputs()
                )));
            }
        }

        Ok(Self { layers })
    }

    /// Load a model artifact from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> ForecastResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ForecastError::artifact(path, e))?;
        let spec: DenseNetworkSpec =
            serde_json::from_slice(&bytes).map_err(|e| ForecastError::artifact(path, e))?;
        let network = Self::from_spec(&spec).map_err(|e| ForecastError::artifact(path, e))?;

        info!(
            path = %path.display(),
            layers = network.layers.len(),
            inputs = network.n_features(),
            outputs = network.n_outputs(),
            "Loaded dense network"
        );
        Ok(network)
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }
}

impl Regressor for DenseNetwork {
    fn n_features(&self) -> usize {
        self.layers[0].inputs()
    }

    fn n_outputs(&self) -> usize {
        self.layers[self.layers.len() - 1].units()
    }

    fn depth(&self) -> usize {
        self.layers.len()
    }

    fn predict(&self, batch: &DMatrix<f64>) -> ForecastResult<DMatrix<f64>> {
        if batch.ncols() != self.n_features() {
            return Err(ForecastError::FeatureMismatch {
                expected: self.n_features(),
                got: batch.ncols(),
            });
        }

        let mut x = batch.clone();
        for layer in &self.layers {
            x = layer.forward(&x);
        }
        Ok(x)
    }
}
