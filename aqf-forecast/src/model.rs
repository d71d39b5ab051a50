//! Serialized model artifacts and their inference.
//!
//! Two architectures are supported, both stored as JSON tagged by `kind`:
//!
//! - `dense`: one linear layer over the flattened window. `weights` is
//!   `horizon` rows of `lag * n_features` values, time-major.
//! - `lstm`: a single LSTM layer followed by a dense head, using Keras
//!   weight layout. `kernel` is `n_features × 4·units`,
//!   `recurrent_kernel` is `units × 4·units`, `bias` is `4·units`, with
//!   gates in input, forget, cell, output order. `dense_kernel` is
//!   `units × horizon`.

use std::path::Path;

use ndarray::{s, Array1, Array2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::predictor::Predictor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelFile {
    Dense {
        lag: usize,
        n_features: usize,
        weights: Vec<Vec<f64>>,
        bias: Vec<f64>,
    },
    Lstm {
        lag: usize,
        n_features: usize,
        kernel: Vec<Vec<f64>>,
        recurrent_kernel: Vec<Vec<f64>>,
        bias: Vec<f64>,
        dense_kernel: Vec<Vec<f64>>,
        dense_bias: Vec<f64>,
    },
}

fn invalid(message: String) -> ForecastError {
    ForecastError::ArtifactLoad(message)
}

fn to_matrix(what: &str, rows: Vec<Vec<f64>>) -> Result<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if n_rows == 0 || n_cols == 0 {
        return Err(invalid(format!("{} is empty", what)));
    }
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(invalid(format!("{} rows differ in length", what)));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    to_finite(what, &flat)?;
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| invalid(format!("{}: {}", what, e)))
}

fn to_vector(what: &str, values: Vec<f64>, len: usize) -> Result<Array1<f64>> {
    if values.len() != len {
        return Err(invalid(format!(
            "{} has {} values, expected {}",
            what,
            values.len(),
            len
        )));
    }
    to_finite(what, &values)?;
    Ok(Array1::from(values))
}

fn to_finite(what: &str, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(invalid(format!("{} contains non-finite values", what)));
    }
    Ok(())
}

fn expect_dim(what: &str, found: (usize, usize), expected: (usize, usize)) -> Result<()> {
    if found != expected {
        return Err(invalid(format!(
            "{} is {:?}, expected {:?}",
            what, found, expected
        )));
    }
    Ok(())
}

fn check_input<P: Predictor + ?Sized>(model: &P, input: &ArrayView3<'_, f64>) -> Result<()> {
    let (_, lag, features) = input.dim();
    if lag != model.lag() || features != model.n_features() {
        return Err(ForecastError::shape(
            "model input",
            format!("(_, {}, {})", model.lag(), model.n_features()),
            format!("{:?}", input.dim()),
        ));
    }
    Ok(())
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Linear map from the flattened window to every horizon step.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseModel {
    lag: usize,
    n_features: usize,
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl Predictor for DenseModel {
    fn lag(&self) -> usize {
        self.lag
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn horizon(&self) -> usize {
        self.bias.len()
    }

    fn predict(&self, input: ArrayView3<'_, f64>) -> Result<Array2<f64>> {
        check_input(self, &input)?;
        let (samples, lag, features) = input.dim();
        let flat = input
            .to_shape((samples, lag * features))
            .map_err(|e| ForecastError::shape("flattened window", lag * features, e))?;
        Ok(flat.dot(&self.weights.t()) + &self.bias)
    }
}

/// Single-layer LSTM with a dense output head.
#[derive(Debug, Clone, PartialEq)]
pub struct LstmModel {
    lag: usize,
    n_features: usize,
    kernel: Array2<f64>,
    recurrent_kernel: Array2<f64>,
    bias: Array1<f64>,
    dense_kernel: Array2<f64>,
    dense_bias: Array1<f64>,
}

impl LstmModel {
    pub fn units(&self) -> usize {
        self.recurrent_kernel.nrows()
    }
}

impl Predictor for LstmModel {
    fn lag(&self) -> usize {
        self.lag
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn horizon(&self) -> usize {
        self.dense_bias.len()
    }

    fn predict(&self, input: ArrayView3<'_, f64>) -> Result<Array2<f64>> {
        check_input(self, &input)?;
        let units = self.units();
        let mut output = Array2::zeros((input.len_of(Axis(0)), self.horizon()));

        for (sample, mut out) in input.axis_iter(Axis(0)).zip(output.rows_mut()) {
            let mut h = Array1::<f64>::zeros(units);
            let mut c = Array1::<f64>::zeros(units);
            for x in sample.rows() {
                let z = x.dot(&self.kernel) + h.dot(&self.recurrent_kernel) + &self.bias;
                let i = z.slice(s![..units]).mapv(sigmoid);
                let f = z.slice(s![units..2 * units]).mapv(sigmoid);
                let g = z.slice(s![2 * units..3 * units]).mapv(f64::tanh);
                let o = z.slice(s![3 * units..]).mapv(sigmoid);
                c = &f * &c + &i * &g;
                h = &o * &c.mapv(f64::tanh);
            }
            out.assign(&(h.dot(&self.dense_kernel) + &self.dense_bias));
        }
        Ok(output)
    }
}

/// A loaded model of either supported architecture.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelArtifact {
    Dense(DenseModel),
    Lstm(LstmModel),
}

impl TryFrom<ModelFile> for ModelArtifact {
    type Error = ForecastError;

    fn try_from(file: ModelFile) -> Result<Self> {
        match file {
            ModelFile::Dense {
                lag,
                n_features,
                weights,
                bias,
            } => {
                let weights = to_matrix("weights", weights)?;
                let horizon = weights.nrows();
                expect_dim("weights", weights.dim(), (horizon, lag * n_features))?;
                let bias = to_vector("bias", bias, horizon)?;
                Ok(ModelArtifact::Dense(DenseModel {
                    lag,
                    n_features,
                    weights,
                    bias,
                }))
            }
            ModelFile::Lstm {
                lag,
                n_features,
                kernel,
                recurrent_kernel,
                bias,
                dense_kernel,
                dense_bias,
            } => {
                let recurrent_kernel = to_matrix("recurrent_kernel", recurrent_kernel)?;
                let units = recurrent_kernel.nrows();
                expect_dim(
                    "recurrent_kernel",
                    recurrent_kernel.dim(),
                    (units, 4 * units),
                )?;
                let kernel = to_matrix("kernel", kernel)?;
                expect_dim("kernel", kernel.dim(), (n_features, 4 * units))?;
                let bias = to_vector("bias", bias, 4 * units)?;
                let dense_kernel = to_matrix("dense_kernel", dense_kernel)?;
                let horizon = dense_kernel.ncols();
                expect_dim("dense_kernel", dense_kernel.dim(), (units, horizon))?;
                let dense_bias = to_vector("dense_bias", dense_bias, horizon)?;
                if lag == 0 {
                    return Err(invalid("lstm lag must be at least 1".to_string()));
                }
                Ok(ModelArtifact::Lstm(LstmModel {
                    lag,
                    n_features,
                    kernel,
                    recurrent_kernel,
                    bias,
                    dense_kernel,
                    dense_bias,
                }))
            }
        }
    }
}

impl ModelArtifact {
    /// Read and validate a model file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("{}: {}", path.display(), e)))?;
        let file: ModelFile = serde_json::from_str(&text)
            .map_err(|e| invalid(format!("{}: {}", path.display(), e)))?;
        let model = ModelArtifact::try_from(file)?;
        log::info!(
            "model: loaded {} from {} (lag {}, features {}, horizon {})",
            model.kind(),
            path.display(),
            model.lag(),
            model.n_features(),
            model.horizon()
        );
        Ok(model)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Dense(_) => "dense",
            ModelArtifact::Lstm(_) => "lstm",
        }
    }

    fn inner(&self) -> &dyn Predictor {
        match self {
            ModelArtifact::Dense(m) => m,
            ModelArtifact::Lstm(m) => m,
        }
    }
}

impl Predictor for ModelArtifact {
    fn lag(&self) -> usize {
        self.inner().lag()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn horizon(&self) -> usize {
        self.inner().horizon()
    }

    fn predict(&self, input: ArrayView3<'_, f64>) -> Result<Array2<f64>> {
        self.inner().predict(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use std::io::Write;

    /// Predicts `[last pm25, first pm25, bias-only]` from a two-day window.
    fn dense() -> ModelArtifact {
        let mut weights = vec![vec![0.0; 10]; 3];
        weights[0][5] = 1.0;
        weights[1][0] = 1.0;
        ModelArtifact::try_from(ModelFile::Dense {
            lag: 2,
            n_features: 5,
            weights,
            bias: vec![0.0, 0.0, 0.25],
        })
        .unwrap()
    }

    /// One unit whose cell is reset each step to `tanh(pm25)`.
    fn lstm(lag: usize) -> ModelArtifact {
        let mut kernel = vec![vec![0.0; 4]; 5];
        kernel[0][2] = 1.0;
        ModelArtifact::try_from(ModelFile::Lstm {
            lag,
            n_features: 5,
            kernel,
            recurrent_kernel: vec![vec![0.0; 4]],
            bias: vec![50.0, -50.0, 0.0, 50.0],
            dense_kernel: vec![vec![1.0, 2.0]],
            dense_bias: vec![0.0, 0.5],
        })
        .unwrap()
    }

    fn window(lag: usize, pm25: &[f64]) -> Array3<f64> {
        Array3::from_shape_fn((1, lag, 5), |(_, t, f)| if f == 0 { pm25[t] } else { 0.3 })
    }

    #[test]
    fn dense_predicts_linear_combination() {
        let model = dense();
        assert_eq!((model.lag(), model.n_features(), model.horizon()), (2, 5, 3));
        let out = model.predict(window(2, &[0.2, 0.7]).view()).unwrap();
        assert_eq!(out.dim(), (1, 3));
        assert!((out[[0, 0]] - 0.7).abs() < 1e-12);
        assert!((out[[0, 1]] - 0.2).abs() < 1e-12);
        assert!((out[[0, 2]] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn dense_handles_batches() {
        let mut batch = Array3::zeros((2, 2, 5));
        batch[[0, 1, 0]] = 0.4;
        batch[[1, 1, 0]] = 0.9;
        let out = dense().predict(batch.view()).unwrap();
        assert_eq!(out.dim(), (2, 3));
        assert!((out[[0, 0]] - 0.4).abs() < 1e-12);
        assert!((out[[1, 0]] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn lstm_follows_keras_gate_order() {
        let model = lstm(3);
        assert_eq!(model.kind(), "lstm");
        assert_eq!(model.horizon(), 2);
        let out = model.predict(window(3, &[0.9, 0.1, 0.5]).view()).unwrap();
        let h = 0.5f64.tanh().tanh();
        assert!((out[[0, 0]] - h).abs() < 1e-12);
        assert!((out[[0, 1]] - (2.0 * h + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn input_shape_must_match_model() {
        let err = lstm(3).predict(Array3::zeros((1, 2, 5)).view()).unwrap_err();
        assert!(matches!(err, ForecastError::ShapeMismatch { .. }));
        let err = dense().predict(Array3::zeros((1, 2, 4)).view()).unwrap_err();
        assert!(matches!(err, ForecastError::ShapeMismatch { .. }));
    }

    #[test]
    fn inconsistent_lstm_weights_are_rejected() {
        let file = ModelFile::Lstm {
            lag: 23,
            n_features: 5,
            kernel: vec![vec![0.0; 8]; 5],
            recurrent_kernel: vec![vec![0.0; 4]],
            bias: vec![0.0; 4],
            dense_kernel: vec![vec![0.0; 7]],
            dense_bias: vec![0.0; 7],
        };
        assert!(matches!(
            ModelArtifact::try_from(file),
            Err(ForecastError::ArtifactLoad(_))
        ));
    }

    #[test]
    fn ragged_dense_weights_are_rejected() {
        let file = ModelFile::Dense {
            lag: 1,
            n_features: 5,
            weights: vec![vec![0.0; 5], vec![0.0; 4]],
            bias: vec![0.0; 2],
        };
        assert!(ModelArtifact::try_from(file).is_err());
    }

    #[test]
    fn load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"kind": "dense", "lag": 1, "n_features": 5,
                "weights": [[1, 0, 0, 0, 0]], "bias": [0.5]}}"#
        )
        .unwrap();
        let model = ModelArtifact::load(file.path()).unwrap();
        assert_eq!(model.kind(), "dense");
        assert_eq!((model.lag(), model.horizon()), (1, 1));
    }

    #[test]
    fn unreadable_model_is_artifact_error() {
        assert!(matches!(
            ModelArtifact::load("/nonexistent/model.json"),
            Err(ForecastError::ArtifactLoad(_))
        ));
    }
}
