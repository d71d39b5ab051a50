//! Fitted normalization transforms, loaded from JSON.
//!
//! # File Format
//!
//! ```json
//! {"kind": "min_max", "data_min": [0, -5, 10, 0, 0], "data_max": [150, 40, 100, 12, 360]}
//! {"kind": "standard", "mean": [...], "scale": [...]}
//! {"kind": "pca", "mean": [...], "components": [[...], ...]}
//! ```
//!
//! `min_max` accepts an optional `feature_range`, defaulting to `[0, 1]`.

use std::path::Path;

use aqf_station::N_FEATURES;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Fitted parameters as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerParams {
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        #[serde(default = "unit_range")]
        feature_range: (f64, f64),
    },
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    Pca {
        mean: Vec<f64>,
        components: Vec<Vec<f64>>,
    },
}

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// A validated, ready-to-apply transform over [`N_FEATURES`] columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Scaler {
    /// Per-feature affine map of `[data_min, data_max]` onto `feature_range`.
    MinMax {
        data_min: Array1<f64>,
        data_range: Array1<f64>,
        feature_range: (f64, f64),
    },
    /// Per-feature `(x - mean) / scale`.
    Standard {
        mean: Array1<f64>,
        scale: Array1<f64>,
    },
    /// Orthogonal projection; every output column mixes every input column.
    Pca {
        mean: Array1<f64>,
        components: Array2<f64>,
    },
}

/// Zero spread maps to 1 so constant features pass through unscaled.
fn nonzero(values: Vec<f64>) -> Array1<f64> {
    values
        .into_iter()
        .map(|v| if v == 0.0 { 1.0 } else { v })
        .collect()
}

fn check_len(what: &'static str, values: &[f64]) -> Result<()> {
    if values.len() != N_FEATURES {
        return Err(ForecastError::shape(what, N_FEATURES, values.len()));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::ArtifactLoad(format!(
            "scaler {} contains non-finite values",
            what
        )));
    }
    Ok(())
}

impl TryFrom<ScalerParams> for Scaler {
    type Error = ForecastError;

    fn try_from(params: ScalerParams) -> Result<Self> {
        match params {
            ScalerParams::MinMax {
                data_min,
                data_max,
                feature_range,
            } => {
                check_len("data_min", &data_min)?;
                check_len("data_max", &data_max)?;
                let (lo, hi) = feature_range;
                if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                    return Err(ForecastError::ArtifactLoad(format!(
                        "invalid feature_range ({}, {})",
                        lo, hi
                    )));
                }
                if let Some(i) = (0..N_FEATURES).find(|&i| data_max[i] < data_min[i]) {
                    return Err(ForecastError::ArtifactLoad(format!(
                        "data_max below data_min for feature {}",
                        i
                    )));
                }
                let range = data_max.iter().zip(&data_min).map(|(hi, lo)| hi - lo).collect();
                Ok(Scaler::MinMax {
                    data_min: Array1::from(data_min),
                    data_range: nonzero(range),
                    feature_range,
                })
            }
            ScalerParams::Standard { mean, scale } => {
                check_len("mean", &mean)?;
                check_len("scale", &scale)?;
                Ok(Scaler::Standard {
                    mean: Array1::from(mean),
                    scale: nonzero(scale),
                })
            }
            ScalerParams::Pca { mean, components } => {
                check_len("mean", &mean)?;
                if components.len() != N_FEATURES {
                    return Err(ForecastError::shape(
                        "pca components",
                        format!("{} rows", N_FEATURES),
                        format!("{} rows", components.len()),
                    ));
                }
                for row in &components {
                    check_len("pca component", row)?;
                }
                let flat: Vec<f64> = components.into_iter().flatten().collect();
                let components = Array2::from_shape_vec((N_FEATURES, N_FEATURES), flat)
                    .map_err(|e| ForecastError::ArtifactLoad(e.to_string()))?;
                Ok(Scaler::Pca {
                    mean: Array1::from(mean),
                    components,
                })
            }
        }
    }
}

impl Scaler {
    /// Read and validate a scaler file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ForecastError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;
        let params: ScalerParams = serde_json::from_str(&text)
            .map_err(|e| ForecastError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;
        let scaler = Scaler::try_from(params)?;
        log::info!("scaler: loaded {} from {}", scaler.kind(), path.display());
        Ok(scaler)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::MinMax { .. } => "min_max",
            Scaler::Standard { .. } => "standard",
            Scaler::Pca { .. } => "pca",
        }
    }

    pub fn n_features(&self) -> usize {
        N_FEATURES
    }

    /// Whether each output column depends only on its own input column.
    ///
    /// Only such scalers can invert a lone target column padded with
    /// placeholders.
    pub fn is_feature_independent(&self) -> bool {
        !matches!(self, Scaler::Pca { .. })
    }

    fn check_width(&self, values: &ArrayView2<'_, f64>) -> Result<()> {
        if values.ncols() != self.n_features() {
            return Err(ForecastError::shape(
                "scaler input columns",
                self.n_features(),
                values.ncols(),
            ));
        }
        Ok(())
    }

    /// Raw to normalized, row by row.
    pub fn forward(&self, values: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.check_width(&values)?;
        let scaled = match self {
            Scaler::MinMax {
                data_min,
                data_range,
                feature_range: (lo, hi),
            } => (&values - data_min) / data_range * (hi - lo) + *lo,
            Scaler::Standard { mean, scale } => (&values - mean) / scale,
            Scaler::Pca { mean, components } => (&values - mean).dot(&components.t()),
        };
        Ok(scaled)
    }

    /// Normalized to raw; exact inverse of [`Scaler::forward`].
    pub fn inverse(&self, values: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.check_width(&values)?;
        let raw = match self {
            Scaler::MinMax {
                data_min,
                data_range,
                feature_range: (lo, hi),
            } => (&values - *lo) / (hi - lo) * data_range + data_min,
            Scaler::Standard { mean, scale } => &values * scale + mean,
            Scaler::Pca { mean, components } => values.dot(components) + mean,
        };
        Ok(raw)
    }

    /// Invert a single predicted column.
    ///
    /// The predictions are written into column `target` of an otherwise
    /// zero matrix, the whole matrix is inverted, and only `target` is
    /// read back.
    pub fn inverse_target(&self, predictions: &[f64], target: usize) -> Result<Vec<f64>> {
        if !self.is_feature_independent() {
            return Err(ForecastError::CoupledScaler);
        }
        if target >= self.n_features() {
            return Err(ForecastError::shape(
                "target column",
                format!("< {}", self.n_features()),
                target,
            ));
        }
        let mut placeholder = Array2::zeros((predictions.len(), self.n_features()));
        placeholder
            .column_mut(target)
            .assign(&ArrayView1::from(predictions));
        let restored = self.inverse(placeholder.view())?;
        Ok(restored.column(target).to_vec())
    }
}
