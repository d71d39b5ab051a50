//! End-to-end forecast: scale, window, predict, unscale.

use std::path::Path;

use aqf_aqi::{classify, AqiResult, Pollutant};
use aqf_station::{Feature, N_FEATURES};
use serde::Serialize;

use crate::error::{ForecastError, Result};
use crate::matrix::FeatureMatrix;
use crate::model::ModelArtifact;
use crate::predictor::Predictor;
use crate::scaler::Scaler;
use crate::window::latest_window;

pub const DEFAULT_LAG: usize = 23;
pub const DEFAULT_HORIZON: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Past days per input window.
    pub lag: usize,
    /// Future days predicted per forecast.
    pub horizon: usize,
    /// Feature the model predicts.
    pub target: Feature,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lag: DEFAULT_LAG,
            horizon: DEFAULT_HORIZON,
            target: Feature::Pm25,
        }
    }
}

/// One forecast day, optionally annotated with its AQI.
///
/// The input window ends the day before the last row of the matrix, so
/// `day_offset` 1 is the last stored day itself, not the day after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Days after the end of the input window; 1 is the last stored day.
    pub day_offset: u32,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aqi: Option<AqiResult>,
}

/// Scaler, model and configuration bound together.
///
/// Immutable once built; a single instance can be shared across threads.
pub struct Forecaster<P = ModelArtifact> {
    scaler: Scaler,
    predictor: P,
    config: ForecastConfig,
}

impl Forecaster<ModelArtifact> {
    /// Load both artifacts and bind them with the default configuration.
    pub fn load<M: AsRef<Path>, S: AsRef<Path>>(model_path: M, scaler_path: S) -> Result<Self> {
        Self::load_with_config(model_path, scaler_path, ForecastConfig::default())
    }

    pub fn load_with_config<M: AsRef<Path>, S: AsRef<Path>>(
        model_path: M,
        scaler_path: S,
        config: ForecastConfig,
    ) -> Result<Self> {
        let predictor = ModelArtifact::load(model_path)?;
        let scaler = Scaler::load(scaler_path)?;
        Self::new(scaler, predictor, config)
    }
}

impl<P: Predictor> Forecaster<P> {
    /// Bind a scaler and predictor, checking that their shapes agree with
    /// `config` and that the scaler can invert the target on its own.
    pub fn new(scaler: Scaler, predictor: P, config: ForecastConfig) -> Result<Self> {
        if !scaler.is_feature_independent() {
            return Err(ForecastError::CoupledScaler);
        }
        let expected = (config.lag, N_FEATURES, config.horizon);
        let found = (predictor.lag(), predictor.n_features(), predictor.horizon());
        if expected != found {
            return Err(ForecastError::ArtifactLoad(format!(
                "model shape (lag, features, horizon) is {:?}, expected {:?}",
                found, expected
            )));
        }
        Ok(Self {
            scaler,
            predictor,
            config,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Predict the next `horizon` daily values of the target feature.
    ///
    /// Only the most recent window is fed to the model: the `lag` days
    /// before the last row. The first value is therefore the model's
    /// estimate for the last stored day, and the rest follow it. Needs at
    /// least `lag + 1` days.
    pub fn forecast(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>> {
        let ForecastConfig {
            lag,
            horizon,
            target,
        } = self.config;
        if matrix.n_days() < lag + 1 {
            return Err(ForecastError::InsufficientHistory {
                needed: lag + 1,
                found: matrix.n_days(),
            });
        }

        let scaled = self.scaler.forward(matrix.values())?;
        let window = latest_window(scaled.view(), lag)?;
        let output = self.predictor.predict(window.view())?;
        if output.dim() != (1, horizon) {
            return Err(ForecastError::shape(
                "model output",
                format!("(1, {})", horizon),
                format!("{:?}", output.dim()),
            ));
        }

        let normalized = output.row(0).to_vec();
        if normalized.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::NonFiniteOutput);
        }
        let values = self.scaler.inverse_target(&normalized, target.index())?;
        log::info!(
            "forecast: {} days of {} from {} days of history",
            values.len(),
            target,
            matrix.n_days()
        );
        Ok(values)
    }

    /// [`Forecaster::forecast`] with each day classified as `pollutant`.
    ///
    /// Without a pollutant the points carry values only.
    pub fn forecast_points(
        &self,
        matrix: &FeatureMatrix,
        pollutant: Option<Pollutant>,
    ) -> Result<Vec<ForecastPoint>> {
        self.forecast(matrix)?
            .into_iter()
            .zip(1u32..)
            .map(|(value, day_offset)| -> Result<ForecastPoint> {
                let aqi = pollutant.map(|p| classify(p, value)).transpose()?;
                Ok(ForecastPoint {
                    day_offset,
                    value,
                    aqi,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaler::ScalerParams;
    use aqf_aqi::Category;
    use ndarray::{Array2, ArrayView3};

    /// Repeats the last normalized pm25 of the window.
    struct Persistence {
        horizon: usize,
    }

    impl Predictor for Persistence {
        fn lag(&self) -> usize {
            DEFAULT_LAG
        }

        fn n_features(&self) -> usize {
            N_FEATURES
        }

        fn horizon(&self) -> usize {
            self.horizon
        }

        fn predict(&self, input: ArrayView3<'_, f64>) -> Result<Array2<f64>> {
            let last = input[[0, input.dim().1 - 1, 0]];
            Ok(Array2::from_elem((1, self.horizon), last))
        }
    }

    /// Always returns a fixed row, whatever the configured horizon.
    struct Fixed(Vec<f64>);

    impl Predictor for Fixed {
        fn lag(&self) -> usize {
            DEFAULT_LAG
        }

        fn n_features(&self) -> usize {
            N_FEATURES
        }

        fn horizon(&self) -> usize {
            DEFAULT_HORIZON
        }

        fn predict(&self, _input: ArrayView3<'_, f64>) -> Result<Array2<f64>> {
            Array2::from_shape_vec((1, self.0.len()), self.0.clone())
                .map_err(|e| ForecastError::ArtifactLoad(e.to_string()))
        }
    }

    fn scaler() -> Scaler {
        Scaler::try_from(ScalerParams::MinMax {
            data_min: vec![0.0; 5],
            data_max: vec![100.0, 50.0, 100.0, 20.0, 360.0],
            feature_range: (0.0, 1.0),
        })
        .unwrap()
    }

    /// `days` rows with pm25 equal to the row index.
    fn history(days: usize) -> FeatureMatrix {
        FeatureMatrix::from_array(Array2::from_shape_fn((days, N_FEATURES), |(d, f)| {
            if f == 0 {
                d as f64
            } else {
                10.0
            }
        }))
        .unwrap()
    }

    #[test]
    fn forecast_uses_the_most_recent_window() {
        let forecaster =
            Forecaster::new(scaler(), Persistence { horizon: 7 }, ForecastConfig::default()).unwrap();
        let values = forecaster.forecast(&history(30)).unwrap();
        assert_eq!(values.len(), 7);
        // window ends on row 28, the day before the last row
        for v in values {
            assert!((v - 28.0).abs() < 1e-9, "{}", v);
        }
    }

    #[test]
    fn last_row_is_the_first_target_not_an_input() {
        let forecaster =
            Forecaster::new(scaler(), Persistence { horizon: 7 }, ForecastConfig::default()).unwrap();
        let mut values = history(30).values().to_owned();
        let before = forecaster
            .forecast(&FeatureMatrix::from_array(values.clone()).unwrap())
            .unwrap();
        values[[29, 0]] = 90.0;
        let after = forecaster
            .forecast(&FeatureMatrix::from_array(values).unwrap())
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn forecast_needs_lag_plus_one_days() {
        let forecaster =
            Forecaster::new(scaler(), Persistence { horizon: 7 }, ForecastConfig::default()).unwrap();
        assert!(forecaster.forecast(&history(24)).is_ok());
        let err = forecaster.forecast(&history(23)).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientHistory {
                needed: 24,
                found: 23
            }
        ));
    }

    #[test]
    fn mismatched_horizon_is_rejected_at_construction() {
        let err = Forecaster::new(scaler(), Persistence { horizon: 5 }, ForecastConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, ForecastError::ArtifactLoad(_)));
    }

    #[test]
    fn coupled_scaler_is_rejected_at_construction() {
        let pca = Scaler::try_from(ScalerParams::Pca {
            mean: vec![0.0; 5],
            components: (0..5)
                .map(|i| (0..5).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
                .collect(),
        })
        .unwrap();
        let err = Forecaster::new(pca, Persistence { horizon: 7 }, ForecastConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, ForecastError::CoupledScaler));
    }

    #[test]
    fn wrong_output_shape_is_rejected() {
        let forecaster =
            Forecaster::new(scaler(), Fixed(vec![0.1; 6]), ForecastConfig::default()).unwrap();
        assert!(matches!(
            forecaster.forecast(&history(30)),
            Err(ForecastError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn non_finite_output_is_rejected() {
        let mut row = vec![0.1; 7];
        row[3] = f64::NAN;
        let forecaster = Forecaster::new(scaler(), Fixed(row), ForecastConfig::default()).unwrap();
        assert!(matches!(
            forecaster.forecast(&history(30)),
            Err(ForecastError::NonFiniteOutput)
        ));
    }

    #[test]
    fn points_carry_offsets_and_aqi() {
        let forecaster =
            Forecaster::new(scaler(), Fixed(vec![0.4; 7]), ForecastConfig::default()).unwrap();
        let points = forecaster
            .forecast_points(&history(30), Some(Pollutant::Pm25))
            .unwrap();
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].day_offset, 1);
        assert_eq!(points[6].day_offset, 7);
        let aqi = points[0].aqi.as_ref().unwrap();
        assert_eq!(aqi.index, 112);
        assert_eq!(aqi.category, Category::UnhealthyForSensitiveGroups);

        let bare = forecaster.forecast_points(&history(30), None).unwrap();
        assert!(bare.iter().all(|p| p.aqi.is_none()));
        let json = serde_json::to_value(&bare[0]).unwrap();
        assert!(json.get("aqi").is_none());
    }

    #[test]
    fn forecaster_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Forecaster>();
    }
}
