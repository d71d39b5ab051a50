//! Multi-day PM2.5 forecasting from a trailing window of daily records.
//!
//! The pipeline is: [`FeatureMatrix`] (oldest first) → [`Scaler::forward`]
//! → [`window::latest_window`] → [`Predictor::predict`] →
//! [`Scaler::inverse_target`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use aqf_forecast::{FeatureMatrix, Forecaster};
//!
//! # fn records() -> Vec<aqf_station::DailyRecord> { Vec::new() }
//! let forecaster = Forecaster::load("models/lstm_seven_step.json", "models/scaler.json")?;
//! // the store returns newest first
//! let matrix = FeatureMatrix::from_newest_first(&records())?;
//! let pm25 = forecaster.forecast(&matrix)?;
//! # Ok::<(), aqf_forecast::ForecastError>(())
//! ```

pub mod error;
pub mod forecaster;
pub mod matrix;
pub mod model;
pub mod predictor;
pub mod scaler;
pub mod window;

pub use error::{ForecastError, Result};
pub use forecaster::{
    ForecastConfig, ForecastPoint, Forecaster, DEFAULT_HORIZON, DEFAULT_LAG,
};
pub use matrix::FeatureMatrix;
pub use model::ModelArtifact;
pub use predictor::Predictor;
pub use scaler::Scaler;
