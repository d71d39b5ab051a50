/// Error types for the forecast pipeline
use aqf_aqi::AqiError;
use aqf_station::Feature;
use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for forecast operations
#[derive(Error, Debug)]
pub enum ForecastError {
    /// A matrix or tensor does not have the geometry the next stage needs
    #[error("Shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: String,
        found: String,
    },

    /// Fewer usable daily records than the lag window plus one
    #[error("Insufficient history (needed: {needed}, found: {found})")]
    InsufficientHistory { needed: usize, found: usize },

    /// A feature is absent; it must be filled before forecasting
    #[error("Missing feature '{feature}' on {date}")]
    MissingFeature { date: NaiveDate, feature: Feature },

    /// Records are not strictly chronological after normalization
    #[error("Records out of order: {next} follows {previous}")]
    Unordered { previous: NaiveDate, next: NaiveDate },

    /// The scaler mixes features, so one column cannot be inverted alone
    #[error("Scaler couples features; single-target inverse scaling is invalid")]
    CoupledScaler,

    /// The model returned NaN or infinity
    #[error("Model produced non-finite output")]
    NonFiniteOutput,

    /// Model or scaler file unreadable, malformed or shape-incompatible
    #[error("Failed to load artifact: {0}")]
    ArtifactLoad(String),

    /// AQI annotation of a forecast failed
    #[error(transparent)]
    Aqi(#[from] AqiError),
}

impl ForecastError {
    pub(crate) fn shape(what: &'static str, expected: impl ToString, found: impl ToString) -> Self {
        ForecastError::ShapeMismatch {
            what,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Type alias for Results using ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;
