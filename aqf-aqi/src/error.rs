/// Error types for the AQI library
use thiserror::Error;

use crate::category::Category;
use crate::pollutant::Pollutant;

/// Main error type for AQI lookups
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AqiError {
    /// No guidance text is published for this pollutant/category pair
    #[error("No recommendations available for {pollutant} at category \"{category}\"")]
    UnsupportedPollutant {
        pollutant: Pollutant,
        category: Category,
    },

    /// Pollutant code did not match any known table
    #[error("Unknown pollutant: {0}")]
    UnknownPollutant(String),
}

/// Type alias for Results using AqiError
pub type Result<T> = std::result::Result<T, AqiError>;
