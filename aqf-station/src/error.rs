/// Error types for the station library
use thiserror::Error;

/// Main error type for station feed operations
#[derive(Error, Debug)]
pub enum StationError {
    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A required column is not present in the feed header
    #[error("Feed is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Type alias for Results using StationError
pub type Result<T> = std::result::Result<T, StationError>;
