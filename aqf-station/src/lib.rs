//! Core types for air monitoring station data.
//!
//! [`DailyRecord`] is the unit exchanged between the feed, the store and the
//! forecaster; [`FEATURES`] fixes the column order every consumer uses.
//! With the `api` feature the hourly feed can be fetched over HTTP.

pub mod daily_record;
pub mod error;
pub mod feature;
pub mod hourly;

pub use daily_record::DailyRecord;
pub use error::{Result, StationError};
pub use feature::{Feature, FEATURES, N_FEATURES};
pub use hourly::{parse_hourly_csv, HourlyReading};
