//! Fully populated, chronologically ordered model input.

use aqf_station::{DailyRecord, FEATURES, N_FEATURES};
use aqf_utils::dates::is_strictly_increasing;
use chrono::NaiveDate;
use ndarray::{Array2, ArrayView2};

use crate::error::{ForecastError, Result};

/// `D` days × [`N_FEATURES`] values in [`FEATURES`] order, **oldest first**.
///
/// The store hands out records newest first; use
/// [`FeatureMatrix::from_newest_first`] for those so the time axis is never
/// silently reversed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    dates: Option<Vec<NaiveDate>>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Build from records ordered oldest to newest.
    ///
    /// Fails on the first absent feature and on any date that does not
    /// strictly follow its predecessor.
    pub fn from_chronological(records: &[DailyRecord]) -> Result<Self> {
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        if !is_strictly_increasing(&dates) {
            let pair = dates
                .windows(2)
                .find(|w| w[0] >= w[1])
                .map(|w| (w[0], w[1]));
            if let Some((previous, next)) = pair {
                return Err(ForecastError::Unordered { previous, next });
            }
        }

        let missing = count_missing_days(&dates);
        if missing > 0 {
            log::warn!(
                "matrix: {} calendar days absent between {} and {}; windows span more days than rows",
                missing,
                dates[0],
                dates[dates.len() - 1]
            );
        }

        let mut values = Array2::zeros((records.len(), N_FEATURES));
        for (mut row, record) in values.rows_mut().into_iter().zip(records) {
            for feature in FEATURES {
                row[feature.index()] = record.get(feature).ok_or(
                    ForecastError::MissingFeature {
                        date: record.date,
                        feature,
                    },
                )?;
            }
        }

        Ok(Self {
            dates: Some(dates),
            values,
        })
    }

    /// Build from records ordered newest to oldest, as the store returns
    /// them. The rows are reversed before validation.
    pub fn from_newest_first(records: &[DailyRecord]) -> Result<Self> {
        let chronological: Vec<DailyRecord> = records.iter().rev().cloned().collect();
        Self::from_chronological(&chronological)
    }

    /// Wrap raw values already in oldest-first, [`FEATURES`] order.
    pub fn from_array(values: Array2<f64>) -> Result<Self> {
        if values.ncols() != N_FEATURES {
            return Err(ForecastError::shape(
                "feature matrix columns",
                N_FEATURES,
                values.ncols(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::shape(
                "feature matrix values",
                "finite values",
                "NaN or infinity",
            ));
        }
        Ok(Self {
            dates: None,
            values,
        })
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn n_days(&self) -> usize {
        self.values.nrows()
    }

    /// Dates of the rows, when built from records.
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|d| d.last().copied())
    }

    /// Calendar days absent between the first and last row. Always 0 for
    /// matrices built without dates.
    pub fn missing_days(&self) -> usize {
        self.dates.as_deref().map_or(0, count_missing_days)
    }
}

/// Days skipped between consecutive entries of strictly increasing dates.
fn count_missing_days(dates: &[NaiveDate]) -> usize {
    dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days().max(1) as usize - 1)
        .sum()
}
