//! Sliding-window reshaping of a daily series into supervised samples.
//!
//! Sample `s` targets day `t = s + lag` and holds rows `t - lag ..= t - 1`,
//! oldest first. The target day itself is never part of its own window.

use aqf_station::N_FEATURES;
use ndarray::{s, Array3, ArrayView2, Axis};

use crate::error::{ForecastError, Result};

/// Reshape `(D, F)` into `(D - lag, lag, F)`.
pub fn series_to_supervised(values: ArrayView2<'_, f64>, lag: usize) -> Result<Array3<f64>> {
    let (days, features) = values.dim();
    if features != N_FEATURES {
        return Err(ForecastError::shape("series columns", N_FEATURES, features));
    }
    if lag == 0 {
        return Err(ForecastError::shape("lag", "at least 1", lag));
    }
    if days <= lag {
        return Err(ForecastError::InsufficientHistory {
            needed: lag + 1,
            found: days,
        });
    }

    let samples = days - lag;
    let mut windows = Array3::zeros((samples, lag, features));
    for (sample, mut window) in windows.axis_iter_mut(Axis(0)).enumerate() {
        window.assign(&values.slice(s![sample..sample + lag, ..]));
    }
    log::debug!(
        "window: {} days -> {} samples of {} x {}",
        days,
        samples,
        lag,
        features
    );
    Ok(windows)
}

/// The single most recent window, shaped `(1, lag, F)`.
///
/// It ends on the second-to-last row; the last row is the window's target
/// day and never part of the input.
pub fn latest_window(values: ArrayView2<'_, f64>, lag: usize) -> Result<Array3<f64>> {
    let windows = series_to_supervised(values, lag)?;
    let last = windows.len_of(Axis(0)) - 1;
    Ok(windows.slice(s![last.., .., ..]).to_owned())
}
