//! Forecast from the stored history and print the result as JSON.

use anyhow::Context;
use aqf_aqi::Pollutant;
use aqf_db::Database;
use aqf_forecast::{FeatureMatrix, ForecastPoint, Forecaster, Predictor};
use log::info;
use serde::Serialize;

use crate::{ArtifactArgs, ForecastArgs, StoreArgs};

/// Days of history read from the store for each forecast.
pub const DEFAULT_HISTORY_DAYS: usize = 30;

#[derive(Debug, Serialize)]
pub struct ForecastReport {
    pub forecast: Vec<ForecastPoint>,
}

/// Read the last `days` records and forecast from them.
pub fn forecast_report<P: Predictor>(
    db: &Database,
    forecaster: &Forecaster<P>,
    days: usize,
    pollutant: Option<Pollutant>,
) -> anyhow::Result<ForecastReport> {
    let recent = db.last_n_daily_records(days)?;
    let matrix = FeatureMatrix::from_newest_first(&recent)
        .context("stored history is not usable for forecasting")?;
    if let Some(last) = matrix.last_date() {
        info!("Forecasting from {} days ending {}", matrix.n_days(), last);
    }
    let forecast = forecaster.forecast_points(&matrix, pollutant)?;
    Ok(ForecastReport { forecast })
}

pub fn run_forecast(
    store: &StoreArgs,
    artifacts: &ArtifactArgs,
    options: &ForecastArgs,
) -> anyhow::Result<()> {
    let forecaster = Forecaster::load(&artifacts.model, &artifacts.scaler).with_context(|| {
        format!(
            "failed to load {} and {}",
            artifacts.model.display(),
            artifacts.scaler.display()
        )
    })?;
    let db = Database::open(&store.db)?;
    let pollutant = (!options.no_aqi).then_some(options.pollutant);
    let report = forecast_report(&db, &forecaster, options.days, pollutant)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
