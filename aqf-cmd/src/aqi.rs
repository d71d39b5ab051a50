//! Single-value AQI classification.

use aqf_aqi::{category_for, classify, index_for, AqiError, AqiResult, Pollutant};
use log::warn;

/// Classify `concentration`, keeping index and category even when no
/// guidance exists for the pollutant.
pub fn aqi_result(pollutant: Pollutant, concentration: f64) -> anyhow::Result<AqiResult> {
    match classify(pollutant, concentration) {
        Ok(result) => Ok(result),
        Err(AqiError::UnsupportedPollutant { .. }) => {
            warn!("No health guidance for {}, reporting index only", pollutant);
            let index = index_for(pollutant, concentration);
            let category = category_for(index);
            Ok(AqiResult {
                index,
                category,
                color: category.color(),
                recommendations: Vec::new(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn run_aqi(pollutant: Pollutant, concentration: f64) -> anyhow::Result<()> {
    let result = aqi_result(pollutant, concentration)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
