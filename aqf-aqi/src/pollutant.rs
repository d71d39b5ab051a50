use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AqiError;

/// Pollutants with a published AQI breakpoint table.
///
/// Concentration units follow the EPA reporting guide: ppm for O3 and CO,
/// µg/m³ for particulates, ppb for SO2 and NO2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    O3,
    Pm25,
    Pm10,
    Co,
    So2,
    No2,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::O3,
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::Co,
        Pollutant::So2,
        Pollutant::No2,
    ];

    /// Short code used in the store, on the command line and in JSON.
    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::O3 => "o3",
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::Co => "co",
            Pollutant::So2 => "so2",
            Pollutant::No2 => "no2",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Pollutant {
    type Err = AqiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase().replace(['.', '_'], "");
        Pollutant::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| AqiError::UnknownPollutant(s.to_string()))
    }
}
