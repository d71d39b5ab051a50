use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of model input features.
pub const N_FEATURES: usize = 5;

/// Feature order shared by the store, the scaler and the model.
///
/// Changing this order silently corrupts every forecast, so all matrix
/// construction goes through [`Feature::index`].
pub const FEATURES: [Feature; N_FEATURES] = [
    Feature::Pm25,
    Feature::Tmp,
    Feature::Rh,
    Feature::Ws,
    Feature::Wd,
];

/// A daily station measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Fine particulate matter, µg/m³
    Pm25,
    /// Air temperature, °C
    Tmp,
    /// Relative humidity, %
    Rh,
    /// Wind speed, m/s
    Ws,
    /// Wind direction, degrees in [0, 360)
    Wd,
}

impl Feature {
    /// Column position in [`FEATURES`].
    pub fn index(&self) -> usize {
        match self {
            Feature::Pm25 => 0,
            Feature::Tmp => 1,
            Feature::Rh => 2,
            Feature::Ws => 3,
            Feature::Wd => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Pm25 => "pm25",
            Feature::Tmp => "tmp",
            Feature::Rh => "rh",
            Feature::Ws => "ws",
            Feature::Wd => "wd",
        }
    }

    /// Angular quantities must be averaged on the circle.
    pub fn is_circular(&self) -> bool {
        matches!(self, Feature::Wd)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        FEATURES
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| format!("unknown feature: {}", s))
    }
}
