use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::feature::{Feature, FEATURES, N_FEATURES};

/// One day of station measurements.
///
/// Any feature may be unavailable (station outage, scrape failure). Absence
/// is always `None`; setters turn NaN and infinities into `None` so a
/// non-finite value never travels further as if it were a reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub pm25: Option<f64>,
    pub tmp: Option<f64>,
    pub rh: Option<f64>,
    pub ws: Option<f64>,
    pub wd: Option<f64>,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl DailyRecord {
    /// A record with every feature absent.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            pm25: None,
            tmp: None,
            rh: None,
            ws: None,
            wd: None,
        }
    }

    /// Build from values in [`FEATURES`] order.
    pub fn from_values(date: NaiveDate, values: [Option<f64>; N_FEATURES]) -> Self {
        let mut record = Self::new(date);
        for (feature, value) in FEATURES.into_iter().zip(values) {
            record.set(feature, value);
        }
        record
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Pm25 => self.pm25,
            Feature::Tmp => self.tmp,
            Feature::Rh => self.rh,
            Feature::Ws => self.ws,
            Feature::Wd => self.wd,
        }
    }

    pub fn set(&mut self, feature: Feature, value: Option<f64>) {
        let value = finite(value);
        match feature {
            Feature::Pm25 => self.pm25 = value,
            Feature::Tmp => self.tmp = value,
            Feature::Rh => self.rh = value,
            Feature::Ws => self.ws = value,
            Feature::Wd => self.wd = value,
        }
    }

    pub fn missing_features(&self) -> Vec<Feature> {
        FEATURES
            .into_iter()
            .filter(|f| finite(self.get(*f)).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_features().is_empty()
    }

    /// All values in [`FEATURES`] order, or `None` if any is absent.
    pub fn values(&self) -> Option<[f64; N_FEATURES]> {
        let mut out = [0.0; N_FEATURES];
        for feature in FEATURES {
            out[feature.index()] = finite(self.get(feature))?;
        }
        Some(out)
    }
}
