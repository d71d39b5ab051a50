//! EPA breakpoint tables.
//!
//! Each pollutant maps six ordered concentration segments onto the six AQI
//! index segments. The tables are published at reporting precision, so a
//! value such as 9.05 µg/m³ of PM2.5 falls between two segments; see
//! [`gap_floor`] for how those values are resolved.
//!
//! Source: <https://document.airnow.gov/technical-assistance-document-for-the-reporting-of-daily-air-quailty.pdf>

use serde::Serialize;

use crate::pollutant::Pollutant;

/// Upper concentration bound of the last segment. Treated as unbounded.
pub const UNBOUNDED: f64 = 1_000_000_000.0;

/// One linear segment of the concentration-to-index mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakpoint {
    /// Inclusive `(low, high)` concentration range.
    pub concentration: (f64, f64),
    /// Inclusive `(low, high)` AQI range.
    pub index: (u16, u16),
}

impl Breakpoint {
    pub const fn new(c_low: f64, c_high: f64, i_low: u16, i_high: u16) -> Self {
        Self {
            concentration: (c_low, c_high),
            index: (i_low, i_high),
        }
    }

    /// True when `concentration` lies within the inclusive range.
    pub fn contains(&self, concentration: f64) -> bool {
        self.concentration.0 <= concentration && concentration <= self.concentration.1
    }

    /// Linear interpolation transcribed from the EPA reporting guide:
    ///
    /// `AQI = (I_high - I_low) / (C_high - C_low) * (C - C_low) + I_low`
    ///
    /// A zero-width concentration range yields 0.
    pub fn interpolate(&self, concentration: f64) -> u16 {
        let (c_low, c_high) = self.concentration;
        let (i_low, i_high) = self.index;
        if c_high == c_low {
            log::debug!("degenerate breakpoint {:?}, using index 0", self);
            return 0;
        }
        let aqi = (f64::from(i_high) - f64::from(i_low)) / (c_high - c_low)
            * (concentration - c_low)
            + f64::from(i_low);
        round_index(aqi)
    }
}

/// Round an interpolated index half to even, clamped into `u16`.
///
/// `2.5 -> 2`, `3.5 -> 4`, `50.5 -> 50`.
pub fn round_index(value: f64) -> u16 {
    value.round_ties_even().clamp(0.0, f64::from(u16::MAX)) as u16
}

static O3: [Breakpoint; 6] = [
    Breakpoint::new(0.000, 0.054, 0, 50),
    Breakpoint::new(0.055, 0.070, 51, 100),
    Breakpoint::new(0.071, 0.085, 101, 150),
    Breakpoint::new(0.086, 0.105, 151, 200),
    Breakpoint::new(0.106, 0.200, 201, 300),
    Breakpoint::new(0.201, UNBOUNDED, 301, 500),
];

// Revised February 2024
static PM25: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 9.0, 0, 50),
    Breakpoint::new(9.1, 35.4, 51, 100),
    Breakpoint::new(35.5, 55.4, 101, 150),
    Breakpoint::new(55.5, 125.4, 151, 200),
    Breakpoint::new(125.5, 225.4, 201, 300),
    Breakpoint::new(225.5, UNBOUNDED, 301, 500),
];

static PM10: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 54.0, 0, 50),
    Breakpoint::new(55.0, 154.0, 51, 100),
    Breakpoint::new(155.0, 254.0, 101, 150),
    Breakpoint::new(255.0, 354.0, 151, 200),
    Breakpoint::new(355.0, 424.0, 201, 300),
    Breakpoint::new(425.0, UNBOUNDED, 301, 500),
];

static CO: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 4.4, 0, 50),
    Breakpoint::new(4.5, 9.4, 51, 100),
    Breakpoint::new(9.5, 12.4, 101, 150),
    Breakpoint::new(12.5, 15.4, 151, 200),
    Breakpoint::new(15.5, 30.4, 201, 300),
    Breakpoint::new(30.5, UNBOUNDED, 301, 500),
];

static SO2: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 35.0, 0, 50),
    Breakpoint::new(36.0, 75.0, 51, 100),
    Breakpoint::new(76.0, 185.0, 101, 150),
    Breakpoint::new(186.0, 304.0, 151, 200),
    Breakpoint::new(305.0, 604.0, 201, 300),
    Breakpoint::new(605.0, UNBOUNDED, 301, 500),
];

static NO2: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 53.0, 0, 50),
    Breakpoint::new(54.0, 100.0, 51, 100),
    Breakpoint::new(101.0, 360.0, 101, 150),
    Breakpoint::new(361.0, 649.0, 151, 200),
    Breakpoint::new(650.0, 1249.0, 201, 300),
    Breakpoint::new(1250.0, UNBOUNDED, 301, 500),
];

/// The ordered breakpoint table for a pollutant.
pub fn table(pollutant: Pollutant) -> &'static [Breakpoint] {
    match pollutant {
        Pollutant::O3 => &O3,
        Pollutant::Pm25 => &PM25,
        Pollutant::Pm10 => &PM10,
        Pollutant::Co => &CO,
        Pollutant::So2 => &SO2,
        Pollutant::No2 => &NO2,
    }
}

/// Find the first segment whose inclusive concentration range contains the
/// value. Negative, NaN, out-of-range and between-segment values return
/// `None`.
pub fn lookup(pollutant: Pollutant, concentration: f64) -> Option<&'static Breakpoint> {
    table(pollutant).iter().find(|bp| bp.contains(concentration))
}

/// For a value strictly between two published segments, the lower segment.
pub fn gap_floor(pollutant: Pollutant, concentration: f64) -> Option<&'static Breakpoint> {
    table(pollutant)
        .windows(2)
        .find(|pair| {
            pair[0].concentration.1 < concentration && concentration < pair[1].concentration.0
        })
        .map(|pair| &pair[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_ranges_partition_zero_to_five_hundred() {
        for pollutant in Pollutant::ALL {
            let segments = table(pollutant);
            assert_eq!(segments.len(), 6);
            assert_eq!(segments[0].index.0, 0, "{} starts at 0", pollutant);
            assert_eq!(segments[5].index.1, 500, "{} ends at 500", pollutant);
            for pair in segments.windows(2) {
                assert_eq!(
                    pair[1].index.0,
                    pair[0].index.1 + 1,
                    "{} index ranges must be contiguous",
                    pollutant
                );
            }
        }
    }

    #[test]
    fn concentration_ranges_are_ordered_and_disjoint() {
        for pollutant in Pollutant::ALL {
            let segments = table(pollutant);
            assert_eq!(segments[0].concentration.0, 0.0);
            assert_eq!(segments[5].concentration.1, UNBOUNDED);
            for bp in segments {
                assert!(bp.concentration.0 < bp.concentration.1);
            }
            for pair in segments.windows(2) {
                assert!(
                    pair[0].concentration.1 < pair[1].concentration.0,
                    "{} segments overlap",
                    pollutant
                );
            }
        }
    }

    #[test]
    fn lookup_uses_inclusive_bounds() {
        assert_eq!(lookup(Pollutant::Pm25, 9.0).unwrap().index, (0, 50));
        assert_eq!(lookup(Pollutant::Pm25, 9.1).unwrap().index, (51, 100));
        assert_eq!(lookup(Pollutant::Pm25, 35.4).unwrap().index, (51, 100));
        assert_eq!(lookup(Pollutant::Pm25, 500.0).unwrap().index, (301, 500));
    }

    #[test]
    fn lookup_misses() {
        assert!(lookup(Pollutant::Pm25, -1.0).is_none());
        assert!(lookup(Pollutant::Pm25, f64::NAN).is_none());
        assert!(lookup(Pollutant::Pm25, 9.05).is_none());
        assert!(lookup(Pollutant::Pm10, UNBOUNDED + 1.0).is_none());
    }

    #[test]
    fn gap_floor_finds_lower_segment() {
        assert_eq!(gap_floor(Pollutant::Pm25, 9.05).unwrap().index, (0, 50));
        assert_eq!(gap_floor(Pollutant::O3, 0.0705).unwrap().index, (51, 100));
        assert!(gap_floor(Pollutant::Pm25, 20.0).is_none());
        assert!(gap_floor(Pollutant::Pm25, -3.0).is_none());
    }

    #[test]
    fn round_index_is_half_to_even() {
        assert_eq!(round_index(2.5), 2);
        assert_eq!(round_index(3.5), 4);
        assert_eq!(round_index(50.5), 50);
        assert_eq!(round_index(50.50001), 51);
        assert_eq!(round_index(-4.0), 0);
    }

    #[test]
    fn interpolate_rounds_ties_to_even() {
        // slope 0.5, so 5.0 lands exactly on 2.5
        let bp = Breakpoint::new(0.0, 10.0, 0, 5);
        assert_eq!(bp.interpolate(5.0), 2);
        // 7.0 lands exactly on 3.5
        assert_eq!(bp.interpolate(7.0), 4);
    }

    #[test]
    fn degenerate_breakpoint_yields_zero() {
        let bp = Breakpoint::new(4.0, 4.0, 51, 100);
        assert_eq!(bp.interpolate(4.0), 0);
    }
}
