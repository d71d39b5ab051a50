//! Data processing for station observations.
//!
//! This crate turns the hourly station feed into the daily records the
//! store and forecaster consume.

/// Averaging of hourly readings into daily records.
pub mod aggregation {
    use aqf_station::{DailyRecord, HourlyReading, FEATURES};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Mean direction of a set of angles in degrees, normalized to [0, 360).
    ///
    /// Computed as `atan2(mean(sin), mean(cos))`, so `[350, 10]` averages to
    /// 0 rather than 180. Returns `None` for an empty slice.
    pub fn circular_mean(angles_deg: &[f64]) -> Option<f64> {
        if angles_deg.is_empty() {
            return None;
        }
        let n = angles_deg.len() as f64;
        let (sin_sum, cos_sum) = angles_deg.iter().fold((0.0, 0.0), |(s, c), a| {
            let rad = a.to_radians();
            (s + rad.sin(), c + rad.cos())
        });
        let mean = (sin_sum / n).atan2(cos_sum / n).to_degrees().rem_euclid(360.0);
        // rem_euclid of a tiny negative angle rounds up to exactly 360
        Some(if mean >= 360.0 { 0.0 } else { mean })
    }

    /// Average hourly readings into one record per calendar day.
    ///
    /// Records are returned oldest first. A feature with no readings on a
    /// day is absent in that day's record; wind direction uses
    /// [`circular_mean`].
    pub fn aggregate_daily(readings: &[HourlyReading]) -> Vec<DailyRecord> {
        let mut by_day: BTreeMap<NaiveDate, Vec<&HourlyReading>> = BTreeMap::new();
        for reading in readings {
            by_day
                .entry(reading.timestamp.date())
                .or_default()
                .push(reading);
        }

        by_day
            .into_iter()
            .map(|(date, hours)| {
                let mut record = DailyRecord::new(date);
                for feature in FEATURES {
                    let values: Vec<f64> = hours.iter().filter_map(|h| h.get(feature)).collect();
                    let value = if feature.is_circular() {
                        circular_mean(&values)
                    } else {
                        mean(&values)
                    };
                    record.set(feature, value);
                }
                log::debug!(
                    "{}: averaged {} hourly readings, missing {:?}",
                    date,
                    hours.len(),
                    record.missing_features()
                );
                record
            })
            .collect()
    }

    /// Aggregate only the readings that fall on `date`.
    pub fn aggregate_day(readings: &[HourlyReading], date: NaiveDate) -> DailyRecord {
        let day: Vec<HourlyReading> = readings
            .iter()
            .filter(|r| r.timestamp.date() == date)
            .cloned()
            .collect();
        aggregate_daily(&day)
            .pop()
            .unwrap_or_else(|| DailyRecord::new(date))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use aqf_station::Feature;

        fn reading(day: u32, hour: u32, values: [Option<f64>; 5]) -> HourlyReading {
            HourlyReading {
                timestamp: NaiveDate::from_ymd_opt(2024, 11, day)
                    .unwrap()
                    .and_hms_opt(hour, 0, 0)
                    .unwrap(),
                pm25: values[0],
                tmp: values[1],
                rh: values[2],
                ws: values[3],
                wd: values[4],
            }
        }

        #[test]
        fn test_mean() {
            assert_eq!(mean(&[]), None);
            assert_eq!(mean(&[4.0]), Some(4.0));
            assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), Some(3.0));
        }

        #[test]
        fn test_circular_mean_wraps_north() {
            let m = circular_mean(&[350.0, 10.0]).unwrap();
            let distance_from_north = m.min(360.0 - m);
            assert!(distance_from_north < 1e-9, "got {}", m);
        }

        #[test]
        fn test_circular_mean_simple() {
            let m = circular_mean(&[80.0, 100.0]).unwrap();
            assert!((m - 90.0).abs() < 1e-9);
            let m = circular_mean(&[260.0, 280.0]).unwrap();
            assert!((m - 270.0).abs() < 1e-9);
            assert_eq!(circular_mean(&[]), None);
        }

        #[test]
        fn test_aggregate_daily_groups_by_date() {
            let readings = vec![
                reading(4, 1, [Some(10.0), Some(20.0), Some(50.0), Some(1.0), Some(350.0)]),
                reading(3, 23, [Some(40.0), Some(15.0), Some(70.0), Some(3.0), Some(90.0)]),
                reading(4, 2, [Some(20.0), Some(22.0), Some(60.0), Some(2.0), Some(10.0)]),
            ];
            let days = aggregate_daily(&readings);
            assert_eq!(days.len(), 2);
            assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 11, 3).unwrap());
            assert_eq!(days[0].pm25, Some(40.0));

            let day = &days[1];
            assert_eq!(day.pm25, Some(15.0));
            assert_eq!(day.tmp, Some(21.0));
            assert_eq!(day.rh, Some(55.0));
            assert_eq!(day.ws, Some(1.5));
            let wd = day.wd.unwrap();
            assert!(wd.min(360.0 - wd) < 1e-9, "wind direction {}", wd);
        }

        #[test]
        fn test_aggregate_daily_marks_unreported_features_absent() {
            let readings = vec![
                reading(4, 1, [Some(10.0), None, Some(50.0), None, None]),
                reading(4, 2, [None, None, Some(70.0), None, None]),
            ];
            let days = aggregate_daily(&readings);
            assert_eq!(days.len(), 1);
            assert_eq!(days[0].pm25, Some(10.0));
            assert_eq!(days[0].rh, Some(60.0));
            assert_eq!(
                days[0].missing_features(),
                vec![Feature::Tmp, Feature::Ws, Feature::Wd]
            );
        }

        #[test]
        fn test_aggregate_day_without_readings() {
            let date = NaiveDate::from_ymd_opt(2024, 11, 9).unwrap();
            let record = aggregate_day(&[], date);
            assert_eq!(record, DailyRecord::new(date));
        }
    }
}

/// Filling of unreported features.
pub mod gap_fill {
    use aqf_station::{DailyRecord, Feature};

    /// Copy absent features of `today` from `previous`.
    ///
    /// Returns the features that were filled. Features absent in both
    /// records stay absent.
    pub fn fill_missing(today: &mut DailyRecord, previous: &DailyRecord) -> Vec<Feature> {
        let mut filled = Vec::new();
        for feature in today.missing_features() {
            if let Some(value) = previous.get(feature) {
                today.set(feature, Some(value));
                filled.push(feature);
            }
        }
        if !filled.is_empty() {
            log::info!(
                "{}: filled {:?} from {}",
                today.date,
                filled,
                previous.date
            );
        }
        filled
    }

}
