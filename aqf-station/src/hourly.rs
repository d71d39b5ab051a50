use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StationError};
use crate::feature::{Feature, FEATURES, N_FEATURES};

#[cfg(feature = "api")]
use log::info;
#[cfg(feature = "api")]
use reqwest::{Client, StatusCode};
#[cfg(feature = "api")]
use std::time::Duration;

/// Timestamp formats accepted in the hourly feed.
pub const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// One hourly row of the station feed. Cells the station did not report
/// (blank, `---`, `N/D`) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyReading {
    pub timestamp: NaiveDateTime,
    pub pm25: Option<f64>,
    pub tmp: Option<f64>,
    pub rh: Option<f64>,
    pub ws: Option<f64>,
    pub wd: Option<f64>,
}

impl HourlyReading {
    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Pm25 => self.pm25,
            Feature::Tmp => self.tmp,
            Feature::Rh => self.rh,
            Feature::Ws => self.ws,
            Feature::Wd => self.wd,
        }
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
}

fn parse_value(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Locate the timestamp and feature columns by header name so the feed may
/// carry extra columns in any order.
fn column_positions(headers: &StringRecord) -> Result<(usize, [Option<usize>; N_FEATURES])> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let timestamp = find("timestamp").ok_or(StationError::MissingColumn("timestamp"))?;
    let mut features = [None; N_FEATURES];
    for feature in FEATURES {
        features[feature.index()] = find(feature.name());
        if features[feature.index()].is_none() {
            warn!("Hourly feed has no '{}' column", feature);
        }
    }
    Ok((timestamp, features))
}

/// Parse the hourly station feed.
///
/// Expected CSV (with headers): `timestamp,pm25,tmp,rh,ws,wd`
///
/// Rows with an unparsable timestamp are skipped.
///
/// # Example CSV
/// ```text
/// timestamp,pm25,tmp,rh,ws,wd
/// 2024-11-03 01:00,18.0,17.2,71,1.3,250
/// 2024-11-03 02:00,---,16.8,74,1.1,240
/// ```
pub fn parse_hourly_csv(csv_data: &str) -> Result<Vec<HourlyReading>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());
    let (ts_col, columns) = column_positions(rdr.headers()?)?;

    let mut readings = Vec::new();
    let mut skipped = 0u32;
    for result in rdr.records() {
        let r = result?;
        let timestamp = match r.get(ts_col).and_then(parse_timestamp) {
            Some(t) => t,
            None => {
                skipped += 1;
                continue;
            }
        };
        let value = |feature: Feature| parse_value(columns[feature.index()].and_then(|c| r.get(c)));
        readings.push(HourlyReading {
            timestamp,
            pm25: value(Feature::Pm25),
            tmp: value(Feature::Tmp),
            rh: value(Feature::Rh),
            ws: value(Feature::Ws),
            wd: value(Feature::Wd),
        });
    }
    debug!(
        "Parsed {} hourly readings, skipped {} rows without a timestamp",
        readings.len(),
        skipped
    );
    Ok(readings)
}

/// Fetch the raw hourly feed body, with retry and exponential backoff.
///
/// Returns `None` when every attempt fails; the caller then falls back on
/// previously stored data.
#[cfg(feature = "api")]
pub async fn fetch_hourly_feed(client: &Client, url: &str, max_tries: u32) -> Option<String> {
    let mut sleep_millis: u64 = 1000;

    for attempt in 1..=max_tries {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status() != StatusCode::OK {
                    warn!(
                        "Attempt {}/{}: Bad response status from {}: {}",
                        attempt,
                        max_tries,
                        url,
                        response.status()
                    );
                } else {
                    match response.text().await {
                        Ok(body) if body.trim().is_empty() => {
                            warn!("Attempt {}/{}: Empty feed from {}", attempt, max_tries, url);
                        }
                        Ok(body) => return Some(body),
                        Err(e) => {
                            warn!(
                                "Attempt {}/{}: Failed to read feed body from {}: {}",
                                attempt, max_tries, url, e
                            );
                        }
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{}: Request failed for {}: {}",
                    attempt, max_tries, url, e
                );
            }
        }

        if attempt < max_tries {
            info!("Sleeping for {} milliseconds before retry", sleep_millis);
            tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
            sleep_millis *= 2;
        }
    }

    warn!("All attempts failed for {}", url);
    None
}

/// Fetch and parse the hourly feed. An unreachable feed yields no readings.
#[cfg(feature = "api")]
pub async fn fetch_hourly_readings(
    client: &Client,
    url: &str,
    max_tries: u32,
) -> Result<Vec<HourlyReading>> {
    match fetch_hourly_feed(client, url, max_tries).await {
        Some(body) => parse_hourly_csv(&body),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_hourly_csv() {
        let csv_data = "\
timestamp,pm25,tmp,rh,ws,wd
2024-11-03 01:00,18.0,17.2,71,1.3,250
2024-11-03 02:00,---,16.8,74,1.1,240
2024-11-03 03:00:00,20.5,,75,N/D,230
";
        let readings = parse_hourly_csv(csv_data).unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(
            readings[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 11, 3)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );
        assert_eq!(readings[0].pm25, Some(18.0));
        assert_eq!(readings[0].wd, Some(250.0));
        assert_eq!(readings[1].pm25, None);
        assert_eq!(readings[1].tmp, Some(16.8));
        assert_eq!(readings[2].tmp, None);
        assert_eq!(readings[2].ws, None);
        assert_eq!(readings[2].get(Feature::Rh), Some(75.0));
    }

    #[test]
    fn test_columns_found_by_name() {
        let csv_data = "\
station,wd,ws,rh,tmp,pm25,timestamp
TLA,180,2.0,60,25.0,12.0,2024-11-03 12:00
";
        let readings = parse_hourly_csv(csv_data).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].pm25, Some(12.0));
        assert_eq!(readings[0].wd, Some(180.0));
    }

    #[test]
    fn test_missing_feature_column_reads_as_absent() {
        let csv_data = "timestamp,pm25\n2024-11-03 12:00,12.0\n";
        let readings = parse_hourly_csv(csv_data).unwrap();
        assert_eq!(readings[0].pm25, Some(12.0));
        assert_eq!(readings[0].wd, None);
    }

    #[test]
    fn test_bad_timestamps_skipped() {
        let csv_data = "\
timestamp,pm25,tmp,rh,ws,wd
Promedio,15.0,20.0,60,1.0,200
2024-11-03 12:00,12.0,25.0,60,2.0,180
";
        let readings = parse_hourly_csv(csv_data).unwrap();
        assert_eq!(readings.len(), 1);
    }

    #[test]
    fn test_missing_timestamp_column_fails() {
        let err = parse_hourly_csv("pm25,tmp\n1.0,2.0\n").unwrap_err();
        assert!(matches!(err, StationError::MissingColumn("timestamp")));
    }

    #[test]
    fn test_parse_empty_csv() {
        let readings = parse_hourly_csv("timestamp,pm25,tmp,rh,ws,wd\n").unwrap();
        assert!(readings.is_empty());
    }
}
