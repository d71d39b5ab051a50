//! Store seeding and daily ingest of the hourly station feed.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use aqf_data::aggregation::aggregate_day;
use aqf_data::gap_fill::fill_missing;
use aqf_db::Database;
use aqf_station::hourly::fetch_hourly_readings;
use aqf_station::{parse_hourly_csv, DailyRecord, HourlyReading};
use aqf_utils::dates::today;
use chrono::NaiveDate;
use log::{info, warn};

use crate::{FeedArgs, StoreArgs};

/// Feed requests are retried this many times before giving up.
pub const FEED_MAX_TRIES: u32 = 2;

/// Load a daily CSV into the store.
pub fn run_import(store: &StoreArgs, csv_path: &Path) -> anyhow::Result<()> {
    let csv_data = std::fs::read_to_string(csv_path)
        .with_context(|| format!("failed to read {}", csv_path.display()))?;
    let db = Database::open(&store.db)?;
    let count = db.load_daily_records(&csv_data)?;
    info!(
        "Imported {} daily records into {} ({} total)",
        count,
        store.db.display(),
        db.count()?
    );
    Ok(())
}

async fn read_feed(feed: &FeedArgs) -> anyhow::Result<Vec<HourlyReading>> {
    if let Some(url) = &feed.url {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        return Ok(fetch_hourly_readings(&client, url, FEED_MAX_TRIES).await?);
    }
    match &feed.file {
        Some(path) => {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(parse_hourly_csv(&body)?)
        }
        None => anyhow::bail!("either --url or --file is required"),
    }
}

/// Aggregate `date`, fill absent features from the latest earlier record,
/// and upsert the result.
///
/// A day without readings still produces a record, made up entirely of
/// the previous day's values.
pub fn ingest_day(
    db: &Database,
    readings: &[HourlyReading],
    date: NaiveDate,
) -> anyhow::Result<DailyRecord> {
    let mut record = aggregate_day(readings, date);
    if !record.is_complete() {
        match db.latest_before(&date)? {
            Some(previous) => {
                fill_missing(&mut record, &previous);
            }
            None => warn!(
                "{}: no earlier record to fill {:?} from",
                date,
                record.missing_features()
            ),
        }
    }
    if !record.is_complete() {
        warn!(
            "{}: storing with {:?} still missing",
            date,
            record.missing_features()
        );
    }
    db.upsert_daily_record(&record)?;
    Ok(record)
}

/// Fetch or read the hourly feed and store the aggregated day.
pub async fn run_ingest(store: &StoreArgs, feed: &FeedArgs) -> anyhow::Result<DailyRecord> {
    let date = feed.date.unwrap_or_else(today);
    let readings = read_feed(feed).await?;
    info!("Read {} hourly readings, aggregating {}", readings.len(), date);

    let db = Database::open(&store.db)?;
    let record = ingest_day(&db, &readings, date)?;
    info!("Ingest complete for {} into {}", date, store.db.display());
    Ok(record)
}
