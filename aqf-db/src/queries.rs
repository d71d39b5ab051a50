//! Typed queries over the `daily_data` table.
//!
//! Dates are stored as `YYYY-MM-DD` text, so lexical order is
//! chronological order.

use anyhow::{bail, Context};
use aqf_station::DailyRecord;
use aqf_utils::dates::{format_date, parse_date};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use crate::models::Upsert;
use crate::Database;

const SELECT_RECORD: &str = "SELECT date, pm25, tmp, rh, ws, wd FROM daily_data";

/// Raw row as stored, before the date is parsed.
type RawRecord = (String, [Option<f64>; 5]);

fn raw_record(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok((
        row.get(0)?,
        [row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?],
    ))
}

fn into_record((date, values): RawRecord) -> anyhow::Result<DailyRecord> {
    let date = parse_date(&date).context("corrupt date in daily_data")?;
    Ok(DailyRecord::from_values(date, values))
}

impl Database {
    /// Id of the row for `date`, if one exists.
    pub fn daily_record_id(&self, date: &NaiveDate) -> anyhow::Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM daily_data WHERE date = ?1",
                params![format_date(date)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Insert a new row and return its id. Fails if the date already exists.
    pub fn insert_daily_record(&self, record: &DailyRecord) -> anyhow::Result<i64> {
        self.conn
            .execute(
                "INSERT INTO daily_data (date, pm25, tmp, rh, ws, wd)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    format_date(&record.date),
                    record.pm25,
                    record.tmp,
                    record.rh,
                    record.ws,
                    record.wd
                ],
            )
            .with_context(|| format!("failed to insert record for {}", record.date))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite every feature of row `id` with the values of `record`.
    pub fn update_daily_record(&self, id: i64, record: &DailyRecord) -> anyhow::Result<()> {
        let changed = self.conn.execute(
            "UPDATE daily_data
             SET pm25 = ?1, tmp = ?2, rh = ?3, ws = ?4, wd = ?5
             WHERE id = ?6",
            params![record.pm25, record.tmp, record.rh, record.ws, record.wd, id],
        )?;
        if changed == 0 {
            bail!("no daily record with id {}", id);
        }
        Ok(())
    }

    /// Insert the record, or update the existing row for its date.
    pub fn upsert_daily_record(&self, record: &DailyRecord) -> anyhow::Result<Upsert> {
        let outcome = match self.daily_record_id(&record.date)? {
            Some(id) => {
                self.update_daily_record(id, record)?;
                Upsert::Updated(id)
            }
            None => Upsert::Inserted(self.insert_daily_record(record)?),
        };
        log::info!("store: {} -> {:?}", record.date, outcome);
        Ok(outcome)
    }

    /// The most recent record.
    pub fn latest_daily_record(&self) -> anyhow::Result<Option<DailyRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!("{} ORDER BY date DESC LIMIT 1", SELECT_RECORD),
                [],
                raw_record,
            )
            .optional()?;
        raw.map(into_record).transpose()
    }

    /// The most recent record strictly before `date`.
    pub fn latest_before(&self, date: &NaiveDate) -> anyhow::Result<Option<DailyRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!("{} WHERE date < ?1 ORDER BY date DESC LIMIT 1", SELECT_RECORD),
                params![format_date(date)],
                raw_record,
            )
            .optional()?;
        raw.map(into_record).transpose()
    }

    /// The last `n` records, **newest first**.
    pub fn last_n_daily_records(&self, n: usize) -> anyhow::Result<Vec<DailyRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY date DESC LIMIT ?1", SELECT_RECORD))?;
        let rows = stmt
            .query_map(params![n as i64], raw_record)?
            .collect::<Result<Vec<_>, _>>()?;
        let records = rows
            .into_iter()
            .map(into_record)
            .collect::<anyhow::Result<Vec<_>>>()?;
        log::info!(
            "store: last_n_daily_records({}) returned {} records",
            n,
            records.len()
        );
        Ok(records)
    }

    /// Every record, oldest first.
    pub fn all_daily_records(&self) -> anyhow::Result<Vec<DailyRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY date", SELECT_RECORD))?;
        let rows = stmt
            .query_map([], raw_record)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(into_record).collect()
    }

    pub fn count(&self) -> anyhow::Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM daily_data", [], |row| row.get(0))?)
    }
}
