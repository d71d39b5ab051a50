//! CSV import and export of daily records.
//!
//! # CSV Format
//!
//! Headers are required and matched by name: `date,pm25,tmp,rh,ws,wd` in
//! any order, extra columns ignored. Dates are `YYYY-MM-DD`;
//! empty or non-numeric feature cells are stored as NULL.

use anyhow::Context;
use aqf_station::{DailyRecord, FEATURES, N_FEATURES};
use aqf_utils::dates::{format_date, parse_date};

use crate::Database;

/// Resolve the date and feature columns by header name, so a file with its
/// columns in another order still lands in the right fields.
fn column_positions(headers: &csv::StringRecord) -> anyhow::Result<(usize, [usize; N_FEATURES])> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .with_context(|| format!("daily CSV has no '{}' column", name))
    };
    let date = find("date")?;
    let mut features = [0; N_FEATURES];
    for feature in FEATURES {
        features[feature.index()] = find(feature.name())?;
    }
    Ok((date, features))
}

impl Database {
    /// Load daily records from a CSV string, inserting or updating by date.
    ///
    /// Returns the number of rows written.
    ///
    /// # Example CSV
    /// ```text
    /// date,pm25,tmp,rh,ws,wd
    /// 2024-11-03,18.2,21.0,55,2.1,270
    /// 2024-11-04,,20.4,61,1.7,
    /// ```
    pub fn load_daily_records(&self, csv_data: &str) -> anyhow::Result<usize> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let (date_col, feature_cols) = column_positions(rdr.headers()?)?;

        // all rows or none
        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0usize;
        let mut skipped = 0u32;
        for (line, result) in rdr.records().enumerate() {
            let r = result?;
            let date_str = r.get(date_col).unwrap_or("").trim();
            if date_str.is_empty() {
                skipped += 1;
                continue;
            }
            let date = parse_date(date_str).with_context(|| format!("row {}", line + 1))?;

            let mut values = [None; 5];
            for feature in FEATURES {
                values[feature.index()] = r
                    .get(feature_cols[feature.index()])
                    .and_then(|s| s.trim().parse::<f64>().ok());
            }
            self.upsert_daily_record(&DailyRecord::from_values(date, values))?;
            count += 1;
        }
        tx.commit()?;
        log::info!(
            "store: loaded {} daily records, skipped {} without a date",
            count,
            skipped
        );
        Ok(count)
    }

    /// Export every record as CSV, oldest first, in the import format.
    pub fn export_daily_records(&self) -> anyhow::Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["date", "pm25", "tmp", "rh", "ws", "wd"])?;
        for record in self.all_daily_records()? {
            let mut row = vec![format_date(&record.date)];
            for feature in FEATURES {
                row.push(record.get(feature).map_or(String::new(), |v| v.to_string()));
            }
            wtr.write_record(&row)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {}", e.error()))?;
        Ok(String::from_utf8(bytes)?)
    }
}
