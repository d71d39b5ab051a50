//! SQL schema for the daily record store.
//!
//! The schema is applied as a single batch when the database is opened.

/// Returns the full SQL schema as a single batch string.
///
/// `daily_data` holds one row per calendar date. Feature columns are
/// nullable; NULL means the station did not report that feature.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS daily_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL UNIQUE,
        pm25 REAL,
        tmp REAL,
        rh REAL,
        ws REAL,
        wd REAL
    );
    CREATE INDEX IF NOT EXISTS idx_daily_date ON daily_data(date);
    "#
}
