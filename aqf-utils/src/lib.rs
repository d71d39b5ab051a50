//! Shared utility functions for AQF crates.

/// Date utility functions
pub mod dates {
    use anyhow::Context;
    use chrono::{Local, NaiveDate};

    /// Date format used in the store and in CSV files: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
    }

    /// Today's date in the local timezone of the station host.
    pub fn today() -> NaiveDate {
        Local::now().naive_local().date()
    }

    /// Check that dates are strictly increasing.
    pub fn is_strictly_increasing(dates: &[NaiveDate]) -> bool {
        dates.windows(2).all(|w| w[0] < w[1])
    }

}
