//! SQLite store for daily station records.
//!
//! This crate keeps one [`DailyRecord`](aqf_station::DailyRecord) per
//! calendar date and serves the trailing window the forecaster needs.
//!
//! # Usage
//!
//! ```rust
//! use aqf_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_daily_records("date,pm25,tmp,rh,ws,wd\n2024-11-03,18.2,21.0,55,2.1,270\n").unwrap();
//!
//! // Newest first, the order the forecaster expects from the store
//! let recent = db.last_n_daily_records(30).unwrap();
//! assert_eq!(recent.len(), 1);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the SQL schema.

pub mod schema;
mod loader;
mod queries;
pub mod models;

use anyhow::Context;
use rusqlite::Connection;
use std::path::Path;

pub use models::Upsert;

/// SQLite database holding daily station records.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self { conn })
    }

    /// Open (or create) a database file and apply the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        conn.execute_batch(schema::create_schema())?;
        log::info!("store: opened {}", path.display());
        Ok(Self { conn })
    }
}
