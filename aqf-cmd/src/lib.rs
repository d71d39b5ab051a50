//! Command implementations for the AQF CLI.
//!
//! Provides subcommands for seeding and updating the daily store from
//! station data, and for producing AQI-annotated PM2.5 forecasts.

use std::path::PathBuf;

use aqf_aqi::Pollutant;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

pub mod aqi;
pub mod forecast;
pub mod ingest;

/// Location of the daily store.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// SQLite database file
    #[arg(long, env = "AQF_DB", default_value = "aqf.sqlite")]
    pub db: PathBuf,
}

/// Trained model and fitted scaler files.
#[derive(Args, Debug, Clone)]
pub struct ArtifactArgs {
    /// Model artifact (JSON)
    #[arg(long, env = "AQF_MODEL", default_value = "models/lstm_seven_step.json")]
    pub model: PathBuf,

    /// Scaler artifact (JSON)
    #[arg(long, env = "AQF_SCALER", default_value = "models/scaler.json")]
    pub scaler: PathBuf,
}

/// Where the hourly station feed comes from, and which day to aggregate.
#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    /// URL of the hourly CSV feed
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub url: Option<String>,

    /// Local hourly CSV file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Day to aggregate, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Forecast output options.
#[derive(Args, Debug, Clone)]
pub struct ForecastArgs {
    /// Number of most recent stored days to read
    #[arg(long, default_value_t = forecast::DEFAULT_HISTORY_DAYS)]
    pub days: usize,

    /// Pollutant table used to classify the forecast
    #[arg(long, default_value = "pm25")]
    pub pollutant: Pollutant,

    /// Print values only, without AQI annotation
    #[arg(long)]
    pub no_aqi: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Seed the store from a daily CSV (date,pm25,tmp,rh,ws,wd)
    Import {
        /// Path to the daily CSV
        #[arg(long)]
        csv: PathBuf,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Aggregate one day of the hourly feed into the store
    Ingest {
        #[command(flatten)]
        feed: FeedArgs,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Forecast the coming days from the stored history
    Forecast {
        #[command(flatten)]
        options: ForecastArgs,

        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        artifacts: ArtifactArgs,
    },

    /// Ingest today's feed, then forecast (the daily job)
    Run {
        #[command(flatten)]
        feed: FeedArgs,

        #[command(flatten)]
        options: ForecastArgs,

        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        artifacts: ArtifactArgs,
    },

    /// Classify a single concentration
    Aqi {
        /// Pollutant (pm25, pm10, o3, co, so2, no2)
        #[arg(long)]
        pollutant: Pollutant,

        /// Concentration in the pollutant's reporting units
        #[arg(long)]
        concentration: f64,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Import { csv, store } => ingest::run_import(&store, &csv),
        Command::Ingest { feed, store } => {
            ingest::run_ingest(&store, &feed).await?;
            Ok(())
        }
        Command::Forecast {
            options,
            store,
            artifacts,
        } => forecast::run_forecast(&store, &artifacts, &options),
        Command::Run {
            feed,
            options,
            store,
            artifacts,
        } => {
            ingest::run_ingest(&store, &feed).await?;
            forecast::run_forecast(&store, &artifacts, &options)
        }
        Command::Aqi {
            pollutant,
            concentration,
        } => aqi::run_aqi(pollutant, concentration),
    }
}
