//! AQF CLI - Command line tool for station ingest and PM2.5 forecasting.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aqf-cli",
    version,
    about = "Air quality forecasting toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: aqf_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    aqf_cmd::run(cli.command).await
}
