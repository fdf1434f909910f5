#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parish crime dashboard on the command line.
//!
//! ```text
//! crime_watch boundary [--geojson]
//! crime_watch periods
//! crime_watch incidents [--period 2024-03] [--category burglary] [--json]
//! crime_watch summary [--period 2024-03] [--category burglary]
//! crime_watch report [--period 2024-03]
//! ```
//!
//! `--period` defaults to the newest month police.uk has published. Set
//! `RUST_LOG=info` to follow boundary resolution.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use crime_watch_crime_models::ReportingPeriod;

use crate::commands::Context;
use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "crime_watch",
    about = "Street-level crime for a civil parish from police.uk"
)]
struct Cli {
    /// Area to report on (from the built-in area registry)
    #[arg(long, global = true, default_value = "Codford")]
    area: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the parish boundary and show where it came from
    Boundary {
        /// Print the boundary as a GeoJSON feature
        #[arg(long)]
        geojson: bool,
    },
    /// List the months with published crime data
    Periods,
    /// List crimes inside the boundary
    Incidents {
        /// Reporting month (YYYY-MM)
        #[arg(long)]
        period: Option<ReportingPeriod>,
        /// Only show this category slug (or "all")
        #[arg(long)]
        category: Option<String>,
        /// Print the raw incident records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show crime counts by category
    Summary {
        /// Reporting month (YYYY-MM)
        #[arg(long)]
        period: Option<ReportingPeriod>,
        /// Only count this category slug (or "all")
        #[arg(long)]
        category: Option<String>,
    },
    /// Write a narrative monthly report with an LLM
    Report {
        /// Reporting month (YYYY-MM)
        #[arg(long)]
        period: Option<ReportingPeriod>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let ctx = Context::new(&config, &cli.area)?;

    match cli.command {
        Commands::Boundary { geojson } => commands::boundary(&ctx, geojson).await?,
        Commands::Periods => commands::periods(&ctx).await,
        Commands::Incidents {
            period,
            category,
            json,
        } => commands::incidents(&ctx, period, category.as_deref(), json).await?,
        Commands::Summary { period, category } => {
            commands::summary(&ctx, period, category.as_deref()).await?;
        }
        Commands::Report { period } => commands::report(&ctx, period).await?,
    }

    Ok(())
}
