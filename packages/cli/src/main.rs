#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI driver for the transit map pipeline.
//!
//! Repeatedly invokes the stop batcher, then the POI batcher (stopping
//! early once an invocation comes back under the batch cap), then runs
//! the aggregator and writes the text report. Each batcher invocation
//! opens and drops its own store connection, so a killed run resumes
//! cleanly on the next one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use transit_map_analytics::report;
use transit_map_database::{db, meta, pois_db, stops_db};
use transit_map_ingest::{ingest_pois, ingest_stops};
use transit_map_source::config::load_config;
use transit_map_source::pois::PoiSearchClient;
use transit_map_source::rate_limit::FixedDelay;
use transit_map_source::stops::StopLocationsClient;
use transit_map_source_models::{AppConfig, StopKind};

#[derive(Parser)]
#[command(name = "transit_map", about = "Transit stop and POI ingestion tool")]
struct Cli {
    /// Path to a TOML config file. Built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest transit stops in batches
    Stops {
        /// Number of batcher invocations (default from config)
        #[arg(long)]
        runs: Option<u32>,
    },
    /// Ingest POIs around stored stops in batches
    Pois {
        /// Maximum batcher invocations; stops early on exhaustion
        #[arg(long)]
        runs: Option<u32>,
    },
    /// Aggregate rankings and write the text report
    Report,
    /// Show store counts and ingestion state
    Status,
    /// Full pipeline: stop runs, POI runs, then the report
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Stops { runs } => {
            run_stop_batches(&config, runs.unwrap_or(config.stop_runs), None).await?;
        }
        Commands::Pois { runs } => {
            run_poi_batches(&config, runs.unwrap_or(config.poi_runs), None).await?;
        }
        Commands::Report => write_report(&config)?,
        Commands::Status => print_status(&config)?,
        Commands::Run => run_pipeline(&config).await?,
    }

    Ok(())
}

/// Invokes the stop batcher `runs` times; returns the total inserted.
#[allow(clippy::future_not_send)]
async fn run_stop_batches(
    config: &AppConfig,
    runs: u32,
    bar: Option<&ProgressBar>,
) -> Result<u64, Box<dyn std::error::Error>> {
    let source = StopLocationsClient::new(config.stops.clone())?;
    let mut total = 0u64;

    for run in 1..=runs {
        let conn = db::open(Path::new(&config.db_path))?;
        let inserted = ingest_stops(&conn, &source, config.batch_cap).await?;
        total += inserted;
        log::info!("Stop run {run}/{runs}: inserted {inserted}");
        if let Some(bar) = bar {
            bar.inc(1);
        }
    }

    log::info!("Inserted {total} stops over {runs} run(s)");
    Ok(total)
}

/// Invokes the POI batcher up to `runs` times, stopping early once an
/// invocation inserts fewer than the batch cap; returns the total
/// inserted.
#[allow(clippy::future_not_send)]
async fn run_poi_batches(
    config: &AppConfig,
    runs: u32,
    bar: Option<&ProgressBar>,
) -> Result<u64, Box<dyn std::error::Error>> {
    let limiter = Arc::new(FixedDelay::from_millis(config.pois.rate_limit_ms));
    let source = PoiSearchClient::new(config.pois.clone(), limiter)?;
    let search_radius_m = config.search_radius_m();
    let mut total = 0u64;

    for run in 1..=runs {
        let conn = db::open(Path::new(&config.db_path))?;
        let inserted = ingest_pois(
            &conn,
            &source,
            config.batch_cap,
            search_radius_m,
            config.pois.result_cap,
        )
        .await?;
        total += inserted;
        log::info!("POI run {run}/{runs}: inserted {inserted}");
        if let Some(bar) = bar {
            bar.inc(1);
        }

        if inserted < config.batch_cap {
            log::info!("No more POIs to fetch; stopping after run {run}");
            break;
        }
    }

    log::info!("Inserted {total} POIs");
    Ok(total)
}

/// Runs the aggregator and writes the text report.
fn write_report(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = db::open(Path::new(&config.db_path))?;
    let reports = transit_map_analytics::aggregate(&conn, &config.radii_m)?;
    report::write_report(Path::new(&config.report_path), &reports)?;
    println!("Report written to {}", config.report_path);
    Ok(())
}

/// Prints store counts and ingestion state.
fn print_status(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = db::open(Path::new(&config.db_path))?;

    println!("{:<16} STOPS", "KIND");
    println!("{}", "-".repeat(24));
    for kind in StopKind::ALL {
        println!("{:<16} {}", kind.to_string(), stops_db::count_for(&conn, kind)?);
    }
    println!();

    println!("Total stops:     {}", stops_db::total(&conn)?);
    println!("Total POIs:      {}", pois_db::total(&conn)?);
    println!(
        "Saturated stops: {}",
        pois_db::saturated_count(&conn, config.pois.result_cap)?
    );

    let cursor = meta::poi_cursor(&conn)?
        .map_or_else(|| "none".to_string(), |id| id.to_string());
    println!("POI cursor:      {cursor}");

    for (label, key) in [
        ("Stops ingested:", meta::STOPS_LAST_INGEST_AT),
        ("POIs ingested: ", meta::POIS_LAST_INGEST_AT),
    ] {
        let at = meta::get(&conn, key)?.unwrap_or_else(|| "never".to_string());
        println!("{label}  {at}");
    }

    Ok(())
}

/// Full pipeline with a steps bar: stop runs, POI runs, report.
#[allow(clippy::future_not_send)]
async fn run_pipeline(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let total_steps = u64::from(config.stop_runs) + u64::from(config.poi_runs) + 1;
    let bar = ProgressBar::new(total_steps);
    bar.set_style(
        ProgressStyle::with_template("{msg} {wide_bar:.cyan/dim} {pos}/{len} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    bar.set_message("Ingesting stops");
    run_stop_batches(config, config.stop_runs, Some(&bar)).await?;

    bar.set_message("Ingesting POIs");
    run_poi_batches(config, config.poi_runs, Some(&bar)).await?;

    // POI ingestion may finish early; jump to the report step.
    bar.set_position(total_steps - 1);
    bar.set_message("Writing report");
    write_report(config)?;
    bar.inc(1);

    bar.finish_with_message("Pipeline complete");
    Ok(())
}
