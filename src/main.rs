//! # Detour-rank CLI
//!
//! Command-line interface for the detour-rank library.
//! Sorts a CSV of addresses by the detour each would add to a fixed route.

use anyhow::Context;
use clap::Parser;
use detour_rank::{
    rank_file, ChunkSize, GoogleMapsClient, RankConfig, RankOptions, ServiceConfig, API_KEY_ENV,
    DEFAULT_CHUNK_SIZE,
};
use log::{error, warn};

mod cli;

/// Command-line interface for detour-rank
#[derive(Parser)]
#[command(name = "detour-rank")]
#[command(about = "Sort a CSV of addresses by the detour they would add to an existing route")]
#[command(long_about = "Sort a CSV of addresses by the detour they would add to an existing route.

The CSV file must have an `address` column. Distances come from the Google Maps
Distance Matrix API; set its key in the GMAPS_API_KEY environment variable.

  detour-rank \"1 Start St\" \"9 End Ave\" stops.csv     # writes stops_sorted.csv

Addresses whose distances cannot be determined are kept and sorted last.")]
#[command(version = env!("DETOUR_VERSION"))]
struct Cli {
    /// Start address on the fixed route
    start_address: String,

    /// End address on the fixed route
    end_address: String,

    /// Path to CSV file with an `address` column
    csv_file: String,

    /// Addresses sent per distance-matrix request
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let progress_manager =
        cli::ProgressManager::new(0, &format!("🗺️  Measuring detours for {}", cli.csv_file));

    // Log to stderr around the progress bar; missing-distance warnings must stay readable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(progress_manager.log_target())
        .init();

    if cli.verbose {
        eprintln!("📍 Detour-rank v{} starting...", env!("DETOUR_VERSION"));
    }

    let chunk_size = ChunkSize::new(cli.chunk_size)?;
    let config = RankConfig::new(&cli.start_address, &cli.end_address, &cli.csv_file)
        .with_chunk_size(chunk_size);

    let service_config = ServiceConfig::from_env();
    if service_config.api_key.is_empty() {
        warn!("Please set an API key for the Google Maps Distance Matrix API in the environment variable `{API_KEY_ENV}`.");
    }
    let client = GoogleMapsClient::new(service_config).context("failed to set up the HTTP client")?;

    let options = RankOptions {
        progress: Some(progress_manager.callback()),
    };

    let summary = rank_file(&config, client, options)
        .await
        .with_context(|| format!("failed to rank {}", cli.csv_file))?;

    if summary.unranked > 0 {
        warn!(
            "{} of {} addresses have no combined distance and were sorted last",
            summary.unranked, summary.rows
        );
    }

    eprintln!("✅ Done! Please see the file below for the results.");
    println!("{}", summary.output_path.display());

    Ok(())
}
