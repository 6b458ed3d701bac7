//! poolev - Main Entry Point
//!
//! Reads a coupon file, builds and filters rows, and prints the analysis
//! as JSON.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::{info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use poolev::config::load_config;
use poolev::rows::GeneratorOptions;
use poolev::{analyze, apply_lookup, AnalysisOptions, InMemoryOddsLookup, Match, OutcomeMap, SelectionSet};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Coupon file (JSON)
    #[arg(short = 'i', long)]
    coupon: PathBuf,

    /// Path to configuration file
    #[arg(short, long, default_value = "poolev.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "POOLEV_LOG_LEVEL")]
    log_level: Option<String>,

    /// Seed for row sampling, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Replacement odds (JSON object: match id -> {"1", "X", "2"})
    #[arg(long)]
    odds: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

/// Coupon file layout
#[derive(Debug, Deserialize)]
struct CouponFile {
    #[serde(default)]
    round: Option<String>,
    #[serde(default)]
    sport: Option<String>,
    matches: Vec<Match>,
    /// Covered signs per match; every available sign when absent
    #[serde(default)]
    selections: Option<SelectionSet>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(Some(&args.config)).context("loading configuration")?;

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.settings.log_level);
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG directives take precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Configuration file: {}", args.config);

    let raw = std::fs::read_to_string(&args.coupon)
        .with_context(|| format!("reading coupon {}", args.coupon.display()))?;
    let coupon: CouponFile = serde_json::from_str(&raw).context("parsing coupon")?;
    info!(
        round = coupon.round.as_deref().unwrap_or("-"),
        sport = coupon.sport.as_deref().unwrap_or("-"),
        matches = coupon.matches.len(),
        "coupon loaded"
    );

    let matches = match &args.odds {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading odds {}", path.display()))?;
            let table: HashMap<String, OutcomeMap<f64>> =
                serde_json::from_str(&raw).context("parsing odds")?;
            let mut lookup = InMemoryOddsLookup::new();
            for (id, odds) in table {
                lookup.set_odds(id, odds);
            }
            apply_lookup(&lookup, &coupon.matches).await?
        }
        None => coupon.matches,
    };

    let mut generator = GeneratorOptions::from(&config.sampling);
    if args.seed.is_some() {
        generator.seed = args.seed;
    }
    let options = AnalysisOptions {
        generator,
        pool: config.pool,
        filters: config.filters.clone(),
    };

    let analysis = analyze(&matches, coupon.selections.as_ref(), &options)?;

    let out = if args.pretty {
        serde_json::to_string_pretty(&analysis)?
    } else {
        serde_json::to_string(&analysis)?
    };
    println!("{}", out);

    Ok(())
}
