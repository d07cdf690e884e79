pub mod brief;
pub mod flights;
pub mod hotels;
pub mod resolve;
pub mod schema;

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG: &str = "tripbrief.yaml";

#[derive(Parser)]
#[command(name = "tripbrief")]
#[command(
    author,
    version,
    about = "Travel brief aggregator: weather, restaurants, activities, hotels and flights in one pass"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (defaults apply when tripbrief.yaml is absent)
    #[arg(short, long, global = true, env = "TRIPBRIEF_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a full trip brief for a destination
    Brief(BriefArgs),

    /// Resolve a place name to a 3-letter IATA code
    Resolve(ResolveArgs),

    /// One-way flight options between two airports
    Flights(FlightsArgs),

    /// Hotel options in a city for a date range
    Hotels(HotelsArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct BriefArgs {
    /// Destination, e.g. "Paris, FR"
    #[arg(short, long)]
    pub destination: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub depart: String,

    /// Return date (YYYY-MM-DD)
    #[arg(long = "return")]
    pub return_date: String,

    /// Number of adults (1-9)
    #[arg(long)]
    pub adults: Option<i64>,

    /// Origin airport code; falls back to DEFAULT_ORIGIN_IATA, then SEA
    #[arg(long)]
    pub origin: Option<String>,

    /// Print the full brief as JSON
    #[arg(long)]
    pub json: bool,

    /// Print only the per-section status lines
    #[arg(long, conflicts_with = "json")]
    pub summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    City,
    Airport,
}

#[derive(Parser, Clone)]
pub struct ResolveArgs {
    /// Free-text place, e.g. "Seattle, WA"
    pub place: String,

    /// Which code to look for
    #[arg(long, value_enum, default_value_t = KindArg::City)]
    pub kind: KindArg,
}

#[derive(Parser, Clone)]
pub struct FlightsArgs {
    /// Origin airport IATA code (e.g. SEA)
    #[arg(long)]
    pub origin: String,

    /// Destination airport IATA code (e.g. LAX)
    #[arg(long)]
    pub destination: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    #[arg(long, default_value_t = 1)]
    pub adults: i64,
}

#[derive(Parser, Clone)]
pub struct HotelsArgs {
    /// IATA city code (e.g. PAR)
    #[arg(long)]
    pub city: String,

    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: String,

    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: String,

    #[arg(long, default_value_t = 1)]
    pub adults: i64,
}

/// Load the config file (if any), apply environment overrides and validate
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let explicit = path.is_some();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG));

    info!("Loading config from {:?}", path);
    let mut config = Config::load_or_default(path, explicit)?;
    config.apply_env();
    config.validate()?;
    Ok(config)
}
