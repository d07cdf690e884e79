use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod brief;
mod cli;
mod config;
mod error;
mod forecast;
mod output;
mod provider;
mod resolver;
mod runner;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("tripbrief=debug")
    } else {
        EnvFilter::new("tripbrief=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Brief(args) => cli::brief::execute(args, config).await,
        Commands::Resolve(args) => cli::resolve::execute(args, config).await,
        Commands::Flights(args) => cli::flights::execute(args, config).await,
        Commands::Hotels(args) => cli::hotels::execute(args, config).await,
        Commands::Schema => cli::schema::execute(),
    }
}
