//! emscope launcher.
//!
//! One binary carries the HTTP API (`serve`) and the standalone operator
//! commands that work the cache and the mapper directly.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

#[derive(Parser, Debug)]
#[command(
    name = "emscope",
    about = "OEM topology discovery and ingest-config builder"
)]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(cli::serve::ServeArgs),
    /// Refresh the cached catalog for an endpoint
    Refresh(cli::refresh::RefreshArgs),
    /// Search the cached catalog
    Search(cli::search::SearchArgs),
    /// Discover and tag the topology of a database cluster
    AutoMap(cli::automap::AutoMapArgs),
    /// Show resolved configuration paths
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    emscope::logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Serve(args) => cli::serve::run(args).await,
        Commands::Refresh(args) => cli::refresh::run(args).await,
        Commands::Search(args) => cli::search::run(args).await,
        Commands::AutoMap(args) => cli::automap::run(args).await,
        Commands::Config(args) => cli::config::run(args),
    }
}
