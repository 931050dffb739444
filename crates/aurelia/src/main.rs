//! Aurelia CLI - terminal storefront for Aurelia antiques.
//!
//! Browse the catalog, talk to Aurelius the curator about a piece, or get an
//! AI appraisal of a photograph.
//!
//! # Usage
//!
//! ```bash
//! # List the collection
//! aurelia catalog
//!
//! # Open an item and chat with the curator
//! aurelia view 1
//!
//! # Appraise a photo
//! aurelia appraise ~/Pictures/teapot.jpg
//!
//! # View configuration
//! aurelia config show
//! ```

use aurelia_core::{Aurelia, Config};
use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Aurelia - antiques catalog, curator chat, and AI appraisal.
#[derive(Parser, Debug)]
#[command(name = "aurelia")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the items in the collection
    Catalog(cli::catalog::CatalogArgs),

    /// Show an item and chat with the curator about it
    View(cli::view::ViewArgs),

    /// Appraise a photograph of an antique
    Appraise(cli::appraise::AppraiseArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `aurelia config path`."
            );
            Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Aurelia v{}", aurelia_core::VERSION);

    match cli.command {
        Commands::Config(args) => cli::config::execute(args).await,
        command => {
            let aurelia = Aurelia::new(config)?;
            match command {
                Commands::Catalog(args) => cli::catalog::execute(args, &aurelia),
                Commands::View(args) => cli::view::execute(args, &aurelia).await,
                Commands::Appraise(args) => cli::appraise::execute(args, &aurelia).await,
                Commands::Config(_) => unreachable!(),
            }
        }
    }
}
