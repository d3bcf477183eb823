// crates/driftscan-cli/src/main.rs
//
// CLI entrypoint for the driftscan toolkit.
//
// Initializes tracing, parses arguments, loads configuration, and
// dispatches subcommands: embed a dataset into the vector store, run the
// drift analysis, inspect distance statistics, or list collections.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use commands::distance::DistanceCmd;
use commands::drift::DriftCmd;
use commands::embed::EmbedCmd;
use config::CliConfig;

/// driftscan — embedding drift detection between train/valid/test datasets.
#[derive(Parser, Debug)]
#[command(
    name = "driftscan",
    version = "0.1.0",
    about = "Detect distributional drift between text embedding datasets"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Emit machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Embed a JSON dataset of texts and persist it to the vector store.
    Embed(EmbedCmd),

    /// Run the drift test suite against a stored collection.
    Drift(DriftCmd),

    /// Show pairwise distance statistics for a stored collection.
    Distance(DistanceCmd),

    /// List collections in the store snapshot.
    Collections,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration, falling back to defaults if no file is present.
    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);
    let config = match CliConfig::load(&config_path) {
        Ok(cfg) => {
            tracing::info!("Loaded configuration from {}", config_path);
            cfg
        }
        Err(e) => {
            tracing::debug!(
                "Could not load config from {}: {}. Using defaults.",
                config_path,
                e
            );
            CliConfig::default()
        }
    };

    match &cli.command {
        Commands::Embed(cmd) => commands::embed::run(cmd, &config).await?,
        Commands::Drift(cmd) => commands::drift::run(cmd, &config, cli.json).await?,
        Commands::Distance(cmd) => commands::distance::run(cmd, &config, cli.json).await?,
        Commands::Collections => commands::collections::run(&config).await?,
    }

    Ok(())
}
