// crates/driftscan-cli/src/commands/drift.rs
//
// `driftscan drift` — load a collection, optionally reduce it, run the
// full drift test suite for valid-vs-train and test-vs-train, and print
// the results as a table or JSON. Optionally saves the structured report.

use std::path::Path;

use clap::Args;

use driftscan_analysis::cache::ProjectionCache;
use driftscan_core::error::DriftError;
use driftscan_detect::pipeline::run_analysis;
use driftscan_store::{load_partition_set, InMemoryVectorStore};

use crate::config::{validate_target_dimension, CliConfig};
use crate::output::{drift_rows, format_json, format_table};

/// Arguments for the drift subcommand.
#[derive(Debug, Args)]
pub struct DriftCmd {
    /// Collection to analyze (defaults to the configured collection).
    #[arg(long)]
    pub collection: Option<String>,

    /// PCA target dimension (10, 50, 100, 200, 300, 400, or 500).
    /// Overrides the configured value; omit both for no reduction.
    #[arg(long)]
    pub dimension: Option<usize>,

    /// Write the structured report as JSON to this path.
    #[arg(long)]
    pub output: Option<String>,
}

/// Run the drift command.
pub async fn run(cmd: &DriftCmd, config: &CliConfig, json: bool) -> Result<(), DriftError> {
    let collection = cmd
        .collection
        .clone()
        .unwrap_or_else(|| config.collection.clone());

    let target_dimension = cmd.dimension.or(config.target_dimension);
    if let Some(k) = target_dimension {
        validate_target_dimension(k)?;
    }

    let store = InMemoryVectorStore::open(Path::new(&config.store_path))?;
    let set = load_partition_set(&store, &collection).await?;

    let cache = ProjectionCache::new();
    let report = run_analysis(
        &set,
        &collection,
        config.thresholds,
        target_dimension,
        &cache,
    )?;

    if let Some(path) = &cmd.output {
        std::fs::write(path, format_json(&report))
            .map_err(|e| DriftError::Storage(format!("cannot write {}: {}", path, e)))?;
        tracing::info!("wrote report to {}", path);
    }

    if json {
        println!("{}", format_json(&report));
        return Ok(());
    }

    let mut rows = drift_rows(&report.valid_vs_train);
    rows.extend(drift_rows(&report.test_vs_train));
    println!("{}", format_table(&rows));
    println!();
    println!("{}", report.summary_text());
    if report.any_drift() {
        println!();
        println!("Drift detected.");
    }

    Ok(())
}
