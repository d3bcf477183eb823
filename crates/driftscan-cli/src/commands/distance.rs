// crates/driftscan-cli/src/commands/distance.rs
//
// `driftscan distance` — pairwise distance statistics for a stored
// collection: cosine similarity and Euclidean distance of valid-vs-train
// and test-vs-train. The numeric feed behind the dashboard heatmaps.

use std::path::Path;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use driftscan_analysis::distance;
use driftscan_core::error::DriftError;
use driftscan_core::partition::Partition;
use driftscan_store::{load_partition_set, InMemoryVectorStore};

use crate::config::CliConfig;
use crate::output::{format_json, format_table};

/// Arguments for the distance subcommand.
#[derive(Debug, Args)]
pub struct DistanceCmd {
    /// Collection to analyze (defaults to the configured collection).
    #[arg(long)]
    pub collection: Option<String>,
}

/// One stats row per (pair, metric).
#[derive(Debug, Serialize, Tabled)]
struct DistanceStatsRow {
    #[tabled(rename = "Comparison")]
    comparison: String,
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Max")]
    max: String,
}

/// Run the distance command.
pub async fn run(cmd: &DistanceCmd, config: &CliConfig, json: bool) -> Result<(), DriftError> {
    let collection = cmd
        .collection
        .clone()
        .unwrap_or_else(|| config.collection.clone());

    let store = InMemoryVectorStore::open(Path::new(&config.store_path))?;
    let set = load_partition_set(&store, &collection).await?;

    let train = set.get(Partition::Train)?;
    let mut rows = Vec::new();
    for current in [Partition::Valid, Partition::Test] {
        let candidate = set.get(current)?;
        let comparison = format!("{}_vs_train", current);

        let cosine = distance::cosine_similarity(candidate, train)?;
        rows.push(DistanceStatsRow {
            comparison: comparison.clone(),
            metric: "cosine".to_string(),
            min: format!("{:.4}", cosine.min()),
            mean: format!("{:.4}", cosine.mean()),
            max: format!("{:.4}", cosine.max()),
        });

        let euclidean = distance::euclidean_distance(candidate, train)?;
        rows.push(DistanceStatsRow {
            comparison,
            metric: "euclidean".to_string(),
            min: format!("{:.4}", euclidean.min()),
            mean: format!("{:.4}", euclidean.mean()),
            max: format!("{:.4}", euclidean.max()),
        });
    }

    if json {
        println!("{}", format_json(&rows));
    } else {
        println!("{}", format_table(&rows));
    }

    Ok(())
}
