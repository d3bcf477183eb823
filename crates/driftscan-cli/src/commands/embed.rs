// crates/driftscan-cli/src/commands/embed.rs
//
// `driftscan embed` — embed a JSON dataset of texts and persist the
// vectors to the store snapshot, tagged by partition.
//
// Dataset format:
//   { "train": ["text", ...], "valid": [...], "test": [...] }

use std::collections::HashMap;
use std::path::Path;

use clap::Args;
use serde::Deserialize;

use driftscan_core::embedding::HashEmbedder;
use driftscan_core::error::DriftError;
use driftscan_core::partition::Partition;
use driftscan_core::record::{SetType, VectorRecord};
use driftscan_core::traits::{Embedder, VectorStore};
use driftscan_store::InMemoryVectorStore;

use crate::config::CliConfig;

/// Arguments for the embed subcommand.
#[derive(Debug, Args)]
pub struct EmbedCmd {
    /// Path to the JSON dataset file.
    #[arg(long)]
    pub input: String,

    /// Collection to insert into (defaults to the configured collection).
    #[arg(long)]
    pub collection: Option<String>,

    /// Replace the collection instead of appending to it.
    #[arg(long)]
    pub replace: bool,
}

/// JSON dataset: partition tag -> texts.
#[derive(Debug, Deserialize)]
struct Dataset(HashMap<String, Vec<String>>);

/// Run the embed command.
pub async fn run(cmd: &EmbedCmd, config: &CliConfig) -> Result<(), DriftError> {
    let raw = std::fs::read_to_string(&cmd.input)
        .map_err(|e| DriftError::Config(format!("cannot read {}: {}", cmd.input, e)))?;
    let dataset: Dataset = serde_json::from_str(&raw)?;

    let collection = cmd
        .collection
        .clone()
        .unwrap_or_else(|| config.collection.clone());

    let store_path = Path::new(&config.store_path);
    let store = if store_path.exists() {
        InMemoryVectorStore::open(store_path)?
    } else {
        if let Some(parent) = store_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DriftError::Storage(format!("cannot create {:?}: {}", parent, e)))?;
        }
        InMemoryVectorStore::new()
    };

    if cmd.replace {
        store.drop_collection(&collection).await?;
    }

    let embedder = HashEmbedder::new(config.embedding_dimensions, config.max_length)?;

    let mut total = 0usize;
    for partition in Partition::ALL {
        let texts = match dataset.0.get(partition.as_str()) {
            Some(texts) if !texts.is_empty() => texts,
            _ => {
                tracing::warn!(%partition, "dataset has no texts for partition");
                continue;
            }
        };

        let matrix = embedder.embed(texts)?;
        let records: Vec<VectorRecord> = matrix
            .iter_rows()
            .zip(texts)
            .map(|(row, text)| {
                VectorRecord::new(row.to_vec(), SetType::from(partition))
                    .with_source_text(text.clone())
            })
            .collect();

        total += store.insert(&collection, records).await?;
    }

    store.persist(store_path)?;
    println!(
        "Embedded {} texts into collection '{}' ({} dimensions, store: {})",
        total, collection, config.embedding_dimensions, config.store_path
    );

    Ok(())
}
