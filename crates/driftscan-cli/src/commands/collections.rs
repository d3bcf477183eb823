// crates/driftscan-cli/src/commands/collections.rs
//
// `driftscan collections` — list collections in the store snapshot with
// per-partition record counts.

use std::path::Path;

use driftscan_core::error::DriftError;
use driftscan_core::record::SetType;
use driftscan_core::traits::VectorStore;
use driftscan_store::InMemoryVectorStore;

use crate::config::CliConfig;

/// Run the collections command.
pub async fn run(config: &CliConfig) -> Result<(), DriftError> {
    let path = Path::new(&config.store_path);
    if !path.exists() {
        println!("No store snapshot at {}", config.store_path);
        return Ok(());
    }

    let store = InMemoryVectorStore::open(path)?;
    let names = store.list_collections().await?;
    if names.is_empty() {
        println!("Store is empty.");
        return Ok(());
    }

    for name in names {
        let mut counts = Vec::new();
        for set_type in [SetType::Train, SetType::Valid, SetType::Test] {
            let records = store
                .query_by_set_type(&name, set_type, usize::MAX)
                .await?;
            counts.push(format!("{}: {}", set_type, records.len()));
        }
        println!("{} ({})", name, counts.join(", "));
    }

    Ok(())
}
