// crates/driftscan-store/src/loader.rs
//
// Store -> PartitionSet loader.
//
// Fetches every vector tagged train/valid/test from one collection and
// assembles the PartitionSet the analysis pipeline consumes. The missing-
// partition check fires here, before any distance or drift work starts.

use driftscan_core::error::DriftError;
use driftscan_core::matrix::EmbeddingMatrix;
use driftscan_core::partition::{Partition, PartitionSet};
use driftscan_core::record::SetType;
use driftscan_core::traits::VectorStore;

/// Upper bound on records fetched per partition. Matches dashboard-scale
/// datasets; raise if collections grow beyond this.
const PARTITION_FETCH_LIMIT: usize = 100_000;

/// Load one partition's matrix from the store.
async fn load_partition(
    store: &dyn VectorStore,
    collection: &str,
    partition: Partition,
) -> Result<EmbeddingMatrix, DriftError> {
    let records = store
        .query_by_set_type(collection, SetType::from(partition), PARTITION_FETCH_LIMIT)
        .await?;
    if records.is_empty() {
        return Err(DriftError::MissingPartition(partition.as_str().to_string()));
    }
    if records.len() == PARTITION_FETCH_LIMIT {
        tracing::warn!(
            collection,
            partition = %partition,
            limit = PARTITION_FETCH_LIMIT,
            "partition hit the fetch limit; additional records were not loaded"
        );
    }
    let rows: Vec<Vec<f64>> = records.into_iter().map(|r| r.vector).collect();
    EmbeddingMatrix::from_rows(rows)
}

/// Fetch train/valid/test from `collection` and build a validated
/// PartitionSet.
///
/// Fails with `MissingPartition` if any partition is absent or empty and
/// `DimensionMismatch` if the stored vectors disagree on dimensionality.
pub async fn load_partition_set(
    store: &dyn VectorStore,
    collection: &str,
) -> Result<PartitionSet, DriftError> {
    let train = load_partition(store, collection, Partition::Train).await?;
    let valid = load_partition(store, collection, Partition::Valid).await?;
    let test = load_partition(store, collection, Partition::Test).await?;

    let set = PartitionSet::new(train, valid, test);
    set.validate()?;
    tracing::info!(
        collection,
        dimensions = set.dimensions()?,
        "loaded partition set"
    );
    Ok(set)
}
