// crates/driftscan-core/src/traits.rs

use async_trait::async_trait;

use crate::error::DriftError;
use crate::matrix::EmbeddingMatrix;
use crate::record::{SetType, VectorRecord};

/// Trait for text embedding models.
///
/// Implemented by `HashEmbedder` in this crate; a transformer-backed
/// implementation plugs in behind the same seam.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts into one matrix, one row per text.
    fn embed(&self, texts: &[String]) -> Result<EmbeddingMatrix, DriftError>;

    /// Output dimensionality of this embedder.
    fn dimensions(&self) -> usize;
}

/// Trait for the vector-store collaborator.
///
/// Implemented by driftscan-store (in-memory + JSON snapshot backend).
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert records into a named collection, creating it if absent.
    /// Returns the number of records inserted.
    async fn insert(
        &self,
        collection: &str,
        records: Vec<VectorRecord>,
    ) -> Result<usize, DriftError>;

    /// Fetch all records in a collection carrying the given set_type tag,
    /// up to `limit`. An unknown collection yields a storage error.
    async fn query_by_set_type(
        &self,
        collection: &str,
        set_type: SetType,
        limit: usize,
    ) -> Result<Vec<VectorRecord>, DriftError>;

    /// List collection names.
    async fn list_collections(&self) -> Result<Vec<String>, DriftError>;

    /// Drop a collection and everything in it. Dropping an unknown
    /// collection is a no-op.
    async fn drop_collection(&self, collection: &str) -> Result<(), DriftError>;
}
