// crates/driftscan-store/src/memory.rs
//
// In-memory vector store implementing the `VectorStore` trait.
//
// Collections are a RwLock'd map from collection name to record list.
// Sufficient for dashboard-scale datasets; a Milvus/Qdrant client would
// implement the same trait for production deployments. Snapshots persist
// the whole map as pretty-printed JSON so an `embed` run and a later
// `drift` run can share state across processes.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use driftscan_core::error::DriftError;
use driftscan_core::record::{SetType, VectorRecord};
use driftscan_core::traits::VectorStore;

/// Serialized snapshot format: collection name -> records.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    collections: HashMap<String, Vec<VectorRecord>>,
}

/// In-memory vector store keyed by collection name.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Vec<VectorRecord>>>,
}

impl InMemoryVectorStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Load a store from a JSON snapshot file.
    pub fn open(path: &Path) -> Result<Self, DriftError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DriftError::Storage(format!("Failed to read snapshot {}: {}", path.display(), e))
        })?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        tracing::debug!(
            collections = snapshot.collections.len(),
            "loaded store snapshot from {}",
            path.display()
        );
        Ok(Self {
            collections: RwLock::new(snapshot.collections),
        })
    }

    /// Write the current contents to a JSON snapshot file.
    pub fn persist(&self, path: &Path) -> Result<(), DriftError> {
        let collections = self
            .collections
            .read()
            .map_err(|e| DriftError::Storage(format!("RwLock poisoned: {}", e)))?
            .clone();
        let snapshot = Snapshot { collections };
        let raw = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, raw).map_err(|e| {
            DriftError::Storage(format!(
                "Failed to write snapshot {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Total record count in a collection, 0 if the collection is unknown.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|store| store.get(collection).map_or(0, |r| r.len()))
            .unwrap_or(0)
    }

    /// Whether the named collection holds no records.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(
        &self,
        collection: &str,
        records: Vec<VectorRecord>,
    ) -> Result<usize, DriftError> {
        let count = records.len();
        let mut store = self
            .collections
            .write()
            .map_err(|e| DriftError::Storage(format!("RwLock poisoned: {}", e)))?;
        store
            .entry(collection.to_string())
            .or_default()
            .extend(records);
        tracing::debug!(collection, inserted = count, "inserted records");
        Ok(count)
    }

    async fn query_by_set_type(
        &self,
        collection: &str,
        set_type: SetType,
        limit: usize,
    ) -> Result<Vec<VectorRecord>, DriftError> {
        let store = self
            .collections
            .read()
            .map_err(|e| DriftError::Storage(format!("RwLock poisoned: {}", e)))?;
        let records = store.get(collection).ok_or_else(|| {
            DriftError::Storage(format!("Unknown collection '{}'", collection))
        })?;

        Ok(records
            .iter()
            .filter(|r| r.set_type == set_type)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_collections(&self) -> Result<Vec<String>, DriftError> {
        let store = self
            .collections
            .read()
            .map_err(|e| DriftError::Storage(format!("RwLock poisoned: {}", e)))?;
        let mut names: Vec<String> = store.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn drop_collection(&self, collection: &str) -> Result<(), DriftError> {
        let mut store = self
            .collections
            .write()
            .map_err(|e| DriftError::Storage(format!("RwLock poisoned: {}", e)))?;
        store.remove(collection);
        Ok(())
    }
}
