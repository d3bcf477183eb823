// crates/driftscan-analysis/src/cache.rs
//
// Cache of fitted PCA projections.
//
// Keyed on (reference content hash, target dimension) so a changed
// reference partition can never serve a stale projection. Invalidation is
// explicit; callers clear the cache when a new dataset is uploaded.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use driftscan_core::error::DriftError;
use driftscan_core::matrix::EmbeddingMatrix;

use crate::pca::PcaProjection;

type CacheKey = ([u8; 32], usize);

/// Shared cache of fitted projections.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    entries: RwLock<HashMap<CacheKey, Arc<PcaProjection>>>,
}

impl ProjectionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fit a projection for (reference, k), returning a cached one when the
    /// reference content and k match a previous fit.
    pub fn fit(
        &self,
        reference: &EmbeddingMatrix,
        k: usize,
    ) -> Result<Arc<PcaProjection>, DriftError> {
        let key = (reference.content_hash(), k);

        {
            let entries = self
                .entries
                .read()
                .map_err(|e| DriftError::Computation(format!("RwLock poisoned: {}", e)))?;
            if let Some(projection) = entries.get(&key) {
                tracing::debug!(k, "projection cache hit");
                return Ok(Arc::clone(projection));
            }
        }

        let projection = Arc::new(PcaProjection::fit(reference, k)?);
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DriftError::Computation(format!("RwLock poisoned: {}", e)))?;
        entries.insert(key, Arc::clone(&projection));
        Ok(projection)
    }

    /// Drop every cached projection.
    pub fn invalidate(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Number of cached projections.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
