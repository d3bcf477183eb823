// crates/driftscan-core/src/embedding.rs
//
// Embedder identity and the deterministic offline embedder.
//
// The real embedding model (a pretrained transformer) lives behind the
// `Embedder` trait; this module provides its identity metadata plus a
// hash-based stand-in so the full pipeline runs without a model server.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DriftError;
use crate::matrix::EmbeddingMatrix;
use crate::traits::Embedder;

/// Identifies a specific embedding model version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EmbedderId {
    /// Model family (e.g., "hash", "bge", "nomic").
    pub provider: String,
    /// Model name (e.g., "hash-v1", "all-MiniLM-L6-v2").
    pub name: String,
    /// Output dimensionality.
    pub dimensions: u32,
    /// Maximum input length in tokens (characters for the hash embedder).
    pub max_length: u32,
}

/// Deterministic pseudo-embedder: hashes text plus dimension index into a
/// reproducible float vector, then L2-normalizes. Identical text always
/// yields an identical vector; no ML model required.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
    max_length: usize,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of the given dimensionality,
    /// truncating inputs to `max_length` characters.
    pub fn new(dimensions: usize, max_length: usize) -> Result<Self, DriftError> {
        if dimensions == 0 {
            return Err(DriftError::Config(
                "embedder dimensions must be positive".to_string(),
            ));
        }
        Ok(Self {
            dimensions,
            max_length,
        })
    }

    /// Identity metadata for this embedder.
    pub fn id(&self) -> EmbedderId {
        EmbedderId {
            provider: "hash".to_string(),
            name: "hash-v1".to_string(),
            dimensions: self.dimensions as u32,
            max_length: self.max_length as u32,
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f64> {
        // Character-level truncation stands in for token truncation.
        let truncated: String = text.chars().take(self.max_length).collect();

        let mut raw = Vec::with_capacity(self.dimensions);
        for i in 0..self.dimensions {
            let mut hasher = Sha256::new();
            hasher.update(truncated.as_bytes());
            hasher.update(i.to_le_bytes());
            let hash = hasher.finalize();
            // Interpret first 4 bytes as u32, map to [-1, 1]
            let bits = u32::from_le_bytes([hash[0], hash[1], hash[2], hash[3]]);
            raw.push((bits as f64 / u32::MAX as f64) * 2.0 - 1.0);
        }

        // L2-normalize
        let norm: f64 = raw.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in raw.iter_mut() {
                *v /= norm;
            }
        }

        raw
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, texts: &[String]) -> Result<EmbeddingMatrix, DriftError> {
        let rows: Vec<Vec<f64>> = texts.iter().map(|t| self.embed_one(t)).collect();
        if rows.is_empty() {
            // Preserve the column count so empty batches still carry shape.
            return Ok(EmbeddingMatrix::zeros(0, self.dimensions));
        }
        EmbeddingMatrix::from_rows(rows)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
