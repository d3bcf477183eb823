// crates/driftscan-core/src/error.rs

use thiserror::Error;

/// Toolkit-wide error types for driftscan.
#[derive(Debug, Error)]
pub enum DriftError {
    /// A required partition (train/valid/test) is absent or has zero rows.
    /// Corrective action: generate embeddings for that partition first.
    #[error("Missing partition '{0}': generate embeddings for it first")]
    MissingPartition(String),

    /// Two matrices being compared have different column counts.
    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A dimension count no computation can work with: a requested
    /// projection dimension outside 1..=min(N-1, D), or input vectors
    /// with zero dimensions.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// A numerical computation failed (degenerate input, non-finite
    /// intermediate, etc.).
    #[error("Computation error: {0}")]
    Computation(String),

    /// Storage layer error (collection access, snapshot I/O).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (unparseable file, out-of-range value).
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DriftError {
    fn from(e: serde_json::Error) -> Self {
        DriftError::Serialization(e.to_string())
    }
}
