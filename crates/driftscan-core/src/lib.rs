// crates/driftscan-core/src/lib.rs
//
// driftscan-core: Core types, traits, and the error taxonomy for the
// driftscan toolkit.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines the embedding matrix and partition types, the storage record
// model, the embedder and vector-store trait seams, and the shared error
// enum used throughout the pipeline.

pub mod embedding;
pub mod error;
pub mod matrix;
pub mod partition;
pub mod record;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use driftscan_core::EmbeddingMatrix;`

// Matrix and partition types
pub use matrix::EmbeddingMatrix;
pub use partition::{Partition, PartitionSet};

// Storage record types
pub use record::{SetType, VectorRecord};

// Embedding types
pub use embedding::{EmbedderId, HashEmbedder};

// Error type
pub use error::DriftError;

// Traits
pub use traits::{Embedder, VectorStore};
