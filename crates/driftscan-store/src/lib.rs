// crates/driftscan-store/src/lib.rs
//
// driftscan-store: Storage layer for the driftscan toolkit.
//
// Provides an in-memory vector store implementing the `VectorStore` trait,
// JSON snapshot persistence for offline runs, and the loader that turns a
// stored collection back into a PartitionSet for analysis.

pub mod loader;
pub mod memory;

// Re-export key types for ergonomic access from downstream crates.
pub use loader::load_partition_set;
pub use memory::InMemoryVectorStore;
