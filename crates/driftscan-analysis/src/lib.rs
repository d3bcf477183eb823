// crates/driftscan-analysis/src/lib.rs
//
// driftscan-analysis: Pairwise distance matrices and dimensionality
// reduction for the driftscan toolkit.
//
// Provides the distance-matrix engine (cosine similarity and Euclidean
// distance between partition pairs), a PCA reducer fit on the reference
// partition only, and a content-hash-keyed cache of fitted projections.

pub mod cache;
pub mod distance;
pub mod pca;

// Re-export key types for ergonomic access from downstream crates.
pub use cache::ProjectionCache;
pub use distance::{cosine_similarity, euclidean_distance, DistanceKind, DistanceMatrix};
pub use pca::PcaProjection;
