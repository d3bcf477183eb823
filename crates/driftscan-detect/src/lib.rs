// crates/driftscan-detect/src/lib.rs
//
// driftscan-detect: Statistical drift tests for embedding distributions.
//
// Quantifies whether a "current" partition has drifted from a "reference"
// partition across five interchangeable methods: MMD on the joint embedding
// space, and four per-dimension tests (Wasserstein, KL divergence,
// Jensen-Shannon, energy distance) aggregated by the fraction of drifted
// dimensions. Methods fail independently; one degenerate test never hides
// the results of the other four.

pub mod component;
pub mod config;
pub mod mmd;
pub mod pipeline;
pub mod report;
pub mod suite;
pub mod summary;

// Re-export key types for ergonomic access from downstream crates.
pub use config::{DriftMethod, DriftThresholds};
pub use pipeline::run_analysis;
pub use report::{AnalysisReport, DistanceStats, PairReport};
pub use suite::{DriftTestResult, DriftTestSuite, MethodFailure, MethodOutcome};
pub use summary::DriftSummary;
