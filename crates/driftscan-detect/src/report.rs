// crates/driftscan-detect/src/report.rs
//
// Structured analysis report.
//
// The plain-data form of everything the dashboard's HTML/PDF report and
// LLM explanation layers consumed: per-pair drift summaries plus distance
// matrix statistics. Serializable, so any downstream renderer can pick it
// up as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use driftscan_analysis::distance::DistanceMatrix;
use driftscan_core::partition::Partition;

use crate::summary::DriftSummary;

/// Min/mean/max of one pairwise distance matrix.
///
/// The data feed behind the similarity/distance heatmaps, minus the
/// rendering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistanceStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl From<&DistanceMatrix> for DistanceStats {
    fn from(matrix: &DistanceMatrix) -> Self {
        Self {
            min: matrix.min(),
            mean: matrix.mean(),
            max: matrix.max(),
        }
    }
}

/// Drift and distance results for one (current vs reference) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairReport {
    /// The partition checked for drift.
    pub current: Partition,
    /// The baseline partition (train).
    pub reference: Partition,
    /// Outcomes of all five drift methods.
    pub drift: DriftSummary,
    /// Cosine similarity statistics for the pair.
    pub cosine: DistanceStats,
    /// Euclidean distance statistics for the pair.
    pub euclidean: DistanceStats,
}

impl PairReport {
    /// Label like `valid_vs_train`, used in filenames and table headers.
    pub fn label(&self) -> String {
        format!("{}_vs_{}", self.current, self.reference)
    }
}

/// Complete output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Collection the partitions were loaded from.
    pub collection: String,
    /// When the analysis ran.
    pub generated_at: DateTime<Utc>,
    /// Dimensionality of the stored embeddings.
    pub original_dimensions: usize,
    /// Target dimension when PCA reduction was applied.
    pub reduced_dimensions: Option<usize>,
    /// valid vs train comparison.
    pub valid_vs_train: PairReport,
    /// test vs train comparison.
    pub test_vs_train: PairReport,
}

impl AnalysisReport {
    /// Formatted drift score summary for both pairs, one block per pair.
    /// This is the text handed to report rendering and LLM explanation.
    pub fn summary_text(&self) -> String {
        format!(
            "{}:\n{}\n\n{}:\n{}",
            self.valid_vs_train.label(),
            self.valid_vs_train.drift.to_text(),
            self.test_vs_train.label(),
            self.test_vs_train.drift.to_text()
        )
    }

    /// Whether any method on any pair detected drift.
    pub fn any_drift(&self) -> bool {
        self.valid_vs_train.drift.any_drift() || self.test_vs_train.drift.any_drift()
    }
}
