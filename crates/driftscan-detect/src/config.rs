// crates/driftscan-detect/src/config.rs
//
// Method naming and threshold configuration for the drift test suite.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five drift test methods.
///
/// MMD produces one global statistic over the joint embedding space; the
/// other four decompose the comparison per embedding dimension and
/// aggregate via the fraction of drifted dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DriftMethod {
    Mmd,
    Wasserstein,
    KlDivergence,
    JensenShannon,
    EnergyDistance,
}

impl DriftMethod {
    /// All methods, in canonical evaluation order.
    pub const ALL: [DriftMethod; 5] = [
        DriftMethod::Mmd,
        DriftMethod::Wasserstein,
        DriftMethod::KlDivergence,
        DriftMethod::JensenShannon,
        DriftMethod::EnergyDistance,
    ];

    /// Human-readable method name as shown in summaries and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftMethod::Mmd => "MMD",
            DriftMethod::Wasserstein => "Wasserstein Distance",
            DriftMethod::KlDivergence => "KL Divergence",
            DriftMethod::JensenShannon => "JensenShannon Divergence",
            DriftMethod::EnergyDistance => "Energy Distance",
        }
    }
}

impl fmt::Display for DriftMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds consumed by the drift test suite.
///
/// For the ratio-aggregated methods a dimension counts as drifted when its
/// own statistic exceeds `component`, and overall drift fires when the
/// fraction of drifted dimensions exceeds `aggregate`. MMD compares its
/// single global statistic against `mmd` directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftThresholds {
    /// Per-dimension statistic threshold.
    #[serde(default = "default_component")]
    pub component: f64,
    /// Drifted-dimension ratio threshold.
    #[serde(default = "default_aggregate")]
    pub aggregate: f64,
    /// MMD score threshold.
    #[serde(default = "default_mmd")]
    pub mmd: f64,
}

fn default_component() -> f64 {
    0.1
}

fn default_aggregate() -> f64 {
    0.015
}

fn default_mmd() -> f64 {
    0.015
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            component: default_component(),
            aggregate: default_aggregate(),
            mmd: default_mmd(),
        }
    }
}

/// Target dimensions the dashboard exposed for PCA reduction.
pub const TARGET_DIMENSIONS: [usize; 7] = [10, 50, 100, 200, 300, 400, 500];
