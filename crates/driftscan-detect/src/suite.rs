// crates/driftscan-detect/src/suite.rs
//
// The drift test suite.
//
// Stateless per invocation: each run takes a reference matrix, a current
// matrix, and the configured thresholds. Partition-level preconditions
// (non-empty, matching dimensions) abort the whole run; numerical failures
// inside one method are isolated as typed failure values so the remaining
// methods still report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use driftscan_core::error::DriftError;
use driftscan_core::matrix::EmbeddingMatrix;

use crate::component;
use crate::config::{DriftMethod, DriftThresholds};
use crate::mmd;
use crate::summary::DriftSummary;

/// Outcome of one successful drift test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftTestResult {
    /// Which method produced this result.
    pub method: DriftMethod,
    /// Non-negative drift score. For MMD this is the squared discrepancy;
    /// for the ratio methods it is the fraction of drifted dimensions.
    pub score: f64,
    /// The threshold the score was compared against.
    pub threshold: f64,
    /// Whether score > threshold.
    pub drift_detected: bool,
}

/// A method that failed numerically, recorded instead of its result.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{method}: failed ({message})")]
pub struct MethodFailure {
    /// Which method failed.
    pub method: DriftMethod,
    /// What went wrong.
    pub message: String,
}

/// Per-method outcome: a result or an isolated failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethodOutcome {
    Completed(DriftTestResult),
    Failed(MethodFailure),
}

impl MethodOutcome {
    /// Typed-result view for programmatic consumers.
    pub fn as_result(&self) -> Result<&DriftTestResult, &MethodFailure> {
        match self {
            MethodOutcome::Completed(r) => Ok(r),
            MethodOutcome::Failed(f) => Err(f),
        }
    }
}

/// Evaluates the five drift methods against configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct DriftTestSuite {
    thresholds: DriftThresholds,
}

impl DriftTestSuite {
    /// Suite with the given thresholds.
    pub fn new(thresholds: DriftThresholds) -> Self {
        Self { thresholds }
    }

    /// The configured thresholds.
    pub fn thresholds(&self) -> &DriftThresholds {
        &self.thresholds
    }

    /// Check the preconditions shared by every method.
    fn validate(
        reference: &EmbeddingMatrix,
        current: &EmbeddingMatrix,
    ) -> Result<(), DriftError> {
        if reference.is_empty() {
            return Err(DriftError::MissingPartition("reference".to_string()));
        }
        if current.is_empty() {
            return Err(DriftError::MissingPartition("current".to_string()));
        }
        if reference.cols() == 0 {
            return Err(DriftError::InvalidDimension(
                "drift tests require at least one embedding dimension".to_string(),
            ));
        }
        if reference.cols() != current.cols() {
            return Err(DriftError::DimensionMismatch {
                expected: reference.cols(),
                actual: current.cols(),
            });
        }
        Ok(())
    }

    /// Fraction of dimensions whose per-dimension statistic exceeds the
    /// component threshold.
    fn ratio_score(
        &self,
        stat: fn(&[f64], &[f64]) -> Result<f64, DriftError>,
        reference: &EmbeddingMatrix,
        current: &EmbeddingMatrix,
    ) -> Result<f64, DriftError> {
        let dims = reference.cols();
        let mut drifted = 0usize;
        for j in 0..dims {
            let value = stat(&reference.column(j), &current.column(j))?;
            if !value.is_finite() {
                return Err(DriftError::Computation(format!(
                    "component statistic for dimension {} is not finite",
                    j
                )));
            }
            if value > self.thresholds.component {
                drifted += 1;
            }
        }
        Ok(drifted as f64 / dims as f64)
    }

    fn compute(
        &self,
        method: DriftMethod,
        reference: &EmbeddingMatrix,
        current: &EmbeddingMatrix,
    ) -> Result<DriftTestResult, DriftError> {
        let (score, threshold) = match method {
            DriftMethod::Mmd => (mmd::mmd_squared(reference, current)?, self.thresholds.mmd),
            DriftMethod::Wasserstein => (
                self.ratio_score(component::wasserstein, reference, current)?,
                self.thresholds.aggregate,
            ),
            DriftMethod::KlDivergence => (
                self.ratio_score(component::kl_divergence, reference, current)?,
                self.thresholds.aggregate,
            ),
            DriftMethod::JensenShannon => (
                self.ratio_score(component::jensen_shannon, reference, current)?,
                self.thresholds.aggregate,
            ),
            DriftMethod::EnergyDistance => (
                self.ratio_score(component::energy_distance, reference, current)?,
                self.thresholds.aggregate,
            ),
        };

        Ok(DriftTestResult {
            method,
            score,
            threshold,
            drift_detected: score > threshold,
        })
    }

    /// Run one method, folding any error into a typed failure marker.
    pub fn run(
        &self,
        method: DriftMethod,
        reference: &EmbeddingMatrix,
        current: &EmbeddingMatrix,
    ) -> MethodOutcome {
        match self.compute(method, reference, current) {
            Ok(result) => MethodOutcome::Completed(result),
            Err(e) => MethodOutcome::Failed(MethodFailure {
                method,
                message: e.to_string(),
            }),
        }
    }

    /// Run every method independently and collect the full outcome set.
    ///
    /// Partition-level and dimension-level precondition violations abort
    /// the run itself; per-method numerical failures do not.
    pub fn run_all(
        &self,
        reference: &EmbeddingMatrix,
        current: &EmbeddingMatrix,
    ) -> Result<DriftSummary, DriftError> {
        Self::validate(reference, current)?;

        let mut outcomes = BTreeMap::new();
        for method in DriftMethod::ALL {
            let outcome = self.run(method, reference, current);
            if let MethodOutcome::Failed(ref failure) = outcome {
                tracing::warn!(method = %method, "drift method failed: {}", failure.message);
            }
            outcomes.insert(method, outcome);
        }

        Ok(DriftSummary::new(outcomes))
    }
}
