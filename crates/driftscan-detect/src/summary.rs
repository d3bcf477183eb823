// crates/driftscan-detect/src/summary.rs
//
// The drift summary: the full outcome set of one run_all invocation.
//
// This is the unit downstream reporting consumes, both as plain data (for
// report assembly and LLM explanation prompts) and as the formatted score
// lines the dashboard rendered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::DriftMethod;
use crate::suite::MethodOutcome;

/// Outcomes of all five methods against one (reference, current) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftSummary {
    outcomes: BTreeMap<DriftMethod, MethodOutcome>,
}

impl DriftSummary {
    /// Wrap a complete outcome map.
    pub fn new(outcomes: BTreeMap<DriftMethod, MethodOutcome>) -> Self {
        Self { outcomes }
    }

    /// Outcome for one method, if it was run.
    pub fn outcome(&self, method: DriftMethod) -> Option<&MethodOutcome> {
        self.outcomes.get(&method)
    }

    /// Iterate outcomes in canonical method order.
    pub fn iter(&self) -> impl Iterator<Item = (DriftMethod, &MethodOutcome)> {
        DriftMethod::ALL
            .into_iter()
            .filter_map(|m| self.outcomes.get(&m).map(|o| (m, o)))
    }

    /// Whether any completed method detected drift.
    pub fn any_drift(&self) -> bool {
        self.iter().any(|(_, outcome)| match outcome.as_result() {
            Ok(result) => result.drift_detected,
            Err(_) => false,
        })
    }

    /// Number of methods that failed.
    pub fn failure_count(&self) -> usize {
        self.iter()
            .filter(|(_, o)| o.as_result().is_err())
            .count()
    }

    /// One formatted line per method, e.g.
    /// `- MMD: score = 0.0123, drift = false`
    /// `- KL Divergence: failed (Computation error: ...)`
    pub fn lines(&self) -> Vec<String> {
        self.iter()
            .map(|(method, outcome)| match outcome.as_result() {
                Ok(result) => format!(
                    "- {}: score = {:.4}, drift = {}",
                    method, result.score, result.drift_detected
                ),
                Err(failure) => format!("- {}: failed ({})", method, failure.message),
            })
            .collect()
    }

    /// All lines joined, ready for a report section or an LLM prompt.
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{DriftTestResult, MethodFailure};

    fn summary_with(outcomes: Vec<(DriftMethod, MethodOutcome)>) -> DriftSummary {
        DriftSummary::new(outcomes.into_iter().collect())
    }

    fn completed(method: DriftMethod, score: f64, drift: bool) -> MethodOutcome {
        MethodOutcome::Completed(DriftTestResult {
            method,
            score,
            threshold: 0.015,
            drift_detected: drift,
        })
    }

    #[test]
    fn test_lines_format() {
        let summary = summary_with(vec![
            (DriftMethod::Mmd, completed(DriftMethod::Mmd, 0.0123, false)),
            (
                DriftMethod::KlDivergence,
                MethodOutcome::Failed(MethodFailure {
                    method: DriftMethod::KlDivergence,
                    message: "degenerate distribution".to_string(),
                }),
            ),
        ]);

        let lines = summary.lines();
        assert_eq!(lines[0], "- MMD: score = 0.0123, drift = false");
        assert_eq!(lines[1], "- KL Divergence: failed (degenerate distribution)");
    }

    #[test]
    fn test_iteration_order_is_canonical() {
        let summary = summary_with(vec![
            (
                DriftMethod::EnergyDistance,
                completed(DriftMethod::EnergyDistance, 0.0, false),
            ),
            (DriftMethod::Mmd, completed(DriftMethod::Mmd, 0.0, false)),
            (
                DriftMethod::Wasserstein,
                completed(DriftMethod::Wasserstein, 0.0, false),
            ),
        ]);

        let methods: Vec<DriftMethod> = summary.iter().map(|(m, _)| m).collect();
        assert_eq!(
            methods,
            vec![
                DriftMethod::Mmd,
                DriftMethod::Wasserstein,
                DriftMethod::EnergyDistance
            ]
        );
    }

    #[test]
    fn test_any_drift_and_failure_count() {
        let summary = summary_with(vec![
            (DriftMethod::Mmd, completed(DriftMethod::Mmd, 0.5, true)),
            (
                DriftMethod::Wasserstein,
                MethodOutcome::Failed(MethodFailure {
                    method: DriftMethod::Wasserstein,
                    message: "boom".to_string(),
                }),
            ),
        ]);
        assert!(summary.any_drift());
        assert_eq!(summary.failure_count(), 1);
    }
}
