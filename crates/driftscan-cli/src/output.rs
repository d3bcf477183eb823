// crates/driftscan-cli/src/output.rs
//
// Output formatting for the driftscan CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

use driftscan_detect::report::PairReport;

/// One drift-result row as rendered in the results table.
#[derive(Debug, Tabled)]
pub struct DriftRow {
    #[tabled(rename = "Comparison")]
    pub comparison: String,
    #[tabled(rename = "Method")]
    pub method: String,
    #[tabled(rename = "Score")]
    pub score: String,
    #[tabled(rename = "Threshold")]
    pub threshold: String,
    #[tabled(rename = "Drift")]
    pub drift: String,
}

/// Flatten a pair report into table rows, one per method outcome.
pub fn drift_rows(pair: &PairReport) -> Vec<DriftRow> {
    let comparison = pair.label();
    pair.drift
        .iter()
        .map(|(method, outcome)| match outcome.as_result() {
            Ok(result) => DriftRow {
                comparison: comparison.clone(),
                method: method.to_string(),
                score: format!("{:.4}", result.score),
                threshold: format!("{:.4}", result.threshold),
                drift: result.drift_detected.to_string(),
            },
            Err(failure) => DriftRow {
                comparison: comparison.clone(),
                method: method.to_string(),
                score: "-".to_string(),
                threshold: "-".to_string(),
                drift: format!("failed ({})", failure.message),
            },
        })
        .collect()
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}
