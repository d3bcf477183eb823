// crates/driftscan-analysis/src/distance.rs
//
// Pairwise distance matrices between two embedding matrices.
//
// Both operations are O(N_a * N_b * D) and dominate analysis cost on large
// partitions. Row norms and squared norms are precomputed once so the inner
// loop is a single dot product per cell.

use serde::{Deserialize, Serialize};

use driftscan_core::error::DriftError;
use driftscan_core::matrix::EmbeddingMatrix;

/// Which metric a DistanceMatrix holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceKind {
    /// Cosine similarity in [-1, 1]; higher means more similar.
    CosineSimilarity,
    /// Euclidean (L2) distance in [0, inf); lower means more similar.
    Euclidean,
}

/// A (rows_a x rows_b) matrix of pairwise metric values between every row
/// of A and every row of B. Derived and read-only; recomputed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceMatrix {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
    kind: DistanceKind,
}

impl DistanceMatrix {
    /// Number of rows (examples of A).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (examples of B).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The metric this matrix holds.
    pub fn kind(&self) -> DistanceKind {
        self.kind
    }

    /// Value at (i, j). Panics if out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.cols + j]
    }

    /// Minimum entry, or 0.0 for an empty matrix.
    pub fn min(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    /// Maximum entry, or 0.0 for an empty matrix.
    pub fn max(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean entry, 0.0 for an empty matrix.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

fn check_dims(a: &EmbeddingMatrix, b: &EmbeddingMatrix) -> Result<(), DriftError> {
    if a.cols() != b.cols() {
        return Err(DriftError::DimensionMismatch {
            expected: a.cols(),
            actual: b.cols(),
        });
    }
    if a.cols() == 0 {
        return Err(DriftError::InvalidDimension(
            "distance matrices require at least one embedding dimension".to_string(),
        ));
    }
    Ok(())
}

fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

/// Pairwise cosine similarity between every row of A and every row of B.
///
/// Zero-norm policy: a row with zero magnitude has similarity 0.0 against
/// everything (the undefined 0/0 case is pinned to "not similar" rather
/// than NaN).
pub fn cosine_similarity(
    a: &EmbeddingMatrix,
    b: &EmbeddingMatrix,
) -> Result<DistanceMatrix, DriftError> {
    check_dims(a, b)?;

    let norms_a: Vec<f64> = a.iter_rows().map(|r| dot(r, r).sqrt()).collect();
    let norms_b: Vec<f64> = b.iter_rows().map(|r| dot(r, r).sqrt()).collect();

    let mut values = Vec::with_capacity(a.rows() * b.rows());
    for (i, row_a) in a.iter_rows().enumerate() {
        for (j, row_b) in b.iter_rows().enumerate() {
            let denom = norms_a[i] * norms_b[j];
            if denom == 0.0 {
                values.push(0.0);
            } else {
                values.push(dot(row_a, row_b) / denom);
            }
        }
    }

    Ok(DistanceMatrix {
        values,
        rows: a.rows(),
        cols: b.rows(),
        kind: DistanceKind::CosineSimilarity,
    })
}

/// Pairwise Euclidean distance between every row of A and every row of B.
pub fn euclidean_distance(
    a: &EmbeddingMatrix,
    b: &EmbeddingMatrix,
) -> Result<DistanceMatrix, DriftError> {
    check_dims(a, b)?;

    let sq_norms_a: Vec<f64> = a.iter_rows().map(|r| dot(r, r)).collect();
    let sq_norms_b: Vec<f64> = b.iter_rows().map(|r| dot(r, r)).collect();

    let mut values = Vec::with_capacity(a.rows() * b.rows());
    for (i, row_a) in a.iter_rows().enumerate() {
        for (j, row_b) in b.iter_rows().enumerate() {
            // ||a - b||^2 = ||a||^2 + ||b||^2 - 2 a.b, clamped against
            // small negative values from floating point cancellation.
            let sq = sq_norms_a[i] + sq_norms_b[j] - 2.0 * dot(row_a, row_b);
            values.push(sq.max(0.0).sqrt());
        }
    }

    Ok(DistanceMatrix {
        values,
        rows: a.rows(),
        cols: b.rows(),
        kind: DistanceKind::Euclidean,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> EmbeddingMatrix {
        EmbeddingMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_cosine_self_similarity_diagonal_is_one() {
        let a = matrix(vec![vec![1.0, 2.0, 3.0], vec![-1.0, 0.5, 2.0]]);
        let sim = cosine_similarity(&a, &a).unwrap();
        for i in 0..a.rows() {
            assert!((sim.get(i, i) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cosine_symmetry() {
        let a = matrix(vec![vec![1.0, 2.0], vec![3.0, -1.0]]);
        let b = matrix(vec![vec![0.5, 0.5], vec![2.0, 1.0], vec![-1.0, 4.0]]);
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        for i in 0..a.rows() {
            for j in 0..b.rows() {
                assert!((ab.get(i, j) - ba.get(j, i)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_euclidean_symmetry_and_self_zero() {
        let a = matrix(vec![vec![1.0, 2.0], vec![3.0, -1.0]]);
        let b = matrix(vec![vec![0.0, 0.0], vec![1.0, 2.0]]);
        let ab = euclidean_distance(&a, &b).unwrap();
        let ba = euclidean_distance(&b, &a).unwrap();
        for i in 0..a.rows() {
            for j in 0..b.rows() {
                assert!((ab.get(i, j) - ba.get(j, i)).abs() < 1e-12);
            }
        }
        // a[0] == b[1]
        assert!(ab.get(0, 1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_norm_row_policy() {
        let a = matrix(vec![vec![0.0, 0.0]]);
        let b = matrix(vec![vec![1.0, 2.0]]);
        let sim = cosine_similarity(&a, &b).unwrap();
        assert_eq!(sim.get(0, 0), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = matrix(vec![vec![1.0, 2.0]]);
        let b = matrix(vec![vec![1.0, 2.0, 3.0]]);
        assert!(matches!(
            cosine_similarity(&a, &b).unwrap_err(),
            DriftError::DimensionMismatch { expected: 2, actual: 3 }
        ));
        assert!(euclidean_distance(&a, &b).is_err());
    }

    #[test]
    fn test_zero_column_matrices_rejected() {
        // Equal column counts of zero must not slip through the mismatch
        // check into the row iterator.
        let a = matrix(vec![vec![], vec![]]);
        let b = matrix(vec![vec![]]);
        assert!(matches!(
            cosine_similarity(&a, &b).unwrap_err(),
            DriftError::InvalidDimension(_)
        ));
        assert!(euclidean_distance(&a, &b).is_err());
    }

    #[test]
    fn test_known_euclidean_value() {
        let a = matrix(vec![vec![0.0, 0.0]]);
        let b = matrix(vec![vec![3.0, 4.0]]);
        let d = euclidean_distance(&a, &b).unwrap();
        assert!((d.get(0, 0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_stats() {
        let a = matrix(vec![vec![0.0]]);
        let b = matrix(vec![vec![1.0], vec![3.0]]);
        let d = euclidean_distance(&a, &b).unwrap();
        assert_eq!(d.min(), 1.0);
        assert_eq!(d.max(), 3.0);
        assert_eq!(d.mean(), 2.0);
    }
}
