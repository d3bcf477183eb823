// crates/driftscan-core/src/matrix.rs
//
// Dense row-major embedding matrix.
//
// The matrix is immutable once built: dimensionality reduction and other
// derived views produce a new matrix rather than mutating in place, so a
// reduced matrix can live alongside the original it was derived from.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DriftError;

/// A dense (rows x cols) matrix of f64 embedding values, row-major.
///
/// One row per embedded example, one column per embedding dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl EmbeddingMatrix {
    /// Build a matrix from row vectors.
    ///
    /// Fails with `DimensionMismatch` if the rows are ragged. An empty
    /// input produces a valid 0 x 0 matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DriftError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in &rows {
            if row.len() != n_cols {
                return Err(DriftError::DimensionMismatch {
                    expected: n_cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            rows: n_rows,
            cols: n_cols,
        })
    }

    /// Build a matrix from a flat row-major buffer.
    ///
    /// Fails with `DimensionMismatch` if `data.len() != rows * cols`.
    pub fn from_flat(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self, DriftError> {
        if data.len() != rows * cols {
            return Err(DriftError::DimensionMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// An all-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Number of rows (examples).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (embedding dimensions).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the matrix holds no examples.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i` as a slice. Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterate over all rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    /// Copy out column `j`. Panics if `j >= cols`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self.data[i * self.cols + j]).collect()
    }

    /// Borrow the flat row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// SHA-256 over shape and contents.
    ///
    /// Used as a cache key for expensive derived computations (e.g. PCA
    /// fits); two matrices with identical shape and bytes hash identically.
    pub fn content_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.rows as u64).to_le_bytes());
        hasher.update((self.cols as u64).to_le_bytes());
        for v in &self.data {
            hasher.update(v.to_le_bytes());
        }
        hasher.finalize().into()
    }

    /// Per-column mean vector. Returns all zeros for an empty matrix.
    pub fn column_means(&self) -> Vec<f64> {
        let mut means = vec![0.0; self.cols];
        if self.rows == 0 {
            return means;
        }
        for row in self.iter_rows() {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        let n = self.rows as f64;
        for m in &mut means {
            *m /= n;
        }
        means
    }
}
