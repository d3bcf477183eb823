// crates/driftscan-analysis/src/pca.rs
//
// PCA dimensionality reduction.
//
// The projection is fit exclusively on the reference (train) partition and
// the same fitted map is applied to every other partition. Fitting per
// partition would silently corrupt the downstream drift comparison; the
// projection-consistency test guards that invariant.
//
// Components are extracted by power iteration on the centered data with
// Gram-Schmidt re-orthogonalization against previously extracted axes.
// The covariance-vector product is formed implicitly from the centered
// rows, so no D x D matrix is materialized. Initialization is a fixed
// per-axis function of the dimension index, making refits reproducible
// up to the usual component sign ambiguity.

use serde::{Deserialize, Serialize};

use driftscan_core::error::DriftError;
use driftscan_core::matrix::EmbeddingMatrix;

/// Maximum power iterations per component.
const MAX_ITERATIONS: usize = 200;

/// Convergence tolerance on the change of a component axis between
/// iterations (measured as 1 - |dot| of consecutive unit axes).
const CONVERGENCE_TOL: f64 = 1e-10;

/// A fitted variance-maximizing orthogonal linear projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcaProjection {
    /// Per-column mean of the reference matrix; subtracted before projecting.
    mean: Vec<f64>,
    /// Principal axes, one unit vector of length D per target dimension.
    components: Vec<Vec<f64>>,
    /// Variance captured along each axis, in extraction order.
    explained_variance: Vec<f64>,
}

impl PcaProjection {
    /// Fit a projection to `k` dimensions from the reference matrix.
    ///
    /// Fails with `InvalidDimension` when `k` is 0, exceeds the column
    /// count, or exceeds `N - 1` rows: PCA cannot extract more than
    /// `min(N - 1, D)` components.
    pub fn fit(reference: &EmbeddingMatrix, k: usize) -> Result<Self, DriftError> {
        let n = reference.rows();
        let d = reference.cols();

        if n == 0 {
            return Err(DriftError::MissingPartition("train".to_string()));
        }
        let max_components = d.min(n.saturating_sub(1));
        if k == 0 || k > max_components {
            return Err(DriftError::InvalidDimension(format!(
                "requested {} components but the reference supports at most min(N-1, D) = {}",
                k, max_components
            )));
        }

        let mean = reference.column_means();
        let centered: Vec<Vec<f64>> = reference
            .iter_rows()
            .map(|row| row.iter().zip(&mean).map(|(v, m)| v - m).collect())
            .collect();

        let mut components: Vec<Vec<f64>> = Vec::with_capacity(k);
        let mut explained_variance = Vec::with_capacity(k);

        for axis_idx in 0..k {
            let mut axis = initial_axis(axis_idx, d);
            orthogonalize(&mut axis, &components);
            if normalize(&mut axis) == 0.0 {
                // Fixed init collapsed under orthogonalization; perturb
                // deterministically and retry once.
                axis = initial_axis(axis_idx + k + 1, d);
                orthogonalize(&mut axis, &components);
                if normalize(&mut axis) == 0.0 {
                    return Err(DriftError::Computation(format!(
                        "could not initialize component {}",
                        axis_idx
                    )));
                }
            }

            for _ in 0..MAX_ITERATIONS {
                // Implicit covariance product: sum over rows of (r . axis) r.
                let mut next = vec![0.0; d];
                for row in &centered {
                    let score: f64 = row.iter().zip(&axis).map(|(r, a)| r * a).sum();
                    for (n_i, r_i) in next.iter_mut().zip(row) {
                        *n_i += score * r_i;
                    }
                }

                orthogonalize(&mut next, &components);
                if normalize(&mut next) == 0.0 {
                    // No variance left in the orthogonal complement; keep
                    // the current axis (its variance will be ~0).
                    break;
                }

                let alignment: f64 = next.iter().zip(&axis).map(|(a, b)| a * b).sum();
                let converged = 1.0 - alignment.abs() < CONVERGENCE_TOL;
                axis = next;
                if converged {
                    break;
                }
            }

            // Variance along the axis (population convention, matching the
            // implicit covariance above).
            let variance = centered
                .iter()
                .map(|row| {
                    let score: f64 = row.iter().zip(&axis).map(|(r, a)| r * a).sum();
                    score * score
                })
                .sum::<f64>()
                / n as f64;

            explained_variance.push(variance);
            components.push(axis);
        }

        tracing::debug!(
            components = k,
            input_dims = d,
            "fitted PCA projection"
        );

        Ok(Self {
            mean,
            components,
            explained_variance,
        })
    }

    /// Number of output dimensions.
    pub fn output_dimensions(&self) -> usize {
        self.components.len()
    }

    /// Number of input dimensions the projection was fit on.
    pub fn input_dimensions(&self) -> usize {
        self.mean.len()
    }

    /// Variance captured along each extracted axis.
    pub fn explained_variance(&self) -> &[f64] {
        &self.explained_variance
    }

    /// Apply the fitted projection to a matrix, producing (N, k).
    ///
    /// Fails with `DimensionMismatch` if `x` has a different column count
    /// than the reference the projection was fit on.
    pub fn transform(&self, x: &EmbeddingMatrix) -> Result<EmbeddingMatrix, DriftError> {
        let d = self.input_dimensions();
        if x.cols() != d {
            return Err(DriftError::DimensionMismatch {
                expected: d,
                actual: x.cols(),
            });
        }

        let k = self.output_dimensions();
        let mut data = Vec::with_capacity(x.rows() * k);
        for row in x.iter_rows() {
            let centered: Vec<f64> = row.iter().zip(&self.mean).map(|(v, m)| v - m).collect();
            for component in &self.components {
                data.push(centered.iter().zip(component).map(|(c, a)| c * a).sum());
            }
        }

        EmbeddingMatrix::from_flat(data, x.rows(), k)
    }
}

/// Deterministic non-degenerate starting axis for power iteration.
fn initial_axis(axis_idx: usize, d: usize) -> Vec<f64> {
    (0..d)
        .map(|i| {
            let t = (axis_idx + i + 7) as f64;
            (t * 0.123).sin() + ((axis_idx * i) as f64 * 0.456).cos()
        })
        .collect()
}

/// Remove the projections of `v` onto each of `basis` (assumed unit norm).
fn orthogonalize(v: &mut [f64], basis: &[Vec<f64>]) {
    for b in basis {
        let overlap: f64 = v.iter().zip(b).map(|(x, y)| x * y).sum();
        for (x, y) in v.iter_mut().zip(b) {
            *x -= overlap * y;
        }
    }
}

/// Scale `v` to unit norm, returning the original norm. Leaves `v`
/// untouched when the norm is (near) zero.
fn normalize(v: &mut [f64]) -> f64 {
    let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 1e-12 {
        for x in v.iter_mut() {
            *x /= norm;
        }
        norm
    } else {
        0.0
    }
}
