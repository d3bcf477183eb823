// crates/driftscan-detect/src/mmd.rs
//
// Maximum mean discrepancy between two embedding samples.
//
// Unbiased squared MMD estimate with an RBF kernel. The kernel bandwidth
// follows the median heuristic over pooled pairwise squared distances,
// falling back to 1.0 when the median is zero (e.g. both samples are a
// single repeated point). The estimate is clamped at zero so identical
// samples score 0 rather than a slightly negative unbiased value.

use driftscan_core::error::DriftError;
use driftscan_core::matrix::EmbeddingMatrix;

/// Squared Euclidean distance between two equal-length slices.
fn sq_dist(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y).map(|(a, b)| (a - b) * (a - b)).sum()
}

/// Median of a list of values. Consumes and sorts the buffer.
fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Kernel bandwidth (sigma squared) from the pooled samples.
fn median_bandwidth(reference: &EmbeddingMatrix, current: &EmbeddingMatrix) -> f64 {
    let pooled: Vec<&[f64]> = reference.iter_rows().chain(current.iter_rows()).collect();
    let mut distances = Vec::with_capacity(pooled.len() * (pooled.len() - 1) / 2);
    for i in 0..pooled.len() {
        for j in (i + 1)..pooled.len() {
            distances.push(sq_dist(pooled[i], pooled[j]));
        }
    }

    let m = median(distances);
    if m > 0.0 {
        m
    } else {
        1.0
    }
}

/// Unbiased squared MMD between the reference and current samples.
///
/// Fails with a computation error when either sample has fewer than two
/// rows (the unbiased estimator needs off-diagonal within-sample terms)
/// or the dimensions disagree.
pub fn mmd_squared(
    reference: &EmbeddingMatrix,
    current: &EmbeddingMatrix,
) -> Result<f64, DriftError> {
    if reference.cols() != current.cols() {
        return Err(DriftError::DimensionMismatch {
            expected: reference.cols(),
            actual: current.cols(),
        });
    }
    if reference.cols() == 0 {
        return Err(DriftError::InvalidDimension(
            "MMD requires at least one embedding dimension".to_string(),
        ));
    }
    let n = reference.rows();
    let m = current.rows();
    if n < 2 || m < 2 {
        return Err(DriftError::Computation(format!(
            "MMD requires at least 2 rows per sample, got {} and {}",
            n, m
        )));
    }

    let sigma_sq = median_bandwidth(reference, current);
    let kernel = |a: &[f64], b: &[f64]| (-sq_dist(a, b) / (2.0 * sigma_sq)).exp();

    let ref_rows: Vec<&[f64]> = reference.iter_rows().collect();
    let cur_rows: Vec<&[f64]> = current.iter_rows().collect();

    let mut k_xx = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                k_xx += kernel(ref_rows[i], ref_rows[j]);
            }
        }
    }
    k_xx /= (n * (n - 1)) as f64;

    let mut k_yy = 0.0;
    for i in 0..m {
        for j in 0..m {
            if i != j {
                k_yy += kernel(cur_rows[i], cur_rows[j]);
            }
        }
    }
    k_yy /= (m * (m - 1)) as f64;

    let mut k_xy = 0.0;
    for x in &ref_rows {
        for y in &cur_rows {
            k_xy += kernel(x, y);
        }
    }
    k_xy /= (n * m) as f64;

    let mmd2 = k_xx + k_yy - 2.0 * k_xy;
    if !mmd2.is_finite() {
        return Err(DriftError::Computation(
            "MMD estimate is not finite".to_string(),
        ));
    }
    Ok(mmd2.max(0.0))
}
