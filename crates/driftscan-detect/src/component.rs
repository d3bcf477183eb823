// crates/driftscan-detect/src/component.rs
//
// Per-dimension two-sample statistics for the ratio-aggregated methods.
//
// Each statistic compares one embedding dimension of the reference sample
// against the same dimension of the current sample. Wasserstein and energy
// distance are computed from the empirical CDFs of the two samples; KL and
// Jensen-Shannon work on a shared 30-bin histogram with additive smoothing
// so identical samples score exactly zero and disjoint supports stay
// finite.

use driftscan_core::error::DriftError;

/// Number of shared histogram bins for the divergence statistics.
const HISTOGRAM_BINS: usize = 30;

/// Additive smoothing applied to histogram bin probabilities.
const HISTOGRAM_SMOOTHING: f64 = 1e-4;

/// Floor on the reference standard deviation used to normalize the
/// Wasserstein statistic, so a constant reference dimension cannot divide
/// by zero.
const STD_FLOOR: f64 = 1e-3;

fn check_samples(x: &[f64], y: &[f64]) -> Result<(), DriftError> {
    if x.is_empty() || y.is_empty() {
        return Err(DriftError::Computation(
            "component statistic requires non-empty samples".to_string(),
        ));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(DriftError::Computation(
            "component statistic requires finite samples".to_string(),
        ));
    }
    Ok(())
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    v
}

/// Walk the merged empirical CDFs of two sorted samples.
///
/// Returns (integral of |F - G|, integral of (F - G)^2) over the merged
/// support: the 1-Wasserstein distance and the Cramer integral.
fn cdf_integrals(x_sorted: &[f64], y_sorted: &[f64]) -> (f64, f64) {
    let mut merged: Vec<f64> = Vec::with_capacity(x_sorted.len() + y_sorted.len());
    merged.extend_from_slice(x_sorted);
    merged.extend_from_slice(y_sorted);
    merged.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = x_sorted.len() as f64;
    let m = y_sorted.len() as f64;
    let mut xi = 0usize;
    let mut yi = 0usize;
    let mut w1 = 0.0;
    let mut cramer = 0.0;

    for window in merged.windows(2) {
        let v = window[0];
        let delta = window[1] - window[0];

        while xi < x_sorted.len() && x_sorted[xi] <= v {
            xi += 1;
        }
        while yi < y_sorted.len() && y_sorted[yi] <= v {
            yi += 1;
        }

        if delta > 0.0 {
            let diff = xi as f64 / n - yi as f64 / m;
            w1 += diff.abs() * delta;
            cramer += diff * diff * delta;
        }
    }

    (w1, cramer)
}

/// 1-Wasserstein (earth mover) distance, normalized by the reference
/// standard deviation (floored at `STD_FLOOR`).
pub fn wasserstein(reference: &[f64], current: &[f64]) -> Result<f64, DriftError> {
    check_samples(reference, current)?;
    let (w1, _) = cdf_integrals(&sorted(reference), &sorted(current));

    let n = reference.len() as f64;
    let mean = reference.iter().sum::<f64>() / n;
    let std = (reference.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt();

    Ok(w1 / std.max(STD_FLOOR))
}

/// Energy distance, sqrt(2 * integral of (F - G)^2).
pub fn energy_distance(reference: &[f64], current: &[f64]) -> Result<f64, DriftError> {
    check_samples(reference, current)?;
    let (_, cramer) = cdf_integrals(&sorted(reference), &sorted(current));
    Ok((2.0 * cramer).sqrt())
}

/// Shared-binning histogram probabilities for the divergence statistics.
fn binned_probabilities(reference: &[f64], current: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let lo = reference
        .iter()
        .chain(current)
        .cloned()
        .fold(f64::INFINITY, f64::min);
    let hi = reference
        .iter()
        .chain(current)
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    if hi <= lo {
        // Every observation equals the same value; both distributions are
        // a single shared atom.
        return (vec![1.0], vec![1.0]);
    }

    let width = (hi - lo) / HISTOGRAM_BINS as f64;
    let bin_of = |v: f64| (((v - lo) / width) as usize).min(HISTOGRAM_BINS - 1);

    let mut p = vec![0.0; HISTOGRAM_BINS];
    for &v in reference {
        p[bin_of(v)] += 1.0;
    }
    let mut q = vec![0.0; HISTOGRAM_BINS];
    for &v in current {
        q[bin_of(v)] += 1.0;
    }

    let smooth = |counts: Vec<f64>, total: f64| -> Vec<f64> {
        let smoothed: Vec<f64> = counts
            .into_iter()
            .map(|c| c / total + HISTOGRAM_SMOOTHING)
            .collect();
        let mass: f64 = smoothed.iter().sum();
        smoothed.into_iter().map(|v| v / mass).collect()
    };

    (
        smooth(p, reference.len() as f64),
        smooth(q, current.len() as f64),
    )
}

fn kl(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|(pi, _)| **pi > 0.0)
        .map(|(pi, qi)| pi * (pi / qi).ln())
        .sum()
}

/// KL divergence KL(reference || current) over shared histogram bins.
pub fn kl_divergence(reference: &[f64], current: &[f64]) -> Result<f64, DriftError> {
    check_samples(reference, current)?;
    let (p, q) = binned_probabilities(reference, current);
    Ok(kl(&p, &q).max(0.0))
}

/// Jensen-Shannon distance (square root of the natural-log JS divergence)
/// over shared histogram bins.
pub fn jensen_shannon(reference: &[f64], current: &[f64]) -> Result<f64, DriftError> {
    check_samples(reference, current)?;
    let (p, q) = binned_probabilities(reference, current);
    let mid: Vec<f64> = p.iter().zip(&q).map(|(a, b)| (a + b) / 2.0).collect();
    let divergence = 0.5 * kl(&p, &mid) + 0.5 * kl(&q, &mid);
    Ok(divergence.max(0.0).sqrt())
}
