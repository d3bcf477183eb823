// crates/driftscan-detect/src/pipeline.rs
//
// The end-to-end analysis pipeline.
//
// One run: fetch the PartitionSet, optionally reduce it with a projection
// fit on train only, then for each of valid-vs-train and test-vs-train
// compute distance statistics and the full drift test suite. The
// PartitionSet is passed explicitly from stage to stage; nothing lives in
// shared session state.

use chrono::Utc;

use driftscan_analysis::cache::ProjectionCache;
use driftscan_analysis::distance;
use driftscan_core::error::DriftError;
use driftscan_core::partition::{Partition, PartitionSet};

use crate::config::DriftThresholds;
use crate::report::{AnalysisReport, DistanceStats, PairReport};
use crate::suite::DriftTestSuite;

/// Compare one current partition against the train reference.
fn compare_pair(
    suite: &DriftTestSuite,
    set: &PartitionSet,
    current: Partition,
) -> Result<PairReport, DriftError> {
    let reference = set.get(Partition::Train)?;
    let candidate = set.get(current)?;

    let cosine = distance::cosine_similarity(candidate, reference)?;
    let euclidean = distance::euclidean_distance(candidate, reference)?;
    let drift = suite.run_all(reference, candidate)?;

    tracing::info!(
        pair = %format!("{}_vs_train", current),
        any_drift = drift.any_drift(),
        failures = drift.failure_count(),
        "compared pair"
    );

    Ok(PairReport {
        current,
        reference: Partition::Train,
        drift,
        cosine: DistanceStats::from(&cosine),
        euclidean: DistanceStats::from(&euclidean),
    })
}

/// Run the full drift analysis over an already-loaded partition set.
///
/// `target_dimension` of `None` analyzes the original embeddings; `Some(k)`
/// fits PCA on the train partition (through the cache) and applies the one
/// fitted projection to all three partitions first.
pub fn run_analysis(
    set: &PartitionSet,
    collection: &str,
    thresholds: DriftThresholds,
    target_dimension: Option<usize>,
    cache: &ProjectionCache,
) -> Result<AnalysisReport, DriftError> {
    set.validate()?;
    let original_dimensions = set.dimensions()?;

    let reduced;
    let working = match target_dimension {
        Some(k) => {
            let projection = cache.fit(set.get(Partition::Train)?, k)?;
            reduced = set.map(|m| projection.transform(m))?;
            tracing::info!(from = original_dimensions, to = k, "reduced partitions");
            &reduced
        }
        None => set,
    };

    let suite = DriftTestSuite::new(thresholds);
    let valid_vs_train = compare_pair(&suite, working, Partition::Valid)?;
    let test_vs_train = compare_pair(&suite, working, Partition::Test)?;

    Ok(AnalysisReport {
        collection: collection.to_string(),
        generated_at: Utc::now(),
        original_dimensions,
        reduced_dimensions: target_dimension,
        valid_vs_train,
        test_vs_train,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftscan_core::matrix::EmbeddingMatrix;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn gaussian(rng: &mut StdRng) -> f64 {
        let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = rng.gen_range(0.0..1.0);
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    fn gaussian_matrix(rng: &mut StdRng, rows: usize, cols: usize, shift: f64) -> EmbeddingMatrix {
        let data: Vec<Vec<f64>> = (0..rows)
            .map(|_| (0..cols).map(|_| gaussian(rng) + shift).collect())
            .collect();
        EmbeddingMatrix::from_rows(data).unwrap()
    }

    #[test]
    fn test_full_pipeline_without_reduction() {
        let mut rng = StdRng::seed_from_u64(100);
        let set = PartitionSet::new(
            gaussian_matrix(&mut rng, 40, 8, 0.0),
            gaussian_matrix(&mut rng, 20, 8, 0.0),
            gaussian_matrix(&mut rng, 20, 8, 5.0),
        );

        let cache = ProjectionCache::new();
        let report =
            run_analysis(&set, "reviews", DriftThresholds::default(), None, &cache).unwrap();

        assert_eq!(report.original_dimensions, 8);
        assert_eq!(report.reduced_dimensions, None);
        // test partition is heavily shifted; valid is not guaranteed
        // quiet on every method, but the shifted pair must fire.
        assert!(report.test_vs_train.drift.any_drift());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_full_pipeline_with_reduction() {
        let mut rng = StdRng::seed_from_u64(101);
        let set = PartitionSet::new(
            gaussian_matrix(&mut rng, 40, 12, 0.0),
            gaussian_matrix(&mut rng, 20, 12, 0.0),
            gaussian_matrix(&mut rng, 20, 12, 5.0),
        );

        let cache = ProjectionCache::new();
        let report = run_analysis(
            &set,
            "reviews",
            DriftThresholds::default(),
            Some(4),
            &cache,
        )
        .unwrap();

        assert_eq!(report.reduced_dimensions, Some(4));
        assert!(report.test_vs_train.drift.any_drift());
        // The fit went through the cache.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_pipeline_rejects_empty_partition_before_distances() {
        let mut rng = StdRng::seed_from_u64(102);
        let set = PartitionSet::new(
            gaussian_matrix(&mut rng, 40, 8, 0.0),
            EmbeddingMatrix::zeros(0, 8),
            gaussian_matrix(&mut rng, 20, 8, 0.0),
        );

        let cache = ProjectionCache::new();
        let err = run_analysis(&set, "reviews", DriftThresholds::default(), None, &cache)
            .unwrap_err();
        assert!(matches!(err, DriftError::MissingPartition(ref p) if p == "valid"));
    }

    #[test]
    fn test_pipeline_rejects_oversized_target_dimension() {
        let mut rng = StdRng::seed_from_u64(103);
        let set = PartitionSet::new(
            gaussian_matrix(&mut rng, 10, 8, 0.0),
            gaussian_matrix(&mut rng, 10, 8, 0.0),
            gaussian_matrix(&mut rng, 10, 8, 0.0),
        );

        let cache = ProjectionCache::new();
        let err = run_analysis(
            &set,
            "reviews",
            DriftThresholds::default(),
            Some(10),
            &cache,
        )
        .unwrap_err();
        assert!(matches!(err, DriftError::InvalidDimension(_)));
    }
}
