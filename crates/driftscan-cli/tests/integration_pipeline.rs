// crates/driftscan-cli/tests/integration_pipeline.rs
//
// End-to-end integration tests for the driftscan pipeline.
//
// Exercises the wired-up flow: embed texts, persist and reload the vector
// store, load partitions, reduce, and run the drift test suite.
//
// These tests use the public APIs of the underlying library crates
// directly (driftscan-core, driftscan-store, driftscan-analysis,
// driftscan-detect) since the CLI is a binary crate with no lib.rs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use driftscan_analysis::cache::ProjectionCache;
use driftscan_analysis::pca::PcaProjection;
use driftscan_core::embedding::HashEmbedder;
use driftscan_core::error::DriftError;
use driftscan_core::matrix::EmbeddingMatrix;
use driftscan_core::record::{SetType, VectorRecord};
use driftscan_core::traits::{Embedder, VectorStore};
use driftscan_detect::config::{DriftMethod, DriftThresholds};
use driftscan_detect::pipeline::run_analysis;
use driftscan_detect::suite::DriftTestSuite;
use driftscan_store::{load_partition_set, InMemoryVectorStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Standard-normal draw via Box-Muller over two uniforms.
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

/// Temporary snapshot path using a UUID to avoid conflicts.
fn temp_snapshot_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("driftscan_test_{}_{}.json", label, Uuid::now_v7()))
}

async fn seed_partition(
    store: &InMemoryVectorStore,
    collection: &str,
    matrix: &EmbeddingMatrix,
    set_type: SetType,
) {
    let records: Vec<VectorRecord> = matrix
        .iter_rows()
        .map(|row| VectorRecord::new(row.to_vec(), set_type))
        .collect();
    store.insert(collection, records).await.unwrap();
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_identical_partitions_no_drift_on_any_method() {
    // Scenario: reference and current are the same 50 x 10 matrix of
    // i.i.d. standard-normal rows.
    let mut rng = StdRng::seed_from_u64(1);
    let reference = gaussian_matrix(&mut rng, 50, 10, 0.0);

    let suite = DriftTestSuite::default();
    let summary = suite.run_all(&reference, &reference).unwrap();

    for method in DriftMethod::ALL {
        let result = summary.outcome(method).unwrap().as_result().unwrap();
        assert!(
            result.score.abs() < 1e-9,
            "{} scored {} on identical partitions",
            method,
            result.score
        );
        assert!(!result.drift_detected, "{} flagged drift", method);
    }
}

#[test]
fn test_shifted_mean_drift_on_every_method() {
    // Scenario: reference ~ N(0, I), current ~ N(5, I).
    let mut rng = StdRng::seed_from_u64(2);
    let reference = gaussian_matrix(&mut rng, 50, 10, 0.0);
    let current = gaussian_matrix(&mut rng, 50, 10, 5.0);

    let suite = DriftTestSuite::default();
    let summary = suite.run_all(&reference, &current).unwrap();

    for method in DriftMethod::ALL {
        let result = summary.outcome(method).unwrap().as_result().unwrap();
        assert!(
            result.drift_detected,
            "{} missed a 5-sigma shift (score {})",
            method, result.score
        );
    }
}

#[test]
fn test_pca_component_limit_is_min_of_rows_minus_one_and_cols() {
    // Scenario: 100 rows of 768-dim embeddings support at most 99
    // components, so 500 and 768 both fail.
    let mut rng = StdRng::seed_from_u64(3);
    let reference = gaussian_matrix(&mut rng, 100, 768, 0.0);

    for k in [500usize, 768] {
        let err = PcaProjection::fit(&reference, k).unwrap_err();
        assert!(
            matches!(err, DriftError::InvalidDimension(_)),
            "k = {} should be rejected",
            k
        );
    }
}

#[tokio::test]
async fn test_empty_valid_partition_fails_before_analysis() {
    // Scenario: a collection with train and test but no valid rows must
    // fail with MissingPartition at load time.
    let store = InMemoryVectorStore::new();
    let mut rng = StdRng::seed_from_u64(4);
    let train = gaussian_matrix(&mut rng, 20, 6, 0.0);
    let test = gaussian_matrix(&mut rng, 10, 6, 0.0);

    seed_partition(&store, "reviews", &train, SetType::Train).await;
    seed_partition(&store, "reviews", &test, SetType::Test).await;

    let err = load_partition_set(&store, "reviews").await.unwrap_err();
    assert!(matches!(err, DriftError::MissingPartition(ref p) if p == "valid"));
}

// ---------------------------------------------------------------------------
// Full pipeline through store and embedder
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_embed_persist_reload_analyze() {
    let embedder = HashEmbedder::new(32, 128).unwrap();

    let train_texts: Vec<String> = (0..30).map(|i| format!("a review about shoes {}", i)).collect();
    let valid_texts: Vec<String> = (0..15).map(|i| format!("a review about shoes {}", i + 100)).collect();
    let test_texts: Vec<String> = (0..15).map(|i| format!("breaking news headline {}", i)).collect();

    let store = InMemoryVectorStore::new();
    for (texts, set_type) in [
        (&train_texts, SetType::Train),
        (&valid_texts, SetType::Valid),
        (&test_texts, SetType::Test),
    ] {
        let matrix = embedder.embed(texts).unwrap();
        seed_partition(&store, "reviews", &matrix, set_type).await;
    }

    // Snapshot round trip.
    let path = temp_snapshot_path("pipeline");
    store.persist(&path).unwrap();
    let reloaded = InMemoryVectorStore::open(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let set = load_partition_set(&reloaded, "reviews").await.unwrap();
    assert_eq!(set.dimensions().unwrap(), 32);

    let cache = ProjectionCache::new();
    let report = run_analysis(&set, "reviews", DriftThresholds::default(), None, &cache).unwrap();

    assert_eq!(report.collection, "reviews");
    assert_eq!(report.original_dimensions, 32);
    assert_eq!(report.valid_vs_train.drift.failure_count(), 0);

    // The structured summary renders one line per method for each pair.
    let text = report.summary_text();
    assert!(text.contains("valid_vs_train"));
    assert!(text.contains("test_vs_train"));
    assert!(text.contains("- MMD: score = "));
}

#[tokio::test]
async fn test_pipeline_with_reduction_and_cache_reuse() {
    let mut rng = StdRng::seed_from_u64(5);
    let store = InMemoryVectorStore::new();
    let train = gaussian_matrix(&mut rng, 60, 16, 0.0);
    let valid = gaussian_matrix(&mut rng, 30, 16, 0.0);
    let test = gaussian_matrix(&mut rng, 30, 16, 4.0);

    seed_partition(&store, "c", &train, SetType::Train).await;
    seed_partition(&store, "c", &valid, SetType::Valid).await;
    seed_partition(&store, "c", &test, SetType::Test).await;

    let set = load_partition_set(&store, "c").await.unwrap();
    let cache = ProjectionCache::new();

    let report =
        run_analysis(&set, "c", DriftThresholds::default(), Some(10), &cache).unwrap();
    assert_eq!(report.reduced_dimensions, Some(10));
    assert!(report.test_vs_train.drift.any_drift());
    assert_eq!(cache.len(), 1);

    // A second run over the same partitions reuses the cached projection.
    run_analysis(&set, "c", DriftThresholds::default(), Some(10), &cache).unwrap();
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_projection_consistency_guard() {
    // Transforming valid/test with the train-fitted projection must keep
    // the cross-partition geometry that independent per-partition fits
    // destroy: with a shared fit a mean-shifted current partition stays
    // far from the reference, with independent fits both are centered.
    let mut rng = StdRng::seed_from_u64(6);
    let train = gaussian_matrix(&mut rng, 50, 12, 0.0);
    let test = gaussian_matrix(&mut rng, 50, 12, 5.0);

    let shared = PcaProjection::fit(&train, 6).unwrap();
    let train_shared = shared.transform(&train).unwrap();
    let test_shared = shared.transform(&test).unwrap();

    let independent = PcaProjection::fit(&test, 6).unwrap();
    let test_independent = independent.transform(&test).unwrap();

    let centroid_distance = |a: &EmbeddingMatrix, b: &EmbeddingMatrix| -> f64 {
        let ma = a.column_means();
        let mb = b.column_means();
        ma.iter()
            .zip(&mb)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    };

    let shared_gap = centroid_distance(&train_shared, &test_shared);
    let independent_gap = centroid_distance(&train_shared, &test_independent);

    assert!(
        shared_gap > 2.0 * independent_gap + 1.0,
        "shared fit should preserve the shift: shared {} vs independent {}",
        shared_gap,
        independent_gap
    );

    // And the suite agrees: shared-fit projections still show the drift.
    let suite = DriftTestSuite::default();
    let summary = suite.run_all(&train_shared, &test_shared).unwrap();
    let mmd = summary
        .outcome(DriftMethod::Mmd)
        .unwrap()
        .as_result()
        .unwrap();
    assert!(mmd.drift_detected);
}

#[test]
fn test_mmd_monotone_under_increasing_shift() {
    // Statistical property: the MMD score should be non-decreasing (within
    // tolerance) as the current partition moves away from the reference.
    let mut rng = StdRng::seed_from_u64(7);
    let reference = gaussian_matrix(&mut rng, 60, 10, 0.0);
    let suite = DriftTestSuite::default();

    let mut previous = -1.0;
    for shift in [0.0, 0.5, 1.5, 3.0, 5.0] {
        let current = gaussian_matrix(&mut rng, 60, 10, shift);
        let summary = suite.run_all(&reference, &current).unwrap();
        let score = summary
            .outcome(DriftMethod::Mmd)
            .unwrap()
            .as_result()
            .unwrap()
            .score;
        assert!(
            score >= previous - 5e-3,
            "MMD decreased at shift {}: {} -> {}",
            shift,
            previous,
            score
        );
        previous = score;
    }
}

#[test]
fn test_single_row_partition_isolates_mmd_failure() {
    let reference = EmbeddingMatrix::from_rows(vec![vec![0.0, 1.0]]).unwrap();
    let current = EmbeddingMatrix::from_rows(vec![vec![0.5, 1.5]]).unwrap();

    let suite = DriftTestSuite::default();
    let summary = suite.run_all(&reference, &current).unwrap();

    assert_eq!(summary.failure_count(), 1);
    assert!(summary
        .outcome(DriftMethod::Mmd)
        .unwrap()
        .as_result()
        .is_err());
    for method in [
        DriftMethod::Wasserstein,
        DriftMethod::KlDivergence,
        DriftMethod::JensenShannon,
        DriftMethod::EnergyDistance,
    ] {
        assert!(summary.outcome(method).unwrap().as_result().is_ok());
    }

    // The formatted summary keeps the four scores and annotates the
    // failure, instead of aborting.
    let text = summary.to_text();
    assert!(text.contains("- MMD: failed ("));
    assert!(text.contains("- Wasserstein Distance: score = "));
}

#[tokio::test]
async fn test_partition_set_threaded_not_sessioned() {
    // Two collections analyzed back to back do not interfere: each run
    // carries its own PartitionSet.
    let mut rng = StdRng::seed_from_u64(8);
    let store = InMemoryVectorStore::new();

    for (name, shift) in [("quiet", 0.0), ("shifted", 5.0)] {
        let train = gaussian_matrix(&mut rng, 30, 6, 0.0);
        let other = gaussian_matrix(&mut rng, 30, 6, shift);
        seed_partition(&store, name, &train, SetType::Train).await;
        seed_partition(&store, name, &train, SetType::Valid).await;
        seed_partition(&store, name, &other, SetType::Test).await;
    }

    let cache = ProjectionCache::new();
    let quiet_set = load_partition_set(&store, "quiet").await.unwrap();
    let shifted_set = load_partition_set(&store, "shifted").await.unwrap();

    let quiet = run_analysis(&quiet_set, "quiet", DriftThresholds::default(), None, &cache).unwrap();
    let shifted =
        run_analysis(&shifted_set, "shifted", DriftThresholds::default(), None, &cache).unwrap();

    assert!(shifted.test_vs_train.drift.any_drift());
    // valid == train exactly in both collections.
    assert!(!quiet.valid_vs_train.drift.any_drift());
    assert!(!shifted.valid_vs_train.drift.any_drift());
}
