// crates/driftscan-core/src/partition.rs
//
// Partition naming and the PartitionSet value object.
//
// A PartitionSet is built once per analysis run and threaded explicitly
// through the pipeline stages; there is no shared session state. All three
// partitions must be present and non-empty, with matching column counts,
// before any distance or drift computation runs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DriftError;
use crate::matrix::EmbeddingMatrix;

/// The three dataset partitions compared by a drift analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    Train,
    Valid,
    Test,
}

impl Partition {
    /// All partitions, in canonical order.
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Valid, Partition::Test];

    /// Lowercase tag used in storage and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Valid => "valid",
            Partition::Test => "test",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The train/valid/test embedding matrices for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionSet {
    train: EmbeddingMatrix,
    valid: EmbeddingMatrix,
    test: EmbeddingMatrix,
}

impl PartitionSet {
    /// Assemble a partition set. Shape checks happen in `validate` / `get`,
    /// not here, so callers can build a set incrementally and validate once.
    pub fn new(train: EmbeddingMatrix, valid: EmbeddingMatrix, test: EmbeddingMatrix) -> Self {
        Self { train, valid, test }
    }

    /// Fetch one partition's matrix.
    ///
    /// Fails with `MissingPartition` if the partition has zero rows.
    pub fn get(&self, partition: Partition) -> Result<&EmbeddingMatrix, DriftError> {
        let matrix = match partition {
            Partition::Train => &self.train,
            Partition::Valid => &self.valid,
            Partition::Test => &self.test,
        };
        if matrix.is_empty() {
            return Err(DriftError::MissingPartition(partition.as_str().to_string()));
        }
        Ok(matrix)
    }

    /// Check the preconditions for any distance/drift computation:
    /// every partition non-empty, at least one embedding dimension, all
    /// column counts equal.
    pub fn validate(&self) -> Result<(), DriftError> {
        let expected = self.get(Partition::Train)?.cols();
        if expected == 0 {
            return Err(DriftError::InvalidDimension(
                "partitions carry zero-dimensional vectors".to_string(),
            ));
        }
        for partition in [Partition::Valid, Partition::Test] {
            let matrix = self.get(partition)?;
            if matrix.cols() != expected {
                return Err(DriftError::DimensionMismatch {
                    expected,
                    actual: matrix.cols(),
                });
            }
        }
        Ok(())
    }

    /// Column count shared by all partitions. Runs `validate` first.
    pub fn dimensions(&self) -> Result<usize, DriftError> {
        self.validate()?;
        Ok(self.train.cols())
    }

    /// Map every partition through `f`, producing a new set.
    ///
    /// This is how a fitted projection is applied consistently: one closure
    /// over one fitted map, applied to all three matrices.
    pub fn map<F>(&self, mut f: F) -> Result<PartitionSet, DriftError>
    where
        F: FnMut(&EmbeddingMatrix) -> Result<EmbeddingMatrix, DriftError>,
    {
        Ok(PartitionSet {
            train: f(&self.train)?,
            valid: f(&self.valid)?,
            test: f(&self.test)?,
        })
    }
}
