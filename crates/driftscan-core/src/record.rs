// crates/driftscan-core/src/record.rs
//
// Storage record model for the vector-store collaborator.
//
// Each embedded example is persisted as one record tagged with a set_type,
// so partitions can be fetched back by tag. The `Metadata` tag exists for
// dataset-level bookkeeping rows that are never part of a comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DriftError;
use crate::partition::Partition;

/// Storage tag distinguishing record kinds within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetType {
    Train,
    Valid,
    Test,
    Metadata,
}

impl SetType {
    /// Lowercase tag as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            SetType::Train => "train",
            SetType::Valid => "valid",
            SetType::Test => "test",
            SetType::Metadata => "metadata",
        }
    }

    /// The partition this tag corresponds to, if any.
    pub fn partition(&self) -> Option<Partition> {
        match self {
            SetType::Train => Some(Partition::Train),
            SetType::Valid => Some(Partition::Valid),
            SetType::Test => Some(Partition::Test),
            SetType::Metadata => None,
        }
    }
}

impl From<Partition> for SetType {
    fn from(p: Partition) -> Self {
        match p {
            Partition::Train => SetType::Train,
            Partition::Valid => SetType::Valid,
            Partition::Test => SetType::Test,
        }
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetType {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(SetType::Train),
            "valid" => Ok(SetType::Valid),
            "test" => Ok(SetType::Test),
            "metadata" => Ok(SetType::Metadata),
            other => Err(DriftError::Config(format!("unknown set_type '{}'", other))),
        }
    }
}

/// One embedded example as stored in a vector-store collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Record identity, assigned at insert time.
    pub id: Uuid,
    /// The embedding vector.
    pub vector: Vec<f64>,
    /// Which partition (or metadata) this record belongs to.
    pub set_type: SetType,
    /// Optional class label carried alongside the embedding.
    pub class_label: Option<String>,
    /// Optional source text the embedding was produced from.
    pub source_text: Option<String>,
}

impl VectorRecord {
    /// Build a record with a fresh v7 UUID.
    pub fn new(vector: Vec<f64>, set_type: SetType) -> Self {
        Self {
            id: Uuid::now_v7(),
            vector,
            set_type,
            class_label: None,
            source_text: None,
        }
    }

    /// Attach a class label.
    pub fn with_class_label(mut self, label: impl Into<String>) -> Self {
        self.class_label = Some(label.into());
        self
    }

    /// Attach the source text.
    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }
}
