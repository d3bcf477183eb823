// crates/driftscan-cli/src/config.rs
//
// Runtime configuration for the driftscan CLI.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;

use driftscan_core::error::DriftError;
use driftscan_detect::config::{DriftThresholds, TARGET_DIMENSIONS};

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Path to the vector-store snapshot file.
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Default collection name when none is given on the command line.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Embedding dimensionality of the hash embedder.
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    /// Maximum input length in characters before truncation.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Default PCA target dimension; absent means no reduction.
    #[serde(default)]
    pub target_dimension: Option<usize>,

    /// Drift test thresholds.
    #[serde(default)]
    pub thresholds: DriftThresholds,
}

fn default_store_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("driftscan").join("store.json"))
        .and_then(|p| p.to_str().map(str::to_string))
        .unwrap_or_else(|| "driftscan-store.json".to_string())
}

fn default_collection() -> String {
    "default".to_string()
}

fn default_embedding_dimensions() -> usize {
    768
}

fn default_max_length() -> usize {
    512
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            collection: default_collection(),
            embedding_dimensions: default_embedding_dimensions(),
            max_length: default_max_length(),
            target_dimension: None,
            thresholds: DriftThresholds::default(),
        }
    }
}

impl CliConfig {
    /// Default config file location: `<config_dir>/driftscan/config.toml`.
    pub fn default_path() -> String {
        dirs::config_dir()
            .map(|d| d.join("driftscan").join("config.toml"))
            .and_then(|p| p.to_str().map(str::to_string))
            .unwrap_or_else(|| "driftscan.toml".to_string())
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, DriftError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| DriftError::Config(format!("cannot read {}: {}", path, e)))?;
        let config: CliConfig =
            toml::from_str(&raw).map_err(|e| DriftError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges. The target dimension must come from the set the
    /// dashboard exposed.
    pub fn validate(&self) -> Result<(), DriftError> {
        if self.embedding_dimensions == 0 {
            return Err(DriftError::Config(
                "embedding_dimensions must be positive".to_string(),
            ));
        }
        if let Some(k) = self.target_dimension {
            validate_target_dimension(k)?;
        }
        Ok(())
    }
}

/// Reject target dimensions outside the supported choice set.
pub fn validate_target_dimension(k: usize) -> Result<(), DriftError> {
    if TARGET_DIMENSIONS.contains(&k) {
        Ok(())
    } else {
        Err(DriftError::Config(format!(
            "target dimension {} not in supported set {:?}",
            k, TARGET_DIMENSIONS
        )))
    }
}
