//! Pipeline configuration and YAML loading.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! train_ratio: 0.7
//! shuffle_seed: 1234
//! unknown_value: sentinel
//! min_label_matches: 1
//! report_holdout: true
//!
//! forest:
//!   seed: 42
//!   n_estimators: 500
//!   max_features: 5
//!   replacement: true
//!   use_parallel: true
//! ```

use std::fs;
use std::path::Path;

use catalog::FIELD_COUNT;
use features::{UnknownValue, DEFAULT_MIN_MATCHES};
use forest::ForestConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a pipeline configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Options for a single match request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fraction of the shuffled snapshot used for training, in `(0, 1]`.
    pub train_ratio: f64,
    /// Seed for the snapshot shuffle. `None` draws a fresh OS seed per
    /// request.
    pub shuffle_seed: Option<u64>,
    pub unknown_value: UnknownValue,
    /// Number of equal fields a record needs to be labelled positive.
    pub min_label_matches: usize,
    /// Score the model on the held-out slice and attach it to the report.
    /// Never changes which records match.
    pub report_holdout: bool,
    pub forest: ForestConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            train_ratio: 0.7,
            shuffle_seed: None,
            unknown_value: UnknownValue::FirstIndex,
            min_label_matches: DEFAULT_MIN_MATCHES,
            report_holdout: false,
            forest: ForestConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load and validate a configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config
            .validate()
            .map_err(ConfigLoadError::Validation)?;
        Ok(config)
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Check ranges, returning a human-readable message on failure.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.train_ratio > 0.0 && self.train_ratio <= 1.0) {
            return Err(format!(
                "train_ratio must be in (0, 1], got {}",
                self.train_ratio
            ));
        }
        if !(1..=FIELD_COUNT).contains(&self.min_label_matches) {
            return Err(format!(
                "min_label_matches must be between 1 and {FIELD_COUNT}, got {}",
                self.min_label_matches
            ));
        }
        self.forest.validate().map_err(|err| err.to_string())
    }

    /// RNG for the snapshot shuffle.
    pub fn shuffle_rng(&self) -> StdRng {
        match self.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
