//! Hyperparameters for the bagged tree ensemble.
//!
//! The configuration is pure data: training is a deterministic function of
//! `(rows, labels, config)`.

use serde::{Deserialize, Serialize};

use crate::ForestError;

/// Training options for [`RandomForest`](crate::RandomForest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Base seed. Tree `i` draws its bootstrap sample and feature subset
    /// from `seed + i`, so results do not depend on scheduling.
    pub seed: u64,
    /// Number of trees in the ensemble.
    pub n_estimators: usize,
    /// Features considered per tree. `None`, or a value at least the row
    /// width, uses every feature.
    pub max_features: Option<usize>,
    /// Draw bootstrap samples with replacement. When `false` every tree
    /// sees the full training set once.
    pub replacement: bool,
    /// Minimum number of samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Maximum tree depth; `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Train trees on the rayon thread pool.
    pub use_parallel: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            n_estimators: 500,
            max_features: Some(5),
            replacement: true,
            min_samples_leaf: 1,
            max_depth: None,
            use_parallel: true,
        }
    }
}

impl ForestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn validate(&self) -> Result<(), ForestError> {
        if self.n_estimators == 0 {
            return Err(ForestError::InvalidConfig(
                "n_estimators must be greater than 0".into(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForestError::InvalidConfig(
                "min_samples_leaf must be greater than 0".into(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(ForestError::InvalidConfig(
                "max_features must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Number of features each tree sees for rows of `width` features.
    pub(crate) fn features_per_tree(&self, width: usize) -> usize {
        self.max_features.map_or(width, |limit| limit.min(width))
    }
}
