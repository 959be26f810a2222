//! # bizmatch forest
//!
//! A bagged decision-tree ensemble for binary classification over ordinal
//! feature vectors. Each member is a `linfa-trees` CART tree; bagging,
//! feature subsampling and voting happen here.
//!
//! The pipeline only needs two operations from a classifier: train on
//! `(row, label)` pairs and predict labels for new rows. Those live behind
//! the [`Classifier`] and [`TrainedModel`] traits so the matcher can be
//! driven by a stub in tests. [`RandomForest`] is the production
//! implementation.
//!
//! Training is deterministic: tree `i` derives all of its randomness from
//! `config.seed + i`, so a fixed seed yields the same model whether trees
//! are grown on the rayon pool or sequentially.
//!
//! ## Example
//!
//! ```
//! use forest::{Classifier, ForestConfig, RandomForest, TrainedModel};
//!
//! let rows = vec![[0usize, 1], [0, 0], [1, 1], [1, 0]];
//! let labels = vec![1u8, 1, 0, 0];
//!
//! let forest = RandomForest::new(ForestConfig::new().with_n_estimators(10)).unwrap();
//! let model = forest.train(&rows, &labels).unwrap();
//! assert_eq!(model.predict(&[[0usize, 1], [1, 1]]).unwrap(), vec![1, 0]);
//! ```

mod config;
mod ensemble;
mod error;
mod tree;

pub use crate::config::ForestConfig;
pub use crate::ensemble::{ForestModel, RandomForest};
pub use crate::error::ForestError;
pub use crate::tree::BaggedTree;

/// Something that can be trained on labelled feature rows.
pub trait Classifier {
    type Model: TrainedModel;

    /// Train a fresh model. Every row must have the same width and every
    /// label must be `0` or `1`.
    fn train<R>(&self, rows: &[R], labels: &[u8]) -> Result<Self::Model, ForestError>
    where
        R: AsRef<[usize]> + Sync;
}

/// A model produced by a [`Classifier`].
pub trait TrainedModel {
    /// Predict one label per row.
    fn predict<R: AsRef<[usize]>>(&self, rows: &[R]) -> Result<Vec<u8>, ForestError>;

    /// Fraction of `rows` whose prediction equals the given label.
    /// `None` for an empty set.
    fn accuracy<R: AsRef<[usize]>>(
        &self,
        rows: &[R],
        labels: &[u8],
    ) -> Result<Option<f64>, ForestError> {
        if rows.len() != labels.len() {
            return Err(ForestError::LengthMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        if rows.is_empty() {
            return Ok(None);
        }
        let correct = self
            .predict(rows)?
            .iter()
            .zip(labels)
            .filter(|(predicted, expected)| predicted == expected)
            .count();
        Ok(Some(correct as f64 / rows.len() as f64))
    }
}
