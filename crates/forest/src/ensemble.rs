use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use crate::tree::{majority, to_matrix, BaggedTree, TreeParams};
use crate::{Classifier, ForestConfig, ForestError, TrainedModel};

/// Bagged ensemble of CART trees with majority voting.
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
}

impl RandomForest {
    /// Create a forest trainer, rejecting invalid hyperparameters.
    pub fn new(config: ForestConfig) -> Result<Self, ForestError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Train an ensemble on `rows` and binary `labels`.
    pub fn fit<R>(&self, rows: &[R], labels: &[u8]) -> Result<ForestModel, ForestError>
    where
        R: AsRef<[usize]> + Sync,
    {
        let start = Instant::now();
        let width = check_training_set(rows, labels)?;
        let matrix = to_matrix(rows, width);
        let params = TreeParams {
            min_samples_leaf: self.config.min_samples_leaf,
            max_depth: self.config.max_depth,
        };

        let grow = |tree: usize| self.grow_tree(tree, &matrix, labels, params);
        let trees = if self.config.use_parallel {
            (0..self.config.n_estimators)
                .into_par_iter()
                .map(grow)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..self.config.n_estimators)
                .map(grow)
                .collect::<Result<Vec<_>, _>>()?
        };

        info!(
            trees = trees.len(),
            rows = rows.len(),
            width,
            positives = labels.iter().filter(|&&label| label == 1).count(),
            parallel = self.config.use_parallel,
            elapsed_micros = start.elapsed().as_micros(),
            "forest_trained"
        );
        Ok(ForestModel { trees, width })
    }

    /// Draw the bootstrap sample and feature subset of tree `tree` from its
    /// own seed, then fit it.
    fn grow_tree(
        &self,
        tree: usize,
        matrix: &ndarray::Array2<f64>,
        labels: &[u8],
        params: TreeParams,
    ) -> Result<BaggedTree, ForestError> {
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(tree as u64));
        let (n, width) = matrix.dim();

        let samples: Vec<usize> = if self.config.replacement {
            (0..n).map(|_| rng.random_range(0..n)).collect()
        } else {
            (0..n).collect()
        };

        let k = self.config.features_per_tree(width);
        let features: Vec<usize> = if k < width {
            let mut chosen = rand::seq::index::sample(&mut rng, width, k).into_vec();
            chosen.sort_unstable();
            chosen
        } else {
            (0..width).collect()
        };

        BaggedTree::fit(matrix, labels, &samples, features, params)
    }
}

impl Classifier for RandomForest {
    type Model = ForestModel;

    fn train<R>(&self, rows: &[R], labels: &[u8]) -> Result<ForestModel, ForestError>
    where
        R: AsRef<[usize]> + Sync,
    {
        self.fit(rows, labels)
    }
}

/// A trained ensemble. Scoped to the request that built it.
#[derive(Debug, Clone)]
pub struct ForestModel {
    trees: Vec<BaggedTree>,
    width: usize,
}

impl ForestModel {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature count the model was trained on.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn trees(&self) -> &[BaggedTree] {
        &self.trees
    }

    /// Each tree's own `0`/`1` prediction for every row, tree by tree.
    pub fn tree_predictions<R: AsRef<[usize]>>(
        &self,
        rows: &[R],
    ) -> Result<Vec<Vec<u8>>, ForestError> {
        let matrix = self.matrix(rows)?;
        Ok(self
            .trees
            .iter()
            .map(|tree| tree.predict(&matrix).iter().map(|&label| u8::from(label == 1)).collect())
            .collect())
    }

    fn matrix<R: AsRef<[usize]>>(&self, rows: &[R]) -> Result<ndarray::Array2<f64>, ForestError> {
        for (index, row) in rows.iter().enumerate() {
            let found = row.as_ref().len();
            if found != self.width {
                return Err(ForestError::InconsistentWidth {
                    row: index,
                    expected: self.width,
                    found,
                });
            }
        }
        Ok(to_matrix(rows, self.width))
    }
}

impl TrainedModel for ForestModel {
    /// Majority vote of all trees; ties resolve to `0`.
    fn predict<R: AsRef<[usize]>>(&self, rows: &[R]) -> Result<Vec<u8>, ForestError> {
        let matrix = self.matrix(rows)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut votes = vec![[0usize; 2]; rows.len()];
        for tree in &self.trees {
            for (row, &label) in tree.predict(&matrix).iter().enumerate() {
                votes[row][usize::from(label == 1)] += 1;
            }
        }
        Ok(votes.into_iter().map(majority).collect())
    }
}

/// Validate the training set and return its row width.
fn check_training_set<R: AsRef<[usize]>>(rows: &[R], labels: &[u8]) -> Result<usize, ForestError> {
    let Some(first) = rows.first() else {
        return Err(ForestError::EmptyTrainingSet);
    };
    if rows.len() != labels.len() {
        return Err(ForestError::LengthMismatch {
            rows: rows.len(),
            labels: labels.len(),
        });
    }

    let width = first.as_ref().len();
    if width == 0 {
        return Err(ForestError::InconsistentWidth {
            row: 0,
            expected: 1,
            found: 0,
        });
    }
    for (index, row) in rows.iter().enumerate() {
        let found = row.as_ref().len();
        if found != width {
            return Err(ForestError::InconsistentWidth {
                row: index,
                expected: width,
                found,
            });
        }
    }
    if let Some((index, &label)) = labels.iter().enumerate().find(|(_, &label)| label > 1) {
        return Err(ForestError::InvalidLabel { row: index, label });
    }
    Ok(width)
}
