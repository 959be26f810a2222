//! A single ensemble member: a `linfa-trees` CART tree (Gini impurity,
//! `x <= threshold` splits) fitted on one bootstrap sample and one subset
//! of the feature columns.

use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};

use crate::ForestError;

/// Growth limits shared by every tree of an ensemble.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub min_samples_leaf: usize,
    pub max_depth: Option<usize>,
}

/// Feature rows as the `f64` matrix linfa consumes. Ordinal indices are
/// exact in `f64`. Every row must already be `width` wide.
pub(crate) fn to_matrix<R: AsRef<[usize]>>(rows: &[R], width: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows.len(), width), |(row, column)| {
        rows[row].as_ref()[column] as f64
    })
}

/// A fitted tree together with the columns it was trained on.
#[derive(Debug, Clone)]
pub struct BaggedTree {
    features: Vec<usize>,
    tree: DecisionTree<f64, usize>,
}

impl BaggedTree {
    /// Fit on the rows of `matrix` selected by `samples` (indices may
    /// repeat), restricted to `features`.
    pub(crate) fn fit(
        matrix: &Array2<f64>,
        labels: &[u8],
        samples: &[usize],
        features: Vec<usize>,
        params: TreeParams,
    ) -> Result<Self, ForestError> {
        let records = matrix
            .select(Axis(0), samples)
            .select(Axis(1), &features);
        let targets: Array1<usize> = samples
            .iter()
            .map(|&row| usize::from(labels[row]))
            .collect();

        let leaf = params.min_samples_leaf as f32;
        let tree = DecisionTree::<f64, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(params.max_depth)
            .min_weight_leaf(leaf)
            .min_weight_split(2.0 * leaf)
            .fit(&Dataset::new(records, targets))
            .map_err(|err| ForestError::Training(err.to_string()))?;

        Ok(Self { features, tree })
    }

    /// Column indices of the full row this tree looks at, ascending.
    pub fn features(&self) -> &[usize] {
        &self.features
    }

    /// One `0`/`1` prediction per row of a full-width `matrix`.
    pub(crate) fn predict(&self, matrix: &Array2<f64>) -> Array1<usize> {
        let columns = matrix.select(Axis(1), &self.features);
        self.tree.predict(&columns)
    }
}

/// Majority label; ties resolve to `0`.
pub(crate) fn majority(votes: [usize; 2]) -> u8 {
    u8::from(votes[1] > votes[0])
}
