use thiserror::Error;

/// Errors raised while configuring, training or querying a forest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ForestError {
    #[error("invalid forest configuration: {0}")]
    InvalidConfig(String),

    /// No rows were supplied for training.
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("{rows} feature rows but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },

    /// A row does not have the width of the first training row (or of the
    /// model, at prediction time).
    #[error("row {row} has {found} features, expected {expected}")]
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The underlying tree learner rejected a bootstrap sample.
    #[error("tree training failed: {0}")]
    Training(String),

    /// Labels must be binary.
    #[error("row {row} has label {label}, expected 0 or 1")]
    InvalidLabel { row: usize, label: u8 },
}
