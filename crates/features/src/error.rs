use catalog::Field;
use thiserror::Error;

/// Errors raised while validating criteria or deriving vocabularies.
///
/// All variants are caused by malformed input; none of them is transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeatureError {
    /// The criteria object is not an object or lacks a required key.
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    /// A catalog record lacks a required field.
    #[error("invalid population: record {record} is missing field `{field}`")]
    InvalidPopulation { record: usize, field: Field },

    /// The catalog is empty, or a field has no observed values.
    #[error("empty vocabulary: {0}")]
    EmptyVocabulary(String),
}
