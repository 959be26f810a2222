//! Workspace umbrella crate for bizmatch.
//!
//! This crate stitches the catalog, feature and forest stages into a single
//! match request: validate the caller's criteria, derive vocabularies from
//! the catalog, synthesize labels, train a fresh ensemble on a shuffled
//! snapshot and return every catalog record the model predicts as a match.
//!
//! ```
//! use bizmatch::{Catalog, PipelineConfig, match_catalog};
//! use serde_json::json;
//!
//! let catalog = Catalog::from_value(json!([
//!     {"namaPerusahaan": "A", "namaBadanHukum": "CV", "sektor": "Tech",
//!      "provinsi": "KALBAR", "sistemPenjualan": "Online", "jenisUsaha": "Retail"},
//!     {"namaPerusahaan": "B", "namaBadanHukum": "PT", "sektor": "Food",
//!      "provinsi": "JAKARTA", "sistemPenjualan": "Offline", "jenisUsaha": "Wholesale"},
//!     {"namaPerusahaan": "C", "namaBadanHukum": "CV", "sektor": "Food",
//!      "provinsi": "KALBAR", "sistemPenjualan": "Offline", "jenisUsaha": "Retail"}
//! ])).unwrap();
//! let criteria = json!({"namaBadanHukum": "CV", "sektor": "", "provinsi": "KALBAR",
//!                       "sistemPenjualan": "", "jenisUsaha": ""});
//!
//! let config = PipelineConfig {
//!     train_ratio: 1.0,
//!     ..PipelineConfig::default()
//! }
//! .with_shuffle_seed(7);
//!
//! let outcome = match_catalog(&catalog, &criteria, &config).unwrap();
//! let names: Vec<_> = outcome.matches.iter().filter_map(|r| r.name()).collect();
//! assert_eq!(names, ["A", "C"]);
//! ```

mod config;
mod partition;
mod pipeline;

pub use catalog::{Catalog, CatalogError, EntityRecord, FIELD_COUNT, Field, NAME_KEY};
pub use features::{
    Criteria, FeatureError, FeatureVector, UnknownValue, Vocabulary, encode, encode_with, label,
    label_with_threshold, match_count, validate_criteria, value_order,
};
pub use forest::{Classifier, ForestConfig, ForestError, ForestModel, RandomForest, TrainedModel};

pub use crate::config::{ConfigLoadError, PipelineConfig};
pub use crate::partition::{Partition, partition};
pub use crate::pipeline::{MatchOutcome, MatchReport, match_catalog, match_catalog_with};

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

/// Errors that can occur while running a match request.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The criteria is not an object or lacks a required key.
    InvalidCriteria(String),
    /// A catalog record is missing a required field.
    InvalidPopulation(String),
    /// The catalog produced an empty vocabulary.
    EmptyVocabulary(String),
    Classifier(ForestError),
    InvalidConfig(String),
}

impl PipelineError {
    /// Stable machine-readable code, used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::InvalidCriteria(_) => "INVALID_CRITERIA",
            PipelineError::InvalidPopulation(_) => "INVALID_POPULATION",
            PipelineError::EmptyVocabulary(_) => "EMPTY_VOCABULARY",
            PipelineError::Classifier(_) => "CLASSIFIER_ERROR",
            PipelineError::InvalidConfig(_) => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidCriteria(msg) => write!(f, "invalid criteria: {msg}"),
            PipelineError::InvalidPopulation(msg) => write!(f, "invalid population: {msg}"),
            PipelineError::EmptyVocabulary(msg) => write!(f, "empty vocabulary: {msg}"),
            PipelineError::Classifier(err) => write!(f, "classifier failure: {err}"),
            PipelineError::InvalidConfig(msg) => write!(f, "invalid pipeline config: {msg}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Classifier(err) => Some(err),
            PipelineError::InvalidCriteria(_)
            | PipelineError::InvalidPopulation(_)
            | PipelineError::EmptyVocabulary(_)
            | PipelineError::InvalidConfig(_) => None,
        }
    }
}

impl From<FeatureError> for PipelineError {
    fn from(value: FeatureError) -> Self {
        match value {
            FeatureError::InvalidCriteria(msg) => PipelineError::InvalidCriteria(msg),
            FeatureError::EmptyVocabulary(msg) => PipelineError::EmptyVocabulary(msg),
            FeatureError::InvalidPopulation { record, field } => {
                PipelineError::InvalidPopulation(format!(
                    "record {record} is missing field `{field}`"
                ))
            }
            other => PipelineError::InvalidPopulation(other.to_string()),
        }
    }
}

impl From<ForestError> for PipelineError {
    fn from(value: ForestError) -> Self {
        match value {
            ForestError::InvalidConfig(msg) => PipelineError::InvalidConfig(msg),
            other => PipelineError::Classifier(other),
        }
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_vocabulary(&self, latency: Duration, result: Result<(), PipelineError>);
    fn record_training(&self, latency: Duration, result: Result<(), PipelineError>);
    /// `Ok` carries the number of matched records.
    fn record_inference(&self, latency: Duration, result: Result<usize, PipelineError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_vocabulary(self, result: Result<(), PipelineError>) {
        self.recorder.record_vocabulary(self.start.elapsed(), result);
    }

    pub(crate) fn record_training(self, result: Result<(), PipelineError>) {
        self.recorder.record_training(self.start.elapsed(), result);
    }

    pub(crate) fn record_inference(self, result: Result<usize, PipelineError>) {
        self.recorder.record_inference(self.start.elapsed(), result);
    }
}
