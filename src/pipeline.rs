//! End-to-end match request: criteria in, predicted-positive records out.

use std::time::{Duration, Instant};

use catalog::{Catalog, EntityRecord};
use features::{Criteria, FeatureVector, Vocabulary, encode_with, label_with_threshold};
use forest::{Classifier, RandomForest, TrainedModel};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::partition::partition;
use crate::{MetricsSpan, PipelineError};

/// Summary of one match request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    pub catalog_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    /// Training rows labelled positive.
    pub positive_labels: usize,
    pub matched: usize,
    /// Accuracy on the held-out slice against the synthesized labels.
    /// Only set when `report_holdout` is on and the slice is non-empty.
    pub holdout_accuracy: Option<f64>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Records predicted to match, borrowed from the catalog in catalog order.
#[derive(Debug, Clone)]
pub struct MatchOutcome<'a> {
    pub matches: Vec<&'a EntityRecord>,
    pub report: MatchReport,
}

impl MatchOutcome<'_> {
    pub fn into_owned_records(self) -> Vec<EntityRecord> {
        self.matches.into_iter().cloned().collect()
    }
}

/// Run a match request with the [`RandomForest`] configured in `config`.
///
/// `criteria` is the raw caller object; it is validated here. The catalog
/// is only read: the shuffle operates on a private snapshot.
///
/// # Errors
///
/// - [`PipelineError::InvalidConfig`] for out-of-range settings.
/// - [`PipelineError::InvalidCriteria`] when a required key is missing.
/// - [`PipelineError::InvalidPopulation`] / [`PipelineError::EmptyVocabulary`]
///   for a malformed or empty catalog.
/// - [`PipelineError::Classifier`] when training fails, including an empty
///   training slice.
pub fn match_catalog<'a>(
    catalog: &'a Catalog,
    criteria: &Value,
    config: &PipelineConfig,
) -> Result<MatchOutcome<'a>, PipelineError> {
    config.validate().map_err(PipelineError::InvalidConfig)?;
    let forest = RandomForest::new(config.forest.clone())?;
    match_catalog_with(catalog, criteria, config, &forest)
}

/// Run a match request with any [`Classifier`].
pub fn match_catalog_with<'a, C: Classifier>(
    catalog: &'a Catalog,
    criteria: &Value,
    config: &PipelineConfig,
    classifier: &C,
) -> Result<MatchOutcome<'a>, PipelineError> {
    let start = Instant::now();
    let result = run(catalog, criteria, config, classifier);
    match &result {
        Ok(outcome) => info!(
            catalog_size = outcome.report.catalog_size,
            train_rows = outcome.report.train_size,
            positive_labels = outcome.report.positive_labels,
            matched = outcome.report.matched,
            holdout_accuracy = outcome.report.holdout_accuracy,
            elapsed_micros = start.elapsed().as_micros(),
            "match_success"
        ),
        Err(err) => warn!(
            catalog_size = catalog.len(),
            error_code = err.code(),
            error = %err,
            "match_failure"
        ),
    }
    result.map(|mut outcome| {
        outcome.report.elapsed = start.elapsed();
        outcome
    })
}

fn run<'a, C: Classifier>(
    catalog: &'a Catalog,
    criteria: &Value,
    config: &PipelineConfig,
    classifier: &C,
) -> Result<MatchOutcome<'a>, PipelineError> {
    config.validate().map_err(PipelineError::InvalidConfig)?;
    let criteria = Criteria::from_value(criteria)?;

    let mut vocabulary_metrics = MetricsSpan::start();
    let vocabulary = match Vocabulary::build(catalog) {
        Ok(vocabulary) => {
            if let Some(span) = vocabulary_metrics.take() {
                span.record_vocabulary(Ok(()));
            }
            vocabulary
        }
        Err(err) => {
            let err = PipelineError::from(err);
            if let Some(span) = vocabulary_metrics.take() {
                span.record_vocabulary(Err(err.clone()));
            }
            return Err(err);
        }
    };

    let encode = |record: &EntityRecord| -> FeatureVector {
        encode_with(record, &vocabulary, config.unknown_value)
    };
    let label = |record: &EntityRecord| -> u8 {
        label_with_threshold(record, &criteria, config.min_label_matches)
    };

    let mut rng = config.shuffle_rng();
    let split = partition(catalog, config.train_ratio, &mut rng);
    let (rows, labels): (Vec<FeatureVector>, Vec<u8>) = split
        .shuffled()
        .iter()
        .map(|&record| (encode(record), label(record)))
        .unzip();
    let train_len = split.train().len();
    let (train_rows, test_rows) = rows.split_at(train_len);
    let (train_labels, test_labels) = labels.split_at(train_len);
    debug!(
        train_rows = train_rows.len(),
        test_rows = test_rows.len(),
        "catalog_partitioned"
    );

    let mut training_metrics = MetricsSpan::start();
    let model = match classifier.train(train_rows, train_labels) {
        Ok(model) => {
            if let Some(span) = training_metrics.take() {
                span.record_training(Ok(()));
            }
            model
        }
        Err(err) => {
            let err = PipelineError::from(err);
            if let Some(span) = training_metrics.take() {
                span.record_training(Err(err.clone()));
            }
            return Err(err);
        }
    };

    let holdout_accuracy = if config.report_holdout {
        model.accuracy(test_rows, test_labels)?
    } else {
        None
    };

    let mut inference_metrics = MetricsSpan::start();
    let catalog_rows: Vec<FeatureVector> = catalog.iter().map(encode).collect();
    let predictions = match model.predict(&catalog_rows) {
        Ok(predictions) => predictions,
        Err(err) => {
            let err = PipelineError::from(err);
            if let Some(span) = inference_metrics.take() {
                span.record_inference(Err(err.clone()));
            }
            return Err(err);
        }
    };
    let matches: Vec<&'a EntityRecord> = catalog
        .iter()
        .zip(&predictions)
        .filter(|(_, predicted)| **predicted == 1)
        .map(|(record, _)| record)
        .collect();
    if let Some(span) = inference_metrics.take() {
        span.record_inference(Ok(matches.len()));
    }

    Ok(MatchOutcome {
        report: MatchReport {
            catalog_size: catalog.len(),
            train_size: train_rows.len(),
            test_size: test_rows.len(),
            positive_labels: train_labels.iter().filter(|&&label| label == 1).count(),
            matched: matches.len(),
            holdout_accuracy,
            elapsed: Duration::ZERO,
        },
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forest::{ForestConfig, ForestError};
    use serde_json::json;

    fn two_records() -> Catalog {
        Catalog::from_value(json!([
            {"namaPerusahaan": "A", "namaBadanHukum": "CV", "sektor": "Tech",
             "provinsi": "KALBAR", "sistemPenjualan": "Online", "jenisUsaha": "Retail"},
            {"namaPerusahaan": "B", "namaBadanHukum": "PT", "sektor": "Food",
             "provinsi": "JAKARTA", "sistemPenjualan": "Offline", "jenisUsaha": "Wholesale"}
        ]))
        .unwrap()
    }

    fn kalbar_cv() -> Value {
        json!({"namaBadanHukum": "CV", "sektor": "", "provinsi": "KALBAR",
               "sistemPenjualan": "", "jenisUsaha": ""})
    }

    /// Predicts the label of an identical training row, else 0.
    struct Memorizer;

    struct Memory(Vec<(Vec<usize>, u8)>);

    impl Classifier for Memorizer {
        type Model = Memory;

        fn train<R>(&self, rows: &[R], labels: &[u8]) -> Result<Memory, ForestError>
        where
            R: AsRef<[usize]> + Sync,
        {
            if rows.is_empty() {
                return Err(ForestError::EmptyTrainingSet);
            }
            Ok(Memory(
                rows.iter()
                    .map(|row| row.as_ref().to_vec())
                    .zip(labels.iter().copied())
                    .collect(),
            ))
        }
    }

    impl TrainedModel for Memory {
        fn predict<R: AsRef<[usize]>>(&self, rows: &[R]) -> Result<Vec<u8>, ForestError> {
            Ok(rows
                .iter()
                .map(|row| {
                    self.0
                        .iter()
                        .find(|(seen, _)| seen.as_slice() == row.as_ref())
                        .map_or(0, |(_, label)| *label)
                })
                .collect())
        }
    }

    /// Predicts the same label for every row.
    struct Constant(u8);

    impl Classifier for Constant {
        type Model = Constant;

        fn train<R>(&self, _rows: &[R], _labels: &[u8]) -> Result<Constant, ForestError>
        where
            R: AsRef<[usize]> + Sync,
        {
            Ok(Constant(self.0))
        }
    }

    impl TrainedModel for Constant {
        fn predict<R: AsRef<[usize]>>(&self, rows: &[R]) -> Result<Vec<u8>, ForestError> {
            Ok(vec![self.0; rows.len()])
        }
    }

    #[test]
    fn holdout_accuracy_comes_from_the_model() {
        let records: Vec<Value> = (0..10)
            .map(|i| {
                json!({"namaPerusahaan": format!("K{i}"), "namaBadanHukum": "CV",
                       "sektor": "Tech", "provinsi": "KALBAR",
                       "sistemPenjualan": "Online", "jenisUsaha": "Retail"})
            })
            .collect();
        let catalog = Catalog::from_value(json!(records)).unwrap();
        let config = PipelineConfig {
            report_holdout: true,
            ..PipelineConfig::default()
        }
        .with_shuffle_seed(5);

        // Every record shares the legal entity with the criteria, so every
        // synthesized label is 1.
        let right = match_catalog_with(&catalog, &kalbar_cv(), &config, &Constant(1)).unwrap();
        assert_eq!(right.report.test_size, 3);
        assert_eq!(right.report.holdout_accuracy, Some(1.0));
        assert_eq!(right.report.matched, 10);

        let wrong = match_catalog_with(&catalog, &kalbar_cv(), &config, &Constant(0)).unwrap();
        assert_eq!(wrong.report.holdout_accuracy, Some(0.0));
        assert!(wrong.matches.is_empty());
    }

    #[test]
    fn holdout_is_skipped_without_test_rows() {
        let config = PipelineConfig {
            report_holdout: true,
            train_ratio: 1.0,
            ..PipelineConfig::default()
        }
        .with_shuffle_seed(5);
        let catalog = two_records();
        let outcome = match_catalog_with(&catalog, &kalbar_cv(), &config, &Constant(1));
        assert_eq!(outcome.map(|outcome| outcome.report.holdout_accuracy), Ok(None));
    }

    #[test]
    fn two_record_catalog_only_ever_matches_a() {
        let catalog = two_records();
        let mut matched_a = false;
        for seed in 0..16 {
            let config = PipelineConfig::default().with_shuffle_seed(seed);
            let outcome = match_catalog_with(&catalog, &kalbar_cv(), &config, &Memorizer).unwrap();
            let names: Vec<_> = outcome.matches.iter().filter_map(|r| r.name()).collect();
            assert!(names.is_empty() || names == ["A"], "seed {seed}: {names:?}");
            matched_a |= names == ["A"];
            assert_eq!(outcome.report.train_size, 1);
            assert_eq!(outcome.report.test_size, 1);
        }
        assert!(matched_a);
    }

    #[test]
    fn single_record_catalog_has_no_training_rows() {
        let catalog = Catalog::new(vec![two_records().records()[0].clone()]);
        let err = match_catalog(&catalog, &kalbar_cv(), &PipelineConfig::default()).unwrap_err();
        assert_eq!(err, PipelineError::Classifier(ForestError::EmptyTrainingSet));
        assert_eq!(err.code(), "CLASSIFIER_ERROR");
    }

    #[test]
    fn missing_criteria_key_fails_before_training() {
        let err = match_catalog(
            &two_records(),
            &json!({"namaBadanHukum": "CV"}),
            &PipelineConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_CRITERIA");
    }

    #[test]
    fn invalid_config_is_reported() {
        let config = PipelineConfig {
            train_ratio: 1.5,
            ..PipelineConfig::default()
        };
        let err = match_catalog(&two_records(), &kalbar_cv(), &config).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn matches_come_back_in_catalog_order() {
        let records: Vec<Value> = (0..12)
            .map(|i| {
                json!({"namaPerusahaan": format!("S{i:02}"),
                       "namaBadanHukum": if i % 2 == 0 { "CV" } else { "PT" },
                       "sektor": "Tech", "provinsi": "JAKARTA",
                       "sistemPenjualan": "Online", "jenisUsaha": "Retail"})
            })
            .collect();
        let catalog = Catalog::from_value(json!(records)).unwrap();
        let criteria = json!({"namaBadanHukum": "CV", "sektor": "x", "provinsi": "x",
                              "sistemPenjualan": "x", "jenisUsaha": "x"});
        let config = PipelineConfig {
            train_ratio: 1.0,
            forest: ForestConfig::new().with_n_estimators(30),
            ..PipelineConfig::default()
        }
        .with_shuffle_seed(8);

        let outcome = match_catalog(&catalog, &criteria, &config).unwrap();
        let names: Vec<_> = outcome.matches.iter().filter_map(|r| r.name()).collect();
        assert_eq!(names, ["S00", "S02", "S04", "S06", "S08", "S10"]);
        assert_eq!(outcome.report.matched, 6);
        assert_eq!(outcome.report.holdout_accuracy, None);
    }

    #[test]
    fn holdout_report_does_not_change_matches() {
        let catalog = two_records();
        let base = PipelineConfig::default().with_shuffle_seed(4);
        let reported = PipelineConfig {
            report_holdout: true,
            ..base.clone()
        };

        let plain = match_catalog_with(&catalog, &kalbar_cv(), &base, &Memorizer).unwrap();
        let scored = match_catalog_with(&catalog, &kalbar_cv(), &reported, &Memorizer).unwrap();
        assert_eq!(plain.matches, scored.matches);
        assert!(plain.report.holdout_accuracy.is_none());
        assert!(scored.report.holdout_accuracy.is_some());
    }
}
