use std::path::PathBuf;

use bizmatch::{
    Catalog, Criteria, ForestConfig, PipelineConfig, Vocabulary, encode, label, match_catalog,
};
use serde_json::{Value, json};

fn startup_catalog() -> Catalog {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/startup.json");
    Catalog::load(path).expect("bundled catalog should load")
}

fn criteria() -> Value {
    json!({
        "namaBadanHukum": "PT",
        "sektor": "Teknologi",
        "provinsi": "DKI JAKARTA",
        "sistemPenjualan": "Online",
        "jenisUsaha": "Jasa",
    })
}

fn names(catalog: &Catalog, config: &PipelineConfig) -> Vec<String> {
    match_catalog(catalog, &criteria(), config)
        .expect("match should succeed")
        .matches
        .iter()
        .filter_map(|record| record.name())
        .map(String::from)
        .collect()
}

#[test]
fn fixed_seeds_reproduce_matches() {
    let catalog = startup_catalog();
    let config = PipelineConfig {
        forest: ForestConfig::new().with_n_estimators(100),
        ..PipelineConfig::default()
    }
    .with_shuffle_seed(2024);

    let first = names(&catalog, &config);
    for _ in 0..3 {
        assert_eq!(names(&catalog, &config), first);
    }
}

#[test]
fn parallel_and_sequential_forests_agree_end_to_end() {
    let catalog = startup_catalog();
    let parallel = PipelineConfig {
        forest: ForestConfig::new().with_n_estimators(100).with_parallel(true),
        ..PipelineConfig::default()
    }
    .with_shuffle_seed(9);
    let sequential = PipelineConfig {
        forest: ForestConfig::new().with_n_estimators(100).with_parallel(false),
        ..parallel.clone()
    };

    assert_eq!(names(&catalog, &parallel), names(&catalog, &sequential));
}

#[test]
fn vocabulary_and_encoding_are_idempotent() {
    let catalog = startup_catalog();
    let first = Vocabulary::build(&catalog).unwrap();
    let second = Vocabulary::build(&catalog).unwrap();
    assert_eq!(first, second);

    for record in &catalog {
        assert_eq!(encode(record, &first), encode(record, &second));
    }
}

#[test]
fn labels_do_not_depend_on_call_order() {
    let catalog = startup_catalog();
    let criteria = Criteria::from_value(&criteria()).unwrap();

    let forward: Vec<u8> = catalog.iter().map(|r| label(r, &criteria)).collect();
    let mut backward: Vec<u8> = catalog.iter().rev().map(|r| label(r, &criteria)).collect();
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn catalog_is_untouched_by_matching() {
    let catalog = startup_catalog();
    let before = catalog.clone();
    for seed in 0..5 {
        let config = PipelineConfig {
            forest: ForestConfig::new().with_n_estimators(20),
            ..PipelineConfig::default()
        }
        .with_shuffle_seed(seed);
        let _ = names(&catalog, &config);
    }
    assert_eq!(catalog, before);
}
