//! Training label synthesis.
//!
//! Labels are derived from how many of the five fields a record shares with
//! the criteria. The default threshold is one matching field, which marks
//! nearly every record positive on realistic catalogs; callers that want a
//! stricter rule must ask for it with [`label_with_threshold`].

use catalog::{EntityRecord, Field};

use crate::Criteria;

/// Default number of equal fields required for a positive label.
pub const DEFAULT_MIN_MATCHES: usize = 1;

/// Number of fields whose record value equals the criteria value.
///
/// A missing record field never matches, not even a `null` criterion.
pub fn match_count(record: &EntityRecord, criteria: &Criteria) -> usize {
    Field::ALL
        .into_iter()
        .filter(|field| record.get(*field) == Some(criteria.get(*field)))
        .count()
}

/// `1` when at least one field matches, else `0`.
pub fn label(record: &EntityRecord, criteria: &Criteria) -> u8 {
    label_with_threshold(record, criteria, DEFAULT_MIN_MATCHES)
}

/// `1` when at least `min_matches` fields match, else `0`.
pub fn label_with_threshold(record: &EntityRecord, criteria: &Criteria, min_matches: usize) -> u8 {
    u8::from(match_count(record, criteria) >= min_matches)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> EntityRecord {
        serde_json::from_value(value).unwrap()
    }

    fn record_a() -> EntityRecord {
        record(json!({"namaPerusahaan": "A", "namaBadanHukum": "CV", "sektor": "Tech",
            "provinsi": "KALBAR", "sistemPenjualan": "Online", "jenisUsaha": "Retail"}))
    }

    fn record_b() -> EntityRecord {
        record(json!({"namaPerusahaan": "B", "namaBadanHukum": "PT", "sektor": "Food",
            "provinsi": "JAKARTA", "sistemPenjualan": "Offline", "jenisUsaha": "Wholesale"}))
    }

    fn criteria() -> Criteria {
        Criteria::from_strs(["CV", "", "KALBAR", "", ""])
    }

    #[test]
    fn counts_exact_matches() {
        assert_eq!(match_count(&record_a(), &criteria()), 2);
        assert_eq!(match_count(&record_b(), &criteria()), 0);
    }

    #[test]
    fn any_single_match_is_positive() {
        assert_eq!(label(&record_a(), &criteria()), 1);
        assert_eq!(label(&record_b(), &criteria()), 0);

        let one = Criteria::from_strs(["PT", "x", "x", "x", "x"]);
        assert_eq!(label(&record_b(), &one), 1);
    }

    #[test]
    fn empty_criterion_matches_only_empty_attribute() {
        let empty_sector = record(json!({"namaBadanHukum": "UD", "sektor": "",
            "provinsi": "BALI", "sistemPenjualan": "Online", "jenisUsaha": "Jasa"}));
        let only_sector = Criteria::from_strs(["CV", "", "KALBAR", "Offline", "Retail"]);

        assert_eq!(match_count(&empty_sector, &only_sector), 1);
        assert_eq!(match_count(&record_a(), &only_sector), 3);
    }

    #[test]
    fn non_string_criteria_never_match_strings() {
        let numeric = Criteria::from_value(&json!({
            "namaBadanHukum": 1, "sektor": null, "provinsi": false,
            "sistemPenjualan": [], "jenisUsaha": {}
        }))
        .unwrap();
        assert_eq!(label(&record_a(), &numeric), 0);
    }

    #[test]
    fn threshold_is_configurable() {
        assert_eq!(label_with_threshold(&record_a(), &criteria(), 2), 1);
        assert_eq!(label_with_threshold(&record_a(), &criteria(), 3), 0);
    }

    #[test]
    fn labels_are_pure() {
        let a = record_a();
        let c = criteria();
        let first = label(&a, &c);
        for _ in 0..10 {
            assert_eq!(label(&a, &c), first);
        }
    }
}
