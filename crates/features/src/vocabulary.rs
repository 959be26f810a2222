//! Per-field vocabularies and ordinal feature encoding.
//!
//! A [`Vocabulary`] holds, for each [`Field`], the sorted distinct values
//! observed across a catalog snapshot. The position of a value inside its
//! field's list is its ordinal code, so the sort order is the canonical
//! index basis. Vocabularies are rebuilt from the snapshot on every request
//! and never cached.
//!
//! Values are ordered by [`value_order`]: strings first, by byte-wise `str`
//! ordering, then every other JSON value by its compact JSON text. Byte-wise
//! ordering is code point order, which differs from UTF-16 code unit order
//! only when characters above U+FFFF are compared with characters in
//! U+E000..=U+FFFF.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::time::Instant;

use catalog::{EntityRecord, Field, FIELD_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::FeatureError;

/// Ordinal encoding of one record, in [`Field::ALL`] order.
pub type FeatureVector = [usize; FIELD_COUNT];

/// How the encoder codes a value that is absent from its vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownValue {
    /// Code unknown values as `0`.
    ///
    /// This collides with the first vocabulary entry and is kept as the
    /// default so existing match behavior does not change.
    #[default]
    FirstIndex,
    /// Code unknown values as the vocabulary length, one past the last
    /// valid index.
    Sentinel,
}

/// Total order used for vocabulary entries.
pub fn value_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::String(_), _) => Ordering::Less,
        (_, Value::String(_)) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Distinct values of one field while a vocabulary is being built.
#[derive(Default)]
struct Distinct<'a> {
    strings: BTreeSet<&'a str>,
    others: Vec<&'a Value>,
}

impl<'a> Distinct<'a> {
    fn insert(&mut self, value: &'a Value) {
        match value {
            Value::String(text) => {
                self.strings.insert(text);
            }
            other if !self.others.contains(&other) => self.others.push(other),
            _ => {}
        }
    }

    fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.others.is_empty()
    }

    fn into_sorted(mut self) -> Vec<Value> {
        self.others.sort_by_cached_key(|value| value.to_string());
        self.strings
            .into_iter()
            .map(|text| Value::String(text.to_string()))
            .chain(self.others.into_iter().cloned())
            .collect()
    }
}

/// Sorted distinct values per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    fields: [Vec<Value>; FIELD_COUNT],
}

impl Vocabulary {
    /// Derive vocabularies from a catalog snapshot. Any JSON value present
    /// in a required field is accepted, `null` included.
    ///
    /// # Errors
    ///
    /// - [`FeatureError::InvalidPopulation`] when a record lacks a required
    ///   field.
    /// - [`FeatureError::EmptyVocabulary`] when `records` is empty or a
    ///   field ends up with no values.
    pub fn build<'a, I>(records: I) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = &'a EntityRecord>,
    {
        let start = Instant::now();
        let mut distinct: [Distinct<'a>; FIELD_COUNT] = Default::default();
        let mut population = 0usize;

        for (position, record) in records.into_iter().enumerate() {
            for field in Field::ALL {
                let value = record.get(field).ok_or(FeatureError::InvalidPopulation {
                    record: position,
                    field,
                })?;
                distinct[field.index()].insert(value);
            }
            population += 1;
        }

        if population == 0 {
            return Err(FeatureError::EmptyVocabulary(
                "catalog has no records".to_string(),
            ));
        }
        if let Some(field) = Field::ALL.into_iter().find(|f| distinct[f.index()].is_empty()) {
            return Err(FeatureError::EmptyVocabulary(format!(
                "field `{field}` has no values"
            )));
        }

        let vocabulary = Self {
            fields: distinct.map(Distinct::into_sorted),
        };

        debug!(
            population,
            sizes = ?vocabulary.sizes(),
            elapsed_micros = start.elapsed().as_micros(),
            "vocabulary_built"
        );
        Ok(vocabulary)
    }

    /// Sorted distinct values of one field.
    pub fn values(&self, field: Field) -> &[Value] {
        &self.fields[field.index()]
    }

    /// Number of distinct values per field, in field order.
    pub fn sizes(&self) -> [usize; FIELD_COUNT] {
        Field::ALL.map(|field| self.fields[field.index()].len())
    }

    /// Ordinal code of `value` within `field`, if present.
    pub fn index_of(&self, field: Field, value: &Value) -> Option<usize> {
        let values = self.values(field);
        let strings = values.partition_point(Value::is_string);
        match value {
            Value::String(text) => values[..strings]
                .binary_search_by(|entry| entry.as_str().unwrap_or_default().cmp(text))
                .ok(),
            other => values[strings..]
                .iter()
                .position(|entry| entry == other)
                .map(|offset| strings + offset),
        }
    }
}

/// Encode a record with the default [`UnknownValue::FirstIndex`] policy.
pub fn encode(record: &EntityRecord, vocabulary: &Vocabulary) -> FeatureVector {
    encode_with(record, vocabulary, UnknownValue::FirstIndex)
}

/// Encode a record, coding absent or unseen values per `unknown`.
pub fn encode_with(
    record: &EntityRecord,
    vocabulary: &Vocabulary,
    unknown: UnknownValue,
) -> FeatureVector {
    Field::ALL.map(|field| {
        record
            .get(field)
            .and_then(|value| vocabulary.index_of(field, value))
            .unwrap_or_else(|| match unknown {
                UnknownValue::FirstIndex => 0,
                UnknownValue::Sentinel => vocabulary.values(field).len(),
            })
    })
}
