//! Caller-supplied match criteria.
//!
//! Criteria carry one target value per [`Field`]. Only the presence of the
//! five keys is validated: values are compared to record attributes by exact
//! JSON equality, so an empty string only matches an empty attribute and a
//! non-string value never matches a (string) record attribute.

use catalog::{Field, FIELD_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::FeatureError;

/// Validated criteria: exactly one value per required field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Criteria {
    values: [Value; FIELD_COUNT],
}

impl Criteria {
    /// Validate a JSON criteria object.
    ///
    /// Fails with [`FeatureError::InvalidCriteria`] when `value` is not an
    /// object or when any required key is absent. Extra keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self, FeatureError> {
        let Some(object) = value.as_object() else {
            return Err(FeatureError::InvalidCriteria(
                "criteria must be a json object".to_string(),
            ));
        };

        let missing: Vec<&str> = Field::ALL
            .iter()
            .filter(|field| !object.contains_key(field.key()))
            .map(|field| field.key())
            .collect();
        if !missing.is_empty() {
            return Err(FeatureError::InvalidCriteria(format!(
                "missing required keys: {}",
                missing.join(", ")
            )));
        }

        let values = Field::ALL.map(|field| object.get(field.key()).cloned().unwrap_or_default());
        Ok(Self { values })
    }

    /// Build criteria from plain strings, in field order.
    pub fn from_strs(values: [&str; FIELD_COUNT]) -> Self {
        Self {
            values: values.map(|value| Value::String(value.to_string())),
        }
    }

    pub fn get(&self, field: Field) -> &Value {
        &self.values[field.index()]
    }

    /// `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &Value)> {
        Field::ALL.into_iter().zip(self.values.iter())
    }
}

/// Check the shape of a criteria object without keeping the parsed form.
pub fn validate_criteria(value: &Value) -> Result<(), FeatureError> {
    Criteria::from_value(value).map(|_| ())
}

impl TryFrom<Value> for Criteria {
    type Error = FeatureError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Criteria::from_value(&value)
    }
}

impl From<Criteria> for Value {
    fn from(criteria: Criteria) -> Self {
        let object: Map<String, Value> = Field::ALL
            .into_iter()
            .zip(criteria.values)
            .map(|(field, value)| (field.key().to_string(), value))
            .collect();
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full() -> Value {
        json!({
            "namaBadanHukum": "CV",
            "sektor": "",
            "provinsi": "KALIMANTAN BARAT",
            "sistemPenjualan": "",
            "jenisUsaha": ""
        })
    }

    #[test]
    fn accepts_all_required_keys() {
        let criteria = Criteria::from_value(&full()).unwrap();
        assert_eq!(criteria.get(Field::LegalEntity), &json!("CV"));
        assert_eq!(criteria.get(Field::Sector), &json!(""));
        assert_eq!(criteria.get(Field::Province), &json!("KALIMANTAN BARAT"));
    }

    #[test]
    fn each_missing_key_is_rejected() {
        for field in Field::ALL {
            let mut value = full();
            value.as_object_mut().unwrap().remove(field.key());
            let err = Criteria::from_value(&value).unwrap_err();
            assert!(
                matches!(err, FeatureError::InvalidCriteria(ref msg) if msg.contains(field.key())),
                "missing {field} should be reported, got {err}"
            );
        }
    }

    #[test]
    fn values_are_not_checked() {
        let mut value = full();
        value["sektor"] = json!(42);
        value["extra"] = json!("ignored");
        let criteria = Criteria::from_value(&value).unwrap();
        assert_eq!(criteria.get(Field::Sector), &json!(42));
        assert!(validate_criteria(&value).is_ok());
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            Criteria::from_value(&json!(["CV"])),
            Err(FeatureError::InvalidCriteria(_))
        ));
        assert!(validate_criteria(&Value::Null).is_err());
    }

    #[test]
    fn serde_round_trip_uses_object_shape() {
        let criteria: Criteria = serde_json::from_value(full()).unwrap();
        assert_eq!(serde_json::to_value(&criteria).unwrap(), full());

        let missing = json!({"namaBadanHukum": "CV"});
        assert!(serde_json::from_value::<Criteria>(missing).is_err());
    }

    #[test]
    fn from_strs_follows_field_order() {
        let criteria = Criteria::from_strs(["PT", "Food", "JAKARTA", "Offline", "Wholesale"]);
        let collected: Vec<(Field, &Value)> = criteria.iter().collect();
        assert_eq!(collected[3], (Field::SalesSystem, &json!("Offline")));
        assert_eq!(collected.len(), FIELD_COUNT);
    }
}
