//! Core data model for catalog entries.
//!
//! A catalog entry is an open JSON object: the pipeline only reads the five
//! categorical [`Field`]s, but every other attribute is carried through
//! untouched so matches can be returned to callers exactly as loaded.
//!
//! ```text
//! EntityRecord (JSON object)
//! ├── namaPerusahaan   display name (optional for the pipeline)
//! ├── namaBadanHukum   Field::LegalEntity
//! ├── sektor           Field::Sector
//! ├── provinsi         Field::Province
//! ├── sistemPenjualan  Field::SalesSystem
//! ├── jenisUsaha       Field::BusinessType
//! └── ...              arbitrary extra attributes
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of categorical fields read by the pipeline.
pub const FIELD_COUNT: usize = 5;

/// JSON key of the display name attribute.
pub const NAME_KEY: &str = "namaPerusahaan";

/// The categorical attributes every record must carry.
///
/// The declaration order is the canonical feature order: `Field::index`
/// gives the position of the field inside an encoded feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    /// Legal entity type (`CV`, `PT`, ...).
    #[serde(rename = "namaBadanHukum")]
    LegalEntity,
    /// Business sector.
    #[serde(rename = "sektor")]
    Sector,
    /// Province of registration.
    #[serde(rename = "provinsi")]
    Province,
    /// Sales channel (online, offline, ...).
    #[serde(rename = "sistemPenjualan")]
    SalesSystem,
    /// Kind of business.
    #[serde(rename = "jenisUsaha")]
    BusinessType,
}

impl Field {
    /// All fields in feature order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::LegalEntity,
        Field::Sector,
        Field::Province,
        Field::SalesSystem,
        Field::BusinessType,
    ];

    /// JSON key used by catalog records and criteria objects.
    pub const fn key(self) -> &'static str {
        match self {
            Field::LegalEntity => "namaBadanHukum",
            Field::Sector => "sektor",
            Field::Province => "provinsi",
            Field::SalesSystem => "sistemPenjualan",
            Field::BusinessType => "jenisUsaha",
        }
    }

    /// Position of this field in a feature vector.
    pub const fn index(self) -> usize {
        match self {
            Field::LegalEntity => 0,
            Field::Sector => 1,
            Field::Province => 2,
            Field::SalesSystem => 3,
            Field::BusinessType => 4,
        }
    }

    /// Resolve a JSON key back to its field.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single business entity as loaded from the catalog.
///
/// Serializes transparently as the underlying JSON object, with key order
/// preserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRecord(Map<String, Value>);

impl EntityRecord {
    /// Wrap an existing JSON object.
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }

    /// Raw value of a categorical field, if present.
    pub fn get(&self, field: Field) -> Option<&Value> {
        self.0.get(field.key())
    }

    /// String value of a categorical field. `None` when the field is
    /// missing or not a string.
    pub fn field_str(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Display name (`namaPerusahaan`), if the record carries one.
    pub fn name(&self) -> Option<&str> {
        self.0.get(NAME_KEY).and_then(Value::as_str)
    }

    /// Any attribute by key, including ones the pipeline ignores.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for EntityRecord {
    fn from(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_order_matches_index() {
        for (position, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), position);
            assert_eq!(Field::from_key(field.key()), Some(*field));
        }
        assert_eq!(Field::from_key("namaPerusahaan"), None);
    }

    #[test]
    fn field_serializes_as_json_key() {
        let encoded = serde_json::to_string(&Field::SalesSystem).unwrap();
        assert_eq!(encoded, "\"sistemPenjualan\"");
        let decoded: Field = serde_json::from_str("\"provinsi\"").unwrap();
        assert_eq!(decoded, Field::Province);
    }

    #[test]
    fn record_accessors_read_fields() {
        let value = json!({
            "namaPerusahaan": "Kopi Senja",
            "namaBadanHukum": "CV",
            "sektor": 12,
            "website": "https://example.id"
        });
        let record: EntityRecord = serde_json::from_value(value).unwrap();

        assert_eq!(record.name(), Some("Kopi Senja"));
        assert_eq!(record.field_str(Field::LegalEntity), Some("CV"));
        assert_eq!(record.field_str(Field::Sector), None);
        assert_eq!(record.get(Field::Sector), Some(&json!(12)));
        assert!(record.get(Field::Province).is_none());
        assert_eq!(record.attribute("website"), Some(&json!("https://example.id")));
    }

    #[test]
    fn record_round_trips_unmodified() {
        let raw = r#"{"zeta":1,"namaPerusahaan":"A","alpha":[1,2]}"#;
        let record: EntityRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(serde_json::to_string(&record).unwrap(), raw);
    }
}
