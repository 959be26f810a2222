//! # bizmatch catalog
//!
//! The catalog is the list of business entities that every match request is
//! evaluated against. It is loaded once at process start and then shared
//! read-only, usually behind an `Arc`; nothing in the pipeline ever reorders
//! or mutates it.
//!
//! Loading only enforces the structural shape (a JSON array of objects).
//! Field-level population checks belong to the vocabulary stage, which runs
//! on every request.
//!
//! ## Example
//!
//! ```
//! use catalog::{Catalog, Field};
//!
//! let catalog = Catalog::from_json_str(r#"[
//!     {"namaPerusahaan": "A", "namaBadanHukum": "CV", "sektor": "Tech",
//!      "provinsi": "KALBAR", "sistemPenjualan": "Online", "jenisUsaha": "Retail"}
//! ]"#).unwrap();
//!
//! assert_eq!(catalog.len(), 1);
//! assert_eq!(catalog.records()[0].field_str(Field::Province), Some("KALBAR"));
//! ```

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

mod error;
mod types;

pub use crate::error::CatalogError;
pub use crate::types::{EntityRecord, Field, FIELD_COUNT, NAME_KEY};

/// Ordered, immutable collection of entity records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<EntityRecord>,
}

impl Catalog {
    pub fn new(records: Vec<EntityRecord>) -> Self {
        Self { records }
    }

    /// Shape a parsed JSON document into a catalog.
    ///
    /// The document must be an array whose entries are all objects.
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let entries = match value {
            Value::Array(entries) => entries,
            other => {
                return Err(CatalogError::InvalidPopulation(format!(
                    "expected a list of records, found {}",
                    json_kind(&other)
                )));
            }
        };

        let records = entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| match entry {
                Value::Object(attributes) => Ok(EntityRecord::new(attributes)),
                other => Err(CatalogError::InvalidPopulation(format!(
                    "record {position} is {}, expected an object",
                    json_kind(&other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Self::from_value(value)
    }

    /// Read and shape a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let start = Instant::now();

        let raw = std::fs::read_to_string(path).map_err(|err| CatalogError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        match Self::from_json_str(&raw) {
            Ok(catalog) => {
                info!(
                    path = %path.display(),
                    records = catalog.len(),
                    elapsed_micros = start.elapsed().as_micros(),
                    "catalog_loaded"
                );
                Ok(catalog)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "catalog_load_failure");
                Err(err)
            }
        }
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntityRecord> {
        self.records.iter()
    }
}

impl FromIterator<EntityRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = EntityRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a EntityRecord;
    type IntoIter = std::slice::Iter<'a, EntityRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
