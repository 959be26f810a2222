//! # bizmatch features
//!
//! Everything between a raw catalog record and a numeric training row:
//!
//! - [`Criteria`]: validated caller criteria (shape check only).
//! - [`Vocabulary`]: per-field sorted distinct values, rebuilt per request.
//! - [`encode`] / [`encode_with`]: ordinal [`FeatureVector`] for a record.
//! - [`label`] / [`label_with_threshold`]: binary training label from the
//!   number of fields a record shares with the criteria.
//!
//! All functions here are pure; the only randomness in the pipeline lives
//! in the partitioner and the classifier.
//!
//! ## Example
//!
//! ```
//! use catalog::Catalog;
//! use features::{encode, label, Criteria, Vocabulary};
//! use serde_json::json;
//!
//! let catalog = Catalog::from_value(json!([
//!     {"namaPerusahaan": "A", "namaBadanHukum": "CV", "sektor": "Tech",
//!      "provinsi": "KALBAR", "sistemPenjualan": "Online", "jenisUsaha": "Retail"},
//!     {"namaPerusahaan": "B", "namaBadanHukum": "PT", "sektor": "Food",
//!      "provinsi": "JAKARTA", "sistemPenjualan": "Offline", "jenisUsaha": "Wholesale"}
//! ])).unwrap();
//! let criteria = Criteria::from_value(&json!({
//!     "namaBadanHukum": "CV", "sektor": "", "provinsi": "KALBAR",
//!     "sistemPenjualan": "", "jenisUsaha": ""
//! })).unwrap();
//!
//! let vocabulary = Vocabulary::build(&catalog).unwrap();
//! let a = &catalog.records()[0];
//! assert_eq!(encode(a, &vocabulary), [0, 1, 1, 1, 0]);
//! assert_eq!(label(a, &criteria), 1);
//! assert_eq!(label(&catalog.records()[1], &criteria), 0);
//! ```

mod criteria;
mod error;
mod label;
mod vocabulary;

pub use crate::criteria::{validate_criteria, Criteria};
pub use crate::error::FeatureError;
pub use crate::label::{label, label_with_threshold, match_count, DEFAULT_MIN_MATCHES};
pub use crate::vocabulary::{
    encode, encode_with, value_order, FeatureVector, UnknownValue, Vocabulary,
};
