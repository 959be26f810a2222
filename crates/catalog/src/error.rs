//! Error types produced while loading a catalog.
//!
//! | Error | Description |
//! |-------|-------------|
//! | [`Io`](CatalogError::Io) | The catalog resource could not be read |
//! | [`Parse`](CatalogError::Parse) | The resource is not valid JSON |
//! | [`InvalidPopulation`](CatalogError::InvalidPopulation) | The JSON is not a list of objects |
use thiserror::Error;

/// Errors that can occur while loading or shaping a catalog.
///
/// Messages are carried as strings so the error stays `Clone + PartialEq`
/// for tests and for propagation across the pipeline boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    /// Reading the catalog resource failed.
    #[error("failed to read catalog from {path}: {message}")]
    Io { path: String, message: String },

    /// The catalog resource is not valid JSON.
    #[error("catalog is not valid json: {0}")]
    Parse(String),

    /// The catalog is not a sequence, or an entry is not an object.
    #[error("invalid population: {0}")]
    InvalidPopulation(String),
}
