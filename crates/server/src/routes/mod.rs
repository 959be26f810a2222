//! API route handlers
//!
//! - `matching`: `GET /` and `POST /`, the catalog match endpoints

pub mod matching;

use crate::error::ServerError;

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
