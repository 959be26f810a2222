use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bizmatch::{match_catalog, EntityRecord, PipelineError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Match request body for `POST /`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MatchRequest {
    /// Target values keyed by the five field names. Shape is checked by
    /// the pipeline, not here.
    #[serde(default)]
    pub criteria: Option<Value>,
}

/// Match response
#[derive(Debug, Deserialize, Serialize)]
pub struct MatchResponse {
    /// The criteria the request was evaluated with, echoed verbatim.
    pub criteria: Value,
    /// Catalog records predicted to match, in catalog order.
    pub matching: Vec<EntityRecord>,
}

/// Criteria used by `GET /`.
pub fn default_criteria() -> Value {
    json!({
        "namaBadanHukum": "CV",
        "sektor": "",
        "provinsi": "KALIMANTAN BARAT",
        "sistemPenjualan": "",
        "jenisUsaha": "",
    })
}

/// Match the catalog against the built-in default criteria.
pub async fn match_default(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<MatchResponse>> {
    run_match(state, default_criteria()).await.map(Json)
}

/// Match the catalog against caller-supplied criteria.
///
/// A body without a `criteria` field fails as invalid criteria; a body
/// that is not JSON fails as a bad request.
pub async fn match_criteria(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> ServerResult<Json<MatchResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(state.config.max_body_size_kb)
        } else {
            ServerError::from(rejection)
        }
    })?;

    let criteria = request.criteria.ok_or_else(|| {
        PipelineError::InvalidCriteria("request body has no `criteria` field".to_string())
    })?;

    run_match(state, criteria).await.map(Json)
}

/// Run one match request off the async runtime.
///
/// Training is CPU-bound, so it runs on the blocking pool. The request
/// gives up after the configured timeout; the blocking task itself runs to
/// completion and its result is dropped.
async fn run_match(state: Arc<ServerState>, criteria: Value) -> ServerResult<MatchResponse> {
    let catalog = Arc::clone(&state.catalog);
    let config = state.config.pipeline.clone();

    let task = tokio::task::spawn_blocking(move || {
        let matching = match_catalog(&catalog, &criteria, &config)?.into_owned_records();
        Ok::<_, PipelineError>(MatchResponse { criteria, matching })
    });

    let joined = tokio::time::timeout(state.config.timeout(), task)
        .await
        .map_err(|_| ServerError::Timeout)?;
    Ok(joined??)
}
