use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use registrar_core::time::now_utc;
use registrar_store::read_records;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::task;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::state::AppState;

pub const SAVED_MESSAGE: &str = "record saved";
pub const EMPTY_MESSAGE: &str = "no records found";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    store: Option<String>,
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let fields = parse_object(&body)?;
    let submission = state.schema.validate(&fields).map_err(|err| {
        debug!(field = %err.field, violation = ?err.violation, "submission rejected");
        ApiError::Validation(err)
    })?;

    let writer = state.writer.clone();
    let record = task::spawn_blocking(move || writer.submit(now_utc(), submission))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;

    if !state.writer.secondaries().is_empty() {
        let writer = state.writer.clone();
        // Not awaited: mirror outcomes never reach the caller.
        task::spawn_blocking(move || {
            let report = writer.mirror(&record);
            debug!(
                attempted = report.attempted,
                failed = report.failures.len(),
                "secondary writes finished"
            );
        });
    }

    Ok((StatusCode::OK, Json(json!({ "message": SAVED_MESSAGE }))).into_response())
}

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let target = match params.store {
        Some(name) => state
            .writer
            .target(&name)
            .cloned()
            .ok_or(ApiError::UnknownStore(name))?,
        None => state.writer.primary().clone(),
    };

    let store = target.name.clone();
    let records = task::spawn_blocking(move || read_records(&target))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .map_err(|err| {
            error!(store = %store, error = %err, "record listing failed");
            ApiError::from(err)
        })?;

    if records.is_empty() {
        return Ok((StatusCode::NOT_FOUND, Json(json!({ "message": EMPTY_MESSAGE }))).into_response());
    }

    Ok((StatusCode::OK, Json(json!({ "records": records }))).into_response())
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        _ => Err(ApiError::MalformedPayload),
    }
}
