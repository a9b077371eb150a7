// handlers/api/markups.rs - GET/POST /api/markups handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;
use tracing::info;

use crate::database::{Document, ID_FIELD};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/markups - All markups, newest first
pub async fn markups_get(State(state): State<AppState>) -> ApiResult<Vec<Document>> {
    let markups = state.markups.list().await?;
    Ok(ApiResponse::success(markups))
}

/// POST /api/markups - Store a markup rule as given
///
/// Any JSON object is accepted; a caller-supplied `_id` is discarded and
/// `createdAt`/`updatedAt` are set by the server.
pub async fn markups_post(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Document> {
    let fields = match body? {
        Json(Value::Null) => return Err(ApiError::bad_request("Missing request body")),
        Json(Value::Object(fields)) => fields,
        Json(_) => return Err(ApiError::bad_request("Markup must be a JSON object")),
    };

    let stored = state.markups.create(fields).await?;
    let id = stored.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default();
    info!("Created markup {}", id);

    Ok(ApiResponse::success(stored))
}
