//! Vector point sampling endpoints.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::response::Response;
use axum::Json;
use serde_json::Value;

use ephemeral_engine::RouteParams;
use geostat_ops::VectorSampling;

use crate::handlers::validate_point_list;
use crate::state::AppState;
use crate::submit::{error_response, submit, ExecutionMode};

/// POST .../vector_layers/:vector/sampling_sync
pub async fn sampling_sync(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, vector)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    sample(state, project, mapset, vector, body, ExecutionMode::Synchronous).await
}

/// POST .../vector_layers/:vector/sampling_async
pub async fn sampling_async(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, vector)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    sample(state, project, mapset, vector, body, ExecutionMode::Asynchronous).await
}

async fn sample(
    state: Arc<AppState>,
    project: String,
    mapset: String,
    vector: String,
    body: Value,
    mode: ExecutionMode,
) -> Response {
    if let Err(err) = validate_point_list(&body) {
        return error_response(&err);
    }
    submit(
        &state,
        RouteParams::new(project, mapset, vector),
        Some(body),
        None,
        Box::new(VectorSampling),
        mode,
    )
    .await
}
