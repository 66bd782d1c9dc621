//! Space-time raster dataset sampling endpoints.
//!
//! Two request shapes serve the same chain family: a point-list body with an
//! optional `where` filter, and a GeoJSON body for callers that already hold
//! their points as features.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::response::Response;
use axum::Json;
use serde_json::Value;

use ephemeral_engine::RouteParams;
use geostat_ops::{StrdsGeojsonSampling, StrdsSampling};
use stats_protocol::validate_geojson;

use crate::handlers::validate_point_list;
use crate::state::AppState;
use crate::submit::{error_response, submit, ExecutionMode};

/// POST .../strds/:strds/sampling_sync
pub async fn sampling_sync(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, strds)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    sample(state, project, mapset, strds, body, ExecutionMode::Synchronous).await
}

/// POST .../strds/:strds/sampling_async
pub async fn sampling_async(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, strds)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    sample(state, project, mapset, strds, body, ExecutionMode::Asynchronous).await
}

async fn sample(
    state: Arc<AppState>,
    project: String,
    mapset: String,
    strds: String,
    body: Value,
    mode: ExecutionMode,
) -> Response {
    if let Err(err) = validate_point_list(&body) {
        return error_response(&err);
    }
    submit(
        &state,
        RouteParams::new(project, mapset, strds),
        Some(body),
        None,
        Box::new(StrdsSampling),
        mode,
    )
    .await
}

/// POST .../strds/:strds/sampling_sync_geojson
pub async fn sampling_sync_geojson(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, strds)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    sample_geojson(state, project, mapset, strds, body, ExecutionMode::Synchronous).await
}

/// POST .../strds/:strds/sampling_async_geojson
pub async fn sampling_async_geojson(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, strds)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    sample_geojson(state, project, mapset, strds, body, ExecutionMode::Asynchronous).await
}

async fn sample_geojson(
    state: Arc<AppState>,
    project: String,
    mapset: String,
    strds: String,
    body: Value,
    mode: ExecutionMode,
) -> Response {
    if let Err(err) = validate_geojson(&body) {
        return error_response(&err);
    }
    submit(
        &state,
        RouteParams::new(project, mapset, strds),
        Some(body),
        None,
        Box::new(StrdsGeojsonSampling),
        mode,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use test_utils::{bodies, names, StubEngine, StubRunner};

    fn state() -> (Arc<StubEngine>, Arc<AppState>) {
        let engine = Arc::new(StubEngine::new(StubRunner::new()));
        let state = Arc::new(AppState::new(engine.clone(), crate::ApiConfig::default()));
        (engine, state)
    }

    #[tokio::test]
    async fn test_point_list_rejected_by_geojson_variant() {
        let (engine, state) = state();

        let response = sample_geojson(
            state,
            names::PROJECT.to_string(),
            names::STRDS_MAPSET.to_string(),
            names::STRDS.to_string(),
            bodies::point_list(),
            ExecutionMode::Synchronous,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(engine.runner().executed_chains().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_point_rejected_by_list_variant() {
        let (engine, state) = state();

        let response = sample(
            state,
            names::PROJECT.to_string(),
            names::STRDS_MAPSET.to_string(),
            names::STRDS.to_string(),
            serde_json::json!({"points": [["p1", "1.0", "2.0", "3.0"]]}),
            ExecutionMode::Asynchronous,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(engine.runner().executed_chains().is_empty());
    }
}
