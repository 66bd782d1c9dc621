//! Areal categorical statistics endpoints.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::response::Response;
use axum::Json;
use serde_json::Value;

use ephemeral_engine::RouteParams;
use geostat_common::parse_strds_timestamp;
use geostat_ops::{RasterAreaStats, StrdsAreaStats};
use stats_protocol::validate_geojson;

use crate::state::AppState;
use crate::submit::{error_response, submit, ExecutionMode};

/// POST /projects/:project/mapsets/:mapset/raster_layers/:raster/area_stats_sync
pub async fn raster_sync(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, raster)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    raster_area_stats(state, project, mapset, raster, body, ExecutionMode::Synchronous).await
}

/// POST /projects/:project/mapsets/:mapset/raster_layers/:raster/area_stats_async
pub async fn raster_async(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, raster)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    raster_area_stats(state, project, mapset, raster, body, ExecutionMode::Asynchronous).await
}

async fn raster_area_stats(
    state: Arc<AppState>,
    project: String,
    mapset: String,
    raster: String,
    body: Value,
    mode: ExecutionMode,
) -> Response {
    if let Err(err) = validate_geojson(&body) {
        return error_response(&err);
    }
    submit(
        &state,
        RouteParams::new(project, mapset, raster),
        Some(body),
        None,
        Box::new(RasterAreaStats),
        mode,
    )
    .await
}

/// POST .../strds/:strds/timestamp/:timestamp/area_stats_sync
pub async fn strds_sync(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, strds, timestamp)): Path<(String, String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    strds_area_stats(
        state,
        project,
        mapset,
        strds,
        timestamp,
        body,
        ExecutionMode::Synchronous,
    )
    .await
}

/// POST .../strds/:strds/timestamp/:timestamp/area_stats_async
pub async fn strds_async(
    Extension(state): Extension<Arc<AppState>>,
    Path((project, mapset, strds, timestamp)): Path<(String, String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    strds_area_stats(
        state,
        project,
        mapset,
        strds,
        timestamp,
        body,
        ExecutionMode::Asynchronous,
    )
    .await
}

async fn strds_area_stats(
    state: Arc<AppState>,
    project: String,
    mapset: String,
    strds: String,
    timestamp: String,
    body: Value,
    mode: ExecutionMode,
) -> Response {
    if let Err(err) = parse_strds_timestamp(&timestamp) {
        return error_response(&err);
    }
    if let Err(err) = validate_geojson(&body) {
        return error_response(&err);
    }
    submit(
        &state,
        RouteParams::new(project, mapset, strds),
        Some(body),
        Some(timestamp),
        Box::new(StrdsAreaStats),
        mode,
    )
    .await
}
