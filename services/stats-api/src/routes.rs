//! Route table for the statistics endpoints.
//!
//! Every route exists twice: once under `/projects` and once under the
//! legacy `/locations` prefix. Both prefixes dispatch to the same
//! handlers.

use std::sync::Arc;

use axum::extract::Extension;
use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the plugin router, ready to be merged into a host application.
pub fn create_endpoints(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/projects", mapset_routes())
        .nest("/locations", mapset_routes())
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Routes below a single `/{project}/mapsets/{mapset}` subtree.
fn mapset_routes() -> Router {
    Router::new()
        // Areal categorical statistics
        .route(
            "/:project/mapsets/:mapset/raster_layers/:raster/area_stats_sync",
            post(handlers::area_stats::raster_sync),
        )
        .route(
            "/:project/mapsets/:mapset/raster_layers/:raster/area_stats_async",
            post(handlers::area_stats::raster_async),
        )
        .route(
            "/:project/mapsets/:mapset/strds/:strds/timestamp/:timestamp/area_stats_sync",
            post(handlers::area_stats::strds_sync),
        )
        .route(
            "/:project/mapsets/:mapset/strds/:strds/timestamp/:timestamp/area_stats_async",
            post(handlers::area_stats::strds_async),
        )
        // Areal univariate statistics
        .route(
            "/:project/mapsets/:mapset/raster_layers/:raster/area_stats_univar_sync",
            post(handlers::area_stats_univar::raster_sync),
        )
        .route(
            "/:project/mapsets/:mapset/raster_layers/:raster/area_stats_univar_async",
            post(handlers::area_stats_univar::raster_async),
        )
        .route(
            "/:project/mapsets/:mapset/strds/:strds/timestamp/:timestamp/area_stats_univar_sync",
            post(handlers::area_stats_univar::strds_sync),
        )
        .route(
            "/:project/mapsets/:mapset/strds/:strds/timestamp/:timestamp/area_stats_univar_async",
            post(handlers::area_stats_univar::strds_async),
        )
        // Point sampling
        .route(
            "/:project/mapsets/:mapset/raster_layers/:raster/sampling_sync",
            post(handlers::raster_sampling::sampling_sync),
        )
        .route(
            "/:project/mapsets/:mapset/raster_layers/:raster/sampling_async",
            post(handlers::raster_sampling::sampling_async),
        )
        .route(
            "/:project/mapsets/:mapset/vector_layers/:vector/sampling_sync",
            post(handlers::vector_sampling::sampling_sync),
        )
        .route(
            "/:project/mapsets/:mapset/vector_layers/:vector/sampling_async",
            post(handlers::vector_sampling::sampling_async),
        )
        .route(
            "/:project/mapsets/:mapset/strds/:strds/sampling_sync",
            post(handlers::strds_sampling::sampling_sync),
        )
        .route(
            "/:project/mapsets/:mapset/strds/:strds/sampling_async",
            post(handlers::strds_sampling::sampling_async),
        )
        .route(
            "/:project/mapsets/:mapset/strds/:strds/sampling_sync_geojson",
            post(handlers::strds_sampling::sampling_sync_geojson),
        )
        .route(
            "/:project/mapsets/:mapset/strds/:strds/sampling_async_geojson",
            post(handlers::strds_sampling::sampling_async_geojson),
        )
}
