//! HTTP request handlers for the statistic endpoints.
//!
//! Every family is a sync/async pair of thin wrappers over one
//! parameterized function. Bodies and path timestamps are validated
//! here, so bad input becomes a 400 without ever reaching the engine.

pub mod area_stats;
pub mod area_stats_univar;
pub mod raster_sampling;
pub mod strds_sampling;
pub mod vector_sampling;

use serde_json::Value;

use geostat_common::{GeostatError, GeostatResult};
use stats_protocol::PointListBody;

/// Check a point-list body without consuming it.
///
/// The worker re-reads the points from the descriptor later; this only
/// decides whether the request is worth enqueueing.
pub(crate) fn validate_point_list(body: &Value) -> GeostatResult<()> {
    let list: PointListBody = serde_json::from_value(body.clone())
        .map_err(|err| GeostatError::MissingInput(format!("point list: {err}")))?;
    list.sample_points()?;
    Ok(())
}
