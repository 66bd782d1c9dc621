//! Point sampling of space-time raster datasets.
//!
//! Every raster of the dataset is sampled at the caller's points; the
//! sampler writes one pipe-delimited row per time interval, headed by a
//! row naming the interval bounds and point ids. Rows are returned
//! verbatim.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use ephemeral_engine::{EphemeralOperation, ExecuteOptions, JobContext};
use geostat_common::GeostatResult;
use process_chain::{Chain, Stage};
use stats_protocol::{validate_geojson, ProcessResults};

use crate::points::{point_import_stage, points_from_descriptor, write_point_file, POINTS_VECTOR};

/// Import the points and sample the dataset at them, optionally
/// narrowed by a temporal `where` filter.
pub fn strds_sampling_chain(
    point_file: &Path,
    strds: &str,
    result_path: &Path,
    where_filter: Option<&str>,
) -> Chain {
    let mut sample = Stage::new("t_rast_sample_2", "t.rast.sample")
        .input("strds", strds)
        .input("points", POINTS_VECTOR)
        .input("column", "id")
        .output("output", result_path.to_string_lossy())
        .flags("rn")
        .superquiet();
    if let Some(filter) = where_filter {
        sample = sample.input("where", filter);
    }

    Chain::new().stage(point_import_stage(point_file)).stage(sample)
}

/// GeoJSON variant: the points arrive as a feature collection imported
/// directly, so the sampler keys rows by feature order instead of an id
/// column.
pub fn strds_geojson_sampling_chain(
    geojson_path: &Path,
    strds: &str,
    result_path: &Path,
) -> Chain {
    Chain::new()
        .stage(
            Stage::new("v_import_1", "v.import")
                .input("input", geojson_path.to_string_lossy())
                .output("output", POINTS_VECTOR)
                .superquiet(),
        )
        .stage(
            Stage::new("t_rast_sample_2", "t.rast.sample")
                .input("strds", strds)
                .input("points", POINTS_VECTOR)
                .output("output", result_path.to_string_lossy())
                .flags("rn")
                .superquiet(),
        )
}

/// Split every output line on the delimiter, keeping all fields
/// verbatim. The header row stays in place; no coercion is applied.
pub fn parse_sampling_rows(raw: &str) -> Vec<Vec<String>> {
    raw.lines()
        .map(|line| line.trim().split('|').map(str::to_string).collect())
        .collect()
}

/// Time series of raster values at caller-supplied points.
pub struct StrdsSampling;

#[async_trait]
impl EphemeralOperation for StrdsSampling {
    fn name(&self) -> &'static str {
        "strds_sampling"
    }

    async fn execute(&self, ctx: &JobContext) -> GeostatResult<ProcessResults> {
        let descriptor = ctx.descriptor();
        let (points, where_filter) = points_from_descriptor(descriptor)?;
        let point_file = write_point_file(ctx.workspace(), &points).await?;
        let result_path = ctx.workspace().temp_file("sample");

        ctx.run_chain(
            &strds_sampling_chain(
                &point_file,
                &descriptor.qualified_map(),
                &result_path,
                where_filter.as_deref(),
            ),
            ExecuteOptions::new().with_permission_check_skipped(),
        )
        .await?;

        let raw = tokio::fs::read_to_string(&result_path).await?;
        let rows = parse_sampling_rows(&raw);
        debug!(points = points.len(), rows = rows.len(), "dataset sampling parsed");
        Ok(ProcessResults::SamplingRows(rows))
    }
}

/// Same sampling with the points provided as GeoJSON.
pub struct StrdsGeojsonSampling;

#[async_trait]
impl EphemeralOperation for StrdsGeojsonSampling {
    fn name(&self) -> &'static str {
        "strds_geojson_sampling"
    }

    async fn execute(&self, ctx: &JobContext) -> GeostatResult<ProcessResults> {
        let descriptor = ctx.descriptor();
        let body = descriptor.body("GeoJSON points")?;
        validate_geojson(body)?;

        let geojson_path = ctx.workspace().temp_file("points");
        tokio::fs::write(&geojson_path, serde_json::to_vec(body)?).await?;
        let result_path = ctx.workspace().temp_file("sample");

        ctx.run_chain(
            &strds_geojson_sampling_chain(
                &geojson_path,
                &descriptor.qualified_map(),
                &result_path,
            ),
            ExecuteOptions::new().with_permission_check_skipped(),
        )
        .await?;

        let raw = tokio::fs::read_to_string(&result_path).await?;
        Ok(ProcessResults::SamplingRows(parse_sampling_rows(&raw)))
    }
}
