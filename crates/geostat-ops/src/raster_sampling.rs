//! Point sampling of a single raster layer.
//!
//! The caller's points are imported as a vector map, the region is
//! aligned to the raster and the query module writes one pipe-delimited
//! row per point, including the cell label and color.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use ephemeral_engine::{EphemeralOperation, ExecuteOptions, JobContext};
use geostat_common::{GeostatResult, SamplePoint};
use process_chain::{Chain, Stage};
use stats_protocol::{PointSample, ProcessResults};

use crate::points::{point_import_stage, points_from_descriptor, write_point_file, POINTS_VECTOR};

/// Import the points, align the region and query the raster at every
/// point.
pub fn raster_sampling_chain(point_file: &Path, raster: &str, result_path: &Path) -> Chain {
    Chain::new()
        .stage(point_import_stage(point_file))
        .stage(
            Stage::new("g_region_2", "g.region")
                .input("vector", POINTS_VECTOR)
                .input("align", raster)
                .flags("p")
                .superquiet(),
        )
        .stage(
            Stage::new("r_what_3", "r.what")
                .input("map", raster)
                .input("points", POINTS_VECTOR)
                .output("output", result_path.to_string_lossy())
                .flags("nrf")
                .overwrite()
                .superquiet(),
        )
}

/// Group the query module's pipe-delimited rows per input point.
///
/// Header columns named after the qualified raster are renamed: the bare
/// map column becomes `value`, prefixed columns lose the prefix. The
/// always-empty `site_name` column is dropped and the unqualified map
/// name is added to every entry. Rows pair with the input points in
/// order; surplus rows or points are ignored.
pub fn parse_raster_sampling(
    raw: &str,
    points: &[SamplePoint],
    raster_name: &str,
    mapset: &str,
) -> Vec<PointSample> {
    let qualified = format!("{raster_name}@{mapset}");
    let prefix = format!("{qualified}_");

    let mut lines = raw.lines();
    let header: Vec<String> = match lines.next() {
        Some(line) => line
            .trim()
            .split('|')
            .map(|col| {
                if col.contains(&qualified) {
                    col.replace(&prefix, "").replace(&qualified, "value")
                } else {
                    col.to_string()
                }
            })
            .collect(),
        None => return Vec::new(),
    };

    let mut samples = Vec::new();
    for (line, point) in lines.zip(points) {
        let mut sample = PointSample::new(point.id.as_str());
        for (key, value) in header.iter().zip(line.trim().split('|')) {
            if key == "site_name" {
                continue;
            }
            sample.insert(key.clone(), value);
        }
        sample.insert("map_name", raster_name);
        samples.push(sample);
    }
    samples
}

/// Raster values at caller-supplied points.
pub struct RasterSampling;

#[async_trait]
impl EphemeralOperation for RasterSampling {
    fn name(&self) -> &'static str {
        "raster_sampling"
    }

    async fn execute(&self, ctx: &JobContext) -> GeostatResult<ProcessResults> {
        let descriptor = ctx.descriptor();
        let (points, _) = points_from_descriptor(descriptor)?;
        let point_file = write_point_file(ctx.workspace(), &points).await?;
        let result_path = ctx.workspace().temp_file("sample");

        ctx.run_chain(
            &raster_sampling_chain(&point_file, &descriptor.qualified_map(), &result_path),
            ExecuteOptions::new().with_permission_check_skipped(),
        )
        .await?;

        let raw = tokio::fs::read_to_string(&result_path).await?;
        let samples =
            parse_raster_sampling(&raw, &points, &descriptor.map_name, &descriptor.mapset);
        debug!(points = points.len(), samples = samples.len(), "raster sampling parsed");
        Ok(ProcessResults::PointSamples(samples))
    }
}
