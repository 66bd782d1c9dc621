//! Point sampling of a vector map's features.
//!
//! The query module prints `key=value` lines per coordinate instead of
//! writing a file, so its stdout is captured and grouped per input
//! point.

use async_trait::async_trait;
use tracing::debug;

use ephemeral_engine::{EphemeralOperation, ExecuteOptions, JobContext};
use geostat_common::{GeostatError, GeostatResult, SamplePoint};
use process_chain::{Chain, Stage};
use stats_protocol::{PointSample, ProcessResults};

use crate::points::points_from_descriptor;

/// Stdout key opening the next per-point group.
const GROUP_SENTINEL_KEY: &str = "East";

/// Comma-joined `x,y` pairs in input order for the query module.
pub fn coordinate_list(points: &[SamplePoint]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.x, point.y))
        .collect::<Vec<_>>()
        .join(",")
}

/// Print the region and query the vector attributes at every
/// coordinate, capturing the query module's stdout.
pub fn vector_sampling_chain(vector: &str, points: &[SamplePoint]) -> Chain {
    Chain::new()
        .stage(
            Stage::new("g_region", "g.region")
                .input("vector", vector)
                .flags("p"),
        )
        .stage(
            Stage::new("v_what", "v.what")
                .input("map", vector)
                .input("coordinates", coordinate_list(points))
                .flags("ag")
                .capture_stdout("info", "list", "|"),
        )
}

/// Group the query module's `key=value` stdout lines per input point.
///
/// Every `East` key opens the next point's group; groups pair with the
/// input points in order. Blank lines separate maps within one group
/// and are skipped; anything that is not `key=value` is malformed.
pub fn parse_vector_sampling(
    raw: &str,
    points: &[SamplePoint],
) -> GeostatResult<Vec<PointSample>> {
    let mut groups: Vec<Vec<(String, String)>> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            GeostatError::MalformedOutput(format!("expected key=value, found '{line}'"))
        })?;
        if key == GROUP_SENTINEL_KEY {
            groups.push(Vec::new());
        }
        match groups.last_mut() {
            Some(group) => group.push((key.to_string(), value.to_string())),
            None => {
                return Err(GeostatError::MalformedOutput(format!(
                    "attribute line '{line}' before the first coordinate group"
                )))
            }
        }
    }

    let samples = groups
        .into_iter()
        .zip(points)
        .map(|(group, point)| {
            let mut sample = PointSample::new(point.id.as_str());
            for (key, value) in group {
                sample.insert(key, value);
            }
            sample
        })
        .collect();
    Ok(samples)
}

/// Vector feature attributes at caller-supplied points.
pub struct VectorSampling;

#[async_trait]
impl EphemeralOperation for VectorSampling {
    fn name(&self) -> &'static str {
        "vector_sampling"
    }

    async fn execute(&self, ctx: &JobContext) -> GeostatResult<ProcessResults> {
        let descriptor = ctx.descriptor();
        let (points, _) = points_from_descriptor(descriptor)?;

        let execution = ctx
            .run_chain(
                &vector_sampling_chain(&descriptor.qualified_map(), &points),
                ExecuteOptions::new().with_permission_check_skipped(),
            )
            .await?;

        let raw = execution.stdout_of("v_what").ok_or_else(|| {
            GeostatError::MalformedOutput("query stage produced no output".to_string())
        })?;
        let samples = parse_vector_sampling(raw, &points)?;
        debug!(points = points.len(), samples = samples.len(), "vector sampling parsed");
        Ok(ProcessResults::PointSamples(samples))
    }
}
