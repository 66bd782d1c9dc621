//! Areal categorical statistics for rasters and space-time raster
//! datasets.
//!
//! The computation region is aligned to the target raster and masked by
//! the imported polygon, then the per-category module writes
//! pipe-delimited area/count/percent rows to a result file.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use ephemeral_engine::{EphemeralOperation, ExecuteOptions, JobContext};
use geostat_common::{GeostatError, GeostatResult};
use process_chain::{Chain, Stage};
use stats_protocol::{CategoricalStatistics, ProcessResults};

use crate::polygon::{polygon_import_chain, write_polygon_file, POLYGON_VECTOR};
use crate::temporal::{resolve_sampled_raster, strds_sample_chain};

/// Mask the region with the polygon and break the raster down per
/// category. Stage numbering continues after the import chain.
pub fn categorical_stats_chain(raster: &str, result_path: &Path) -> Chain {
    Chain::new()
        .stage(
            Stage::new("g_region_2", "g.region")
                .input("vector", POLYGON_VECTOR)
                .input("align", raster)
                .flags("p")
                .superquiet(),
        )
        .stage(
            Stage::new("r_mask_3", "r.mask")
                .input("vector", POLYGON_VECTOR)
                .superquiet(),
        )
        .stage(
            Stage::new("r_stats_4", "r.stats")
                .input("input", raster)
                .input("separator", "|")
                .output("output", result_path.to_string_lossy())
                .flags("acpl")
                .superquiet(),
        )
}

/// Same statistics against the raster resolved by the temporal prelude.
/// Numbering continues after its four stages.
pub fn strds_categorical_stats_chain(raster: &str, result_path: &Path) -> Chain {
    Chain::new()
        .stage(
            Stage::new("g_region_5", "g.region")
                .input("vector", POLYGON_VECTOR)
                .input("align", raster),
        )
        .stage(
            Stage::new("r_mask_6", "r.mask")
                .input("vector", POLYGON_VECTOR)
                .superquiet(),
        )
        .stage(
            Stage::new("r_stats_7", "r.stats")
                .input("input", raster)
                .input("separator", "|")
                .output("output", result_path.to_string_lossy())
                .flags("acpl")
                .superquiet(),
        )
}

/// Parse the pipe-delimited category rows written by the statistics
/// module.
///
/// Each line carries exactly five fields; the percent field ends in a
/// `%` that is stripped before parsing.
pub fn parse_categorical_stats(raw: &str) -> GeostatResult<Vec<CategoricalStatistics>> {
    let mut rows = Vec::new();
    for line in raw.lines() {
        let fields: Vec<&str> = line.trim().split('|').collect();
        if fields.len() != 5 {
            return Err(GeostatError::MalformedOutput(format!(
                "expected 5 category fields, found {} in '{}'",
                fields.len(),
                line
            )));
        }

        let percent_token = fields[4].split('%').next().unwrap_or(fields[4]);
        rows.push(CategoricalStatistics {
            cat: fields[0].to_string(),
            name: fields[1].to_string(),
            area: parse_float(fields[2], "area")?,
            cell_count: fields[3].parse().map_err(|_| {
                GeostatError::MalformedOutput(format!("invalid cell count '{}'", fields[3]))
            })?,
            percent: parse_float(percent_token, "percent")?,
        });
    }
    Ok(rows)
}

fn parse_float(token: &str, field: &str) -> GeostatResult<f64> {
    token
        .parse()
        .map_err(|_| GeostatError::MalformedOutput(format!("invalid {field} value '{token}'")))
}

/// Categorical area statistics of a plain raster layer.
pub struct RasterAreaStats;

#[async_trait]
impl EphemeralOperation for RasterAreaStats {
    fn name(&self) -> &'static str {
        "raster_area_stats"
    }

    async fn execute(&self, ctx: &JobContext) -> GeostatResult<ProcessResults> {
        let descriptor = ctx.descriptor();
        let polygon =
            write_polygon_file(ctx.workspace(), descriptor.body("GeoJSON polygon")?).await?;
        let raster = descriptor.qualified_map();

        ctx.run_chain(
            &polygon_import_chain(&polygon),
            ExecuteOptions::new()
                .with_region_check_skipped()
                .with_permission_check_skipped(),
        )
        .await?;

        let result_path = ctx.workspace().temp_file("stats");
        ctx.run_chain(
            &categorical_stats_chain(&raster, &result_path),
            ExecuteOptions::new().with_permission_check_skipped(),
        )
        .await?;

        let raw = tokio::fs::read_to_string(&result_path).await?;
        let rows = parse_categorical_stats(&raw)?;
        debug!(raster = %raster, rows = rows.len(), "categorical statistics parsed");
        Ok(ProcessResults::CategoricalStats(rows))
    }
}

/// Categorical area statistics of the raster a STRDS holds at a
/// timestamp.
pub struct StrdsAreaStats;

#[async_trait]
impl EphemeralOperation for StrdsAreaStats {
    fn name(&self) -> &'static str {
        "strds_area_stats"
    }

    async fn execute(&self, ctx: &JobContext) -> GeostatResult<ProcessResults> {
        let descriptor = ctx.descriptor();
        let timestamp = descriptor.user_datum("timestamp")?.to_string();
        let polygon =
            write_polygon_file(ctx.workspace(), descriptor.body("GeoJSON polygon")?).await?;
        let strds = descriptor.qualified_map();

        let prelude = ctx
            .run_chain(
                &strds_sample_chain(&polygon, &strds, &timestamp),
                ExecuteOptions::new()
                    .with_region_check_skipped()
                    .with_permission_check_skipped(),
            )
            .await?;
        let raster = resolve_sampled_raster(&prelude, &timestamp)?;
        debug!(raster = %raster, timestamp = %timestamp, "temporal sample resolved");

        let result_path = ctx.workspace().temp_file("stats");
        ctx.run_chain(
            &strds_categorical_stats_chain(&raster, &result_path),
            ExecuteOptions::new().with_permission_check_skipped(),
        )
        .await?;

        let raw = tokio::fs::read_to_string(&result_path).await?;
        Ok(ProcessResults::CategoricalStats(parse_categorical_stats(
            &raw,
        )?))
    }
}
