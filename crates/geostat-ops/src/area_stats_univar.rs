//! Univariate areal statistics for rasters and space-time raster
//! datasets.
//!
//! The aggregates are written as prefixed columns into the imported
//! polygon's attribute table, which is then dumped pipe-delimited and
//! parsed per feature.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use ephemeral_engine::{EphemeralOperation, ExecuteOptions, JobContext};
use geostat_common::GeostatResult;
use process_chain::{Chain, Stage};
use stats_protocol::{AreaUnivarStatistics, ProcessResults};

use crate::polygon::{polygon_import_chain, write_polygon_file, POLYGON_VECTOR};
use crate::temporal::{resolve_sampled_raster, strds_sample_chain};

/// Aggregates computed per polygon feature.
pub const UNIVAR_METHODS: &str =
    "number,minimum,maximum,range,average,median,stddev,sum,variance,coeff_var";

/// Prefix of the attribute columns the statistics module writes.
pub const UNIVAR_COLUMN_PREFIX: &str = "raster";

/// Compute per-feature statistics into the polygon's attribute table and
/// dump the table. Stage numbering continues after the import chain.
pub fn raster_univar_chain(raster: &str, result_path: &Path) -> Chain {
    Chain::new()
        .stage(
            Stage::new("g_region_2", "g.region")
                .input("vector", POLYGON_VECTOR)
                .flags("p"),
        )
        .stage(
            Stage::new("v_rast_stats_3", "v.rast.stats")
                .input("map", POLYGON_VECTOR)
                .input("method", UNIVAR_METHODS)
                .input("raster", raster)
                .input("column_prefix", UNIVAR_COLUMN_PREFIX)
                .superquiet(),
        )
        .stage(
            Stage::new("v_db_select_4", "v.db.select")
                .input("map", POLYGON_VECTOR)
                .output("file", result_path.to_string_lossy()),
        )
}

/// Same computation against the raster resolved by the temporal prelude.
/// Numbering continues after its four stages.
pub fn strds_univar_chain(raster: &str, result_path: &Path) -> Chain {
    Chain::new()
        .stage(Stage::new("g_region_5", "g.region").input("vector", POLYGON_VECTOR))
        .stage(
            Stage::new("v_rast_stats_6", "v.rast.stats")
                .input("map", POLYGON_VECTOR)
                .input("method", UNIVAR_METHODS)
                .input("raster", raster)
                .input("column_prefix", UNIVAR_COLUMN_PREFIX)
                .superquiet(),
        )
        .stage(
            Stage::new("v_db_select_7", "v.db.select")
                .input("map", POLYGON_VECTOR)
                .output("file", result_path.to_string_lossy()),
        )
}

/// Parse the attribute table dump into per-feature statistics.
///
/// The first line names the columns. The identifier columns stay
/// strings; every other known column is parsed as a float, and tokens
/// that fail the parse are dropped rather than rejected, so features
/// without raster coverage come back with only their identifiers set.
/// Unknown columns are ignored.
pub fn parse_univar_stats(raw: &str) -> Vec<AreaUnivarStatistics> {
    let mut lines = raw.lines();
    let header: Vec<&str> = match lines.next() {
        Some(line) => line.trim().split('|').collect(),
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for line in lines {
        let mut row = AreaUnivarStatistics::default();
        for (key, token) in header.iter().zip(line.trim().split('|')) {
            let number = token.parse::<f64>().ok();
            match *key {
                "cat" => row.cat = Some(token.to_string()),
                "fid" => row.fid = Some(token.to_string()),
                "raster_number" => row.raster_number = number,
                "raster_minimum" => row.raster_minimum = number,
                "raster_maximum" => row.raster_maximum = number,
                "raster_range" => row.raster_range = number,
                "raster_average" => row.raster_average = number,
                "raster_median" => row.raster_median = number,
                "raster_stddev" => row.raster_stddev = number,
                "raster_sum" => row.raster_sum = number,
                "raster_variance" => row.raster_variance = number,
                "raster_coeff_var" => row.raster_coeff_var = number,
                _ => {}
            }
        }
        rows.push(row);
    }
    rows
}

/// Univariate area statistics of a plain raster layer.
pub struct RasterAreaStatsUnivar;

#[async_trait]
impl EphemeralOperation for RasterAreaStatsUnivar {
    fn name(&self) -> &'static str {
        "raster_area_stats_univar"
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

        let result_path = ctx.workspace().temp_file("univar");
        ctx.run_chain(
            &raster_univar_chain(&raster, &result_path),
            ExecuteOptions::new().with_permission_check_skipped(),
        )
        .await?;

        let raw = tokio::fs::read_to_string(&result_path).await?;
        let rows = parse_univar_stats(&raw);
        debug!(raster = %raster, rows = rows.len(), "univariate statistics parsed");
        Ok(ProcessResults::UnivarStats(rows))
    }
}

/// Univariate area statistics of the raster a STRDS holds at a
/// timestamp.
pub struct StrdsAreaStatsUnivar;

#[async_trait]
impl EphemeralOperation for StrdsAreaStatsUnivar {
    fn name(&self) -> &'static str {
        "strds_area_stats_univar"
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

        let result_path = ctx.workspace().temp_file("univar");
        ctx.run_chain(
            &strds_univar_chain(&raster, &result_path),
            ExecuteOptions::new().with_permission_check_skipped(),
        )
        .await?;

        let raw = tokio::fs::read_to_string(&result_path).await?;
        Ok(ProcessResults::UnivarStats(parse_univar_stats(&raw)))
    }
}
