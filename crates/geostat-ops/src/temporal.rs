//! Temporal prelude resolving a raster from a space-time dataset.
//!
//! The request polygon is registered as a one-second space-time vector
//! dataset at the requested timestamp and sampled against the target
//! STRDS. The raster valid at that instant comes back in the sampler's
//! stdout and feeds the analysis chain built afterwards.

use std::path::Path;

use ephemeral_engine::ChainExecution;
use geostat_common::{GeostatError, GeostatResult};
use process_chain::{Chain, Stage};

use crate::polygon::POLYGON_VECTOR;

/// Space-time vector dataset the polygon is registered into.
pub const POLYGON_STVDS: &str = "polygon_stvds";

/// Stage whose stdout carries the sampled raster name.
pub const TEMPORAL_SAMPLE_STAGE: &str = "t_sample_4";

/// Import the polygon and sample the STRDS at the given timestamp.
///
/// Stage numbering continues into the analysis chain built afterwards,
/// keeping ids unique across the whole request.
pub fn strds_sample_chain(geojson_path: &Path, strds: &str, timestamp: &str) -> Chain {
    Chain::new()
        .stage(
            Stage::new("v_import_1", "v.import")
                .input("input", geojson_path.to_string_lossy())
                .output("output", POLYGON_VECTOR)
                .superquiet(),
        )
        .stage(
            Stage::new("t_create_2", "t.create")
                .input("type", "stvds")
                .input("temporaltype", "absolute")
                .input("semantictype", "mean")
                .input("title", "Polygon")
                .input("description", "Polygon")
                .output("output", POLYGON_STVDS)
                .superquiet(),
        )
        .stage(
            Stage::new("t_register_3", "t.register")
                .input("type", "vector")
                .input("input", POLYGON_STVDS)
                .input("maps", POLYGON_VECTOR)
                .input("start", timestamp)
                .input("increment", "1 second")
                .flags("i"),
        )
        .stage(
            Stage::new(TEMPORAL_SAMPLE_STAGE, "t.sample")
                .input("sample", POLYGON_STVDS)
                .input("inputs", strds)
                .input("samtype", "stvds")
                .input("intype", "strds"),
        )
}

/// Extract the raster sampled for `timestamp` from the executed prelude.
///
/// The sampler prints pipe-delimited rows with the matched raster ids in
/// the second field; a comma-separated id list is narrowed to its first
/// entry. A missing field or the literal `None` means no raster covers
/// the timestamp.
pub fn resolve_sampled_raster(
    execution: &ChainExecution,
    timestamp: &str,
) -> GeostatResult<String> {
    let no_raster = || GeostatError::NoRasterForTimestamp {
        timestamp: timestamp.to_string(),
    };

    let stdout = execution
        .stdout_of(TEMPORAL_SAMPLE_STAGE)
        .ok_or_else(no_raster)?;
    let field = stdout.split('|').nth(1).ok_or_else(no_raster)?;
    let raster = field.split(',').next().unwrap_or(field).trim();

    if raster.is_empty() || raster == "None" {
        return Err(no_raster());
    }
    Ok(raster.to_string())
}
