//! Point list plumbing shared by the sampling families.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use ephemeral_engine::{RequestDescriptor, Workspace};
use geostat_common::{GeostatError, GeostatResult, SamplePoint};
use process_chain::Stage;
use stats_protocol::PointListBody;

/// Vector map name the point import stage creates.
pub const POINTS_VECTOR: &str = "input_points";

/// Re-derive the validated point list from the request body.
///
/// Handlers validate before enqueueing, but the worker reads its input
/// from the descriptor alone, so the same checks run again here.
pub fn points_from_descriptor(
    descriptor: &RequestDescriptor,
) -> GeostatResult<(Vec<SamplePoint>, Option<String>)> {
    let body = descriptor.body("point list")?;
    let body: PointListBody = serde_json::from_value(body.clone())
        .map_err(|err| GeostatError::MissingInput(format!("point list: {err}")))?;
    let points = body.sample_points()?;
    Ok((points, body.where_))
}

/// Write points as pipe-delimited `id|x|y` rows for the ASCII importer.
pub async fn write_point_file(
    workspace: &Workspace,
    points: &[SamplePoint],
) -> GeostatResult<PathBuf> {
    let mut rows = String::new();
    for point in points {
        let _ = writeln!(rows, "{}|{}|{}", point.id, point.x, point.y);
    }
    let path = workspace.temp_file("points");
    tokio::fs::write(&path, rows).await?;
    Ok(path)
}

/// Import stage turning the point file into a vector map.
pub fn point_import_stage(point_file: &Path) -> Stage {
    Stage::new("v_in_ascii_1", "v.in.ascii")
        .input("input", point_file.to_string_lossy())
        .input("format", "point")
        .input("column", "id text, x double precision, y double precision")
        .input("x", "2")
        .input("y", "3")
        .output("output", POINTS_VECTOR)
        .superquiet()
}
