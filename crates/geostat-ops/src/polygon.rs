//! Polygon import shared by the areal statistics families.

use std::path::{Path, PathBuf};

use serde_json::Value;

use ephemeral_engine::Workspace;
use geostat_common::GeostatResult;
use process_chain::{Chain, Stage};

/// Vector map name the polygon import stage creates.
pub const POLYGON_VECTOR: &str = "polygon";

/// Write the request polygon to a workspace file and return its path.
///
/// The body is stored verbatim; coordinate reference handling is the
/// import module's business.
pub async fn write_polygon_file(workspace: &Workspace, body: &Value) -> GeostatResult<PathBuf> {
    let path = workspace.temp_file("polygon");
    tokio::fs::write(&path, serde_json::to_vec(body)?).await?;
    Ok(path)
}

/// Single-stage chain importing the polygon file into the job mapset.
pub fn polygon_import_chain(geojson_path: &Path) -> Chain {
    Chain::new().stage(
        Stage::new("v_import_1", "v.import")
            .input("input", geojson_path.to_string_lossy())
            .output("output", POLYGON_VECTOR)
            .superquiet(),
    )
}
