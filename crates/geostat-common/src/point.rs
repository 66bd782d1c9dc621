//! Sample points supplied by the sampling endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{GeostatError, GeostatResult};

/// A caller-supplied sampling location.
///
/// Coordinates stay strings in the coordinate system of the target project;
/// no transformation happens on this side of the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub id: String,
    pub x: String,
    pub y: String,
}

impl SamplePoint {
    pub fn new(id: impl Into<String>, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Convert raw `[id, x, y]` triples into sample points.
///
/// The list must be non-empty and every entry must carry exactly three
/// fields; anything else is rejected before any chain stage is built.
pub fn sample_points_from_triples(raw: &[Vec<String>]) -> GeostatResult<Vec<SamplePoint>> {
    if raw.is_empty() {
        return Err(GeostatError::EmptyPointList);
    }

    let mut points = Vec::with_capacity(raw.len());
    for (index, entry) in raw.iter().enumerate() {
        match entry.as_slice() {
            [id, x, y] => points.push(SamplePoint {
                id: id.clone(),
                x: x.clone(),
                y: y.clone(),
            }),
            _ => {
                return Err(GeostatError::MalformedPoint {
                    index,
                    len: entry.len(),
                })
            }
        }
    }
    Ok(points)
}
