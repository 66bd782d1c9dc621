//! Request body types for the statistic and sampling endpoints.

use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use geostat_common::{sample_points_from_triples, GeostatError, GeostatResult, SamplePoint};

/// JSON body of the point-sampling endpoints.
///
/// `points` holds `[id, x, y]` triples. `where` optionally narrows the
/// maps considered by STRDS sampling and is passed through to the
/// temporal sampling module unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointListBody {
    pub points: Vec<Vec<String>>,

    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_: Option<String>,
}

impl PointListBody {
    pub fn new(points: Vec<Vec<String>>) -> Self {
        Self {
            points,
            where_: None,
        }
    }

    /// Validate the raw triples into typed sample points.
    pub fn sample_points(&self) -> GeostatResult<Vec<SamplePoint>> {
        sample_points_from_triples(&self.points)
    }
}

/// Check that a request body is well-formed GeoJSON.
///
/// Only structural validity is checked here; geometry content is the
/// import module's business.
pub fn validate_geojson(body: &Value) -> GeostatResult<GeoJson> {
    GeoJson::from_json_value(body.clone()).map_err(|e| GeostatError::InvalidGeoJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_list_body_wire_shape() {
        let body: PointListBody = serde_json::from_value(serde_json::json!({
            "points": [["p1", "638684.0", "220210.0"], ["p2", "635676.0", "226371.0"]],
            "where": "start_time > '2016-01-01'",
        }))
        .unwrap();

        assert_eq!(body.points.len(), 2);
        assert_eq!(body.where_.as_deref(), Some("start_time > '2016-01-01'"));

        let points = body.sample_points().unwrap();
        assert_eq!(points[0].id, "p1");
        assert_eq!(points[1].x, "635676.0");
    }

    #[test]
    fn test_point_list_body_rejects_bad_triples() {
        let body = PointListBody::new(vec![vec!["p1".to_string(), "1.0".to_string()]]);
        assert!(matches!(
            body.sample_points(),
            Err(GeostatError::MalformedPoint { .. })
        ));

        let body = PointListBody::new(Vec::new());
        assert!(matches!(
            body.sample_points(),
            Err(GeostatError::EmptyPointList)
        ));
    }

    #[test]
    fn test_validate_geojson_accepts_polygon_and_collection() {
        let polygon = serde_json::json!({
            "type": "Polygon",
            "coordinates": [[
                [330000.0, 214000.0],
                [337000.0, 214000.0],
                [337000.0, 221000.0],
                [330000.0, 221000.0],
                [330000.0, 214000.0],
            ]],
        });
        assert!(validate_geojson(&polygon).is_ok());

        let collection = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [638684.0, 220210.0]},
                "properties": {"id": "p1"},
            }],
        });
        assert!(validate_geojson(&collection).is_ok());
    }

    #[test]
    fn test_validate_geojson_rejects_non_geojson() {
        let err = validate_geojson(&serde_json::json!({"points": [[1, 2]]})).unwrap_err();
        assert!(matches!(err, GeostatError::InvalidGeoJson(_)));
        assert_eq!(err.http_status_code(), 400);
    }
}
