//! Common test fixtures for the geostat services tests.
//!
//! Canned request bodies and module outputs matching what the
//! geoprocessing tools actually print, so parsers and endpoints can be
//! exercised without a spatial database.

/// Map and route names shared across the test suite.
pub mod names {
    pub const PROJECT: &str = "nc_spm_08";
    pub const MAPSET: &str = "PERMANENT";
    pub const RASTER: &str = "landuse96_28m";
    pub const VECTOR: &str = "zipcodes_wake";

    pub const STRDS_MAPSET: &str = "modis_lst";
    pub const STRDS: &str = "LST_Day_monthly";
    pub const TIMESTAMP: &str = "2016-01-01T00:00:00";

    pub const USER: &str = "tester";
}

/// Request bodies in the shapes the endpoints accept.
pub mod bodies {
    use serde_json::{json, Value};

    /// A GeoJSON polygon covering a small area of the test project.
    pub fn polygon() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[
                [630000.0, 215000.0],
                [640000.0, 215000.0],
                [640000.0, 228000.0],
                [630000.0, 228000.0],
                [630000.0, 215000.0]
            ]]
        })
    }

    /// A GeoJSON feature collection with two point features.
    pub fn point_features() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "Point", "coordinates": [638684.0, 220210.0]}
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "Point", "coordinates": [635676.0, 226371.0]}
                }
            ]
        })
    }

    /// The two-point list used by the sampling endpoints.
    pub fn point_list() -> Value {
        json!({
            "points": [
                ["p1", "638684.0", "220210.0"],
                ["p2", "635676.0", "226371.0"]
            ]
        })
    }

    /// Point list with a temporal filter attached.
    pub fn point_list_with_where(filter: &str) -> Value {
        json!({
            "points": [
                ["p1", "638684.0", "220210.0"],
                ["p2", "635676.0", "226371.0"]
            ],
            "where": filter
        })
    }
}

/// Module outputs as the geoprocessing tools print them.
pub mod outputs {
    /// Per-category statistics rows (r.stats with the acpl flags).
    pub const CATEGORICAL_STATS: &str = "\
0|not classified|812.25|1|0.0%
1|Developed|224101.75|276|3.53%
4|Managed Herbaceous Cover|1939575.25|2389|30.59%
";

    /// Attribute table dump after univariate statistics (v.db.select).
    pub const UNIVAR_TABLE: &str = "\
cat|fid|raster_number|raster_minimum|raster_maximum|raster_range|raster_average|raster_median|raster_stddev|raster_sum|raster_variance|raster_coeff_var
1|swwake_10m.0|2025000|1|6|5|4.27381481481481|5|1.54778017556735|8654475|2.39562347187929|36.2154244540989
";

    /// Dump for a feature without raster coverage: empty numeric tokens.
    pub const UNIVAR_TABLE_EMPTY_FEATURE: &str = "\
cat|fid|raster_number|raster_minimum|raster_maximum|raster_range|raster_average|raster_median|raster_stddev|raster_sum|raster_variance|raster_coeff_var
1|tile||||||||||
";

    /// Raster query rows for two points (r.what with the nrf flags).
    pub const RASTER_SAMPLING: &str = "\
easting|northing|site_name|landuse96_28m@PERMANENT|landuse96_28m@PERMANENT_label|landuse96_28m@PERMANENT_color
638684|220210||4|Managed Herbaceous Cover|229:229:204
635676|226371||2|Low Intensity Developed|255:051:076
";

    /// Vector query stdout for two points (v.what with the ag flags).
    pub const VECTOR_SAMPLING: &str = "\
East=638684
North=220210

Map=zipcodes_wake
Mapset=PERMANENT
Type=Area
Sq_Meters=130875884.223
East=635676
North=226371

Map=zipcodes_wake
Mapset=PERMANENT
Type=Area
Sq_Meters=63169356.527
";

    /// Temporal sample row resolving to one raster (t.sample).
    pub const TEMPORAL_SAMPLE: &str =
        "polygon_stvds@mapset|MOD11B3.A2016001@modis_lst|2016-01-01 00:00:00|2016-01-01 00:00:01|1.0\n";

    /// Temporal sample row for a timestamp no raster covers.
    pub const TEMPORAL_SAMPLE_NONE: &str =
        "polygon_stvds@mapset|None|2016-01-01 00:00:00|2016-01-01 00:00:01|0.0\n";

    /// Dataset sampling rows for two points (t.rast.sample).
    pub const STRDS_SAMPLING: &str = "\
start_time|end_time|p1|p2
2016-01-01 00:00:00|2016-02-01 00:00:00|13773.0|13771.0
2016-02-01 00:00:00|2016-03-01 00:00:00|14101.0|*
";
}
