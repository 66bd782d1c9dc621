//! End-to-end tests for the statistic and sampling operations.
//!
//! Each operation runs against a stub chain runner that replays canned
//! module outputs, covering the full build/run/parse path of every
//! endpoint family without a spatial database.

use std::sync::Arc;

use tempfile::TempDir;

use ephemeral_engine::{
    EphemeralOperation, JobContext, RequestDescriptor, RouteParams, Workspace,
};
use geostat_common::GeostatError;
use geostat_ops::{
    RasterAreaStats, RasterAreaStatsUnivar, RasterSampling, StrdsAreaStats,
    StrdsAreaStatsUnivar, StrdsGeojsonSampling, StrdsSampling, VectorSampling,
};
use stats_protocol::ProcessResults;
use test_utils::{bodies, names, outputs, StubRunner};

fn raster_descriptor() -> RequestDescriptor {
    RequestDescriptor::new(
        RouteParams::new(names::PROJECT, names::MAPSET, names::RASTER),
        names::USER,
    )
}

fn strds_descriptor() -> RequestDescriptor {
    RequestDescriptor::new(
        RouteParams::new(names::PROJECT, names::STRDS_MAPSET, names::STRDS),
        names::USER,
    )
}

fn context(runner: &Arc<StubRunner>, dir: &TempDir, descriptor: RequestDescriptor) -> JobContext {
    JobContext::new(descriptor, Workspace::new(dir.path()), runner.clone())
}

// ============================================================================
// Areal categorical statistics
// ============================================================================

#[tokio::test]
async fn test_raster_area_stats_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        StubRunner::new().with_output_file("r_stats_4", outputs::CATEGORICAL_STATS),
    );
    let ctx = context(
        &runner,
        &dir,
        raster_descriptor().with_body(bodies::polygon()),
    );

    let results = RasterAreaStats.execute(&ctx).await.unwrap();

    match results {
        ProcessResults::CategoricalStats(rows) => {
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[0].cat, "0");
            assert_eq!(rows[0].name, "not classified");
            assert_eq!(rows[2].cell_count, 2389);
        }
        other => panic!("expected categorical statistics, got {other:?}"),
    }

    // Import chain first, analysis chain second, ids unique throughout.
    let chains = runner.executed_chains();
    assert_eq!(chains.len(), 2);
    assert_eq!(chains[0].stage_ids(), vec!["v_import_1"]);
    assert_eq!(
        chains[1].stage_ids(),
        vec!["g_region_2", "r_mask_3", "r_stats_4"]
    );
    assert_eq!(
        chains[1].last().unwrap().input_value("input"),
        Some("landuse96_28m@PERMANENT")
    );

    let log = ctx.process_log().await;
    assert_eq!(log.len(), 4);
    assert_eq!(log[0].id, "v_import_1");
    assert_eq!(log[3].id, "r_stats_4");
}

#[tokio::test]
async fn test_raster_area_stats_requires_polygon_body() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(StubRunner::new());
    let ctx = context(&runner, &dir, raster_descriptor());

    let err = RasterAreaStats.execute(&ctx).await.unwrap_err();

    assert!(matches!(err, GeostatError::MissingInput(_)));
    assert!(runner.executed_chains().is_empty());
}

#[tokio::test]
async fn test_raster_area_stats_stage_failure_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(StubRunner::new().with_failure("r_mask_3"));
    let ctx = context(
        &runner,
        &dir,
        raster_descriptor().with_body(bodies::polygon()),
    );

    let err = RasterAreaStats.execute(&ctx).await.unwrap_err();

    assert!(matches!(err, GeostatError::StageFailed { .. }));
    // The import chain ran; the analysis chain aborted.
    let log = ctx.process_log().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].id, "v_import_1");
}

#[tokio::test]
async fn test_strds_area_stats_resolves_sampled_raster() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        StubRunner::new()
            .with_stdout("t_sample_4", outputs::TEMPORAL_SAMPLE)
            .with_output_file("r_stats_7", outputs::CATEGORICAL_STATS),
    );
    let ctx = context(
        &runner,
        &dir,
        strds_descriptor()
            .with_body(bodies::polygon())
            .with_user_data(names::TIMESTAMP),
    );

    let results = StrdsAreaStats.execute(&ctx).await.unwrap();
    assert_eq!(results.len(), 3);

    let chains = runner.executed_chains();
    assert_eq!(chains.len(), 2);
    assert_eq!(
        chains[0].stage_ids(),
        vec!["v_import_1", "t_create_2", "t_register_3", "t_sample_4"]
    );
    // The analysis chain targets the raster the temporal sample named.
    assert_eq!(
        chains[1].get("g_region_5").unwrap().input_value("align"),
        Some("MOD11B3.A2016001@modis_lst")
    );
    assert_eq!(
        chains[1].get("r_stats_7").unwrap().input_value("input"),
        Some("MOD11B3.A2016001@modis_lst")
    );
}

#[tokio::test]
async fn test_strds_area_stats_no_raster_for_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        StubRunner::new().with_stdout("t_sample_4", outputs::TEMPORAL_SAMPLE_NONE),
    );
    let ctx = context(
        &runner,
        &dir,
        strds_descriptor()
            .with_body(bodies::polygon())
            .with_user_data(names::TIMESTAMP),
    );

    let err = StrdsAreaStats.execute(&ctx).await.unwrap_err();

    assert!(matches!(err, GeostatError::NoRasterForTimestamp { .. }));
    assert_eq!(
        err.to_string(),
        "No raster maps found for timestamp: 2016-01-01T00:00:00"
    );
    // Only the temporal prelude ran.
    assert_eq!(runner.executed_chains().len(), 1);
}

#[tokio::test]
async fn test_strds_area_stats_requires_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(StubRunner::new());
    let ctx = context(
        &runner,
        &dir,
        strds_descriptor().with_body(bodies::polygon()),
    );

    let err = StrdsAreaStats.execute(&ctx).await.unwrap_err();
    assert!(matches!(err, GeostatError::MissingInput(_)));
}

// ============================================================================
// Areal univariate statistics
// ============================================================================

#[tokio::test]
async fn test_raster_univar_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        StubRunner::new().with_output_file("v_db_select_4", outputs::UNIVAR_TABLE),
    );
    let ctx = context(
        &runner,
        &dir,
        raster_descriptor().with_body(bodies::polygon()),
    );

    let results = RasterAreaStatsUnivar.execute(&ctx).await.unwrap();

    match results {
        ProcessResults::UnivarStats(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].cat.as_deref(), Some("1"));
            assert_eq!(rows[0].fid.as_deref(), Some("swwake_10m.0"));
            assert_eq!(rows[0].raster_number, Some(2025000.0));
            assert_eq!(rows[0].raster_maximum, Some(6.0));
        }
        other => panic!("expected univariate statistics, got {other:?}"),
    }

    let chains = runner.executed_chains();
    assert_eq!(
        chains[1].stage_ids(),
        vec!["g_region_2", "v_rast_stats_3", "v_db_select_4"]
    );
    assert_eq!(
        chains[1].get("v_rast_stats_3").unwrap().input_value("raster"),
        Some("landuse96_28m@PERMANENT")
    );
}

#[tokio::test]
async fn test_strds_univar_uses_resolved_raster_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        StubRunner::new()
            .with_stdout("t_sample_4", outputs::TEMPORAL_SAMPLE)
            .with_output_file("v_db_select_7", outputs::UNIVAR_TABLE_EMPTY_FEATURE),
    );
    let ctx = context(
        &runner,
        &dir,
        strds_descriptor()
            .with_body(bodies::polygon())
            .with_user_data(names::TIMESTAMP),
    );

    let results = StrdsAreaStatsUnivar.execute(&ctx).await.unwrap();

    match results {
        ProcessResults::UnivarStats(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].fid.as_deref(), Some("tile"));
            assert_eq!(rows[0].raster_number, None);
        }
        other => panic!("expected univariate statistics, got {other:?}"),
    }

    let chains = runner.executed_chains();
    assert_eq!(
        chains[1].get("v_rast_stats_6").unwrap().input_value("raster"),
        Some("MOD11B3.A2016001@modis_lst")
    );
}

// ============================================================================
// Point sampling
// ============================================================================

#[tokio::test]
async fn test_raster_sampling_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        StubRunner::new().with_output_file("r_what_3", outputs::RASTER_SAMPLING),
    );
    let ctx = context(
        &runner,
        &dir,
        raster_descriptor().with_body(bodies::point_list()),
    );

    let results = RasterSampling.execute(&ctx).await.unwrap();

    match results {
        ProcessResults::PointSamples(samples) => {
            assert_eq!(samples.len(), 2);
            assert_eq!(samples[0].point_id, "p1");
            assert_eq!(samples[0].get("value"), Some("4"));
            assert_eq!(samples[0].get("map_name"), Some("landuse96_28m"));
            assert_eq!(samples[0].get("site_name"), None);
            assert_eq!(samples[1].point_id, "p2");
            assert_eq!(samples[1].get("label"), Some("Low Intensity Developed"));
        }
        other => panic!("expected point samples, got {other:?}"),
    }

    // The importer consumed a pipe-delimited point file from the
    // workspace.
    let chains = runner.executed_chains();
    let import = chains[0].get("v_in_ascii_1").unwrap();
    let point_file = import.input_value("input").unwrap();
    assert_eq!(
        std::fs::read_to_string(point_file).unwrap(),
        "p1|638684.0|220210.0\np2|635676.0|226371.0\n"
    );
}

#[tokio::test]
async fn test_raster_sampling_rejects_empty_point_list() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(StubRunner::new());
    let ctx = context(
        &runner,
        &dir,
        raster_descriptor().with_body(serde_json::json!({"points": []})),
    );

    let err = RasterSampling.execute(&ctx).await.unwrap_err();

    assert!(matches!(err, GeostatError::EmptyPointList));
    assert!(runner.executed_chains().is_empty());
}

#[tokio::test]
async fn test_vector_sampling_groups_captured_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(StubRunner::new().with_stdout("v_what", outputs::VECTOR_SAMPLING));
    let descriptor = RequestDescriptor::new(
        RouteParams::new(names::PROJECT, names::MAPSET, names::VECTOR),
        names::USER,
    )
    .with_body(bodies::point_list());
    let ctx = context(&runner, &dir, descriptor);

    let results = VectorSampling.execute(&ctx).await.unwrap();

    match results {
        ProcessResults::PointSamples(samples) => {
            assert_eq!(samples.len(), 2);
            assert_eq!(samples[0].point_id, "p1");
            assert_eq!(samples[0].get("East"), Some("638684"));
            assert_eq!(samples[1].get("Sq_Meters"), Some("63169356.527"));
        }
        other => panic!("expected point samples, got {other:?}"),
    }

    let chains = runner.executed_chains();
    assert_eq!(chains.len(), 1);
    assert_eq!(
        chains[0].get("v_what").unwrap().input_value("coordinates"),
        Some("638684.0,220210.0,635676.0,226371.0")
    );
}

#[tokio::test]
async fn test_strds_sampling_passes_where_filter() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        StubRunner::new().with_output_file("t_rast_sample_2", outputs::STRDS_SAMPLING),
    );
    let ctx = context(
        &runner,
        &dir,
        strds_descriptor().with_body(bodies::point_list_with_where(
            "start_time > '2016-01-01'",
        )),
    );

    let results = StrdsSampling.execute(&ctx).await.unwrap();

    match results {
        ProcessResults::SamplingRows(rows) => {
            assert_eq!(rows.len(), 3);
            assert_eq!(rows[0], vec!["start_time", "end_time", "p1", "p2"]);
            assert_eq!(rows[2][3], "*");
        }
        other => panic!("expected sampling rows, got {other:?}"),
    }

    let chains = runner.executed_chains();
    let sample = chains[0].get("t_rast_sample_2").unwrap();
    assert_eq!(sample.input_value("where"), Some("start_time > '2016-01-01'"));
    assert_eq!(sample.input_value("strds"), Some("LST_Day_monthly@modis_lst"));
}

#[tokio::test]
async fn test_strds_geojson_sampling_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(
        StubRunner::new().with_output_file("t_rast_sample_2", outputs::STRDS_SAMPLING),
    );
    let ctx = context(
        &runner,
        &dir,
        strds_descriptor().with_body(bodies::point_features()),
    );

    let results = StrdsGeojsonSampling.execute(&ctx).await.unwrap();
    assert_eq!(results.len(), 3);

    let chains = runner.executed_chains();
    assert_eq!(chains[0].stage_ids(), vec!["v_import_1", "t_rast_sample_2"]);
    assert!(chains[0]
        .get("t_rast_sample_2")
        .unwrap()
        .input_value("column")
        .is_none());
}

#[tokio::test]
async fn test_strds_geojson_sampling_rejects_invalid_body() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(StubRunner::new());
    let ctx = context(
        &runner,
        &dir,
        strds_descriptor().with_body(serde_json::json!({"not": "geojson"})),
    );

    let err = StrdsGeojsonSampling.execute(&ctx).await.unwrap_err();

    assert!(matches!(err, GeostatError::InvalidGeoJson(_)));
    assert!(runner.executed_chains().is_empty());
}
