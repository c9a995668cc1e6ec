//! Integration tests for the full registry-and-derivation workflow.
//!
//! These tests exercise the library the way a front end would: register
//! source layers (by hand or through the raster store), describe derived
//! layers in a configuration, run the batch, and consume the results.

use geolayer::config::PipelineConfig;
use geolayer::export::export_raster_csv;
use geolayer::geotiff::{LoadedRaster, MockRasterStore, RasterReader, RasterWriter};
use geolayer::layer::{Geotransform, KernelSpec, LayerKind, LayerStatus, DEFAULT_NODATA};
use geolayer::pipeline::{ComputeError, Pipeline};
use ndarray::Array2;
use std::path::Path;

/// The canonical walkthrough: a 4x4 constant elevation grid with a
/// radius-1 `range` kernel. The 2x2 interior derives to 0.0 and the 12
/// border cells stay no-data.
#[test]
fn test_elevation_roughness_walkthrough() {
    let mut pipeline = Pipeline::new();

    let elevation = pipeline.create_raster_layer("elevation").unwrap();
    {
        let grid = pipeline
            .get_mut(elevation)
            .unwrap()
            .as_raster_mut()
            .unwrap();
        grid.allocate(4, 4, -9999.0).unwrap();
        for row in 0..4 {
            for col in 0..4 {
                grid.set(row, col, 1.0).unwrap();
            }
        }
    }
    assert_eq!(
        pipeline.get(elevation).unwrap().status(),
        LayerStatus::Empty,
        "population alone does not validate a layer"
    );
    pipeline.mark_valid(elevation).unwrap();

    let roughness = pipeline
        .create_kernel_layer("roughness", &[elevation], KernelSpec::new("range", 1))
        .unwrap();
    pipeline.compute(roughness).unwrap();

    let layer = pipeline.get_by_name("roughness").unwrap();
    assert_eq!(layer.status(), LayerStatus::Valid);
    let grid = layer.as_raster().unwrap();
    let mut border_nodata = 0;
    for row in 0..4 {
        for col in 0..4 {
            if (1..3).contains(&row) && (1..3).contains(&col) {
                assert_eq!(grid.get(row, col).unwrap(), 0.0);
            } else {
                assert_eq!(grid.get(row, col).unwrap(), -9999.0);
                border_nodata += 1;
            }
        }
    }
    assert_eq!(border_nodata, 12);
}

/// Config-driven run against the in-memory store: load, derive a chain of
/// kernel layers, and write the products back.
#[test]
fn test_config_driven_run_with_store() {
    let store = MockRasterStore::new();
    let geotransform = Geotransform {
        origin_x: 5000.0,
        origin_y: 8000.0,
        pixel_x: 1.0,
        pixel_y: -1.0,
    };
    let mut samples = Array2::from_elem((6, 6), 10.0);
    samples[[2, 3]] = 16.0;
    store.insert(
        Path::new("bathymetry.tif"),
        LoadedRaster {
            samples,
            geotransform,
            nodata: Some(DEFAULT_NODATA),
        },
    );

    let config = PipelineConfig::from_ini_str(
        "
[input]
path = bathymetry.tif
layer = bathymetry

[kernel.local_relief]
sources = bathymetry
function = range
radius = 1

[kernel.exclusion]
sources = local_relief
function = threshold
radius = 0
params = 3.0
",
    )
    .unwrap();

    let mut pipeline = Pipeline::new();
    let input_path = config.input.path.clone().unwrap();
    let loaded = store.load(&input_path).unwrap();
    pipeline
        .register_raster(
            &config.input.layer,
            loaded.samples,
            loaded.geotransform,
            config.input.nodata.or(loaded.nodata),
        )
        .unwrap();
    pipeline.apply_config(&config).unwrap();

    let report = pipeline.compute_all().unwrap();
    assert!(report.is_clean(), "report: {}", report);

    // The bump of +6 exceeds the threshold of 3 wherever the radius-1
    // window saw it; its 3x3 neighborhood within the interior is excluded.
    let exclusion = pipeline.get_by_name("exclusion").unwrap();
    let grid = exclusion.as_raster().unwrap();
    assert_eq!(grid.get(2, 3).unwrap(), 1.0);
    assert_eq!(grid.get(3, 2).unwrap(), 1.0);
    assert_eq!(grid.get(4, 4).unwrap(), 0.0);
    assert_eq!(
        grid.get(0, 0).unwrap(),
        DEFAULT_NODATA,
        "edge ring of the upstream kernel layer propagates"
    );

    // Products round-trip through the writer under their layer names.
    for layer in pipeline.layers_of_kind(LayerKind::Kernel) {
        let path = format!("out/{}.tif", layer.name());
        store
            .save(Path::new(&path), layer.as_raster().unwrap())
            .unwrap();
    }
    assert!(store.load(Path::new("out/local_relief.tif")).is_ok());
    assert!(store.load(Path::new("out/exclusion.tif")).is_ok());
}

/// A kernel layer over an unpopulated source reports not-ready, stays
/// untouched, and succeeds once the source is populated and marked valid.
#[test]
fn test_not_ready_then_retry() {
    let mut pipeline = Pipeline::new();
    let depth = pipeline.create_raster_layer("depth").unwrap();
    let smooth = pipeline
        .create_kernel_layer("smooth", &[depth], KernelSpec::new("mean", 1))
        .unwrap();

    let err = pipeline.compute(smooth).unwrap_err();
    assert!(matches!(err, ComputeError::SourceNotReady { .. }));
    assert_eq!(pipeline.get(smooth).unwrap().status(), LayerStatus::Empty);

    {
        let grid = pipeline.get_mut(depth).unwrap().as_raster_mut().unwrap();
        grid.allocate(5, 5, DEFAULT_NODATA).unwrap();
        for row in 0..5 {
            for col in 0..5 {
                grid.set(row, col, (row + col) as f64).unwrap();
            }
        }
    }
    pipeline.mark_valid(depth).unwrap();

    pipeline.compute(smooth).unwrap();
    let grid = pipeline.get(smooth).unwrap().as_raster().unwrap();
    // Mean of a 3x3 window of the plane row+col equals its center value.
    assert_eq!(grid.get(2, 2).unwrap(), 4.0);
    assert_eq!(pipeline.get(smooth).unwrap().status(), LayerStatus::Valid);
}

/// A two-kernel cycle aborts the batch with both layers reported and
/// neither computed.
#[test]
fn test_cycle_aborts_batch() {
    let mut pipeline = Pipeline::new();
    let seed = pipeline.create_raster_layer("seed").unwrap();
    {
        let grid = pipeline.get_mut(seed).unwrap().as_raster_mut().unwrap();
        grid.allocate(3, 3, DEFAULT_NODATA).unwrap();
        grid.fill(1.0);
    }
    pipeline.mark_valid(seed).unwrap();

    let a = pipeline
        .create_kernel_layer("a", &[seed], KernelSpec::new("mean", 1))
        .unwrap();
    let b = pipeline
        .create_kernel_layer("b", &[a], KernelSpec::new("mean", 1))
        .unwrap();
    pipeline.set_kernel_sources(a, &[b]).unwrap();

    match pipeline.compute_all() {
        Err(ComputeError::CycleDetected(names)) => {
            assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("expected cycle, got {:?}", other),
    }
    assert_eq!(pipeline.get(a).unwrap().status(), LayerStatus::Empty);
    assert_eq!(pipeline.get(b).unwrap().status(), LayerStatus::Empty);
}

/// Derived layers export as CSV with one row per valid cell.
#[test]
fn test_export_of_derived_layer() {
    let mut pipeline = Pipeline::new();
    let samples = Array2::from_elem((4, 4), 2.5);
    pipeline
        .register_raster("depth", samples, Geotransform::default(), None)
        .unwrap();
    let depth = pipeline.id_of("depth").unwrap();
    let smooth = pipeline
        .create_kernel_layer("smooth", &[depth], KernelSpec::new("mean", 1))
        .unwrap();
    pipeline.compute(smooth).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smooth.csv");
    export_raster_csv(pipeline.get(smooth).unwrap(), &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    // Header plus the 2x2 interior; the edge ring is no-data and skipped.
    assert_eq!(content.lines().count(), 5);
}
