//! GeoLayer CLI - Command-line interface
//!
//! Loads an input raster, registers the kernel layers described by the
//! configuration (file and/or flags), derives them in dependency order,
//! and writes the products. All flag knowledge lives here; the library
//! only ever sees a [`PipelineConfig`].

mod error;

use clap::Parser;
use error::CliError;
use geolayer::config::{KernelLayerConfig, PipelineConfig};
use geolayer::export::export_raster_csv;
use geolayer::geotiff::{GeoTiffStore, RasterReader, RasterWriter};
use geolayer::layer::LayerKind;
use geolayer::logging::{default_log_dir, default_log_file, init_logging};
use geolayer::pipeline::{configure_thread_pool, Pipeline};
use std::path::PathBuf;
use std::process;
use tracing::info;

#[derive(Parser)]
#[command(name = "geolayer")]
#[command(version = geolayer::VERSION)]
#[command(about = "Derive raster layers through windowed kernel operations", long_about = None)]
struct Args {
    /// INI configuration file describing the run
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input raster (single-band TIFF with optional .tfw sidecar)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Layer name to register the input raster under
    #[arg(long)]
    layer: Option<String>,

    /// No-data sentinel of the input raster
    #[arg(long)]
    nodata: Option<f64>,

    /// Also derive a valid-data mask layer under this name
    #[arg(long)]
    mask: Option<String>,

    /// Kernel function for a single derived layer (shorthand for one
    /// [kernel.*] config section)
    #[arg(long)]
    kernel: Option<String>,

    /// Name of the layer derived by --kernel
    #[arg(long, default_value = "derived")]
    kernel_name: String,

    /// Window radius for --kernel
    #[arg(long, default_value_t = 1)]
    radius: u32,

    /// Numeric parameter for --kernel (repeatable)
    #[arg(long = "param")]
    params: Vec<f64>,

    /// Output directory for derived rasters
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also export each derived raster as CSV
    #[arg(long)]
    export_csv: bool,

    /// Worker threads for the kernel loop (0 = all cores)
    #[arg(long)]
    threads: Option<usize>,
}

/// Folds the command line into the (possibly file-sourced) configuration.
/// Flags win over file values.
fn build_config(args: &Args) -> Result<PipelineConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load_from(path)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?,
        None => PipelineConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input.path = Some(input.clone());
    }
    if let Some(layer) = &args.layer {
        config.input.layer = layer.clone();
    }
    if let Some(nodata) = args.nodata {
        config.input.nodata = Some(nodata);
    }
    if let Some(mask) = &args.mask {
        config.input.mask_layer = Some(mask.clone());
    }
    if let Some(output) = &args.output {
        config.output.directory = output.clone();
    }
    if args.export_csv {
        config.output.export_csv = true;
    }
    if let Some(threads) = args.threads {
        config.compute.threads = threads;
    }
    if let Some(function) = &args.kernel {
        config.kernels.push(KernelLayerConfig {
            name: args.kernel_name.clone(),
            sources: vec![config.input.layer.clone()],
            function: function.clone(),
            radius: args.radius,
            params: args.params.clone(),
        });
    }

    if config.kernels.is_empty() {
        return Err(CliError::MissingArgument(
            "--kernel or a [kernel.*] config section".to_string(),
        ));
    }
    Ok(config)
}

fn run(config: &PipelineConfig) -> Result<(), CliError> {
    let input_path = config
        .input
        .path
        .as_ref()
        .ok_or_else(|| CliError::MissingArgument("--input".to_string()))?;

    configure_thread_pool(config.compute.threads);

    let store = GeoTiffStore::new();
    let loaded = store.load(input_path).map_err(CliError::FileAccess)?;
    info!(
        path = %input_path.display(),
        layer = %config.input.layer,
        "input raster loaded"
    );

    let mut pipeline = Pipeline::new();
    pipeline
        .register_raster(
            &config.input.layer,
            loaded.samples,
            loaded.geotransform,
            config.input.nodata.or(loaded.nodata),
        )
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    if let Some(mask_name) = &config.input.mask_layer {
        pipeline
            .create_mask_layer(&config.input.layer, mask_name)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    }

    pipeline
        .apply_config(config)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let report = pipeline
        .compute_all()
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    print!("{}", report);
    if !report.is_clean() {
        return Err(CliError::ComputeFailed(format!(
            "{} of {} kernel layers did not complete",
            report.failed_count() + report.skipped_count(),
            report.entries().len()
        )));
    }

    std::fs::create_dir_all(&config.output.directory).map_err(|e| {
        CliError::FileAccess(geolayer::geotiff::GeotiffError::FailOpen {
            path: config.output.directory.clone(),
            source: e,
        })
    })?;
    for layer in pipeline.layers_of_kind(LayerKind::Kernel) {
        let raster = match layer.as_raster() {
            Some(raster) if raster.is_allocated() => raster,
            _ => continue,
        };
        let tif_path = config.output.directory.join(format!("{}.tif", layer.name()));
        store.save(&tif_path, raster).map_err(CliError::FileAccess)?;
        println!("wrote {}", tif_path.display());

        if config.output.export_csv {
            let csv_path = config.output.directory.join(format!("{}.csv", layer.name()));
            export_raster_csv(layer, &csv_path)
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
            println!("wrote {}", csv_path.display());
        }
    }

    println!("{}", pipeline.summary());
    Ok(())
}

fn main() {
    let args = Args::parse();

    let _guard = match init_logging(default_log_dir(), default_log_file()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => e.exit(),
    };

    match run(&config) {
        Ok(()) => process::exit(0),
        Err(e) => e.exit(),
    }
}
