//! Raster file access boundary.
//!
//! The pipeline core never touches on-disk formats directly; everything
//! goes through the [`RasterReader`] and [`RasterWriter`] traits. The
//! shipped [`GeoTiffStore`] reads and writes single-band float TIFFs with
//! the georeference carried in an ESRI world-file sidecar (`.tfw`), so no
//! GDAL binding is required. Tests swap in the in-memory
//! [`MockRasterStore`].

mod mock;
mod store;
mod world_file;

pub use mock::MockRasterStore;
pub use store::GeoTiffStore;
pub use world_file::{read_world_file, world_file_path, write_world_file};

use crate::layer::{Geotransform, RasterData};
use ndarray::Array2;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by raster file access.
#[derive(Debug, Error)]
pub enum GeotiffError {
    /// The file could not be opened at all.
    #[error("failed to open '{path}': {source}")]
    FailOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but is not a raster this reader understands.
    #[error("invalid raster file '{path}': {detail}")]
    FileInvalid { path: PathBuf, detail: String },

    /// The file is structurally valid but carries no samples.
    #[error("raster file '{path}' contains no samples")]
    FileEmpty { path: PathBuf },

    /// An underlying I/O operation failed mid-read or mid-write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A raster grid as it comes off disk: samples, georeference, and the
/// file's no-data sentinel when the format records one.
#[derive(Debug, Clone)]
pub struct LoadedRaster {
    /// Row-major sample grid, `(height, width)`.
    pub samples: Array2<f64>,
    /// Georeference of the grid.
    pub geotransform: Geotransform,
    /// No-data sentinel, when the source format records one.
    pub nodata: Option<f64>,
}

/// Loads raster grids with their georeference.
pub trait RasterReader {
    fn load(&self, path: &Path) -> Result<LoadedRaster, GeotiffError>;
}

/// Saves raster grids with their georeference.
pub trait RasterWriter {
    fn save(&self, path: &Path, raster: &RasterData) -> Result<(), GeotiffError>;
}
