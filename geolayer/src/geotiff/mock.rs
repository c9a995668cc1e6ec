//! In-memory raster store for tests and dry runs.

use super::{GeotiffError, LoadedRaster, RasterReader, RasterWriter};
use crate::layer::RasterData;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A [`RasterReader`]/[`RasterWriter`] pair backed by a map.
///
/// Saved rasters are readable back under the same path; loading an
/// unknown path reports `FailOpen` just like the on-disk store.
#[derive(Default)]
pub struct MockRasterStore {
    rasters: Mutex<HashMap<PathBuf, LoadedRaster>>,
}

impl MockRasterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raster under `path` as if it existed on disk.
    pub fn insert(&self, path: &Path, raster: LoadedRaster) {
        self.rasters
            .lock()
            .expect("mock store lock")
            .insert(path.to_path_buf(), raster);
    }

    /// Number of stored rasters.
    pub fn len(&self) -> usize {
        self.rasters.lock().expect("mock store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RasterReader for MockRasterStore {
    fn load(&self, path: &Path) -> Result<LoadedRaster, GeotiffError> {
        self.rasters
            .lock()
            .expect("mock store lock")
            .get(path)
            .cloned()
            .ok_or_else(|| GeotiffError::FailOpen {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "not in mock store"),
            })
    }
}

impl RasterWriter for MockRasterStore {
    fn save(&self, path: &Path, raster: &RasterData) -> Result<(), GeotiffError> {
        let loaded = LoadedRaster {
            samples: raster.samples().clone(),
            geotransform: raster.geotransform(),
            nodata: Some(raster.nodata()),
        };
        self.insert(path, loaded);
        Ok(())
    }
}
