//! Single-band float TIFF storage with world-file georeference.

use super::world_file::{read_world_file, world_file_path, write_world_file};
use super::{GeotiffError, LoadedRaster, RasterReader, RasterWriter};
use crate::layer::{Geotransform, RasterData};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};
use tracing::{debug, warn};

/// Reads and writes single-band grayscale TIFFs.
///
/// Samples are stored as 64-bit floats; on read, any single-band integer
/// or float depth is widened to `f64`. The georeference travels in a
/// `.tfw` world-file sidecar; a missing sidecar falls back to the default
/// geotransform rather than failing, since pixel-space rasters are still
/// usable. No-data sentinels are not recorded by this format and must be
/// supplied by the caller.
pub struct GeoTiffStore;

impl GeoTiffStore {
    pub fn new() -> Self {
        GeoTiffStore
    }
}

impl Default for GeoTiffStore {
    fn default() -> Self {
        Self::new()
    }
}

fn widen(result: DecodingResult) -> Vec<f64> {
    match result {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|s| s as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|s| s as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
    }
}

impl RasterReader for GeoTiffStore {
    fn load(&self, path: &Path) -> Result<LoadedRaster, GeotiffError> {
        let file = File::open(path).map_err(|source| GeotiffError::FailOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| GeotiffError::FileInvalid {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        let (width, height) = decoder.dimensions().map_err(|e| GeotiffError::FileInvalid {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        if width == 0 || height == 0 {
            return Err(GeotiffError::FileEmpty {
                path: path.to_path_buf(),
            });
        }

        let decoded = decoder.read_image().map_err(|e| GeotiffError::FileInvalid {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let samples = widen(decoded);
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(GeotiffError::FileInvalid {
                path: path.to_path_buf(),
                detail: format!(
                    "expected {} single-band samples, decoded {}",
                    expected,
                    samples.len()
                ),
            });
        }
        let samples = Array2::from_shape_vec((height as usize, width as usize), samples)
            .map_err(|e| GeotiffError::FileInvalid {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        let sidecar = world_file_path(path);
        let geotransform = match read_world_file(&sidecar) {
            Ok(geotransform) => geotransform,
            Err(GeotiffError::FailOpen { .. }) => {
                debug!(path = %sidecar.display(), "no world file, using pixel coordinates");
                Geotransform::default()
            }
            Err(err) => {
                warn!(path = %sidecar.display(), error = %err, "ignoring unreadable world file");
                Geotransform::default()
            }
        };

        debug!(path = %path.display(), width, height, "raster loaded");
        Ok(LoadedRaster {
            samples,
            geotransform,
            nodata: None,
        })
    }
}

impl RasterWriter for GeoTiffStore {
    fn save(&self, path: &Path, raster: &RasterData) -> Result<(), GeotiffError> {
        let file = File::create(path).map_err(|source| GeotiffError::FailOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut encoder =
            TiffEncoder::new(BufWriter::new(file)).map_err(|e| GeotiffError::FileInvalid {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        let flat: Vec<f64> = raster.samples().iter().copied().collect();
        encoder
            .write_image::<colortype::Gray64Float>(
                raster.width() as u32,
                raster.height() as u32,
                &flat,
            )
            .map_err(|e| GeotiffError::FileInvalid {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        write_world_file(&world_file_path(path), &raster.geotransform())?;
        debug!(path = %path.display(), "raster saved");
        Ok(())
    }
}
