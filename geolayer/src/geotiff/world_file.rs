//! ESRI world-file sidecars.
//!
//! A world file is six lines of plain text: pixel X size, row rotation,
//! column rotation, pixel Y size, then the world X/Y of the *center* of
//! the upper-left pixel. Rotation terms are written as zero and rejected
//! when non-zero, since the grid model is axis-aligned.

use super::GeotiffError;
use crate::layer::Geotransform;
use std::fs;
use std::path::{Path, PathBuf};

/// Sidecar path for a raster file (`bathymetry.tif` -> `bathymetry.tfw`).
pub fn world_file_path(raster_path: &Path) -> PathBuf {
    raster_path.with_extension("tfw")
}

/// Writes the six-line world file next to a raster.
pub fn write_world_file(path: &Path, geotransform: &Geotransform) -> Result<(), GeotiffError> {
    let center_x = geotransform.origin_x + geotransform.pixel_x / 2.0;
    let center_y = geotransform.origin_y + geotransform.pixel_y / 2.0;
    let content = format!(
        "{}\n0.0\n0.0\n{}\n{}\n{}\n",
        geotransform.pixel_x, geotransform.pixel_y, center_x, center_y
    );
    fs::write(path, content)?;
    Ok(())
}

/// Reads a world file back into a geotransform.
pub fn read_world_file(path: &Path) -> Result<Geotransform, GeotiffError> {
    let content = fs::read_to_string(path).map_err(|source| GeotiffError::FailOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let values: Vec<f64> = content
        .lines()
        .take(6)
        .map(|line| line.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| GeotiffError::FileInvalid {
            path: path.to_path_buf(),
            detail: format!("malformed world file: {}", e),
        })?;
    if values.len() != 6 {
        return Err(GeotiffError::FileInvalid {
            path: path.to_path_buf(),
            detail: format!("world file has {} lines, expected 6", values.len()),
        });
    }
    if values[1] != 0.0 || values[2] != 0.0 {
        return Err(GeotiffError::FileInvalid {
            path: path.to_path_buf(),
            detail: "rotated rasters are not supported".to_string(),
        });
    }
    let pixel_x = values[0];
    let pixel_y = values[3];
    Ok(Geotransform {
        origin_x: values[4] - pixel_x / 2.0,
        origin_y: values[5] - pixel_y / 2.0,
        pixel_x,
        pixel_y,
    })
}
