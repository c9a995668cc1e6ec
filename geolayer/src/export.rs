//! CSV export of layer contents.
//!
//! A lightweight built-in exporter for inspection and downstream tooling:
//! rasters become `x,y,value` triples in world coordinates (no-data cells
//! are skipped), vector layers become one row per vertex.

use crate::layer::{Layer, LayerKind, RasterError};
use crate::pipeline::LayerError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised by CSV export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Writes a raster-shaped layer as `x,y,value` rows.
///
/// Coordinates are the world-space cell centers; cells holding the
/// no-data sentinel are omitted, so the row count equals the valid sample
/// count.
pub fn export_raster_csv(layer: &Layer, path: &Path) -> Result<(), ExportError> {
    let raster = layer.as_raster().ok_or(LayerError::KindMismatch {
        name: layer.name().to_string(),
        expected: LayerKind::Raster,
        actual: layer.kind(),
    })?;
    if !raster.is_allocated() {
        return Err(LayerError::Raster(RasterError::NotAllocated).into());
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "x,y,value")?;
    let geotransform = raster.geotransform();
    let nodata = raster.nodata();
    let mut rows = 0usize;
    for ((row, col), &value) in raster.samples().indexed_iter() {
        if value == nodata {
            continue;
        }
        let (x, y) = geotransform.cell_center(row, col);
        writeln!(writer, "{},{},{}", x, y, value)?;
        rows += 1;
    }
    writer.flush()?;
    debug!(layer = %layer.name(), path = %path.display(), rows, "raster exported");
    Ok(())
}

/// Writes a vector layer as one row per vertex.
///
/// Columns are the geometry's insertion index, its kind, the vertex
/// index, and the vertex coordinates.
pub fn export_vector_csv(layer: &Layer, path: &Path) -> Result<(), ExportError> {
    let vector = layer.as_vector().ok_or(LayerError::KindMismatch {
        name: layer.name().to_string(),
        expected: LayerKind::Vector,
        actual: layer.kind(),
    })?;

    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "geometry,kind,vertex,x,y")?;
    for (index, geometry) in vector.iter().enumerate() {
        for (vertex, (x, y)) in geometry.coordinates.iter().enumerate() {
            writeln!(
                writer,
                "{},{:?},{},{},{}",
                index, geometry.kind, vertex, x, y
            )?;
        }
    }
    writer.flush()?;
    debug!(layer = %layer.name(), path = %path.display(), "vector exported");
    Ok(())
}
