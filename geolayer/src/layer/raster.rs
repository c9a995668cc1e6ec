//! Raster grid payload: a 2-D numeric grid plus georeferencing.

use super::error::RasterError;
use ndarray::Array2;

/// Default no-data sentinel for raster layers.
///
/// Matches the conventional GIS fill value used by the supported file
/// formats, so freshly allocated grids round-trip without remapping.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// Affine georeference of a north-up raster grid.
///
/// Maps grid indices to world coordinates: the world position of the
/// upper-left corner plus a signed pixel size per axis. Rotation terms are
/// not modeled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geotransform {
    /// World X of the grid's upper-left corner.
    pub origin_x: f64,
    /// World Y of the grid's upper-left corner.
    pub origin_y: f64,
    /// Signed pixel width (world units per column).
    pub pixel_x: f64,
    /// Signed pixel height (world units per row, negative for north-up).
    pub pixel_y: f64,
}

impl Default for Geotransform {
    fn default() -> Self {
        Geotransform {
            origin_x: 0.0,
            origin_y: 0.0,
            pixel_x: 1.0,
            pixel_y: -1.0,
        }
    }
}

impl Geotransform {
    /// World coordinates of a cell's center.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.pixel_x,
            self.origin_y + (row as f64 + 0.5) * self.pixel_y,
        )
    }
}

/// Summary statistics over the valid samples of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stdev: f64,
}

/// A 2-D numeric grid with georeferencing and a no-data sentinel.
///
/// Freshly constructed grids are unallocated (0x0); [`RasterData::allocate`]
/// sizes the grid and fills it with the no-data sentinel. All sample access
/// is bounds-checked.
#[derive(Debug, Clone)]
pub struct RasterData {
    samples: Array2<f64>,
    geotransform: Geotransform,
    nodata: f64,
}

impl RasterData {
    /// An unallocated grid with default georeference and sentinel.
    pub fn new() -> Self {
        RasterData {
            samples: Array2::zeros((0, 0)),
            geotransform: Geotransform::default(),
            nodata: DEFAULT_NODATA,
        }
    }

    /// Builds an allocated grid from an existing sample array.
    ///
    /// # Errors
    ///
    /// Fails with [`RasterError::InvalidDimensions`] when either dimension
    /// is zero.
    pub fn from_grid(
        samples: Array2<f64>,
        geotransform: Geotransform,
        nodata: f64,
    ) -> Result<Self, RasterError> {
        let (height, width) = samples.dim();
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        Ok(RasterData {
            samples,
            geotransform,
            nodata,
        })
    }

    /// Sizes the grid to `width` x `height` and fills every cell with the
    /// no-data sentinel.
    ///
    /// # Errors
    ///
    /// Fails with [`RasterError::InvalidDimensions`] when either dimension
    /// is zero; the previous contents are untouched in that case.
    pub fn allocate(&mut self, width: usize, height: usize, nodata: f64) -> Result<(), RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        self.samples = Array2::from_elem((height, width), nodata);
        self.nodata = nodata;
        Ok(())
    }

    /// Discards the grid contents, returning to the unallocated state.
    pub(crate) fn deallocate(&mut self) {
        self.samples = Array2::zeros((0, 0));
    }

    /// Whether the grid has been allocated.
    pub fn is_allocated(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.samples.dim().1
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.samples.dim().0
    }

    /// The no-data sentinel.
    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    /// The affine georeference.
    pub fn geotransform(&self) -> Geotransform {
        self.geotransform
    }

    /// Replaces the georeference.
    ///
    /// # Errors
    ///
    /// Fails with [`RasterError::InvalidGeotransform`] if either pixel size
    /// is zero.
    pub fn set_geotransform(&mut self, geotransform: Geotransform) -> Result<(), RasterError> {
        if geotransform.pixel_x == 0.0 || geotransform.pixel_y == 0.0 {
            return Err(RasterError::InvalidGeotransform);
        }
        self.geotransform = geotransform;
        Ok(())
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), RasterError> {
        if row >= self.height() || col >= self.width() {
            return Err(RasterError::OutOfRange {
                row,
                col,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }

    /// Reads one sample, bounds-checked.
    pub fn get(&self, row: usize, col: usize) -> Result<f64, RasterError> {
        self.check_bounds(row, col)?;
        Ok(self.samples[[row, col]])
    }

    /// Writes one sample, bounds-checked.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), RasterError> {
        self.check_bounds(row, col)?;
        self.samples[[row, col]] = value;
        Ok(())
    }

    /// True iff the stored value is not the no-data sentinel.
    pub fn is_valid_sample(&self, row: usize, col: usize) -> Result<bool, RasterError> {
        Ok(self.get(row, col)? != self.nodata)
    }

    /// Read-only view of the sample array, row-major `(height, width)`.
    pub fn samples(&self) -> &Array2<f64> {
        &self.samples
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: f64) {
        self.samples.fill(value);
    }

    /// True when both grids have identical dimensions and georeference.
    pub fn shape_matches(&self, other: &RasterData) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.geotransform == other.geotransform
    }

    /// Min/max/mean/standard deviation over valid samples.
    ///
    /// Returns `None` when the grid is unallocated or every sample is the
    /// no-data sentinel.
    pub fn stats(&self) -> Option<RasterStats> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;
        for &v in self.samples.iter() {
            if v == self.nodata {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let mean = sum / count as f64;
        let mut sq_sum = 0.0;
        for &v in self.samples.iter() {
            if v != self.nodata {
                sq_sum += (v - mean) * (v - mean);
            }
        }
        Some(RasterStats {
            min,
            max,
            mean,
            stdev: (sq_sum / count as f64).sqrt(),
        })
    }
}

impl Default for RasterData {
    fn default() -> Self {
        Self::new()
    }
}
