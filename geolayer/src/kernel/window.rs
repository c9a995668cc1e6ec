//! The sample window handed to kernel functions.

/// A square window of source samples centered on one destination cell.
///
/// Carries one row-major `side x side` plane per source layer, in the
/// order the kernel layer declared its sources, plus the pixel size of the
/// shared georeference for kernels that reason in world units.
///
/// Every sample in every plane is valid: the engine never builds a window
/// across a no-data cell.
#[derive(Debug)]
pub struct KernelWindow<'a> {
    planes: &'a [Vec<f64>],
    side: usize,
    pixel_size: (f64, f64),
}

impl<'a> KernelWindow<'a> {
    pub(crate) fn new(planes: &'a [Vec<f64>], side: usize, pixel_size: (f64, f64)) -> Self {
        debug_assert!(side % 2 == 1, "window side must be odd");
        debug_assert!(planes.iter().all(|p| p.len() == side * side));
        KernelWindow {
            planes,
            side,
            pixel_size,
        }
    }

    /// Side length of the window (`2 * radius + 1`).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of source planes.
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Row-major samples of one source plane.
    ///
    /// # Panics
    ///
    /// Panics if `plane` is out of range; the pipeline validates kernel
    /// arity before building windows.
    pub fn plane(&self, plane: usize) -> &[f64] {
        &self.planes[plane]
    }

    /// Samples of the first (primary) source plane.
    pub fn samples(&self) -> &[f64] {
        self.plane(0)
    }

    /// The sample under the window center in the given plane.
    pub fn center(&self, plane: usize) -> f64 {
        self.planes[plane][(self.side * self.side) / 2]
    }

    /// Absolute pixel size of the shared georeference, `(x, y)`.
    pub fn pixel_size(&self) -> (f64, f64) {
        self.pixel_size
    }
}
