//! Kernel payload: a derived raster plus its derivation recipe.

use super::raster::RasterData;
use super::LayerId;

/// Recipe for deriving a raster through a windowed kernel operation.
///
/// Names a kernel function in the pipeline's registry, the window radius
/// (a radius of `r` spans a `(2r+1) x (2r+1)` window), and free-form
/// numeric parameters interpreted by the function's builder.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelSpec {
    pub function: String,
    pub radius: u32,
    pub params: Vec<f64>,
}

impl KernelSpec {
    pub fn new(function: &str, radius: u32) -> Self {
        KernelSpec {
            function: function.to_string(),
            radius,
            params: Vec::new(),
        }
    }

    /// Attaches numeric parameters, builder style.
    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = params;
        self
    }

    /// Side length of the sampling window.
    pub fn window_side(&self) -> usize {
        2 * self.radius as usize + 1
    }
}

/// Payload of a kernel layer: the derived grid (unallocated until the first
/// successful computation), the ordered source layer ids, and the spec.
#[derive(Debug, Clone)]
pub struct KernelData {
    raster: RasterData,
    source_ids: Vec<LayerId>,
    spec: KernelSpec,
}

impl KernelData {
    pub(crate) fn new(source_ids: Vec<LayerId>, spec: KernelSpec) -> Self {
        KernelData {
            raster: RasterData::new(),
            source_ids,
            spec,
        }
    }

    /// The ordered ids of the layers this one derives from.
    pub fn source_ids(&self) -> &[LayerId] {
        &self.source_ids
    }

    pub(crate) fn set_source_ids(&mut self, source_ids: Vec<LayerId>) {
        self.source_ids = source_ids;
    }

    /// The derivation recipe.
    pub fn spec(&self) -> &KernelSpec {
        &self.spec
    }

    /// The derived grid; unallocated until a computation has completed.
    pub fn raster(&self) -> &RasterData {
        &self.raster
    }

    pub(crate) fn raster_mut(&mut self) -> &mut RasterData {
        &mut self.raster
    }

    /// Replaces the derived grid wholesale after a computation.
    pub(crate) fn install_grid(&mut self, raster: RasterData) {
        self.raster = raster;
    }

    /// Discards any partial grid contents.
    pub(crate) fn discard_grid(&mut self) {
        self.raster.deallocate();
    }
}
