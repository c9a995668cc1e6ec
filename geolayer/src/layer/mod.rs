//! Layer entity model.
//!
//! A [`Layer`] is a named, typed unit of geospatial data owned by a
//! [`Pipeline`](crate::pipeline::Pipeline). The closed set of layer kinds
//! is expressed as a tagged payload variant rather than an inheritance
//! chain: every layer shares identity and status fields, and behavior
//! dispatches on [`LayerKind`].
//!
//! Layers are created only through the pipeline's creation API, which
//! assigns the process-unique [`LayerId`] and the pipeline-unique name.

mod error;
mod kernel;
mod raster;
mod vector;

pub use error::{RasterError, VectorError};
pub use kernel::{KernelData, KernelSpec};
pub use raster::{Geotransform, RasterData, RasterStats, DEFAULT_NODATA};
pub use vector::{Geometry, GeometryKind, VectorData};

use std::fmt;

/// Identifier assigned to a layer at registration.
///
/// Unique for the lifetime of the owning pipeline and never reused, even
/// after the layer is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub(crate) u32);

impl LayerId {
    /// Raw numeric value, for display and sorting.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind tag of a layer, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// A 2-D numeric grid with georeferencing.
    Raster,
    /// An ordered set of vector geometries with attributes.
    Vector,
    /// A raster derived from one or more source rasters via a kernel.
    Kernel,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Raster => write!(f, "raster"),
            LayerKind::Vector => write!(f, "vector"),
            LayerKind::Kernel => write!(f, "kernel"),
        }
    }
}

/// Lifecycle state of a layer.
///
/// Transitions move forward from `Empty` to `Valid`; any state may fall to
/// `Invalid` on failure. No transition back to `Empty` is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerStatus {
    /// The layer's content failed to materialize and must not be read.
    Invalid,
    /// The layer exists but holds no committed data yet.
    Empty,
    /// The layer's content is fully populated and readable.
    Valid,
}

impl fmt::Display for LayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerStatus::Invalid => write!(f, "invalid"),
            LayerStatus::Empty => write!(f, "empty"),
            LayerStatus::Valid => write!(f, "valid"),
        }
    }
}

impl LayerStatus {
    /// Whether a transition from `self` to `to` is permitted.
    ///
    /// Falling to `Invalid` is always allowed, rising to `Valid` is always
    /// allowed, and nothing returns to `Empty` after leaving it.
    pub fn can_transition_to(&self, to: LayerStatus) -> bool {
        match to {
            LayerStatus::Invalid | LayerStatus::Valid => true,
            LayerStatus::Empty => *self == LayerStatus::Empty,
        }
    }
}

/// Per-kind payload of a layer.
#[derive(Debug, Clone)]
pub enum LayerPayload {
    Raster(RasterData),
    Vector(VectorData),
    Kernel(KernelData),
}

/// A named, typed unit of geospatial data.
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    name: String,
    status: LayerStatus,
    payload: LayerPayload,
}

impl Layer {
    /// Constructs a layer around a payload. Crate-private: layers come to
    /// life only through the pipeline's creation API.
    pub(crate) fn new(id: LayerId, name: String, payload: LayerPayload) -> Self {
        Layer {
            id,
            name,
            status: LayerStatus::Empty,
            payload,
        }
    }

    /// The identifier assigned at registration.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The pipeline-unique, case-sensitive name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind tag, fixed at construction.
    pub fn kind(&self) -> LayerKind {
        match self.payload {
            LayerPayload::Raster(_) => LayerKind::Raster,
            LayerPayload::Vector(_) => LayerKind::Vector,
            LayerPayload::Kernel(_) => LayerKind::Kernel,
        }
    }

    /// The current lifecycle status.
    pub fn status(&self) -> LayerStatus {
        self.status
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_status_unchecked(&mut self, status: LayerStatus) {
        self.status = status;
    }

    /// Raster view of the layer.
    ///
    /// Returns the grid for raster layers and for kernel layers, which are
    /// raster-shaped by construction. `None` for vector layers.
    pub fn as_raster(&self) -> Option<&RasterData> {
        match &self.payload {
            LayerPayload::Raster(raster) => Some(raster),
            LayerPayload::Kernel(kernel) => Some(kernel.raster()),
            LayerPayload::Vector(_) => None,
        }
    }

    /// Mutable raster view; same shape rules as [`Layer::as_raster`].
    pub fn as_raster_mut(&mut self) -> Option<&mut RasterData> {
        match &mut self.payload {
            LayerPayload::Raster(raster) => Some(raster),
            LayerPayload::Kernel(kernel) => Some(kernel.raster_mut()),
            LayerPayload::Vector(_) => None,
        }
    }

    /// Vector payload, if this is a vector layer.
    pub fn as_vector(&self) -> Option<&VectorData> {
        match &self.payload {
            LayerPayload::Vector(vector) => Some(vector),
            _ => None,
        }
    }

    pub(crate) fn as_vector_mut(&mut self) -> Option<&mut VectorData> {
        match &mut self.payload {
            LayerPayload::Vector(vector) => Some(vector),
            _ => None,
        }
    }

    /// Kernel payload, if this is a kernel layer.
    pub fn as_kernel(&self) -> Option<&KernelData> {
        match &self.payload {
            LayerPayload::Kernel(kernel) => Some(kernel),
            _ => None,
        }
    }

    pub(crate) fn as_kernel_mut(&mut self) -> Option<&mut KernelData> {
        match &mut self.payload {
            LayerPayload::Kernel(kernel) => Some(kernel),
            _ => None,
        }
    }

    /// True for layers that carry a grid (raster and kernel layers).
    pub fn is_raster_shaped(&self) -> bool {
        !matches!(self.payload, LayerPayload::Vector(_))
    }
}
