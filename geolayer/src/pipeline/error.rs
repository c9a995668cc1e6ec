//! Error types for registry and computation operations.

use crate::layer::{LayerId, LayerKind, LayerStatus, RasterError, VectorError};
use thiserror::Error;

/// Errors returned by the pipeline's registry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    /// The id is not registered with this pipeline.
    #[error("layer id {0} is not registered")]
    InvalidId(LayerId),

    /// No layer carries the given name.
    #[error("layer '{0}' not found")]
    NotFound(String),

    /// A layer with this name already exists (case-sensitive match).
    #[error("layer name '{0}' already exists")]
    NameDuplicated(String),

    /// The name is empty or contains disallowed characters.
    #[error("invalid layer name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The layer is a declared source of live kernel layers and cannot be
    /// removed.
    #[error("cannot remove layer '{name}': it is a source of {dependents:?}")]
    DependencyViolation {
        name: String,
        dependents: Vec<String>,
    },

    /// A kernel layer was declared with no sources.
    #[error("kernel layer '{0}' must declare at least one source")]
    NoSources(String),

    /// A kernel layer listed itself among its sources.
    #[error("kernel layer '{0}' cannot derive from itself")]
    SelfReference(String),

    /// The operation applies to a different kind of layer.
    #[error("layer '{name}' is a {actual} layer, expected {expected}")]
    KindMismatch {
        name: String,
        expected: LayerKind,
        actual: LayerKind,
    },

    /// The requested status change violates the lifecycle rules.
    #[error("illegal status transition from {from} to {to}")]
    InvalidTransition { from: LayerStatus, to: LayerStatus },

    /// A raster payload operation failed.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// A vector payload operation failed.
    #[error(transparent)]
    Geometry(#[from] VectorError),
}

/// Errors returned by kernel layer computation.
///
/// `SourceNotReady` is the one recoverable precondition: the caller may
/// populate the source and retry. Everything else reflects a registry or
/// configuration defect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    /// The target of a compute call is not a kernel layer.
    #[error("layer '{0}' is not a kernel layer")]
    NotKernel(String),

    /// A declared source id is absent from the pipeline.
    #[error("source layer id {0} not found")]
    SourceNotFound(LayerId),

    /// A declared source resolved to a vector layer.
    #[error("source layer '{0}' is not raster-shaped")]
    SourceNotRaster(String),

    /// A declared source has not been populated yet.
    #[error("source layer '{name}' is not ready (status: {status})")]
    SourceNotReady { name: String, status: LayerStatus },

    /// A source grid's dimensions or georeference differ from the first
    /// source's.
    #[error("source layer '{name}' shape does not match '{reference}'")]
    ShapeMismatch { name: String, reference: String },

    /// The spec names a kernel function missing from the registry.
    #[error("unknown kernel function '{0}'")]
    UnknownKernel(String),

    /// The kernel function needs more source planes than were declared.
    #[error("kernel '{function}' requires at least {required} sources, {declared} declared")]
    ArityMismatch {
        function: String,
        required: usize,
        declared: usize,
    },

    /// The dependency graph of kernel layers contains a cycle; the whole
    /// batch is aborted.
    #[error("dependency cycle among kernel layers: {0:?}")]
    CycleDetected(Vec<String>),

    /// A registry lookup failed mid-computation.
    #[error(transparent)]
    Registry(#[from] LayerError),
}

impl ComputeError {
    /// True for the recoverable "populate the source and retry" case.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, ComputeError::SourceNotReady { .. })
    }
}
