//! Windowed kernel functions and their registry.
//!
//! A kernel function maps a window of source samples to one derived
//! sample. The engine in [`crate::pipeline`] owns the edge policy and
//! no-data propagation: windows handed to a kernel never contain the
//! no-data sentinel, and cells whose window would leave the grid are
//! written as no-data without consulting the kernel at all.
//!
//! Functions are pluggable. The [`KernelRegistry`] maps operation names
//! (as they appear in a [`KernelSpec`](crate::layer::KernelSpec)) to
//! builders; the pipeline consults it by name at computation time, so
//! callers can register their own functions next to the built-ins.

mod functions;
mod registry;
mod window;

pub use functions::{Diff, Max, Mean, Min, Range, Roughness, Slope, Threshold};
pub use registry::{KernelBuilder, KernelRegistry};
pub use window::KernelWindow;

/// A windowed numeric function mapping neighboring source samples to one
/// derived sample.
///
/// Implementations must be pure: the same window must always produce the
/// same sample, since the engine may evaluate cells in any order and from
/// multiple threads.
pub trait KernelFunction: Send + Sync {
    /// The registry name this instance was built under.
    fn name(&self) -> &str;

    /// Minimum number of source planes the window must carry.
    ///
    /// The pipeline validates a kernel layer's declared sources against
    /// this before computing.
    fn min_sources(&self) -> usize {
        1
    }

    /// Derives one sample from the window.
    fn evaluate(&self, window: &KernelWindow<'_>) -> f64;
}
