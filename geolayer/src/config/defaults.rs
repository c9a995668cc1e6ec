//! Default values for pipeline configuration.

/// Layer name the input raster is registered under when none is given.
pub const DEFAULT_INPUT_LAYER: &str = "elevation";

/// Directory derived rasters are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Window radius used when a kernel section omits one.
pub const DEFAULT_KERNEL_RADIUS: u32 = 1;

/// Worker thread count; zero lets the runtime use every core.
pub const DEFAULT_THREADS: usize = 0;
