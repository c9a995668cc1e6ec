//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file. These
//! are pure data types with no parsing or serialization logic.

use super::defaults::{
    DEFAULT_INPUT_LAYER, DEFAULT_KERNEL_RADIUS, DEFAULT_OUTPUT_DIR, DEFAULT_THREADS,
};
use std::path::PathBuf;

/// Complete configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    /// Input raster settings
    pub input: InputSettings,
    /// Output settings
    pub output: OutputSettings,
    /// Computation settings
    pub compute: ComputeSettings,
    /// Kernel layers to derive, in declaration order
    pub kernels: Vec<KernelLayerConfig>,
}

/// Input raster configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSettings {
    /// Path of the raster to load; `None` when the caller registers
    /// layers programmatically.
    pub path: Option<PathBuf>,
    /// Layer name the raster is registered under.
    pub layer: String,
    /// No-data sentinel, overriding whatever the file records.
    pub nodata: Option<f64>,
    /// When set, a valid-data mask layer is derived under this name.
    pub mask_layer: Option<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        InputSettings {
            path: None,
            layer: DEFAULT_INPUT_LAYER.to_string(),
            nodata: None,
            mask_layer: None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Directory derived rasters are saved into.
    pub directory: PathBuf,
    /// Also export each derived raster as CSV.
    pub export_csv: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            export_csv: false,
        }
    }
}

/// Computation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeSettings {
    /// Worker threads for the per-cell kernel loop; 0 = all cores.
    pub threads: usize,
}

impl Default for ComputeSettings {
    fn default() -> Self {
        ComputeSettings {
            threads: DEFAULT_THREADS,
        }
    }
}

/// One kernel layer to derive.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelLayerConfig {
    /// Name of the derived layer.
    pub name: String,
    /// Source layer names, resolved at registration time.
    pub sources: Vec<String>,
    /// Kernel function name in the registry.
    pub function: String,
    /// Window radius.
    pub radius: u32,
    /// Numeric parameters for the function's builder.
    pub params: Vec<f64>,
}

impl KernelLayerConfig {
    pub fn new(name: &str, sources: Vec<String>, function: &str) -> Self {
        KernelLayerConfig {
            name: name.to_string(),
            sources,
            function: function.to_string(),
            radius: DEFAULT_KERNEL_RADIUS,
            params: Vec::new(),
        }
    }
}
