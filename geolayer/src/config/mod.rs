//! Configuration value objects for pipeline runs.
//!
//! The CLI (or any other front end) parses flags and files into a
//! [`PipelineConfig`] and hands it to the library; the core never reads
//! ambient parser state. Settings structs are pure data, constants live
//! in [`defaults`], and INI parsing is isolated in the parser submodule.

mod defaults;
mod parser;
mod settings;

pub use defaults::{DEFAULT_INPUT_LAYER, DEFAULT_KERNEL_RADIUS, DEFAULT_OUTPUT_DIR};
pub use parser::ConfigError;
pub use settings::{
    ComputeSettings, InputSettings, KernelLayerConfig, OutputSettings, PipelineConfig,
};

use std::path::Path;

impl PipelineConfig {
    /// Loads a configuration from an INI file.
    ///
    /// Missing sections fall back to defaults; `[kernel.<name>]` sections
    /// each describe one kernel layer to derive.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = ini::Ini::load_from_file(path)?;
        parser::parse_ini(&ini)
    }

    /// Parses a configuration from INI text, for callers that already
    /// hold the contents.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigError> {
        let ini = ini::Ini::load_from_str(content).map_err(ini::Error::Parse)?;
        parser::parse_ini(&ini)
    }
}
