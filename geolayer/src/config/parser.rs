//! INI parsing logic for converting `Ini` -> `PipelineConfig`.
//!
//! This is the single place where INI key names are mapped to struct
//! fields. Kernel layers are declared as `[kernel.<name>]` sections.

use super::settings::{KernelLayerConfig, PipelineConfig};
use ini::Ini;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file
    #[error("failed to read config file: {0}")]
    Read(#[from] ini::Error),

    /// A required key is absent
    #[error("missing required key {section}.{key}")]
    MissingKey { section: String, key: String },

    /// A key holds an unusable value
    #[error("invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_f64(section: &str, key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a number"))
}

fn parse_u32(section: &str, key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

fn parse_usize(section: &str, key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(invalid(section, key, value, "must be true or false")),
    }
}

fn parse_name_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an `Ini` object into a `PipelineConfig`.
///
/// Starts from `PipelineConfig::default()` and overlays any values found
/// in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<PipelineConfig, ConfigError> {
    let mut config = PipelineConfig::default();

    // [input] section
    if let Some(section) = ini.section(Some("input")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.input.path = Some(PathBuf::from(v));
            }
        }
        if let Some(v) = section.get("layer") {
            let v = v.trim();
            if !v.is_empty() {
                config.input.layer = v.to_string();
            }
        }
        if let Some(v) = section.get("nodata") {
            config.input.nodata = Some(parse_f64("input", "nodata", v)?);
        }
        if let Some(v) = section.get("mask") {
            let v = v.trim();
            if !v.is_empty() {
                config.input.mask_layer = Some(v.to_string());
            }
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.output.directory = PathBuf::from(v);
            }
        }
        if let Some(v) = section.get("export_csv") {
            config.output.export_csv = parse_bool("output", "export_csv", v)?;
        }
    }

    // [compute] section
    if let Some(section) = ini.section(Some("compute")) {
        if let Some(v) = section.get("threads") {
            config.compute.threads = parse_usize("compute", "threads", v)?;
        }
    }

    // [kernel.<name>] sections, kept in declaration order
    for (section_name, properties) in ini.iter() {
        let Some(section_name) = section_name else {
            continue;
        };
        let Some(kernel_name) = section_name.strip_prefix("kernel.") else {
            continue;
        };
        if kernel_name.is_empty() {
            return Err(invalid(section_name, "name", "", "kernel name is empty"));
        }

        let sources = properties
            .get("sources")
            .map(parse_name_list)
            .unwrap_or_default();
        if sources.is_empty() {
            return Err(ConfigError::MissingKey {
                section: section_name.to_string(),
                key: "sources".to_string(),
            });
        }
        let function = properties
            .get("function")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingKey {
                section: section_name.to_string(),
                key: "function".to_string(),
            })?;

        let mut kernel = KernelLayerConfig::new(kernel_name, sources, function);
        if let Some(v) = properties.get("radius") {
            kernel.radius = parse_u32(section_name, "radius", v)?;
        }
        if let Some(v) = properties.get("params") {
            kernel.params = parse_name_list(v)
                .iter()
                .map(|p| parse_f64(section_name, "params", p))
                .collect::<Result<_, _>>()?;
        }
        config.kernels.push(kernel);
    }

    Ok(config)
}
