//! GeoLayer - Geospatial layer registry and raster derivation pipeline
//!
//! This library manages a typed collection of geospatial layers (raster
//! grids, vector feature sets, and rasters derived through windowed kernel
//! operations) and orchestrates how derived layers are computed from their
//! sources.
//!
//! # High-Level API
//!
//! Most callers interact with the [`pipeline::Pipeline`], which owns every
//! layer and resolves derivation order:
//!
//! ```
//! use geolayer::layer::KernelSpec;
//! use geolayer::pipeline::Pipeline;
//!
//! let mut pipeline = Pipeline::new();
//! let elevation = pipeline.create_raster_layer("elevation").unwrap();
//! pipeline
//!     .create_kernel_layer("roughness", &[elevation], KernelSpec::new("range", 1))
//!     .unwrap();
//! ```
//!
//! Raster file access lives behind the [`geotiff`] traits so the core never
//! touches GDAL or on-disk formats directly.

pub mod config;
pub mod export;
pub mod geotiff;
pub mod kernel;
pub mod layer;
pub mod logging;
pub mod pipeline;

/// Version of the GeoLayer library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
