//! Layer registry and derivation orchestrator.
//!
//! The [`Pipeline`] owns every [`Layer`](crate::layer::Layer), indexes them
//! by id and by name, and materializes kernel layers from their declared
//! sources in dependency order.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Pipeline                          │
//! │   id arena (BTreeMap)  +  name index (HashMap)           │
//! │   sole owner / sole mutator of all layers                │
//! └──────────────────────────────────────────────────────────┘
//!         │ create / get / remove            │ compute
//!         ▼                                  ▼
//! ┌──────────────────┐            ┌─────────────────────────┐
//! │  Layer entities  │            │  Kernel engine          │
//! │  raster/vector/  │◄───reads───│  topological order,     │
//! │  kernel payloads │   writes──►│  windowed apply, edge   │
//! └──────────────────┘            │  and no-data policy     │
//!                                 └─────────────────────────┘
//! ```
//!
//! Kernel layers reference their sources by [`LayerId`](crate::layer::LayerId),
//! resolved through the arena on every computation; no layer ever owns
//! another, so dependency cycles are representable — and detected — as a
//! data error rather than an ownership hazard.

mod compute;
mod error;
mod registry;
mod report;

pub use compute::configure_thread_pool;
pub use error::{ComputeError, LayerError};
pub use registry::{Pipeline, PipelineSummary};
pub use report::{ComputeOutcome, ComputeReport, ReportEntry};
