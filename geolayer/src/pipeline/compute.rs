//! Kernel layer derivation: single-layer compute and the batch
//! orchestrator.
//!
//! The per-cell loop reads only from source grids and writes disjoint
//! destination cells, so rows are derived in parallel with rayon; the
//! result grid is installed, and the status flipped to valid, only after
//! the whole loop has joined.

use super::error::{ComputeError, LayerError};
use super::registry::Pipeline;
use super::report::{ComputeOutcome, ComputeReport};
use crate::kernel::{KernelFunction, KernelWindow};
use crate::layer::{LayerId, LayerStatus, RasterData};
use ndarray::Array2;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, info, warn};

/// Sizes the worker pool used by the per-cell kernel loop.
///
/// Zero keeps the default of one worker per core. Must run before the
/// first computation; once the pool exists the call has no effect and is
/// reported at debug level.
pub fn configure_thread_pool(threads: usize) {
    if threads == 0 {
        return;
    }
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        debug!(threads, error = %err, "worker pool already initialized");
    }
}

impl Pipeline {
    /// Derives one kernel layer from its declared sources.
    ///
    /// Follows the five-step contract: resolve sources, require them
    /// valid, require matching shapes, apply the kernel window by window,
    /// then commit. Cells whose window would extend outside the source
    /// grid are written as no-data, and any no-data sample inside a window
    /// propagates no-data to the destination cell.
    ///
    /// # Errors
    ///
    /// [`ComputeError::SourceNotReady`] is recoverable and leaves the
    /// layer untouched; the caller may populate the source and retry. Any
    /// other failure marks the layer invalid and discards partial data, so
    /// a partially-derived grid is never observable.
    pub fn compute(&mut self, id: LayerId) -> Result<(), ComputeError> {
        match self.run_kernel(id) {
            Ok(grid) => {
                let layer = self.get_mut(id).map_err(ComputeError::Registry)?;
                let name = layer.name().to_string();
                if let Some(kernel) = layer.as_kernel_mut() {
                    kernel.install_grid(grid);
                }
                layer.set_status_unchecked(LayerStatus::Valid);
                info!(layer = %name, %id, "kernel layer computed");
                Ok(())
            }
            Err(err) => {
                let target_exists_as_kernel = !matches!(
                    err,
                    ComputeError::NotKernel(_) | ComputeError::Registry(LayerError::InvalidId(_))
                );
                if target_exists_as_kernel && !err.is_not_ready() {
                    if let Ok(layer) = self.get_mut(id) {
                        if let Some(kernel) = layer.as_kernel_mut() {
                            kernel.discard_grid();
                        }
                        layer.set_status_unchecked(LayerStatus::Invalid);
                        warn!(%id, error = %err, "kernel layer invalidated");
                    }
                } else {
                    debug!(%id, error = %err, "kernel layer not computed");
                }
                Err(err)
            }
        }
    }

    /// Derives every kernel layer in dependency order.
    ///
    /// A cycle among kernel layers is a fatal configuration error: it is
    /// reported and the whole batch is aborted before anything computes.
    /// Individual failures are recorded per layer; their transitive
    /// dependents are skipped (and reported individually) while
    /// independent branches still complete.
    pub fn compute_all(&mut self) -> Result<ComputeReport, ComputeError> {
        let order = self.kernel_order()?;
        debug!(kernel_layers = order.len(), "starting batch computation");

        let mut report = ComputeReport::new();
        let mut unusable: BTreeSet<LayerId> = BTreeSet::new();
        for id in order {
            let (name, sources) = match self.get(id).ok().and_then(|layer| {
                layer
                    .as_kernel()
                    .map(|k| (layer.name().to_string(), k.source_ids().to_vec()))
            }) {
                Some(parts) => parts,
                // Unreachable given the order came from the registry, but a
                // report entry is more useful than a panic.
                None => continue,
            };

            if let Some(&blocked) = sources.iter().find(|s| unusable.contains(s)) {
                let blocked_on = self
                    .get(blocked)
                    .map(|l| l.name().to_string())
                    .unwrap_or_else(|_| blocked.to_string());
                warn!(layer = %name, blocked_on = %blocked_on, "skipping dependent of failed layer");
                unusable.insert(id);
                report.push(id, name, ComputeOutcome::Skipped { blocked_on });
                continue;
            }

            match self.compute(id) {
                Ok(()) => report.push(id, name, ComputeOutcome::Completed),
                Err(err) => {
                    unusable.insert(id);
                    report.push(id, name, ComputeOutcome::Failed(err));
                }
            }
        }
        info!(%report, "batch computation finished");
        Ok(report)
    }

    /// Topological order of kernel layers by their kernel-layer sources.
    ///
    /// Raster and vector sources impose no ordering; only kernel-to-kernel
    /// edges are considered. Ties resolve in creation (id) order so batch
    /// runs are deterministic.
    fn kernel_order(&self) -> Result<Vec<LayerId>, ComputeError> {
        let kernel_ids = self.kernel_ids();
        let kernel_set: BTreeSet<LayerId> = kernel_ids.iter().copied().collect();

        let mut indegree: BTreeMap<LayerId, usize> =
            kernel_ids.iter().map(|&id| (id, 0)).collect();
        let mut dependents: BTreeMap<LayerId, Vec<LayerId>> = BTreeMap::new();
        for &id in &kernel_ids {
            let layer = self.get(id).map_err(ComputeError::Registry)?;
            if let Some(kernel) = layer.as_kernel() {
                for &source in kernel.source_ids() {
                    if kernel_set.contains(&source) {
                        *indegree.entry(id).or_default() += 1;
                        dependents.entry(source).or_default().push(id);
                    }
                }
            }
        }

        let mut ready: VecDeque<LayerId> = kernel_ids
            .iter()
            .copied()
            .filter(|id| indegree[id] == 0)
            .collect();
        let mut order = Vec::with_capacity(kernel_ids.len());
        while let Some(id) = ready.pop_front() {
            order.push(id);
            for &dependent in dependents.get(&id).map(Vec::as_slice).unwrap_or(&[]) {
                let degree = indegree.entry(dependent).or_default();
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(dependent);
                }
            }
        }

        if order.len() != kernel_ids.len() {
            let mut cycle: Vec<String> = kernel_ids
                .iter()
                .filter(|id| indegree[*id] > 0)
                .filter_map(|id| self.get(*id).ok().map(|l| l.name().to_string()))
                .collect();
            cycle.sort();
            warn!(layers = ?cycle, "dependency cycle detected, batch aborted");
            return Err(ComputeError::CycleDetected(cycle));
        }
        Ok(order)
    }

    /// Validates preconditions and derives the destination grid without
    /// mutating anything.
    fn run_kernel(&self, id: LayerId) -> Result<RasterData, ComputeError> {
        let layer = self.get(id).map_err(ComputeError::Registry)?;
        let kernel_data = layer
            .as_kernel()
            .ok_or_else(|| ComputeError::NotKernel(layer.name().to_string()))?;
        let spec = kernel_data.spec().clone();

        // Step 1: resolve every source and require it raster-shaped.
        let mut sources = Vec::with_capacity(kernel_data.source_ids().len());
        for &source_id in kernel_data.source_ids() {
            let source = self
                .get(source_id)
                .map_err(|_| ComputeError::SourceNotFound(source_id))?;
            if !source.is_raster_shaped() {
                return Err(ComputeError::SourceNotRaster(source.name().to_string()));
            }
            sources.push(source);
        }

        // Step 2: every source must be valid before anything is touched.
        for source in &sources {
            if source.status() != LayerStatus::Valid {
                return Err(ComputeError::SourceNotReady {
                    name: source.name().to_string(),
                    status: source.status(),
                });
            }
        }

        let kernel = self
            .kernel_registry()
            .build(&spec)
            .ok_or_else(|| ComputeError::UnknownKernel(spec.function.clone()))?;
        if sources.len() < kernel.min_sources() {
            return Err(ComputeError::ArityMismatch {
                function: spec.function.clone(),
                required: kernel.min_sources(),
                declared: sources.len(),
            });
        }

        // Step 3: the destination takes the first source's shape; all
        // sources must agree on dimensions and georeference.
        let mut grids = Vec::with_capacity(sources.len());
        for source in &sources {
            let grid = source.as_raster().ok_or_else(|| {
                ComputeError::SourceNotRaster(source.name().to_string())
            })?;
            if !grid.is_allocated() {
                return Err(ComputeError::SourceNotReady {
                    name: source.name().to_string(),
                    status: source.status(),
                });
            }
            grids.push(grid);
        }
        let reference = grids[0];
        for (source, grid) in sources.iter().zip(&grids).skip(1) {
            if !reference.shape_matches(grid) {
                return Err(ComputeError::ShapeMismatch {
                    name: source.name().to_string(),
                    reference: sources[0].name().to_string(),
                });
            }
        }

        // Steps 4-5: windowed apply into a fresh grid; the caller commits.
        debug!(
            layer = %layer.name(),
            function = %spec.function,
            radius = spec.radius,
            sources = sources.len(),
            "deriving kernel layer"
        );
        Ok(derive_grid(&grids, kernel.as_ref(), spec.radius as usize))
    }
}

/// Applies `kernel` over every destination cell.
///
/// Edge policy: cells whose window would extend outside the grid stay
/// no-data; there is no wraparound and no clamping. Any window sample
/// equal to its source's sentinel also leaves the destination cell
/// no-data. The destination inherits the first source's georeference and
/// sentinel.
fn derive_grid(sources: &[&RasterData], kernel: &dyn KernelFunction, radius: usize) -> RasterData {
    let first = sources[0];
    let width = first.width();
    let height = first.height();
    let nodata = first.nodata();
    let side = 2 * radius + 1;
    let geotransform = first.geotransform();
    let pixel_size = (geotransform.pixel_x.abs(), geotransform.pixel_y.abs());

    let row_range = radius..height.saturating_sub(radius);
    let col_range = radius..width.saturating_sub(radius);

    let rows: Vec<Vec<f64>> = (0..height)
        .into_par_iter()
        .map(|row| {
            let mut out = vec![nodata; width];
            if !row_range.contains(&row) {
                return out;
            }
            // Scratch planes are reused across the row.
            let mut planes: Vec<Vec<f64>> =
                sources.iter().map(|_| vec![0.0; side * side]).collect();
            for col in col_range.clone() {
                if fill_window(sources, &mut planes, row, col, radius, side) {
                    let window = KernelWindow::new(&planes, side, pixel_size);
                    out[col] = kernel.evaluate(&window);
                }
            }
            out
        })
        .collect();

    let samples = Array2::from_shape_vec((height, width), rows.into_iter().flatten().collect())
        .expect("row buffers match the destination shape");
    RasterData::from_grid(samples, geotransform, nodata)
        .expect("destination inherits positive source dimensions")
}

/// Copies the window centered at `(row, col)` out of every source plane.
///
/// Returns false, leaving the planes partially written, as soon as any
/// sample equals its source's no-data sentinel.
fn fill_window(
    sources: &[&RasterData],
    planes: &mut [Vec<f64>],
    row: usize,
    col: usize,
    radius: usize,
    side: usize,
) -> bool {
    for (plane, source) in planes.iter_mut().zip(sources) {
        let grid = source.samples();
        let sentinel = source.nodata();
        for wr in 0..side {
            for wc in 0..side {
                let value = grid[[row + wr - radius, col + wc - radius]];
                if value == sentinel {
                    return false;
                }
                plane[wr * side + wc] = value;
            }
        }
    }
    true
}
