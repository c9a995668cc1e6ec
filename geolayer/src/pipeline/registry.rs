//! The layer registry: creation, lookup, removal, and status control.

use super::error::LayerError;
use crate::kernel::KernelRegistry;
use crate::layer::{
    Geometry, Geotransform, KernelData, KernelSpec, Layer, LayerId, LayerKind, LayerPayload,
    LayerStatus, RasterData, RasterError, VectorData, DEFAULT_NODATA,
};
use ndarray::Array2;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// Counts of layers by kind and by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineSummary {
    pub total: usize,
    pub rasters: usize,
    pub vectors: usize,
    pub kernels: usize,
    pub valid: usize,
    pub empty: usize,
    pub invalid: usize,
}

impl fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} layers ({} raster, {} vector, {} kernel; {} valid, {} empty, {} invalid)",
            self.total,
            self.rasters,
            self.vectors,
            self.kernels,
            self.valid,
            self.empty,
            self.invalid
        )
    }
}

/// Registry and orchestrator owning all layers.
///
/// Layers are created only through this type, which assigns ids and
/// enforces name uniqueness. Ids are never reused for the lifetime of the
/// pipeline, even after removal.
pub struct Pipeline {
    layers: BTreeMap<LayerId, Layer>,
    names: HashMap<String, LayerId>,
    next_id: u32,
    kernels: KernelRegistry,
}

impl Pipeline {
    /// A pipeline with the built-in kernel functions registered.
    pub fn new() -> Self {
        Self::with_kernel_registry(KernelRegistry::with_builtins())
    }

    /// A pipeline with a caller-supplied kernel registry.
    pub fn with_kernel_registry(kernels: KernelRegistry) -> Self {
        Pipeline {
            layers: BTreeMap::new(),
            names: HashMap::new(),
            next_id: 0,
            kernels,
        }
    }

    /// The kernel function registry consulted by computations.
    pub fn kernel_registry(&self) -> &KernelRegistry {
        &self.kernels
    }

    /// Mutable access, for registering custom kernel functions.
    pub fn kernel_registry_mut(&mut self) -> &mut KernelRegistry {
        &mut self.kernels
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Layer names are non-empty and restricted to alphanumerics plus
    /// `-`, `_` and `.`.
    fn validate_new_name(&self, name: &str) -> Result<(), LayerError> {
        if name.is_empty() {
            return Err(LayerError::InvalidName {
                name: name.to_string(),
                reason: "name is empty".to_string(),
            });
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(LayerError::InvalidName {
                name: name.to_string(),
                reason: format!("character '{}' is not allowed", bad),
            });
        }
        if self.names.contains_key(name) {
            return Err(LayerError::NameDuplicated(name.to_string()));
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, payload: LayerPayload) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        let layer = Layer::new(id, name.to_string(), payload);
        debug!(layer = name, %id, kind = %layer.kind(), "layer registered");
        self.names.insert(name.to_string(), id);
        self.layers.insert(id, layer);
        id
    }

    /// Creates an empty raster layer.
    ///
    /// # Errors
    ///
    /// [`LayerError::NameDuplicated`] when the name is taken (the layer
    /// count is unchanged), [`LayerError::InvalidName`] when it is empty or
    /// carries disallowed characters.
    pub fn create_raster_layer(&mut self, name: &str) -> Result<LayerId, LayerError> {
        self.validate_new_name(name)?;
        Ok(self.insert(name, LayerPayload::Raster(RasterData::new())))
    }

    /// Creates an empty vector layer.
    pub fn create_vector_layer(&mut self, name: &str) -> Result<LayerId, LayerError> {
        self.validate_new_name(name)?;
        Ok(self.insert(name, LayerPayload::Vector(VectorData::new())))
    }

    /// Creates a kernel layer deriving from `sources` via `spec`.
    ///
    /// Every source must already be registered and raster-shaped; the
    /// derived grid stays empty until [`Pipeline::compute`] runs.
    pub fn create_kernel_layer(
        &mut self,
        name: &str,
        sources: &[LayerId],
        spec: KernelSpec,
    ) -> Result<LayerId, LayerError> {
        self.validate_new_name(name)?;
        self.validate_sources(name, sources)?;
        Ok(self.insert(
            name,
            LayerPayload::Kernel(KernelData::new(sources.to_vec(), spec)),
        ))
    }

    fn validate_sources(&self, owner: &str, sources: &[LayerId]) -> Result<(), LayerError> {
        if sources.is_empty() {
            return Err(LayerError::NoSources(owner.to_string()));
        }
        for &source in sources {
            let layer = self
                .layers
                .get(&source)
                .ok_or(LayerError::InvalidId(source))?;
            if !layer.is_raster_shaped() {
                return Err(LayerError::KindMismatch {
                    name: layer.name().to_string(),
                    expected: LayerKind::Raster,
                    actual: layer.kind(),
                });
            }
        }
        Ok(())
    }

    /// Replaces a kernel layer's declared sources.
    ///
    /// The same validity rules as creation apply, plus a self-reference
    /// check (the layer now has an id of its own).
    pub fn set_kernel_sources(
        &mut self,
        id: LayerId,
        sources: &[LayerId],
    ) -> Result<(), LayerError> {
        let layer = self.layers.get(&id).ok_or(LayerError::InvalidId(id))?;
        let name = layer.name().to_string();
        if layer.as_kernel().is_none() {
            return Err(LayerError::KindMismatch {
                name,
                expected: LayerKind::Kernel,
                actual: layer.kind(),
            });
        }
        if sources.contains(&id) {
            return Err(LayerError::SelfReference(name));
        }
        self.validate_sources(&name, sources)?;
        let layer = self.layers.get_mut(&id).ok_or(LayerError::InvalidId(id))?;
        if let Some(kernel) = layer.as_kernel_mut() {
            kernel.set_source_ids(sources.to_vec());
        }
        Ok(())
    }

    /// Registers a fully-populated raster layer in one step.
    ///
    /// Convenience for loaders: creates the layer, installs the grid and
    /// georeference, and marks it valid. A missing no-data sentinel falls
    /// back to [`DEFAULT_NODATA`].
    pub fn register_raster(
        &mut self,
        name: &str,
        samples: Array2<f64>,
        geotransform: Geotransform,
        nodata: Option<f64>,
    ) -> Result<LayerId, LayerError> {
        self.validate_new_name(name)?;
        let mut raster =
            RasterData::from_grid(samples, geotransform, nodata.unwrap_or(DEFAULT_NODATA))?;
        raster.set_geotransform(geotransform)?;
        let id = self.insert(name, LayerPayload::Raster(raster));
        self.set_status(id, LayerStatus::Valid)?;
        Ok(id)
    }

    /// Derives a valid-data mask from a raster-shaped layer.
    ///
    /// The mask is a raster layer holding 1.0 where the source sample is
    /// valid and 0.0 where it is the no-data sentinel; the mask itself is
    /// fully populated and immediately valid.
    pub fn create_mask_layer(
        &mut self,
        source_name: &str,
        mask_name: &str,
    ) -> Result<LayerId, LayerError> {
        self.validate_new_name(mask_name)?;
        let source = self.get_by_name(source_name)?;
        let raster = source.as_raster().ok_or_else(|| LayerError::KindMismatch {
            name: source_name.to_string(),
            expected: LayerKind::Raster,
            actual: source.kind(),
        })?;
        if !raster.is_allocated() {
            return Err(LayerError::Raster(RasterError::NotAllocated));
        }
        let nodata = raster.nodata();
        let mask_samples = raster
            .samples()
            .mapv(|v| if v == nodata { 0.0 } else { 1.0 });
        let mask = RasterData::from_grid(mask_samples, raster.geotransform(), DEFAULT_NODATA)?;
        let id = self.insert(mask_name, LayerPayload::Raster(mask));
        self.set_status(id, LayerStatus::Valid)?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Looks a layer up by id.
    pub fn get(&self, id: LayerId) -> Result<&Layer, LayerError> {
        self.layers.get(&id).ok_or(LayerError::InvalidId(id))
    }

    /// Mutable lookup by id, for owners populating payloads.
    pub fn get_mut(&mut self, id: LayerId) -> Result<&mut Layer, LayerError> {
        self.layers.get_mut(&id).ok_or(LayerError::InvalidId(id))
    }

    /// Looks a layer up by name (case-sensitive exact match).
    pub fn get_by_name(&self, name: &str) -> Result<&Layer, LayerError> {
        let id = self.id_of(name)?;
        self.get(id)
    }

    /// Resolves a name to its id.
    pub fn id_of(&self, name: &str) -> Result<LayerId, LayerError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| LayerError::NotFound(name.to_string()))
    }

    /// Whether a layer with this name exists.
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    // ------------------------------------------------------------------
    // Removal and rename
    // ------------------------------------------------------------------

    /// Removes a layer, releasing ownership to the caller.
    ///
    /// # Errors
    ///
    /// [`LayerError::DependencyViolation`] when any live kernel layer
    /// declares this layer among its sources; remove the dependents first.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<Layer, LayerError> {
        let name = self.get(id)?.name().to_string();
        let dependents: Vec<String> = self
            .layers
            .values()
            .filter(|layer| layer.id() != id)
            .filter_map(|layer| layer.as_kernel().map(|k| (layer, k)))
            .filter(|(_, kernel)| kernel.source_ids().contains(&id))
            .map(|(layer, _)| layer.name().to_string())
            .collect();
        if !dependents.is_empty() {
            return Err(LayerError::DependencyViolation { name, dependents });
        }
        self.names.remove(&name);
        let layer = self.layers.remove(&id).ok_or(LayerError::InvalidId(id))?;
        debug!(layer = %name, %id, "layer removed");
        Ok(layer)
    }

    /// Renames a layer, keeping both indexes consistent.
    pub fn rename_layer(&mut self, id: LayerId, new_name: &str) -> Result<(), LayerError> {
        let old_name = self.get(id)?.name().to_string();
        if old_name == new_name {
            return Ok(());
        }
        self.validate_new_name(new_name)?;
        self.names.remove(&old_name);
        self.names.insert(new_name.to_string(), id);
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.set_name(new_name.to_string());
        }
        debug!(from = %old_name, to = %new_name, %id, "layer renamed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    /// Requests a status change, enforcing the lifecycle rules.
    ///
    /// Rising to `Valid` additionally requires content: an allocated grid
    /// for raster-shaped layers, at least one geometry for vector layers.
    pub fn set_status(&mut self, id: LayerId, status: LayerStatus) -> Result<(), LayerError> {
        let layer = self.layers.get(&id).ok_or(LayerError::InvalidId(id))?;
        let from = layer.status();
        if !from.can_transition_to(status) {
            return Err(LayerError::InvalidTransition { from, to: status });
        }
        if status == LayerStatus::Valid {
            match layer.as_raster() {
                Some(raster) if !raster.is_allocated() => {
                    return Err(LayerError::Raster(RasterError::NotAllocated));
                }
                None => {
                    // Vector layers derive validity from their content.
                    if layer.as_vector().map(|v| v.is_empty()).unwrap_or(true) {
                        return Err(LayerError::InvalidTransition { from, to: status });
                    }
                }
                _ => {}
            }
        }
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.set_status_unchecked(status);
        }
        Ok(())
    }

    /// Marks a populated layer valid; the owner's "mark complete" call.
    pub fn mark_valid(&mut self, id: LayerId) -> Result<(), LayerError> {
        self.set_status(id, LayerStatus::Valid)
    }

    /// Explicitly invalidates a layer.
    pub fn invalidate(&mut self, id: LayerId) -> Result<(), LayerError> {
        self.set_status(id, LayerStatus::Invalid)
    }

    /// Appends a geometry to a vector layer and refreshes its status.
    pub fn add_geometry(&mut self, id: LayerId, geometry: Geometry) -> Result<(), LayerError> {
        let layer = self.layers.get_mut(&id).ok_or(LayerError::InvalidId(id))?;
        let name = layer.name().to_string();
        let kind = layer.kind();
        let vector = layer.as_vector_mut().ok_or(LayerError::KindMismatch {
            name,
            expected: LayerKind::Vector,
            actual: kind,
        })?;
        vector.add(geometry)?;
        layer.set_status_unchecked(LayerStatus::Valid);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Enumeration
    // ------------------------------------------------------------------

    /// Number of registered layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of layers of one kind, or all layers for `None`.
    pub fn count_by_kind(&self, kind: Option<LayerKind>) -> usize {
        match kind {
            None => self.layers.len(),
            Some(kind) => self.layers.values().filter(|l| l.kind() == kind).count(),
        }
    }

    /// Iterates all layers in id (creation) order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    /// Iterates layers of one kind in id order.
    pub fn layers_of_kind(&self, kind: LayerKind) -> impl Iterator<Item = &Layer> {
        self.layers.values().filter(move |l| l.kind() == kind)
    }

    pub(super) fn kernel_ids(&self) -> Vec<LayerId> {
        self.layers_of_kind(LayerKind::Kernel)
            .map(|l| l.id())
            .collect()
    }

    /// Creates every kernel layer a configuration describes.
    ///
    /// Source names resolve against already-registered layers, so the
    /// input raster(s) must be registered first. Returns the new ids in
    /// declaration order.
    pub fn apply_config(
        &mut self,
        config: &crate::config::PipelineConfig,
    ) -> Result<Vec<LayerId>, LayerError> {
        let mut created = Vec::with_capacity(config.kernels.len());
        for kernel in &config.kernels {
            let sources: Vec<LayerId> = kernel
                .sources
                .iter()
                .map(|name| self.id_of(name))
                .collect::<Result<_, _>>()?;
            let spec = KernelSpec::new(&kernel.function, kernel.radius)
                .with_params(kernel.params.clone());
            created.push(self.create_kernel_layer(&kernel.name, &sources, spec)?);
        }
        Ok(created)
    }

    /// Counts by kind and status.
    pub fn summary(&self) -> PipelineSummary {
        let mut summary = PipelineSummary {
            total: self.layers.len(),
            ..PipelineSummary::default()
        };
        for layer in self.layers.values() {
            match layer.kind() {
                LayerKind::Raster => summary.rasters += 1,
                LayerKind::Vector => summary.vectors += 1,
                LayerKind::Kernel => summary.kernels += 1,
            }
            match layer.status() {
                LayerStatus::Valid => summary.valid += 1,
                LayerStatus::Empty => summary.empty += 1,
                LayerStatus::Invalid => summary.invalid += 1,
            }
        }
        summary
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::GeometryKind;

    fn populated_raster(pipeline: &mut Pipeline, name: &str, value: f64) -> LayerId {
        let samples = Array2::from_elem((4, 4), value);
        pipeline
            .register_raster(name, samples, Geotransform::default(), None)
            .unwrap()
    }

    #[test]
    fn test_create_assigns_unique_monotonic_ids() {
        let mut pipeline = Pipeline::new();
        let a = pipeline.create_raster_layer("a").unwrap();
        let b = pipeline.create_vector_layer("b").unwrap();
        assert!(b > a, "ids should grow monotonically");
        assert_eq!(pipeline.layer_count(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected_count_unchanged() {
        let mut pipeline = Pipeline::new();
        pipeline.create_raster_layer("elevation").unwrap();
        let err = pipeline.create_raster_layer("elevation").unwrap_err();
        assert_eq!(err, LayerError::NameDuplicated("elevation".to_string()));
        assert_eq!(pipeline.layer_count(), 1, "failed create must not insert");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut pipeline = Pipeline::new();
        pipeline.create_raster_layer("Elevation").unwrap();
        assert!(pipeline.create_raster_layer("elevation").is_ok());
        assert_eq!(pipeline.layer_count(), 2);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut pipeline = Pipeline::new();
        assert!(matches!(
            pipeline.create_raster_layer(""),
            Err(LayerError::InvalidName { .. })
        ));
        assert!(matches!(
            pipeline.create_raster_layer("bad name"),
            Err(LayerError::InvalidName { .. })
        ));
        assert!(matches!(
            pipeline.create_raster_layer("layer/1"),
            Err(LayerError::InvalidName { .. })
        ));
        assert!(pipeline.create_raster_layer("ok-name_1.v2").is_ok());
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let mut pipeline = Pipeline::new();
        let id = pipeline.create_raster_layer("depth").unwrap();
        assert_eq!(pipeline.get(id).unwrap().name(), "depth");
        assert_eq!(pipeline.get_by_name("depth").unwrap().id(), id);
        assert_eq!(
            pipeline.get_by_name("missing").unwrap_err(),
            LayerError::NotFound("missing".to_string())
        );
        assert_eq!(
            pipeline.get(LayerId(99)).unwrap_err(),
            LayerError::InvalidId(LayerId(99))
        );
    }

    #[test]
    fn test_kernel_creation_requires_existing_raster_sources() {
        let mut pipeline = Pipeline::new();
        let spec = KernelSpec::new("mean", 1);
        assert_eq!(
            pipeline
                .create_kernel_layer("k", &[], spec.clone())
                .unwrap_err(),
            LayerError::NoSources("k".to_string())
        );
        assert!(matches!(
            pipeline.create_kernel_layer("k", &[LayerId(42)], spec.clone()),
            Err(LayerError::InvalidId(_))
        ));

        let vector = pipeline.create_vector_layer("points").unwrap();
        assert!(matches!(
            pipeline.create_kernel_layer("k", &[vector], spec.clone()),
            Err(LayerError::KindMismatch { .. })
        ));

        let raster = pipeline.create_raster_layer("grid").unwrap();
        assert!(pipeline.create_kernel_layer("k", &[raster], spec).is_ok());
    }

    #[test]
    fn test_kernel_layers_can_source_kernel_layers() {
        let mut pipeline = Pipeline::new();
        let raster = pipeline.create_raster_layer("grid").unwrap();
        let first = pipeline
            .create_kernel_layer("smooth", &[raster], KernelSpec::new("mean", 1))
            .unwrap();
        assert!(pipeline
            .create_kernel_layer("rough", &[first], KernelSpec::new("roughness", 1))
            .is_ok());
    }

    #[test]
    fn test_set_kernel_sources_rejects_self_reference() {
        let mut pipeline = Pipeline::new();
        let raster = pipeline.create_raster_layer("grid").unwrap();
        let kernel = pipeline
            .create_kernel_layer("k", &[raster], KernelSpec::new("mean", 1))
            .unwrap();
        assert_eq!(
            pipeline.set_kernel_sources(kernel, &[kernel]).unwrap_err(),
            LayerError::SelfReference("k".to_string())
        );
    }

    #[test]
    fn test_remove_source_of_live_kernel_rejected() {
        let mut pipeline = Pipeline::new();
        let raster = pipeline.create_raster_layer("grid").unwrap();
        let kernel = pipeline
            .create_kernel_layer("derived", &[raster], KernelSpec::new("mean", 1))
            .unwrap();

        let err = pipeline.remove_layer(raster).unwrap_err();
        assert_eq!(
            err,
            LayerError::DependencyViolation {
                name: "grid".to_string(),
                dependents: vec!["derived".to_string()],
            }
        );

        // Removing the dependent first unblocks the source.
        pipeline.remove_layer(kernel).unwrap();
        pipeline.remove_layer(raster).unwrap();
        assert_eq!(pipeline.layer_count(), 0);
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut pipeline = Pipeline::new();
        let a = pipeline.create_raster_layer("a").unwrap();
        pipeline.remove_layer(a).unwrap();
        let b = pipeline.create_raster_layer("b").unwrap();
        assert!(b > a, "removed id must never be reassigned");
    }

    #[test]
    fn test_rename_keeps_indexes_consistent() {
        let mut pipeline = Pipeline::new();
        let id = pipeline.create_raster_layer("old").unwrap();
        pipeline.rename_layer(id, "new").unwrap();

        assert_eq!(pipeline.get(id).unwrap().name(), "new");
        assert_eq!(pipeline.id_of("new").unwrap(), id);
        assert!(pipeline.id_of("old").is_err(), "old name must be released");

        // The released name is usable again.
        assert!(pipeline.create_raster_layer("old").is_ok());
    }

    #[test]
    fn test_rename_rejects_duplicate() {
        let mut pipeline = Pipeline::new();
        let id = pipeline.create_raster_layer("a").unwrap();
        pipeline.create_raster_layer("b").unwrap();
        assert_eq!(
            pipeline.rename_layer(id, "b").unwrap_err(),
            LayerError::NameDuplicated("b".to_string())
        );
        assert_eq!(pipeline.get(id).unwrap().name(), "a");
    }

    #[test]
    fn test_set_status_on_unregistered_id_fails() {
        let mut pipeline = Pipeline::new();
        assert_eq!(
            pipeline
                .set_status(LayerId(5), LayerStatus::Valid)
                .unwrap_err(),
            LayerError::InvalidId(LayerId(5))
        );
    }

    #[test]
    fn test_mark_valid_requires_allocated_grid() {
        let mut pipeline = Pipeline::new();
        let id = pipeline.create_raster_layer("grid").unwrap();
        assert_eq!(
            pipeline.mark_valid(id).unwrap_err(),
            LayerError::Raster(RasterError::NotAllocated)
        );

        pipeline
            .get_mut(id)
            .unwrap()
            .as_raster_mut()
            .unwrap()
            .allocate(2, 2, DEFAULT_NODATA)
            .unwrap();
        pipeline.mark_valid(id).unwrap();
        assert_eq!(pipeline.get(id).unwrap().status(), LayerStatus::Valid);
    }

    #[test]
    fn test_vector_status_follows_content() {
        let mut pipeline = Pipeline::new();
        let id = pipeline.create_vector_layer("sites").unwrap();
        assert_eq!(pipeline.get(id).unwrap().status(), LayerStatus::Empty);
        assert!(
            pipeline.mark_valid(id).is_err(),
            "empty vector cannot be valid"
        );

        pipeline
            .add_geometry(id, Geometry::new(GeometryKind::Point, vec![(1.0, 2.0)]))
            .unwrap();
        assert_eq!(pipeline.get(id).unwrap().status(), LayerStatus::Valid);
    }

    #[test]
    fn test_add_geometry_to_raster_is_kind_mismatch() {
        let mut pipeline = Pipeline::new();
        let id = pipeline.create_raster_layer("grid").unwrap();
        assert!(matches!(
            pipeline.add_geometry(id, Geometry::new(GeometryKind::Point, vec![(0.0, 0.0)])),
            Err(LayerError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_register_raster_is_valid_immediately() {
        let mut pipeline = Pipeline::new();
        let id = populated_raster(&mut pipeline, "depth", 3.0);
        let layer = pipeline.get(id).unwrap();
        assert_eq!(layer.status(), LayerStatus::Valid);
        assert_eq!(layer.as_raster().unwrap().get(0, 0).unwrap(), 3.0);
    }

    #[test]
    fn test_mask_layer_marks_valid_cells() {
        let mut pipeline = Pipeline::new();
        let mut samples = Array2::from_elem((2, 2), 5.0);
        samples[[1, 1]] = DEFAULT_NODATA;
        pipeline
            .register_raster("depth", samples, Geotransform::default(), None)
            .unwrap();

        let mask_id = pipeline.create_mask_layer("depth", "depth_mask").unwrap();
        let mask = pipeline.get(mask_id).unwrap();
        assert_eq!(mask.status(), LayerStatus::Valid);
        let grid = mask.as_raster().unwrap();
        assert_eq!(grid.get(0, 0).unwrap(), 1.0);
        assert_eq!(grid.get(1, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_count_and_enumerate_by_kind() {
        let mut pipeline = Pipeline::new();
        let raster = pipeline.create_raster_layer("r").unwrap();
        pipeline.create_vector_layer("v").unwrap();
        pipeline
            .create_kernel_layer("k", &[raster], KernelSpec::new("mean", 1))
            .unwrap();

        assert_eq!(pipeline.count_by_kind(None), 3);
        assert_eq!(pipeline.count_by_kind(Some(LayerKind::Raster)), 1);
        assert_eq!(pipeline.count_by_kind(Some(LayerKind::Kernel)), 1);
        let kernel_names: Vec<&str> = pipeline
            .layers_of_kind(LayerKind::Kernel)
            .map(|l| l.name())
            .collect();
        assert_eq!(kernel_names, vec!["k"]);
    }

    #[test]
    fn test_apply_config_registers_kernels_in_order() {
        use crate::config::{KernelLayerConfig, PipelineConfig};

        let mut pipeline = Pipeline::new();
        populated_raster(&mut pipeline, "depth", 2.0);

        let mut config = PipelineConfig::default();
        config
            .kernels
            .push(KernelLayerConfig::new("smooth", vec!["depth".into()], "mean"));
        config.kernels.push(KernelLayerConfig::new(
            "rough",
            vec!["smooth".into()],
            "roughness",
        ));

        let created = pipeline.apply_config(&config).unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(pipeline.get(created[0]).unwrap().name(), "smooth");
        assert_eq!(pipeline.count_by_kind(Some(LayerKind::Kernel)), 2);
    }

    #[test]
    fn test_apply_config_unknown_source_fails() {
        use crate::config::{KernelLayerConfig, PipelineConfig};

        let mut pipeline = Pipeline::new();
        let mut config = PipelineConfig::default();
        config
            .kernels
            .push(KernelLayerConfig::new("k", vec!["missing".into()], "mean"));
        assert_eq!(
            pipeline.apply_config(&config).unwrap_err(),
            LayerError::NotFound("missing".to_string())
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut pipeline = Pipeline::new();
        populated_raster(&mut pipeline, "depth", 1.0);
        pipeline.create_vector_layer("sites").unwrap();
        let summary = pipeline.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.rasters, 1);
        assert_eq!(summary.vectors, 1);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.empty, 1);
        let text = summary.to_string();
        assert!(text.contains("2 layers"), "summary should render counts");
    }
}
