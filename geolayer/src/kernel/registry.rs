//! Name-indexed registry of kernel function builders.

use super::functions::{Diff, Max, Mean, Min, Range, Roughness, Slope, Threshold};
use super::KernelFunction;
use crate::layer::KernelSpec;
use std::collections::HashMap;

/// Builds a configured kernel function from a spec.
///
/// Builders receive the whole spec so numeric parameters can configure the
/// instance (e.g. `threshold` reads `params[0]`). Parameterless kernels
/// ignore the params.
pub type KernelBuilder = fn(&KernelSpec) -> Box<dyn KernelFunction>;

/// Registry of named kernel functions consulted by the pipeline.
pub struct KernelRegistry {
    builders: HashMap<String, KernelBuilder>,
}

impl KernelRegistry {
    /// A registry with no functions registered.
    pub fn empty() -> Self {
        KernelRegistry {
            builders: HashMap::new(),
        }
    }

    /// A registry pre-populated with the built-in functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("mean", |_| Box::new(Mean));
        registry.register("min", |_| Box::new(Min));
        registry.register("max", |_| Box::new(Max));
        registry.register("range", |_| Box::new(Range));
        registry.register("roughness", |_| Box::new(Roughness));
        registry.register("slope", |_| Box::new(Slope));
        registry.register("diff", |_| Box::new(Diff));
        registry.register("threshold", |spec| {
            Box::new(Threshold {
                threshold: spec.params.first().copied().unwrap_or(0.0),
            })
        });
        registry
    }

    /// Registers a builder under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, builder: KernelBuilder) {
        self.builders.insert(name.to_string(), builder);
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Builds the function named by the spec, or `None` if unregistered.
    pub fn build(&self, spec: &KernelSpec) -> Option<Box<dyn KernelFunction>> {
        self.builders.get(&spec.function).map(|builder| builder(spec))
    }

    /// Registered names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
