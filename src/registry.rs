//! Concurrent store of grading systems and converters.

use crate::converters::GradeConverter;
use crate::ids::generate_id;
use crate::model::GradingSystem;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Thread-safe `id -> GradingSystem` and `(from, to) -> converter` maps.
///
/// Registering overwrites silently; lookups return `None` for missing keys
/// and leave it to the caller to raise a not-found error.
pub struct GradingSystemRegistry {
    registry_id: String,
    systems: DashMap<String, Arc<GradingSystem>>,
    converters: DashMap<(String, String), Arc<dyn GradeConverter>>,
}

impl GradingSystemRegistry {
    pub fn new() -> Self {
        Self::with_id(generate_id())
    }

    pub fn with_id(registry_id: impl Into<String>) -> Self {
        Self {
            registry_id: registry_id.into(),
            systems: DashMap::new(),
            converters: DashMap::new(),
        }
    }

    pub fn registry_id(&self) -> &str {
        &self.registry_id
    }

    pub fn register_system(&self, id: impl Into<String>, system: Arc<GradingSystem>) {
        let id = id.into();
        if self.systems.insert(id.clone(), system).is_some() {
            debug!(registry = %self.registry_id, id = %id, "Replaced registered grading system");
        }
    }

    pub fn unregister_system(&self, id: &str) -> Option<Arc<GradingSystem>> {
        self.systems.remove(id).map(|(_, system)| system)
    }

    pub fn lookup_system(&self, id: &str) -> Option<Arc<GradingSystem>> {
        self.systems.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn register_converter(
        &self,
        from: impl Into<String>,
        to: impl Into<String>,
        converter: Arc<dyn GradeConverter>,
    ) {
        let key = (from.into(), to.into());
        if let Some(previous) = self.converters.insert(key.clone(), converter) {
            debug!(
                registry = %self.registry_id,
                from = %key.0,
                to = %key.1,
                previous = ?previous,
                "Replaced registered converter"
            );
        }
    }

    pub fn unregister_converter(&self, from: &str, to: &str) -> Option<Arc<dyn GradeConverter>> {
        self.converters
            .remove(&(from.to_string(), to.to_string()))
            .map(|(_, converter)| converter)
    }

    pub fn lookup_converter(&self, from: &str, to: &str) -> Option<Arc<dyn GradeConverter>> {
        self.converters
            .get(&(from.to_string(), to.to_string()))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Registration keys currently in use, sorted.
    pub fn system_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.systems.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Snapshot of registered systems, one per registration key.
    pub fn registered_systems(&self) -> Vec<Arc<GradingSystem>> {
        self.system_ids()
            .iter()
            .filter_map(|id| self.lookup_system(id))
            .collect()
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn converter_count(&self) -> usize {
        self.converters.len()
    }
}

impl Default for GradingSystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GradingSystemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradingSystemRegistry")
            .field("registry_id", &self.registry_id)
            .field("systems", &self.systems.len())
            .field("converters", &self.converters.len())
            .finish()
    }
}
