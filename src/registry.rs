//! Lookup of light entities by unit id.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::controller::Unit;
use crate::errors::Error;
use crate::light::CasambiLight;

type Result<T> = std::result::Result<T, Error>;

/// Maps unit ids to their light entities.
///
/// Filled once during platform setup and shared with the push dispatcher.
/// Entries are never removed.
pub struct UnitRegistry<U> {
    lights: RwLock<HashMap<String, Arc<CasambiLight<U>>>>,
}

impl<U: Unit> Default for UnitRegistry<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Unit> UnitRegistry<U> {
    pub fn new() -> Self {
        UnitRegistry {
            lights: RwLock::new(HashMap::new()),
        }
    }

    /// Register a light under its unit id.
    ///
    /// Returns the light previously registered under the same id, if any.
    pub fn insert(&self, light: Arc<CasambiLight<U>>) -> Option<Arc<CasambiLight<U>>> {
        let id = light.unit().unique_id().to_string();
        self.lights
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, light)
    }

    /// Get a light by unit id.
    pub fn get(&self, id: &str) -> Option<Arc<CasambiLight<U>>> {
        self.lights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// List all registered unit ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .lights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.lights.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Route a push payload to the light registered under `id`.
    pub fn process_update(&self, id: &str, data: &Value) -> Result<()> {
        // Clone out of the lock so the host callback runs unlocked.
        let light = self
            .get(id)
            .ok_or_else(|| Error::UnknownUnit(id.to_string()))?;
        light.process_update(data);
        Ok(())
    }
}
