use std::collections::HashSet;
use std::sync::RwLock;

use uuid::Uuid;

use crate::domain::Building;
use crate::error::CoreError;

/// The persistence seam the engine consumes. Implementations load
/// fully-populated building graphs (units and ledgers included) and persist
/// a saved graph atomically; lazy fetching never happens inside the engine.
pub trait BuildingStore: Send + Sync {
    /// Load one building with its full unit graph. `NotFound` for an
    /// unknown id.
    fn fetch_building(&self, id: Uuid) -> Result<Building, CoreError>;

    /// Load every building, in the store's stable iteration order.
    fn list_buildings(&self) -> Result<Vec<Building>, CoreError>;

    /// Persist a full building graph in one atomic unit of work.
    fn save_building(&self, building: &Building) -> Result<(), CoreError>;
}

/// In-memory store: the reference implementation used by tests and
/// embedders that load graphs themselves. Keeps insertion order and
/// enforces the uniqueness invariants a database would.
#[derive(Default)]
pub struct InMemoryStore {
    buildings: RwLock<Vec<Building>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, preserving first-insertion order.
    pub fn put(&self, building: Building) -> Result<(), CoreError> {
        self.save_building(&building)
    }

    /// Remove a building and its whole graph. Returns whether it existed.
    pub fn remove(&self, id: Uuid) -> Result<bool, CoreError> {
        let mut buildings = self.write_guard()?;
        let before = buildings.len();
        buildings.retain(|building| building.id != id);
        Ok(buildings.len() < before)
    }

    fn read_guard(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Building>>, CoreError> {
        self.buildings
            .read()
            .map_err(|_| CoreError::Dependency("building store lock poisoned".to_string()))
    }

    fn write_guard(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Building>>, CoreError> {
        self.buildings
            .write()
            .map_err(|_| CoreError::Dependency("building store lock poisoned".to_string()))
    }
}

impl BuildingStore for InMemoryStore {
    fn fetch_building(&self, id: Uuid) -> Result<Building, CoreError> {
        self.read_guard()?
            .iter()
            .find(|building| building.id == id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("building", id))
    }

    fn list_buildings(&self) -> Result<Vec<Building>, CoreError> {
        Ok(self.read_guard()?.clone())
    }

    fn save_building(&self, building: &Building) -> Result<(), CoreError> {
        let mut unit_numbers = HashSet::new();
        for unit in &building.units {
            if !unit_numbers.insert(unit.number.trim()) {
                return Err(CoreError::Conflict(format!(
                    "unit number '{}' already exists in building '{}'",
                    unit.number, building.name
                )));
            }
        }

        let mut buildings = self.write_guard()?;
        if buildings
            .iter()
            .any(|existing| existing.id != building.id && existing.name == building.name)
        {
            return Err(CoreError::Conflict(format!(
                "building name '{}' already exists",
                building.name
            )));
        }

        match buildings
            .iter_mut()
            .find(|existing| existing.id == building.id)
        {
            Some(existing) => *existing = building.clone(),
            None => buildings.push(building.clone()),
        }
        Ok(())
    }
}
