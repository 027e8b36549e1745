use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::repository::BuildingStore;

/// Tracks which building each workspace is currently operating on.
///
/// A workspace key is caller-supplied (session id, operator id, import job
/// id, ...); pins under different keys are independent. Within one key the
/// last writer wins. This replaces the original single process-wide
/// current-building pointer.
pub struct WorkspaceSelector {
    active_status_marker: String,
    pinned: RwLock<HashMap<String, Uuid>>,
}

impl WorkspaceSelector {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            active_status_marker: config.active_status_marker.clone(),
            pinned: RwLock::new(HashMap::new()),
        }
    }

    /// The building the workspace is pinned to, if it still exists.
    ///
    /// A stale pin (building deleted since) is dropped. Without a usable
    /// pin the fallback policy runs: the first building carrying the
    /// configured active status, else the first building in store order;
    /// the choice is pinned so subsequent calls are stable. `None` only
    /// when no buildings exist at all.
    pub fn current(
        &self,
        store: &dyn BuildingStore,
        key: &str,
    ) -> Result<Option<Uuid>, CoreError> {
        let pinned_id = self.read_pins()?.get(key).copied();
        if let Some(building_id) = pinned_id {
            match store.fetch_building(building_id) {
                Ok(_) => return Ok(Some(building_id)),
                Err(CoreError::NotFound(_)) => {
                    warn!(
                        workspace = key,
                        building_id = %building_id,
                        "pinned building no longer exists; re-selecting"
                    );
                    let mut pins = self.write_pins()?;
                    if pins.get(key) == Some(&building_id) {
                        pins.remove(key);
                    }
                }
                Err(other) => return Err(other),
            }
        }

        let buildings = store.list_buildings()?;
        let Some(chosen) = buildings
            .iter()
            .find(|building| building.status == self.active_status_marker)
            .or_else(|| buildings.first())
        else {
            return Ok(None);
        };

        self.write_pins()?.insert(key.to_string(), chosen.id);
        info!(
            workspace = key,
            building_id = %chosen.id,
            building = %chosen.name,
            "selected fallback building"
        );
        Ok(Some(chosen.id))
    }

    /// Pin a building unconditionally. The target's existence is not
    /// checked here; a stale pin self-heals on the next `current` call.
    pub fn set_current(&self, key: &str, building_id: Uuid) -> Result<(), CoreError> {
        self.write_pins()?.insert(key.to_string(), building_id);
        Ok(())
    }

    /// Drop one workspace's pin.
    pub fn clear(&self, key: &str) -> Result<(), CoreError> {
        self.write_pins()?.remove(key);
        Ok(())
    }

    /// Drop every pin pointing at a building; callers invoke this when the
    /// building is deleted. Returns how many workspaces were unpinned.
    pub fn unpin_building(&self, building_id: Uuid) -> Result<usize, CoreError> {
        let mut pins = self.write_pins()?;
        let before = pins.len();
        pins.retain(|_, pinned| *pinned != building_id);
        Ok(before - pins.len())
    }

    fn read_pins(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Uuid>>, CoreError> {
        self.pinned
            .read()
            .map_err(|_| CoreError::Dependency("workspace lock poisoned".to_string()))
    }

    fn write_pins(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Uuid>>, CoreError> {
        self.pinned
            .write()
            .map_err(|_| CoreError::Dependency("workspace lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::WorkspaceSelector;
    use crate::config::CoreConfig;
    use crate::domain::Building;
    use crate::repository::{BuildingStore, InMemoryStore};

    fn selector() -> WorkspaceSelector {
        WorkspaceSelector::new(&CoreConfig::default())
    }

    #[test]
    fn empty_store_selects_nothing() {
        let store = InMemoryStore::new();
        let workspace = selector();
        assert_eq!(workspace.current(&store, "alice").expect("current"), None);
    }

    #[test]
    fn fallback_prefers_the_active_building_and_pins_it() {
        let store = InMemoryStore::new();
        let paused = Building::new("B-paused", "paused");
        let active = Building::new("B-active", "active");
        let active_id = active.id;
        store.put(paused).expect("put");
        store.put(active).expect("put");

        let workspace = selector();
        assert_eq!(
            workspace.current(&store, "alice").expect("current"),
            Some(active_id)
        );

        // Pinned: the choice sticks even after the status stops matching.
        let mut demoted = store.fetch_building(active_id).expect("fetch");
        demoted.status = "paused".to_string();
        store.put(demoted).expect("put");
        assert_eq!(
            workspace.current(&store, "alice").expect("current"),
            Some(active_id)
        );
    }

    #[test]
    fn fallback_uses_store_order_when_nothing_is_active() {
        let store = InMemoryStore::new();
        let first = Building::new("First", "paused");
        let first_id = first.id;
        store.put(first).expect("put");
        store.put(Building::new("Second", "on hold")).expect("put");

        let workspace = selector();
        assert_eq!(
            workspace.current(&store, "alice").expect("current"),
            Some(first_id)
        );
    }

    #[test]
    fn stale_pin_self_heals_after_delete() {
        let store = InMemoryStore::new();
        let doomed = Building::new("Doomed", "active");
        let survivor = Building::new("Survivor", "paused");
        let doomed_id = doomed.id;
        let survivor_id = survivor.id;
        store.put(doomed).expect("put");
        store.put(survivor).expect("put");

        let workspace = selector();
        assert_eq!(
            workspace.current(&store, "alice").expect("current"),
            Some(doomed_id)
        );

        store.remove(doomed_id).expect("remove");
        assert_eq!(
            workspace.current(&store, "alice").expect("current"),
            Some(survivor_id)
        );
    }

    #[test]
    fn set_current_is_not_validated_and_self_heals() {
        let store = InMemoryStore::new();
        let building = Building::new("Only one", "active");
        let building_id = building.id;
        store.put(building).expect("put");

        let workspace = selector();
        workspace
            .set_current("alice", Uuid::new_v4())
            .expect("set_current");
        assert_eq!(
            workspace.current(&store, "alice").expect("current"),
            Some(building_id)
        );
    }

    #[test]
    fn workspaces_are_independent() {
        let store = InMemoryStore::new();
        let first = Building::new("First", "active");
        let second = Building::new("Second", "paused");
        let first_id = first.id;
        let second_id = second.id;
        store.put(first).expect("put");
        store.put(second).expect("put");

        let workspace = selector();
        workspace.set_current("bob", second_id).expect("set_current");
        assert_eq!(
            workspace.current(&store, "alice").expect("current"),
            Some(first_id)
        );
        assert_eq!(
            workspace.current(&store, "bob").expect("current"),
            Some(second_id)
        );
    }

    #[test]
    fn unpin_building_clears_every_affected_workspace() {
        let store = InMemoryStore::new();
        let shared = Building::new("Shared", "active");
        let other = Building::new("Other", "paused");
        let shared_id = shared.id;
        let other_id = other.id;
        store.put(shared).expect("put");
        store.put(other).expect("put");

        let workspace = selector();
        workspace.set_current("alice", shared_id).expect("set_current");
        workspace.set_current("bob", shared_id).expect("set_current");
        workspace.set_current("carol", other_id).expect("set_current");

        assert_eq!(workspace.unpin_building(shared_id).expect("unpin"), 2);
        assert_eq!(
            workspace.current(&store, "carol").expect("current"),
            Some(other_id)
        );
    }

    #[test]
    fn clear_drops_only_the_given_key() {
        let store = InMemoryStore::new();
        let building = Building::new("Only one", "paused");
        let building_id = building.id;
        store.put(building).expect("put");

        let workspace = selector();
        workspace.set_current("alice", building_id).expect("set_current");
        workspace.clear("alice").expect("clear");
        // Fallback runs again and re-pins the only building.
        assert_eq!(
            workspace.current(&store, "alice").expect("current"),
            Some(building_id)
        );
    }
}
