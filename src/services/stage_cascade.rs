use tracing::info;
use uuid::Uuid;

use crate::domain::{Building, Milestone};
use crate::error::CoreError;
use crate::repository::BuildingStore;

/// Record a building's new construction stage and fan it out to every owned
/// unit as the translated billing-stage label.
///
/// The whole graph is handed to the store in one save; partial application
/// (building updated, some units not) is on the store to prevent, not this
/// coordinator.
pub fn update_building_stage(
    store: &dyn BuildingStore,
    building_id: Uuid,
    new_stage: &str,
) -> Result<Building, CoreError> {
    let mut building = store.fetch_building(building_id)?;

    let milestone = Milestone::from_construction_stage(new_stage);
    let unit_label = milestone.unit_label();

    building.stage = Some(new_stage.trim().to_string());
    for unit in &mut building.units {
        unit.stage = Some(unit_label.to_string());
    }
    store.save_building(&building)?;

    info!(
        building_id = %building_id,
        construction_stage = new_stage,
        unit_stage = unit_label,
        units = building.units.len(),
        "propagated construction stage"
    );

    Ok(building)
}
