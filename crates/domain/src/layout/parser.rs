//! Venue-layout parser
//!
//! Builds the validated [`VenueLayout`] from the raw configuration
//! document and the renderer's floor inventory. Degenerate input is
//! recovered with a warning and a best-effort default; parsing itself
//! never fails.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::{ground_stack_heights, FloorStack};
use crate::ids::{BuildingId, FloorId, ModelActorId};
use crate::layout::{Building, Floor, VenueLayout};

/// Raw thickness and ordering parameters for one floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FloorConfig {
    pub level_index: i32,
    pub stack_height_min: Option<f64>,
    pub stack_height_max: Option<f64>,
    pub stack_gap: Option<f64>,
}

/// Raw configuration for one building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildingConfig {
    pub display_index: i32,
    pub default_floor: Option<String>,
    pub floors: BTreeMap<String, FloorConfig>,
}

/// The venue-layout document, as delivered by the host's configuration
/// channel (already deserialized from JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VenueLayoutConfig {
    pub buildings: BTreeMap<String, BuildingConfig>,
    pub default_building: Option<String>,
    /// Floor id of the venue-wide global layer, if the dataset has one.
    pub layer: Option<String>,
}

/// Parse the venue-layout document against the renderer's known floor
/// set. Floors the renderer does not know are dropped with a warning;
/// buildings left without any valid floor are dropped likewise.
pub fn parse_venue_layout(
    config: &VenueLayoutConfig,
    known_floors: &BTreeSet<FloorId>,
    model_actors_by_building: &HashMap<BuildingId, Vec<ModelActorId>>,
) -> VenueLayout {
    let global_layer = match &config.layer {
        Some(layer) if !layer.is_empty() => {
            let id = FloorId::new(layer.clone());
            if known_floors.contains(&id) {
                Some(id)
            } else {
                warn!(layer = %layer, "venue layout names a global layer the renderer does not know");
                None
            }
        }
        _ => None,
    };

    let mut buildings = Vec::new();
    for (building_id, building_config) in &config.buildings {
        let id = BuildingId::new(building_id.clone());

        let mut floors = Vec::new();
        for (floor_id, floor_config) in &building_config.floors {
            let floor_id = FloorId::new(floor_id.clone());
            if !known_floors.contains(&floor_id) {
                warn!(building = %id, floor = %floor_id, "dropping floor unknown to the renderer");
                continue;
            }
            floors.push(Floor {
                id: floor_id,
                level_index: floor_config.level_index,
                stack_height_min: floor_config.stack_height_min.unwrap_or(0.0),
                stack_height_max: floor_config.stack_height_max.unwrap_or(0.0),
                stack_gap: floor_config.stack_gap.unwrap_or(0.0),
                ground_stack_height: 0.0,
            });
        }
        if floors.is_empty() {
            warn!(building = %id, "dropping building with no valid floors");
            continue;
        }
        floors.sort_by_key(|f| f.level_index);

        let ground_floor_index = match floors.iter().position(|f| f.level_index == 0) {
            Some(i) => i,
            None => {
                warn!(building = %id, "no ground floor (level index 0), using the lowest floor");
                0
            }
        };

        let default_floor_index = match &building_config.default_floor {
            Some(default_floor) => {
                let index = floors.iter().position(|f| f.id.as_str() == default_floor);
                if index.is_none() {
                    warn!(
                        building = %id,
                        default_floor = %default_floor,
                        "configured default floor not found in building"
                    );
                }
                index
            }
            None => None,
        };

        let stacks: Vec<FloorStack> = floors
            .iter()
            .map(|f| FloorStack {
                stack_height_min: f.stack_height_min,
                stack_height_max: f.stack_height_max,
                stack_gap: f.stack_gap,
            })
            .collect();
        for (floor, height) in floors
            .iter_mut()
            .zip(ground_stack_heights(&stacks, ground_floor_index))
        {
            floor.ground_stack_height = height;
        }

        let model_actors = model_actors_by_building.get(&id).cloned().unwrap_or_default();

        buildings.push(Building::new(
            id,
            building_config.display_index,
            floors,
            ground_floor_index,
            default_floor_index,
            model_actors,
        ));
    }

    buildings.sort_by_key(|b| b.display_index());

    let default_building_index = match &config.default_building {
        Some(default_building) => {
            let index = buildings
                .iter()
                .position(|b| b.id().as_str() == default_building);
            if index.is_none() {
                warn!(
                    default_building = %default_building,
                    "configured default building not found in venue"
                );
            }
            index
        }
        None => None,
    };

    VenueLayout::new(buildings, global_layer, default_building_index)
}
