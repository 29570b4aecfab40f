//! Venue layout model - immutable once parsed
//!
//! A venue is an ordered set of buildings; a building is an ordered
//! stack of floors. All cross-references (building by id, building by
//! floor id) are resolved at parse time so lookups never fail for data
//! the model accepted.

mod localization;
mod parser;

use std::collections::HashMap;

pub use localization::{LocalizationTable, LocalizedNames};
pub use parser::{parse_venue_layout, BuildingConfig, FloorConfig, VenueLayoutConfig};

use crate::ids::{BuildingId, FloorId, ModelActorId};

/// One floor of a building.
///
/// `ground_stack_height` is the signed distance from the building's
/// level-0 floor, accounting for floor thickness and gaps. It is 0 for
/// the ground floor and can be negative for basements.
#[derive(Debug, Clone, PartialEq)]
pub struct Floor {
    id: FloorId,
    level_index: i32,
    stack_height_min: f64,
    stack_height_max: f64,
    stack_gap: f64,
    ground_stack_height: f64,
}

impl Floor {
    pub fn id(&self) -> &FloorId {
        &self.id
    }

    /// Building-relative vertical order; 0 is the ground floor.
    pub fn level_index(&self) -> i32 {
        self.level_index
    }

    pub fn stack_height_min(&self) -> f64 {
        self.stack_height_min
    }

    pub fn stack_height_max(&self) -> f64 {
        self.stack_height_max
    }

    pub fn stack_gap(&self) -> f64 {
        self.stack_gap
    }

    pub fn ground_stack_height(&self) -> f64 {
        self.ground_stack_height
    }
}

/// A building: floors sorted by level index, plus the 3-D model actors
/// that stand in for it on the global view.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    id: BuildingId,
    display_index: i32,
    floors: Vec<Floor>,
    floor_index_by_id: HashMap<FloorId, usize>,
    ground_floor_index: usize,
    default_floor_index: Option<usize>,
    model_actors: Vec<ModelActorId>,
}

impl Building {
    pub fn id(&self) -> &BuildingId {
        &self.id
    }

    /// UI ordering within the venue.
    pub fn display_index(&self) -> i32 {
        self.display_index
    }

    /// Floors sorted by level index, ascending. Never empty.
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, id: &FloorId) -> Option<&Floor> {
        self.floor_index_by_id.get(id).map(|&i| &self.floors[i])
    }

    /// Index into `floors()` of the floor the building stack steps on.
    pub fn ground_floor_index(&self) -> usize {
        self.ground_floor_index
    }

    /// The floor navigation lands on when none is requested: the
    /// configured default floor, or the lowest floor when none is set.
    pub fn default_floor(&self) -> &Floor {
        &self.floors[self.default_floor_index.unwrap_or(0)]
    }

    pub fn model_actors(&self) -> &[ModelActorId] {
        &self.model_actors
    }

    pub(crate) fn new(
        id: BuildingId,
        display_index: i32,
        floors: Vec<Floor>,
        ground_floor_index: usize,
        default_floor_index: Option<usize>,
        model_actors: Vec<ModelActorId>,
    ) -> Self {
        let floor_index_by_id = floors
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        Self {
            id,
            display_index,
            floors,
            floor_index_by_id,
            ground_floor_index,
            default_floor_index,
            model_actors,
        }
    }
}

/// The whole venue: buildings sorted by display index, the optional
/// venue-wide global layer, and the reverse floor-to-building index.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueLayout {
    buildings: Vec<Building>,
    building_index_by_id: HashMap<BuildingId, usize>,
    building_index_by_floor: HashMap<FloorId, usize>,
    global_layer: Option<FloorId>,
    default_building_index: Option<usize>,
}

impl VenueLayout {
    pub(crate) fn new(
        buildings: Vec<Building>,
        global_layer: Option<FloorId>,
        default_building_index: Option<usize>,
    ) -> Self {
        let mut building_index_by_id = HashMap::new();
        let mut building_index_by_floor = HashMap::new();
        for (i, building) in buildings.iter().enumerate() {
            building_index_by_id.insert(building.id.clone(), i);
            for floor in &building.floors {
                building_index_by_floor.insert(floor.id.clone(), i);
            }
        }
        Self {
            buildings,
            building_index_by_id,
            building_index_by_floor,
            global_layer,
            default_building_index,
        }
    }

    /// Buildings sorted by display index, ascending.
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building(&self, id: &BuildingId) -> Option<&Building> {
        self.building_index_by_id
            .get(id)
            .map(|&i| &self.buildings[i])
    }

    /// Owning building for a floor id, via the reverse index.
    pub fn building_for_floor(&self, floor: &FloorId) -> Option<&Building> {
        self.building_index_by_floor
            .get(floor)
            .map(|&i| &self.buildings[i])
    }

    pub fn has_global_layer(&self) -> bool {
        self.global_layer.is_some()
    }

    pub fn global_layer(&self) -> Option<&FloorId> {
        self.global_layer.as_ref()
    }

    pub fn is_global_layer(&self, floor: &FloorId) -> bool {
        self.global_layer.as_ref() == Some(floor)
    }

    pub fn default_building(&self) -> Option<&Building> {
        self.default_building_index.map(|i| &self.buildings[i])
    }
}
