//! Shared layout fixtures for domain tests.

use std::collections::{BTreeSet, HashMap};

use crate::ids::{BuildingId, FloorId, ModelActorId, PlaceId};
use crate::layout::{parse_venue_layout, VenueLayout, VenueLayoutConfig};

fn config(with_global: bool) -> VenueLayoutConfig {
    let mut value = serde_json::json!({
        "buildings": {
            "B1": {
                "displayIndex": 0,
                "floors": {
                    "B1-F0": {"levelIndex": 0, "stackHeightMax": 3.0, "stackGap": 0.5}
                }
            },
            "B2": {
                "displayIndex": 1,
                "defaultFloor": "B2-F0",
                "floors": {
                    "B2-B1": {"levelIndex": -1, "stackHeightMax": 4.0},
                    "B2-F0": {"levelIndex": 0, "stackHeightMax": 3.0, "stackGap": 0.5},
                    "B2-F1": {"levelIndex": 1, "stackHeightMax": 3.0, "stackGap": 0.5}
                }
            }
        }
    });
    if with_global {
        value["layer"] = serde_json::json!("outside");
        value["defaultBuilding"] = serde_json::json!("B2");
    }
    serde_json::from_value(value).expect("fixture config is valid")
}

fn known_floors(with_global: bool) -> BTreeSet<FloorId> {
    let mut floors: BTreeSet<FloorId> = ["B1-F0", "B2-B1", "B2-F0", "B2-F1"]
        .into_iter()
        .map(FloorId::from)
        .collect();
    if with_global {
        floors.insert(FloorId::from("outside"));
    }
    floors
}

fn model_actors() -> HashMap<BuildingId, Vec<ModelActorId>> {
    let mut actors = HashMap::new();
    actors.insert(
        BuildingId::from("B1"),
        vec![ModelActorId::from("B1-model")],
    );
    actors.insert(
        BuildingId::from("B2"),
        vec![ModelActorId::from("B2-model")],
    );
    actors
}

/// Two buildings (B1 single floor, B2 with basement/ground/upper),
/// global layer "outside", default building B2.
pub(crate) fn layout_with_global() -> VenueLayout {
    parse_venue_layout(&config(true), &known_floors(true), &model_actors())
}

/// Same buildings, no global layer, no default building.
pub(crate) fn layout_without_global() -> VenueLayout {
    parse_venue_layout(&config(false), &known_floors(false), &model_actors())
}

/// A venue with no buildings at all, optionally keeping the global
/// layer "outside".
pub(crate) fn empty_layout(with_global: bool) -> VenueLayout {
    let mut value = serde_json::json!({ "buildings": {} });
    if with_global {
        value["layer"] = serde_json::json!("outside");
    }
    let config = serde_json::from_value(value).expect("fixture config is valid");
    let known = if with_global {
        BTreeSet::from([FloorId::from("outside")])
    } else {
        BTreeSet::new()
    };
    parse_venue_layout(&config, &known, &HashMap::new())
}

/// "shop" lives on B2-F1, "park" on the global layer.
pub(crate) fn places() -> HashMap<PlaceId, FloorId> {
    let mut places = HashMap::new();
    places.insert(PlaceId::from("shop"), FloorId::from("B2-F1"));
    places.insert(PlaceId::from("park"), FloorId::from("outside"));
    places
}
