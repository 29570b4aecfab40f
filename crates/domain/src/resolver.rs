//! Explore-state resolution
//!
//! Turns a partial navigation request plus the current state into a
//! fully specified target, or a reference/mode-availability error.
//! Pure: no side effects beyond logging.

use tracing::warn;

use crate::error::DomainError;
use crate::explore::{
    ExploreRequest, ExploreState, PlaceLookup, ResolvedExploreState, Selector, ViewMode,
};
use crate::ids::{BuildingId, FloorId};
use crate::layout::VenueLayout;

/// Feature flags the resolver consults.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// When off, building-mode requests degrade to floor mode.
    pub building_mode_enabled: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            building_mode_enabled: true,
        }
    }
}

/// Resolve `request` against the current state and layout.
///
/// Resolution is idempotent: feeding a resolved state back in returns
/// it unchanged.
pub fn resolve(
    request: &ExploreRequest,
    current: &ExploreState,
    layout: &VenueLayout,
    places: &dyn PlaceLookup,
    options: ResolveOptions,
) -> Result<ResolvedExploreState, DomainError> {
    // A place request short-circuits everything else. A viewpoint on
    // the same request is ignored (the place footprint drives the
    // camera).
    if let Some(place) = &request.place {
        return resolve_place(place, request.no_viewpoint, layout, places);
    }

    // DEFAULT-token substitution, with floor rollback when there is no
    // default building to anchor it.
    let mut building_sel = request.building.clone();
    let mut floor_sel = request.floor.clone();
    if matches!(building_sel, Selector::Default) {
        match layout.default_building() {
            Some(building) => building_sel = Selector::Id(building.id().clone()),
            None => {
                building_sel = Selector::Unset;
                if matches!(floor_sel, Selector::Default) {
                    floor_sel = Selector::Unset;
                }
            }
        }
    }

    // Building/floor cascade.
    let mut forced_mode = None;
    let mut target_building: Option<BuildingId>;
    let mut target_floor: Option<FloorId>;
    match &building_sel {
        Selector::Id(building_id) => {
            let building = layout
                .building(building_id)
                .ok_or_else(|| DomainError::unknown("building", building_id.as_str()))?;
            target_building = Some(building_id.clone());
            target_floor = match &floor_sel {
                Selector::Id(floor_id) => Some(floor_id.clone()),
                _ => Some(building.default_floor().id().clone()),
            };
        }
        _ => match &floor_sel {
            Selector::Id(floor_id) if layout.is_global_layer(floor_id) => {
                // Asking for the global layer as a floor means "go
                // global"; the current focus is carried forward.
                forced_mode = Some(ViewMode::Global);
                target_building = current.building.clone();
                target_floor = current.floor.clone();
            }
            Selector::Id(floor_id) => {
                let building = layout
                    .building_for_floor(floor_id)
                    .ok_or_else(|| DomainError::unknown("floor", floor_id.as_str()))?;
                target_building = Some(building.id().clone());
                target_floor = Some(floor_id.clone());
            }
            _ => {
                target_building = current.building.clone();
                target_floor = current.floor.clone();
            }
        },
    }

    // Mode default, then viability.
    let mut mode = forced_mode.or(request.mode).unwrap_or(current.mode);

    if mode == ViewMode::Global && !layout.has_global_layer() {
        warn!("global mode requested but the venue has no global layer");
        mode = ViewMode::Building;
    }

    if mode == ViewMode::Building || mode == ViewMode::Floor {
        if target_building.is_none() {
            target_building = layout.buildings().first().map(|b| b.id().clone());
        }
        if target_floor.is_none() {
            target_floor = target_building
                .as_ref()
                .and_then(|id| layout.building(id))
                .and_then(|b| b.floors().first())
                .map(|f| f.id().clone());
        }
    }

    if mode == ViewMode::Building {
        let stack_viable = options.building_mode_enabled
            && target_building
                .as_ref()
                .and_then(|id| layout.building(id))
                .is_some_and(|b| b.floors().len() > 1);
        if !stack_viable {
            mode = ViewMode::Floor;
        }
    }

    if mode == ViewMode::Floor {
        let has_building = target_building
            .as_ref()
            .and_then(|id| layout.building(id))
            .is_some();
        if !has_building {
            if layout.has_global_layer() {
                warn!("floor mode requested with no focused building, falling back to global");
                mode = ViewMode::Global;
            } else {
                return Err(DomainError::mode_unavailable(
                    "floor mode with no focused building and no global layer",
                ));
            }
        }
    }

    // Building mode never accepts a caller-specified camera viewpoint.
    let mut viewpoint = request.viewpoint;
    if viewpoint.is_some() && mode == ViewMode::Building {
        warn!("viewpoint requested in building mode is not supported, ignoring");
        viewpoint = None;
    }

    // Final consistency gate.
    if (mode == ViewMode::Building || mode == ViewMode::Floor)
        && (target_building.is_none() || target_floor.is_none())
    {
        if layout.has_global_layer() {
            warn!(
                mode = %mode,
                "target building or floor unresolved, falling back to global"
            );
            mode = ViewMode::Global;
        } else {
            return Err(DomainError::inconsistent(
                "target building or floor unresolved and no global layer to fall back to",
            ));
        }
    }

    Ok(ResolvedExploreState {
        mode,
        building: target_building,
        floor: target_floor,
        place: None,
        viewpoint,
        no_viewpoint: request.no_viewpoint,
    })
}

fn resolve_place(
    place: &crate::ids::PlaceId,
    no_viewpoint: bool,
    layout: &VenueLayout,
    places: &dyn PlaceLookup,
) -> Result<ResolvedExploreState, DomainError> {
    let floor = places
        .place_floor(place)
        .ok_or_else(|| DomainError::unknown("place", place.as_str()))?;

    if layout.is_global_layer(&floor) {
        return Ok(ResolvedExploreState {
            mode: ViewMode::Global,
            building: None,
            floor: None,
            place: Some(place.clone()),
            viewpoint: None,
            no_viewpoint,
        });
    }

    let building = layout
        .building_for_floor(&floor)
        .ok_or_else(|| DomainError::unknown("floor", floor.as_str()))?;
    if building.floor(&floor).is_none() {
        return Err(DomainError::unknown("floor", floor.as_str()));
    }
    Ok(ResolvedExploreState {
        mode: ViewMode::Floor,
        building: Some(building.id().clone()),
        floor: Some(floor),
        place: Some(place.clone()),
        viewpoint: None,
        no_viewpoint,
    })
}
