//! MultiBuildingView - the host-facing navigation controller
//!
//! Owns the persisted explore state and ties the pieces together: each
//! `go_to` resolves the request, computes the map state, lets observers
//! veto it, hands it to the animation orchestrator, and commits the
//! new explore state only after every animation finished. A vetoed,
//! failed or superseded call leaves the persisted state untouched.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::debug;

use stackview_domain::{
    compute, parse_venue_layout, point_in_polygon, resolve, Building, BuildingId, CameraPosition,
    ExploreRequest, ExploreState, FloorId, Footprint, LocalizationTable, MapConfig, MapQuery,
    PlaceId, PlaceLookup, Point2, PointOfFocus, VenueLayout, VenueLayoutConfig, ViewMode,
    Viewport, ViewpointFit,
};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::orchestrator::AnimationOrchestrator;
use crate::ports::{ExploreObserver, RendererPort};

/// Interactive viewer over a venue of stacked buildings.
pub struct MultiBuildingView {
    renderer: Arc<dyn RendererPort>,
    orchestrator: AnimationOrchestrator,
    layout: VenueLayout,
    config: ViewerConfig,
    map_config: MapConfig,
    localization: Mutex<LocalizationTable>,
    state: Mutex<ExploreState>,
    observers: Vec<Arc<dyn ExploreObserver>>,
}

impl MultiBuildingView {
    /// Build a view over `renderer` from the venue-layout document.
    ///
    /// The renderer's floor inventory filters the document, and the
    /// camera position at this moment is kept as the compatibility
    /// fallback framing.
    pub fn new(
        renderer: Arc<dyn RendererPort>,
        config: ViewerConfig,
        layout_config: &VenueLayoutConfig,
    ) -> Self {
        let known_floors: BTreeSet<FloorId> = renderer.floor_ids().into_iter().collect();
        let mut model_actors: HashMap<BuildingId, Vec<_>> = HashMap::new();
        for building_id in layout_config.buildings.keys() {
            let id = BuildingId::from(building_id.as_str());
            let actors = renderer.model_actors(&id);
            model_actors.insert(id, actors);
        }
        let layout = parse_venue_layout(layout_config, &known_floors, &model_actors);
        debug!(
            buildings = layout.buildings().len(),
            global_layer = layout.has_global_layer(),
            "venue layout loaded"
        );

        let map_config = config.map_config(Some(renderer.camera_position()));
        Self {
            orchestrator: AnimationOrchestrator::new(renderer.clone()),
            renderer,
            layout,
            config,
            map_config,
            localization: Mutex::new(LocalizationTable::default()),
            state: Mutex::new(ExploreState::initial()),
            observers: Vec::new(),
        }
    }

    /// Register an observer. Observers are consulted in registration
    /// order; the first veto wins.
    pub fn add_observer(&mut self, observer: Arc<dyn ExploreObserver>) {
        self.observers.push(observer);
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Navigate to the target described by `request`.
    ///
    /// Returns the committed explore state. The persisted state changes
    /// only when the whole transition ran to completion.
    pub async fn go_to(&self, request: ExploreRequest) -> Result<ExploreState, ViewerError> {
        let current = self.lock_state().clone();
        let resolved = resolve(
            &request,
            &current,
            &self.layout,
            &RendererPlaces(self.renderer.as_ref()),
            self.config.resolve_options(),
        )
        .map_err(ViewerError::Resolve)?;
        let to_state = resolved.to_state();

        let mut map_state = compute(
            &resolved,
            &current,
            &self.layout,
            &self.map_config,
            &RendererQuery(self.renderer.as_ref()),
        )
        .map_err(ViewerError::Compute)?;
        map_state.apply_duration_overrides(&request.durations);

        // Observers are asked only once the transition is known to be
        // realizable; a veto still precedes any renderer mutation.
        for observer in &self.observers {
            if !observer.explore_will_change(&current, &to_state) {
                debug!(from = %current.mode, to = %to_state.mode, "transition vetoed");
                return Err(ViewerError::Vetoed);
            }
        }

        self.orchestrator.apply(&map_state, &self.layout).await?;

        *self.lock_state() = to_state.clone();
        for observer in &self.observers {
            observer.explore_changed(&current, &to_state);
        }
        Ok(to_state)
    }

    /// Compatibility entry taking one bare name: the global layer goes
    /// global, a building id opens that building's stack, a floor id
    /// focuses that floor. Global and floor targets leave the camera
    /// where the host put it. `duration` overrides the floor channel.
    pub async fn change_floor(
        &self,
        name: &str,
        duration: Option<Duration>,
    ) -> Result<ExploreState, ViewerError> {
        let mut request = if self.layout.is_global_layer(&FloorId::from(name)) {
            ExploreRequest {
                mode: Some(ViewMode::Global),
                no_viewpoint: true,
                ..Default::default()
            }
        } else if self.layout.building(&BuildingId::from(name)).is_some() {
            ExploreRequest::building(ViewMode::Building, name)
        } else {
            let mut request = ExploreRequest::floor(ViewMode::Floor, name);
            request.no_viewpoint = true;
            request
        };
        request.durations.floor = duration;
        self.go_to(request).await
    }

    /// Step `offset` floors up (positive) or down within the focused
    /// building's stack, keeping the current mode.
    pub async fn step_floor(&self, offset: i32) -> Result<ExploreState, ViewerError> {
        let (mode, next) = {
            let state = self.lock_state();
            let (Some(building_id), Some(floor_id)) = (&state.building, &state.floor) else {
                return Err(ViewerError::floor_out_of_range("unfocused view", offset));
            };
            let building = self
                .layout
                .building(building_id)
                .ok_or_else(|| ViewerError::floor_out_of_range(floor_id.as_str(), offset))?;
            let index = building
                .floors()
                .iter()
                .position(|f| f.id() == floor_id)
                .ok_or_else(|| ViewerError::floor_out_of_range(floor_id.as_str(), offset))?;
            let target = index as i64 + i64::from(offset);
            if target < 0 || target >= building.floors().len() as i64 {
                return Err(ViewerError::floor_out_of_range(floor_id.as_str(), offset));
            }
            let mode = if state.mode == ViewMode::Global {
                ViewMode::Floor
            } else {
                state.mode
            };
            (mode, building.floors()[target as usize].id().clone())
        };
        self.go_to(ExploreRequest::floor(mode, next)).await
    }

    // -------------------------------------------------------------------------
    // State and layout access
    // -------------------------------------------------------------------------

    pub fn current_explore_state(&self) -> ExploreState {
        self.lock_state().clone()
    }

    pub fn mode(&self) -> ViewMode {
        self.lock_state().mode
    }

    pub fn current_building(&self) -> Option<BuildingId> {
        self.lock_state().building.clone()
    }

    /// The floor the view is on: the global layer in global mode, the
    /// focused floor otherwise.
    pub fn current_floor(&self) -> Option<FloorId> {
        let state = self.lock_state();
        if state.mode == ViewMode::Global {
            self.layout.global_layer().cloned()
        } else {
            state.floor.clone()
        }
    }

    pub fn layout(&self) -> &VenueLayout {
        &self.layout
    }

    pub fn buildings(&self) -> &[Building] {
        self.layout.buildings()
    }

    pub fn building(&self, id: &BuildingId) -> Option<&Building> {
        self.layout.building(id)
    }

    /// The building whose footprint contains `point`, in display order.
    pub fn building_at_point(&self, point: Point2) -> Option<BuildingId> {
        self.layout.buildings().iter().find_map(|building| {
            let footprint = self.renderer.footprint(building.id().as_str())?;
            point_in_polygon(point, &footprint.points).then(|| building.id().clone())
        })
    }

    // -------------------------------------------------------------------------
    // Localization
    // -------------------------------------------------------------------------

    /// Swap the display-name table, e.g. on a language change.
    pub fn set_localization(&self, table: LocalizationTable) {
        *self.lock_localization() = table;
    }

    /// Localized display name for a building or floor id, falling back
    /// to the id itself.
    pub fn display_name(&self, id: &str) -> String {
        self.lock_localization().name_for(id).to_string()
    }

    fn lock_state(&self) -> MutexGuard<'_, ExploreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_localization(&self) -> MutexGuard<'_, LocalizationTable> {
        self.localization.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Place lookup over the renderer's place inventory.
struct RendererPlaces<'a>(&'a dyn RendererPort);

impl PlaceLookup for RendererPlaces<'_> {
    fn place_floor(&self, place: &PlaceId) -> Option<FloorId> {
        self.0.place_floor(place)
    }
}

/// Read-only map queries over the renderer.
struct RendererQuery<'a>(&'a dyn RendererPort);

impl MapQuery for RendererQuery<'_> {
    fn footprint(&self, id: &str) -> Option<Footprint> {
        self.0.footprint(id)
    }

    fn point_of_focus(&self, id: &str) -> Option<PointOfFocus> {
        self.0.point_of_focus(id)
    }

    fn camera_heading(&self) -> f64 {
        self.0.camera_heading()
    }

    fn viewport(&self) -> Viewport {
        self.0.viewport()
    }

    fn fit_viewpoint(&self, fit: &ViewpointFit) -> Option<CameraPosition> {
        self.0.fit_viewpoint(fit)
    }
}
