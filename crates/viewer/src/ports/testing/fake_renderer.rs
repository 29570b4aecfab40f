//! In-memory renderer for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use stackview_domain::{
    BuildingId, CameraPosition, FloorId, Footprint, Lod, Manipulator, ModelActorId, PlaceId,
    Point3, PointOfFocus, Viewport, ViewpointFit,
};

use crate::ports::renderer_port::{AnimationCompleter, AnimationHandle, RendererPort};

#[derive(Debug, Default)]
struct FakeState {
    floor_ids: Vec<FloorId>,
    model_actors: HashMap<BuildingId, Vec<ModelActorId>>,
    places: HashMap<PlaceId, FloorId>,
    footprints: HashMap<String, Footprint>,
    points_of_focus: HashMap<String, PointOfFocus>,
    camera_position: CameraPosition,
    camera_heading: f64,
    viewport: Viewport,

    floor_positions: HashMap<FloorId, Point3>,
    floor_visibility: HashMap<FloorId, bool>,
    floor_lods: HashMap<FloorId, Lod>,
    floor_animations: Vec<(FloorId, Point3, Duration)>,
    model_positions: HashMap<ModelActorId, Point3>,
    model_visibility: HashMap<ModelActorId, bool>,
    model_animations: Vec<(ModelActorId, Point3, Duration)>,
    camera_animations: Vec<(String, Duration)>,
    manipulators: Vec<Manipulator>,
    target_level_indices: Vec<Option<i32>>,
    stop_camera_motion_calls: usize,
    pending: Vec<AnimationCompleter>,
}

/// Stateful in-memory [`RendererPort`].
///
/// In the default mode every animation completes immediately. In manual
/// mode ([`FakeRenderer::manual`]) animations stay open until the test
/// calls [`complete_all`](FakeRenderer::complete_all).
#[derive(Debug, Default)]
pub struct FakeRenderer {
    manual_animations: bool,
    state: Mutex<FakeState>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer whose animations stay pending until completed by the
    /// test.
    pub fn manual() -> Self {
        Self {
            manual_animations: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // -------------------------------------------------------------------------
    // Scenario setup
    // -------------------------------------------------------------------------

    pub fn with_floors(self, ids: &[&str]) -> Self {
        self.lock().floor_ids = ids.iter().map(|id| FloorId::from(*id)).collect();
        self
    }

    pub fn with_model_actor(self, building: &str, actor: &str) -> Self {
        self.lock()
            .model_actors
            .entry(BuildingId::from(building))
            .or_default()
            .push(ModelActorId::from(actor));
        self
    }

    pub fn with_place(self, place: &str, floor: &str) -> Self {
        self.lock()
            .places
            .insert(PlaceId::from(place), FloorId::from(floor));
        self
    }

    pub fn with_footprint(self, id: &str, footprint: Footprint) -> Self {
        self.lock().footprints.insert(id.to_string(), footprint);
        self
    }

    pub fn with_point_of_focus(self, id: &str, pof: PointOfFocus) -> Self {
        self.lock().points_of_focus.insert(id.to_string(), pof);
        self
    }

    pub fn with_camera_position(self, position: CameraPosition) -> Self {
        self.lock().camera_position = position;
        self
    }

    pub fn with_viewport(self, width: f64, height: f64) -> Self {
        self.lock().viewport = Viewport { width, height };
        self
    }

    /// Place a model actor at a height with an explicit visibility
    /// flag, e.g. mid-flight after an interrupted transition.
    pub fn with_model_state(self, actor: &str, z: f64, visible: bool) -> Self {
        {
            let mut state = self.lock();
            let id = ModelActorId::from(actor);
            state.model_positions.insert(id.clone(), Point3::at_height(z));
            state.model_visibility.insert(id, visible);
        }
        self
    }

    // -------------------------------------------------------------------------
    // Animation control
    // -------------------------------------------------------------------------

    /// Complete every animation currently held open.
    pub fn complete_all(&self) {
        let pending = std::mem::take(&mut self.lock().pending);
        for completer in pending {
            completer.complete();
        }
    }

    pub fn pending_animations(&self) -> usize {
        self.lock().pending.len()
    }

    fn animation(&self) -> AnimationHandle {
        if self.manual_animations {
            let (completer, handle) = AnimationHandle::pending();
            self.lock().pending.push(completer);
            handle
        } else {
            AnimationHandle::completed()
        }
    }

    // -------------------------------------------------------------------------
    // Recorded state
    // -------------------------------------------------------------------------

    pub fn floor_position(&self, floor: &str) -> Option<Point3> {
        self.lock().floor_positions.get(&FloorId::from(floor)).copied()
    }

    pub fn floor_visible(&self, floor: &str) -> Option<bool> {
        self.lock().floor_visibility.get(&FloorId::from(floor)).copied()
    }

    pub fn floor_lod(&self, floor: &str) -> Option<Lod> {
        self.lock().floor_lods.get(&FloorId::from(floor)).copied()
    }

    pub fn floor_animations(&self) -> Vec<(FloorId, Point3, Duration)> {
        self.lock().floor_animations.clone()
    }

    /// The recorded visibility flag, `None` until something set it.
    pub fn model_visibility(&self, actor: &str) -> Option<bool> {
        self.lock()
            .model_visibility
            .get(&ModelActorId::from(actor))
            .copied()
    }

    pub fn model_animations(&self) -> Vec<(ModelActorId, Point3, Duration)> {
        self.lock().model_animations.clone()
    }

    pub fn camera_animations(&self) -> Vec<(String, Duration)> {
        self.lock().camera_animations.clone()
    }

    pub fn manipulators(&self) -> Vec<Manipulator> {
        self.lock().manipulators.clone()
    }

    pub fn target_level_indices(&self) -> Vec<Option<i32>> {
        self.lock().target_level_indices.clone()
    }

    pub fn stop_camera_motion_calls(&self) -> usize {
        self.lock().stop_camera_motion_calls
    }
}

impl RendererPort for FakeRenderer {
    fn floor_ids(&self) -> Vec<FloorId> {
        self.lock().floor_ids.clone()
    }

    fn model_actors(&self, building: &BuildingId) -> Vec<ModelActorId> {
        self.lock()
            .model_actors
            .get(building)
            .cloned()
            .unwrap_or_default()
    }

    fn place_floor(&self, place: &PlaceId) -> Option<FloorId> {
        self.lock().places.get(place).cloned()
    }

    fn footprint(&self, id: &str) -> Option<Footprint> {
        self.lock().footprints.get(id).cloned()
    }

    fn point_of_focus(&self, id: &str) -> Option<PointOfFocus> {
        self.lock().points_of_focus.get(id).copied()
    }

    fn camera_position(&self) -> CameraPosition {
        self.lock().camera_position
    }

    fn camera_heading(&self) -> f64 {
        self.lock().camera_heading
    }

    fn viewport(&self) -> Viewport {
        self.lock().viewport
    }

    /// Centroid of the points; radius encodes the top padding so tests
    /// can see which padding was requested.
    fn fit_viewpoint(&self, fit: &ViewpointFit) -> Option<CameraPosition> {
        if fit.points.is_empty() {
            return None;
        }
        let n = fit.points.len() as f64;
        Some(CameraPosition {
            x: fit.points.iter().map(|p| p.x).sum::<f64>() / n,
            y: fit.points.iter().map(|p| p.y).sum::<f64>() / n,
            radius: fit.padding.top,
        })
    }

    fn model_position(&self, actor: &ModelActorId) -> Point3 {
        self.lock()
            .model_positions
            .get(actor)
            .copied()
            .unwrap_or_default()
    }

    /// Models start shown, matching a renderer booting into the global
    /// view.
    fn model_visible(&self, actor: &ModelActorId) -> bool {
        self.lock()
            .model_visibility
            .get(actor)
            .copied()
            .unwrap_or(true)
    }

    fn set_floor_visible(&self, floor: &FloorId, visible: bool) {
        self.lock().floor_visibility.insert(floor.clone(), visible);
    }

    fn animate_floor_position(
        &self,
        floor: &FloorId,
        to: Point3,
        duration: Duration,
    ) -> AnimationHandle {
        {
            let mut state = self.lock();
            state.floor_positions.insert(floor.clone(), to);
            state.floor_animations.push((floor.clone(), to, duration));
        }
        self.animation()
    }

    fn set_model_visible(&self, actor: &ModelActorId, visible: bool) {
        self.lock().model_visibility.insert(actor.clone(), visible);
    }

    fn animate_model_position(
        &self,
        actor: &ModelActorId,
        to: Point3,
        duration: Duration,
    ) -> AnimationHandle {
        {
            let mut state = self.lock();
            state.model_positions.insert(actor.clone(), to);
            state.model_animations.push((actor.clone(), to, duration));
        }
        self.animation()
    }

    fn stop_camera_motion(&self) {
        self.lock().stop_camera_motion_calls += 1;
    }

    fn animate_camera_pitch(&self, pitch: f64, duration: Duration) -> AnimationHandle {
        self.lock()
            .camera_animations
            .push((format!("pitch:{pitch}"), duration));
        self.animation()
    }

    fn animate_camera_heading(&self, heading: f64, duration: Duration) -> AnimationHandle {
        {
            let mut state = self.lock();
            state.camera_heading = heading;
            state
                .camera_animations
                .push((format!("heading:{heading}"), duration));
        }
        self.animation()
    }

    fn animate_camera_position(
        &self,
        position: CameraPosition,
        duration: Duration,
    ) -> AnimationHandle {
        {
            let mut state = self.lock();
            state.camera_position = position;
            state
                .camera_animations
                .push((format!("position:{},{}", position.x, position.y), duration));
        }
        self.animation()
    }

    fn set_floor_lod(&self, floor: &FloorId, lod: Lod) {
        self.lock().floor_lods.insert(floor.clone(), lod);
    }

    fn set_manipulator(&self, manipulator: Manipulator) {
        self.lock().manipulators.push(manipulator);
    }

    fn set_target_level_index(&self, level_index: Option<i32>) {
        self.lock().target_level_indices.push(level_index);
    }
}
