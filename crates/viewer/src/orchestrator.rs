//! Animation orchestration
//!
//! Turns one [`MapState`] into renderer calls: instant visibility
//! changes first, then every animated channel in parallel, then the
//! deferred hides and the manipulator switch once everything finished.
//! Completion is the slowest channel, not the sum. Only one transition
//! is in flight per orchestrator; a newer `apply` supersedes the
//! pending one, which returns [`ViewerError::Superseded`].

use std::sync::{Arc, Mutex};

use futures_channel::oneshot;
use futures_util::future::{self, Either};
use futures_util::pin_mut;
use tracing::debug;

use stackview_domain::{FloorId, Manipulator, MapState, ModelActorId, Point3, VenueLayout};

use crate::error::ViewerError;
use crate::ports::RendererPort;

/// Stack height building models are parked at when hidden; also the
/// reference travel for model animation duration scaling.
const MODEL_FAR_Z: f64 = 200.0;

#[derive(Default)]
struct ActiveTransition {
    seq: u64,
    cancel: Option<oneshot::Sender<()>>,
}

/// Drives renderer animations for one view.
pub struct AnimationOrchestrator {
    renderer: Arc<dyn RendererPort>,
    active: Mutex<ActiveTransition>,
}

impl AnimationOrchestrator {
    pub fn new(renderer: Arc<dyn RendererPort>) -> Self {
        Self {
            renderer,
            active: Mutex::new(ActiveTransition::default()),
        }
    }

    /// Apply `state` to the renderer and wait until every started
    /// animation finished.
    ///
    /// The custom manipulator is parked on the plain map manipulator
    /// for the duration of the transition and the target manipulator is
    /// installed only after completion, so gesture handling never runs
    /// against a moving stack.
    pub async fn apply(&self, state: &MapState, layout: &VenueLayout) -> Result<(), ViewerError> {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let seq = {
            let mut active = self.lock_active();
            if let Some(previous) = active.cancel.replace(cancel_tx) {
                let _ = previous.send(());
            }
            active.seq += 1;
            active.seq
        };
        debug!(seq, layers = state.layers.len(), "applying map state");

        self.renderer.stop_camera_motion();
        self.renderer.set_manipulator(Manipulator::Map);
        self.renderer.set_target_level_index(state.target_level_index);

        let mut waits = Vec::new();
        let mut hide_floors_after: Vec<FloorId> = Vec::new();
        let mut hide_models_after: Vec<ModelActorId> = Vec::new();

        for (floor_id, layer) in &state.layers {
            if let Some(visible) = layer.immediate_visible {
                self.renderer.set_floor_visible(floor_id, visible);
            }
            self.renderer.set_floor_lod(floor_id, layer.lod);
            if layer.visible {
                self.renderer.set_floor_visible(floor_id, true);
            } else {
                hide_floors_after.push(floor_id.clone());
            }
            // Layers hidden up front are parked, not slid.
            let duration = if !layer.visible && layer.immediate_visible.is_some() {
                std::time::Duration::ZERO
            } else {
                state.durations.floor
            };
            waits.push(
                self.renderer
                    .animate_floor_position(floor_id, layer.position, duration)
                    .wait(),
            );
        }

        for building in layout.buildings() {
            let Some(&visible) = state.building_models.get(building.id()) else {
                continue;
            };
            for actor in building.model_actors() {
                // Actors already showing (or hiding) what the state asks
                // for are left alone.
                if self.renderer.model_visible(actor) == visible {
                    continue;
                }
                let current_z = self.renderer.model_position(actor).z;
                let target_z = if visible { 0.0 } else { MODEL_FAR_Z };
                // Grounded models fly up, parked ones come down; the
                // start position decides, not the target.
                let base = if current_z == 0.0 {
                    state.durations.model_up
                } else {
                    state.durations.model_down
                };
                if visible {
                    self.renderer.set_model_visible(actor, true);
                } else {
                    hide_models_after.push(actor.clone());
                }
                // Scale by remaining travel so a model already in place
                // does not replay the full flight.
                let duration = base.mul_f64((target_z - current_z).abs() / MODEL_FAR_Z);
                waits.push(
                    self.renderer
                        .animate_model_position(actor, Point3::at_height(target_z), duration)
                        .wait(),
                );
            }
        }

        if let Some(camera) = &state.camera {
            if let Some(pitch) = camera.pitch {
                waits.push(
                    self.renderer
                        .animate_camera_pitch(pitch, state.durations.pitch)
                        .wait(),
                );
            }
            if let Some(heading) = camera.heading {
                waits.push(
                    self.renderer
                        .animate_camera_heading(heading, state.durations.heading)
                        .wait(),
                );
            }
            if let Some(position) = camera.position {
                waits.push(
                    self.renderer
                        .animate_camera_position(position, state.durations.camera_position)
                        .wait(),
                );
            }
        }

        let all_done = future::join_all(waits);
        pin_mut!(all_done);
        if let Either::Left(_) = future::select(cancel_rx, all_done).await {
            debug!(seq, "transition superseded");
            return Err(ViewerError::Superseded);
        }

        for floor_id in &hide_floors_after {
            self.renderer.set_floor_visible(floor_id, false);
        }
        for actor in &hide_models_after {
            self.renderer.set_model_visible(actor, false);
        }
        self.renderer.set_manipulator(state.manipulator);

        let mut active = self.lock_active();
        if active.seq == seq {
            active.cancel = None;
        }
        Ok(())
    }

    fn lock_active(&self) -> std::sync::MutexGuard<'_, ActiveTransition> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }
}
