//! RendererPort - the outbound contract to the map renderer
//!
//! Everything the viewer needs from the rendering engine goes through
//! this trait: the floor/model inventory, read-only camera and geometry
//! queries, and the animated mutations. Animated calls start the
//! animation and return an [`AnimationHandle`] immediately; the
//! orchestrator decides what to wait for.

use std::time::Duration;

use futures_channel::oneshot;
use stackview_domain::{
    BuildingId, CameraPosition, FloorId, Footprint, Lod, Manipulator, ModelActorId, PlaceId,
    Point3, PointOfFocus, Viewport, ViewpointFit,
};

/// Completion token for one running animation.
///
/// Dropping the handle detaches from the animation without stopping it.
/// An animation the renderer discards (its completer dropped) counts as
/// finished, so a waiter never hangs on a replaced animation.
#[derive(Debug)]
pub struct AnimationHandle {
    receiver: Option<oneshot::Receiver<()>>,
}

impl AnimationHandle {
    /// A handle that is already complete, for instant changes.
    pub fn completed() -> Self {
        Self { receiver: None }
    }

    /// A pending handle paired with the completer the adapter fires
    /// when the renderer reports the animation done.
    pub fn pending() -> (AnimationCompleter, Self) {
        let (sender, receiver) = oneshot::channel();
        (
            AnimationCompleter { sender },
            Self {
                receiver: Some(receiver),
            },
        )
    }

    /// Resolves when the animation finishes or is discarded.
    pub async fn wait(self) {
        if let Some(receiver) = self.receiver {
            let _ = receiver.await;
        }
    }
}

/// Adapter-side end of an [`AnimationHandle`].
#[derive(Debug)]
pub struct AnimationCompleter {
    sender: oneshot::Sender<()>,
}

impl AnimationCompleter {
    /// Mark the animation finished, waking any waiter.
    pub fn complete(self) {
        let _ = self.sender.send(());
    }
}

/// Outbound port to the rendering engine.
///
/// The inventory and query methods are synchronous reads of renderer
/// state. The `set_*` methods apply instantly; the `animate_*` methods
/// return handles. The capability methods at the end have no-op
/// defaults so reduced renderers only implement what they support.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait RendererPort: Send + Sync {
    // -------------------------------------------------------------------------
    // Inventory
    // -------------------------------------------------------------------------

    /// All floor layer ids the renderer loaded, including any venue-wide
    /// global layer.
    fn floor_ids(&self) -> Vec<FloorId>;

    /// The 3-D model actors standing in for a building on the global view.
    fn model_actors(&self, building: &BuildingId) -> Vec<ModelActorId>;

    /// The floor a place id lives on, from the renderer's place inventory.
    fn place_floor(&self, place: &PlaceId) -> Option<FloorId>;

    // -------------------------------------------------------------------------
    // Read-only queries
    // -------------------------------------------------------------------------

    /// Outline polygon for a floor, building or place id.
    fn footprint(&self, id: &str) -> Option<Footprint>;

    /// Point of focus for a floor or building id.
    fn point_of_focus(&self, id: &str) -> Option<PointOfFocus>;

    fn camera_position(&self) -> CameraPosition;

    /// The camera's current heading in degrees.
    fn camera_heading(&self) -> f64;

    fn viewport(&self) -> Viewport;

    /// Fit a camera position so all points are on screen under the
    /// given padding, pitch and heading.
    fn fit_viewpoint(&self, fit: &ViewpointFit) -> Option<CameraPosition>;

    /// Current position of a building model actor.
    fn model_position(&self, actor: &ModelActorId) -> Point3;

    /// Current visibility flag of a building model actor.
    fn model_visible(&self, actor: &ModelActorId) -> bool;

    // -------------------------------------------------------------------------
    // Floor layer mutations
    // -------------------------------------------------------------------------

    fn set_floor_visible(&self, floor: &FloorId, visible: bool);

    fn animate_floor_position(
        &self,
        floor: &FloorId,
        to: Point3,
        duration: Duration,
    ) -> AnimationHandle;

    // -------------------------------------------------------------------------
    // Building model mutations
    // -------------------------------------------------------------------------

    fn set_model_visible(&self, actor: &ModelActorId, visible: bool);

    fn animate_model_position(
        &self,
        actor: &ModelActorId,
        to: Point3,
        duration: Duration,
    ) -> AnimationHandle;

    // -------------------------------------------------------------------------
    // Camera mutations
    // -------------------------------------------------------------------------

    /// Abort any camera motion in flight before a new transition starts.
    fn stop_camera_motion(&self);

    fn animate_camera_pitch(&self, pitch: f64, duration: Duration) -> AnimationHandle;

    fn animate_camera_heading(&self, heading: f64, duration: Duration) -> AnimationHandle;

    fn animate_camera_position(
        &self,
        position: CameraPosition,
        duration: Duration,
    ) -> AnimationHandle;

    // -------------------------------------------------------------------------
    // Optional capabilities, no-op by default
    // -------------------------------------------------------------------------

    /// Force or release a floor layer's level of detail.
    fn set_floor_lod(&self, floor: &FloorId, lod: Lod) {
        let _ = (floor, lod);
    }

    /// Switch the active camera manipulator.
    fn set_manipulator(&self, manipulator: Manipulator) {
        let _ = manipulator;
    }

    /// Report the focused level index to renderer-side UI.
    fn set_target_level_index(&self, level_index: Option<i32>) {
        let _ = level_index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    #[test]
    fn test_completed_handle_is_immediately_done() {
        let handle = AnimationHandle::completed();
        assert!(handle.wait().now_or_never().is_some());
    }

    #[test]
    fn test_pending_handle_resolves_on_complete() {
        let (completer, handle) = AnimationHandle::pending();
        let mut wait = Box::pin(handle.wait());
        assert!(wait.as_mut().now_or_never().is_none());
        completer.complete();
        assert!(wait.as_mut().now_or_never().is_some());
    }

    #[test]
    fn test_discarded_animation_counts_as_finished() {
        let (completer, handle) = AnimationHandle::pending();
        drop(completer);
        assert!(handle.wait().now_or_never().is_some());
    }
}
