//! Map state - the renderer-facing description of one view instant
//!
//! Produced by the computer, consumed by the animation orchestrator,
//! and discarded; nothing here outlives a single navigation call.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::explore::{CameraPosition, DurationOverrides};
use crate::geometry::{Footprint, Point2, Point3};
use crate::ids::{BuildingId, FloorId};

/// Level-of-detail policy for one floor layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lod {
    /// Let the renderer pick by distance.
    Auto,
    /// Force a single detail level; content is disabled alongside.
    Level(usize),
}

/// The renderer's active camera-control input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manipulator {
    /// Standard pan/zoom.
    Map,
    /// Application-defined gesture handling (floor stepping).
    Custom,
}

/// Target configuration for one floor layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    pub lod: Lod,
    pub position: Point3,
    pub visible: bool,
    /// When set, visibility is forced to this value before any
    /// animation starts.
    pub immediate_visible: Option<bool>,
}

/// Camera target. Fields left `None` leave that channel untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraConfig {
    pub position: Option<CameraPosition>,
    pub pitch: Option<f64>,
    pub heading: Option<f64>,
}

/// Per-channel animation durations for one transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Durations {
    pub floor: Duration,
    pub pitch: Duration,
    pub heading: Duration,
    pub camera_position: Duration,
    pub model_up: Duration,
    pub model_down: Duration,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            floor: Duration::from_millis(700),
            pitch: Duration::from_millis(700),
            heading: Duration::from_millis(700),
            camera_position: Duration::from_millis(500),
            model_up: Duration::from_millis(700),
            model_down: Duration::ZERO,
        }
    }
}

/// A fully computed view description for one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct MapState {
    pub target_level_index: Option<i32>,
    pub layers: BTreeMap<FloorId, LayerConfig>,
    /// `None` means the camera is left entirely alone.
    pub camera: Option<CameraConfig>,
    /// Target visibility per building model.
    pub building_models: BTreeMap<BuildingId, bool>,
    pub manipulator: Manipulator,
    pub durations: Durations,
}

impl MapState {
    /// Merge caller-supplied duration overrides onto the computed
    /// defaults. `all` covers the three camera channels; individual
    /// fields win over it.
    pub fn apply_duration_overrides(&mut self, overrides: &DurationOverrides) {
        if let Some(duration) = overrides.all {
            self.durations.pitch = duration;
            self.durations.heading = duration;
            self.durations.camera_position = duration;
        }
        if let Some(duration) = overrides.pitch {
            self.durations.pitch = duration;
        }
        if let Some(duration) = overrides.heading {
            self.durations.heading = duration;
        }
        if let Some(duration) = overrides.camera_position {
            self.durations.camera_position = duration;
        }
        if let Some(duration) = overrides.floor {
            self.durations.floor = duration;
        }
    }
}

/// Viewport dimensions in pixels, for padding computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Pixel padding for the bounding-viewpoint fit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Request for the renderer's bounding-viewpoint fitting function.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewpointFit {
    pub points: Vec<Point2>,
    pub padding: Padding,
    pub pitch: f64,
    pub heading: f64,
}

/// A renderer-provided reference point and heading, the default
/// look-at target for a floor or building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointOfFocus {
    pub x: f64,
    pub y: f64,
    pub heading_in_degrees: f64,
}

/// Read-only renderer queries the map-state computer needs. Nothing
/// here mutates renderer state.
pub trait MapQuery {
    /// Outline polygon for a floor, building or place id.
    fn footprint(&self, id: &str) -> Option<Footprint>;

    /// Point of focus for a floor or building id.
    fn point_of_focus(&self, id: &str) -> Option<PointOfFocus>;

    /// The camera's current heading in degrees.
    fn camera_heading(&self) -> f64;

    fn viewport(&self) -> Viewport;

    /// Fit a camera position so all points are on screen under the
    /// given padding, pitch and heading.
    fn fit_viewpoint(&self, fit: &ViewpointFit) -> Option<CameraPosition>;
}
