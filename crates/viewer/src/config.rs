//! Viewer configuration
//!
//! Host-supplied tuning for camera policy, animation timing, and the
//! rendering-compatibility flags. Everything has a sensible default so
//! an empty document configures a standard venue.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stackview_domain::{CameraPosition, Durations, MapConfig, ModePolicy, ResolveOptions};

/// Host-facing configuration document for [`MultiBuildingView`].
///
/// [`MultiBuildingView`]: crate::controller::MultiBuildingView
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Allow building mode at all; when off, building requests degrade
    /// to floor mode.
    pub building_mode_enabled: bool,
    /// Show only the exact target floor instead of the stack below it.
    pub single_floor_rendering: bool,
    /// Compatibility behavior for legacy multifloor datasets.
    pub multifloor_compat: bool,
    /// Stack height layers are teleported to before being hidden.
    pub far_away_height: f64,

    pub global_pitch: f64,
    pub building_pitch: f64,
    pub floor_pitch: f64,
    pub global_padding_factor: f64,
    pub building_padding_factor: f64,
    pub floor_padding_factor: f64,

    pub floor_duration_ms: u64,
    pub pitch_duration_ms: u64,
    pub heading_duration_ms: u64,
    pub camera_position_duration_ms: u64,
    pub model_up_duration_ms: u64,
    pub model_down_duration_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            building_mode_enabled: true,
            single_floor_rendering: false,
            multifloor_compat: false,
            far_away_height: 750.0,
            global_pitch: -50.0,
            building_pitch: -20.0,
            floor_pitch: -50.0,
            global_padding_factor: 0.0,
            building_padding_factor: 0.1,
            floor_padding_factor: 0.1,
            floor_duration_ms: 700,
            pitch_duration_ms: 700,
            heading_duration_ms: 700,
            camera_position_duration_ms: 500,
            model_up_duration_ms: 700,
            model_down_duration_ms: 0,
        }
    }
}

impl ViewerConfig {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            building_mode_enabled: self.building_mode_enabled,
        }
    }

    /// Map-state computer configuration. `initial_camera_position` is
    /// the camera position captured when the view was constructed.
    pub fn map_config(&self, initial_camera_position: Option<CameraPosition>) -> MapConfig {
        MapConfig {
            global: ModePolicy {
                pitch: self.global_pitch,
                padding_factor: self.global_padding_factor,
            },
            building: ModePolicy {
                pitch: self.building_pitch,
                padding_factor: self.building_padding_factor,
            },
            floor: ModePolicy {
                pitch: self.floor_pitch,
                padding_factor: self.floor_padding_factor,
            },
            single_floor_rendering: self.single_floor_rendering,
            multifloor_compat: self.multifloor_compat,
            far_away_height: self.far_away_height,
            initial_camera_position,
            durations: Durations {
                floor: Duration::from_millis(self.floor_duration_ms),
                pitch: Duration::from_millis(self.pitch_duration_ms),
                heading: Duration::from_millis(self.heading_duration_ms),
                camera_position: Duration::from_millis(self.camera_position_duration_ms),
                model_up: Duration::from_millis(self.model_up_duration_ms),
                model_down: Duration::from_millis(self.model_down_duration_ms),
            },
        }
    }
}
