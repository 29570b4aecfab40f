//! Explore state - the logical "where the viewer currently is"
//!
//! Three nested granularities: venue-wide global view, one building's
//! floor stack, one floor. Requests arrive partial; the resolver fills
//! them into a [`ResolvedExploreState`].

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ids::{BuildingId, FloorId, PlaceId};

/// View granularity. All per-mode policy (pitch, padding, visibility
/// rules) is dispatched through tables keyed by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Global,
    Building,
    Floor,
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Global => write!(f, "global"),
            ViewMode::Building => write!(f, "building"),
            ViewMode::Floor => write!(f, "floor"),
        }
    }
}

/// Camera position in the renderer's orbit parametrization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraPosition {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Caller-specified camera target. `pitch`/`heading` fall back to the
/// per-mode defaults when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: CameraPosition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

/// The persisted explore state, owned by the navigation controller and
/// mutated only by a successful `go_to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreState {
    pub mode: ViewMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<BuildingId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<FloorId>,
}

impl ExploreState {
    /// Starting state: global view, nothing focused.
    pub fn initial() -> Self {
        Self {
            mode: ViewMode::Global,
            building: None,
            floor: None,
        }
    }
}

/// Selects a building or floor in a request: leave as-is, use the
/// configured default, or a specific id.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector<T> {
    Unset,
    /// The DEFAULT sentinel: substitute the layout's configured default.
    Default,
    Id(T),
}

impl<T> Selector<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Selector::Unset)
    }
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::Unset
    }
}

impl<T> From<T> for Selector<T> {
    fn from(value: T) -> Self {
        Selector::Id(value)
    }
}

/// Per-channel animation duration overrides carried on a request.
/// `all` applies to the pitch, heading, and camera-position channels;
/// the individual fields then override per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DurationOverrides {
    pub all: Option<Duration>,
    pub pitch: Option<Duration>,
    pub heading: Option<Duration>,
    pub camera_position: Option<Duration>,
    pub floor: Option<Duration>,
}

/// A partial navigation request, as accepted by `go_to`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExploreRequest {
    pub mode: Option<ViewMode>,
    pub building: Selector<BuildingId>,
    pub floor: Selector<FloorId>,
    pub place: Option<PlaceId>,
    pub viewpoint: Option<Viewpoint>,
    /// Leave the camera untouched; no camera animation is produced.
    pub no_viewpoint: bool,
    pub durations: DurationOverrides,
}

impl ExploreRequest {
    pub fn mode(mode: ViewMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn building(mode: ViewMode, building: impl Into<BuildingId>) -> Self {
        Self {
            mode: Some(mode),
            building: Selector::Id(building.into()),
            ..Self::default()
        }
    }

    pub fn floor(mode: ViewMode, floor: impl Into<FloorId>) -> Self {
        Self {
            mode: Some(mode),
            floor: Selector::Id(floor.into()),
            ..Self::default()
        }
    }

    pub fn place(place: impl Into<PlaceId>) -> Self {
        Self {
            place: Some(place.into()),
            ..Self::default()
        }
    }
}

/// A fully specified, validated explore state, produced by the
/// resolver and consumed by the map-state computer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExploreState {
    pub mode: ViewMode,
    pub building: Option<BuildingId>,
    pub floor: Option<FloorId>,
    pub place: Option<PlaceId>,
    pub viewpoint: Option<Viewpoint>,
    /// Carried from the request: suppresses all camera computation.
    pub no_viewpoint: bool,
}

impl ResolvedExploreState {
    /// The persisted form: mode plus ids, without the per-call
    /// viewpoint/place.
    pub fn to_state(&self) -> ExploreState {
        ExploreState {
            mode: self.mode,
            building: self.building.clone(),
            floor: self.floor.clone(),
        }
    }

    /// Re-wrap as a request. Resolving the result against itself must
    /// return it unchanged.
    pub fn to_request(&self) -> ExploreRequest {
        ExploreRequest {
            mode: Some(self.mode),
            building: self
                .building
                .clone()
                .map_or(Selector::Unset, Selector::Id),
            floor: self.floor.clone().map_or(Selector::Unset, Selector::Id),
            place: self.place.clone(),
            viewpoint: self.viewpoint,
            no_viewpoint: self.no_viewpoint,
            durations: DurationOverrides::default(),
        }
    }
}

/// Maps a place id to its owning floor. Implemented over the renderer's
/// place inventory by the viewer crate.
pub trait PlaceLookup {
    fn place_floor(&self, place: &PlaceId) -> Option<FloorId>;
}

/// No place data at all.
impl PlaceLookup for () {
    fn place_floor(&self, _place: &PlaceId) -> Option<FloorId> {
        None
    }
}

impl PlaceLookup for HashMap<PlaceId, FloorId> {
    fn place_floor(&self, place: &PlaceId) -> Option<FloorId> {
        self.get(place).cloned()
    }
}
