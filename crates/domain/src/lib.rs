//! StackView domain - pure multi-building venue navigation logic.
//!
//! Everything in this crate is deterministic and renderer-agnostic:
//! the venue layout model and its parser, explore-state resolution,
//! and map-state computation. Renderer data flows in only through the
//! read-only [`PlaceLookup`] and [`MapQuery`] traits.

pub mod computer;
pub mod error;
pub mod explore;
pub mod geometry;
pub mod ids;
pub mod layout;
pub mod map_state;
pub mod resolver;

#[cfg(test)]
mod test_fixtures;

pub use computer::{compute, MapConfig, ModePolicy};
pub use error::DomainError;
pub use explore::{
    CameraPosition, DurationOverrides, ExploreRequest, ExploreState, PlaceLookup,
    ResolvedExploreState, Selector, ViewMode, Viewpoint,
};
pub use geometry::{point_in_polygon, Footprint, Point2, Point3};
pub use ids::{BuildingId, FloorId, ModelActorId, PlaceId};
pub use layout::{
    parse_venue_layout, Building, Floor, LocalizationTable, LocalizedNames, VenueLayout,
    VenueLayoutConfig,
};
pub use map_state::{
    CameraConfig, Durations, LayerConfig, Lod, Manipulator, MapQuery, MapState, Padding,
    PointOfFocus, Viewport, ViewpointFit,
};
pub use resolver::{resolve, ResolveOptions};
