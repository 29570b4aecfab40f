//! StackView viewer - the renderer-facing half of the engine.
//!
//! [`MultiBuildingView`] is the host-facing entry point; it drives any
//! rendering engine implementing [`RendererPort`] and reports
//! navigation through [`ExploreObserver`]. The pure navigation logic
//! lives in `stackview-domain` and is re-exported here for
//! convenience.

pub mod config;
pub mod controller;
pub mod error;
pub mod orchestrator;
pub mod ports;

pub use config::ViewerConfig;
pub use controller::MultiBuildingView;
pub use error::ViewerError;
pub use orchestrator::AnimationOrchestrator;
pub use ports::{AnimationCompleter, AnimationHandle, ExploreObserver, RendererPort};

pub use stackview_domain::{
    ExploreRequest, ExploreState, Selector, VenueLayoutConfig, ViewMode, Viewpoint,
};
