//! Outbound and inbound ports of the viewer
//!
//! The renderer port is the only way the viewer touches the rendering
//! engine; the observer port is the only way hosts hear about
//! navigation. Test doubles live under `testing`.

pub mod events_port;
pub mod renderer_port;
pub mod testing;

pub use events_port::ExploreObserver;
pub use renderer_port::{AnimationCompleter, AnimationHandle, RendererPort};

#[cfg(any(test, feature = "testing"))]
pub use events_port::MockExploreObserver;
#[cfg(any(test, feature = "testing"))]
pub use renderer_port::MockRendererPort;
