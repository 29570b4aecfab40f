//! Test doubles for the viewer ports
//!
//! [`FakeRenderer`] is a stateful in-memory renderer: it records every
//! mutation and can hold animations open so tests control completion
//! order. Available in unit tests here and to downstream crates via the
//! `testing` feature.

#[cfg(any(test, feature = "testing"))]
mod fake_renderer;

#[cfg(any(test, feature = "testing"))]
pub use fake_renderer::FakeRenderer;
