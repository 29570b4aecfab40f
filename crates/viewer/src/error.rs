//! Unified error type for the viewer layer

use stackview_domain::DomainError;
use thiserror::Error;

/// Unified error type for viewer operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ViewerError {
    /// The navigation request could not be resolved against the layout
    #[error("Resolve failed: {0}")]
    Resolve(#[source] DomainError),

    /// The resolved state could not be turned into a map state
    #[error("Compute failed: {0}")]
    Compute(#[source] DomainError),

    /// An observer vetoed the transition before any animation started
    #[error("Transition vetoed by an observer")]
    Vetoed,

    /// A newer navigation call replaced this one mid-animation
    #[error("Transition superseded by a newer navigation call")]
    Superseded,

    /// Floor stepping walked outside the current building's stack
    #[error("No floor at offset {offset} from {from}")]
    FloorOutOfRange { from: String, offset: i32 },
}

impl ViewerError {
    /// Create a floor-out-of-range error
    pub fn floor_out_of_range(from: impl Into<String>, offset: i32) -> Self {
        Self::FloorOutOfRange {
            from: from.into(),
            offset,
        }
    }
}
