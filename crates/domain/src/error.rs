//! Unified error type for the domain layer
//!
//! Reference errors and mode-unavailability errors short-circuit
//! resolution/computation; degenerate-layout conditions are recovered
//! locally with a warning and never surface here.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Unknown building/floor/place id referenced by a request or the layout
    #[error("Unknown {entity_type}: {id}")]
    UnknownReference {
        entity_type: &'static str,
        id: String,
    },

    /// Requested mode cannot be satisfied and no fallback exists
    #[error("Mode unavailable: {0}")]
    ModeUnavailable(String),

    /// Resolved state failed a consistency check
    #[error("Inconsistent state: {0}")]
    Inconsistent(String),
}

impl DomainError {
    /// Create an unknown-reference error
    pub fn unknown(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::UnknownReference {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a mode-unavailability error
    pub fn mode_unavailable(msg: impl Into<String>) -> Self {
        Self::ModeUnavailable(msg.into())
    }

    /// Create an inconsistent-state error
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_reference_error() {
        let err = DomainError::unknown("building", "B7");
        assert!(matches!(err, DomainError::UnknownReference { .. }));
        assert_eq!(err.to_string(), "Unknown building: B7");
    }

    #[test]
    fn test_mode_unavailable_error() {
        let err = DomainError::mode_unavailable("no focused building and no global layer");
        assert!(err
            .to_string()
            .contains("no focused building and no global layer"));
    }
}
