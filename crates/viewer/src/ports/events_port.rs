//! ExploreObserver - inbound notifications about navigation
//!
//! Hosts register observers to gate and follow explore-state changes.
//! `explore_will_change` runs before any animation starts; returning
//! false vetoes the whole transition. `explore_changed` runs after the
//! new state is committed.

use stackview_domain::ExploreState;

/// Observer of explore-state transitions.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ExploreObserver: Send + Sync {
    /// Called before a transition starts. Return false to veto it.
    fn explore_will_change(&self, from: &ExploreState, to: &ExploreState) -> bool {
        let _ = (from, to);
        true
    }

    /// Called after a transition committed.
    fn explore_changed(&self, from: &ExploreState, to: &ExploreState) {
        let _ = (from, to);
    }
}
