//! Runtime overlay: banned edges and congestion multipliers
//!
//! The overlay is the only mutable state in the engine. It is keyed by
//! graph edge index, which is stable for the process lifetime because the
//! base network never changes after construction. Mutations go through
//! [`OverlayHandle`], which serializes writers against each other; queries
//! take a snapshot once at search start and never observe a half-applied
//! mutation.

use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::{HashMap, HashSet};
use petgraph::graph::EdgeIndex;

/// Multiplier for an operator-supplied congestion level.
/// Unknown levels map to 1.0, which records a no-op factor.
pub fn congestion_multiplier(level: u32) -> f64 {
    match level {
        1 => 1.5,
        2 => 3.0,
        3 => 10.0,
        _ => 1.0,
    }
}

/// Mutable restriction state layered over the immutable network.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    banned: HashSet<EdgeIndex>,
    congestion: HashMap<EdgeIndex, f64>,
}

impl OverlayState {
    pub fn is_banned(&self, edge: EdgeIndex) -> bool {
        self.banned.contains(&edge)
    }

    /// Congestion multiplier for an edge; absence means 1.0.
    pub fn congestion_factor(&self, edge: EdgeIndex) -> f64 {
        self.congestion.get(&edge).copied().unwrap_or(1.0)
    }

    pub fn banned_count(&self) -> usize {
        self.banned.len()
    }

    pub fn congested_count(&self) -> usize {
        self.congestion.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banned.is_empty() && self.congestion.is_empty()
    }

    fn ban_edges(&mut self, edges: impl IntoIterator<Item = EdgeIndex>) {
        self.banned.extend(edges);
    }

    /// Records `factor` for every edge, overwriting any previous factor.
    /// Repeated calls never compound.
    fn set_congestion(&mut self, edges: impl IntoIterator<Item = EdgeIndex>, factor: f64) {
        for edge in edges {
            self.congestion.insert(edge, factor);
        }
    }

    fn clear(&mut self) {
        self.banned.clear();
        self.congestion.clear();
    }
}

/// Shared handle to the overlay state.
///
/// Writers hold the lock exclusively for the whole mutation; readers clone
/// a snapshot and release the lock immediately, so concurrent searches do
/// not block each other.
#[derive(Clone, Default)]
pub struct OverlayHandle {
    inner: Arc<RwLock<OverlayState>>,
}

impl OverlayHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent copy of the current state, taken atomically.
    pub fn snapshot(&self) -> OverlayState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn ban(&self, edges: impl IntoIterator<Item = EdgeIndex>) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .ban_edges(edges);
    }

    pub fn set_congestion(&self, edges: impl IntoIterator<Item = EdgeIndex>, factor: f64) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_congestion(edges, factor);
    }

    /// Drop every ban and congestion factor, returning the network to
    /// baseline cost for every vehicle.
    pub fn reset(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn congestion_levels() {
        assert_eq!(congestion_multiplier(1), 1.5);
        assert_eq!(congestion_multiplier(2), 3.0);
        assert_eq!(congestion_multiplier(3), 10.0);
        assert_eq!(congestion_multiplier(0), 1.0);
        assert_eq!(congestion_multiplier(42), 1.0);
    }

    #[test]
    fn congestion_overwrites_instead_of_compounding() {
        let handle = OverlayHandle::new();
        let edge = EdgeIndex::new(7);

        handle.set_congestion([edge], 3.0);
        handle.set_congestion([edge], 3.0);
        assert_eq!(handle.snapshot().congestion_factor(edge), 3.0);

        handle.set_congestion([edge], 1.5);
        assert_eq!(handle.snapshot().congestion_factor(edge), 1.5);
    }

    #[test]
    fn reset_clears_everything() {
        let handle = OverlayHandle::new();
        handle.ban([EdgeIndex::new(1)]);
        handle.set_congestion([EdgeIndex::new(2)], 10.0);
        assert!(!handle.snapshot().is_empty());

        handle.reset();
        let state = handle.snapshot();
        assert!(state.is_empty());
        assert!(!state.is_banned(EdgeIndex::new(1)));
        assert_eq!(state.congestion_factor(EdgeIndex::new(2)), 1.0);
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutations() {
        let handle = OverlayHandle::new();
        let before = handle.snapshot();
        handle.ban([EdgeIndex::new(0)]);
        assert!(!before.is_banned(EdgeIndex::new(0)));
        assert!(handle.snapshot().is_banned(EdgeIndex::new(0)));
    }
}
