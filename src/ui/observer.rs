//! Proximity observer for infinite scroll
//!
//! Watches a single tile (the last one in the grid) and reports when it comes
//! within [`PROXIMITY_MARGIN`] of the viewport. Like a browser intersection
//! observer it reports once on entering, not on every scroll while the tile
//! stays visible, and it reports immediately when attached to a tile that is
//! already visible.

use super::grid::{self, GridViewport};

/// How close the observed tile must get before more content is loaded
pub const PROXIMITY_MARGIN: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct ProximityObserver {
    margin: f32,
    target: Option<usize>,
    intersecting: bool,
}

impl Default for ProximityObserver {
    fn default() -> Self {
        Self::new(PROXIMITY_MARGIN)
    }
}

impl ProximityObserver {
    pub fn new(margin: f32) -> Self {
        Self {
            margin,
            target: None,
            intersecting: false,
        }
    }

    /// Watch `index` instead of the previous target.
    /// Returns true when the new target is already within the margin.
    pub fn observe(&mut self, index: usize, viewport: &GridViewport) -> bool {
        self.target = Some(index);
        self.intersecting = grid::intersects(index, viewport, self.margin);
        self.intersecting
    }

    /// Feed a new viewport. Returns true when the target has just come into range.
    pub fn update(&mut self, viewport: &GridViewport) -> bool {
        let Some(index) = self.target else {
            return false;
        };

        let now = grid::intersects(index, viewport, self.margin);
        let entered = now && !self.intersecting;
        self.intersecting = now;
        entered
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }
}
