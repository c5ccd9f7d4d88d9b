//! The affine transform applied to the whole graph.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{MAX_SCALE, MIN_SCALE};

/// Translate-then-scale transform from graph space to screen space.
///
/// `screen = graph * scale + (x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Horizontal screen offset of the graph origin
    pub x: f64,
    /// Vertical screen offset of the graph origin
    pub y: f64,
    /// Zoom factor, kept within [`MIN_SCALE`, `MAX_SCALE`]
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 0.5,
        }
    }
}

impl Viewport {
    /// Create a viewport, clamping the scale into range.
    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        Self {
            x,
            y,
            scale: clamp_scale(scale),
        }
    }

    /// View used by the "center" action for a screen of the given size.
    pub fn centered(width: f64, height: f64) -> Self {
        Self::new(width / 2.0 - 130.0, height / 2.0 - 350.0, 0.65)
    }

    /// View framing the demo graph for a screen of the given size.
    pub fn demo(width: f64, height: f64) -> Self {
        Self::new(width / 2.0 - 20.0, height / 2.0 - 350.0, 0.55)
    }

    /// Screen offset as a vector.
    pub fn offset(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Project a graph-space point to screen space.
    pub fn to_screen(&self, graph: DVec2) -> DVec2 {
        graph * self.scale + self.offset()
    }

    /// Project a screen-space point back to graph space.
    pub fn to_graph(&self, screen: DVec2) -> DVec2 {
        (screen - self.offset()) / self.scale
    }

    /// Graph-space point shown at the center of a screen of the given size.
    pub fn graph_center(&self, width: f64, height: f64) -> DVec2 {
        self.to_graph(DVec2::new(width / 2.0, height / 2.0))
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, delta: DVec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Multiply the scale by `factor`, keeping `center` (screen space) fixed.
    ///
    /// The resulting scale is clamped; the offset is derived from the clamped
    /// ratio so the focal point never drifts, even at the bounds.
    pub fn zoom_about(&mut self, center: DVec2, factor: f64) {
        let old_scale = self.scale;
        let new_scale = clamp_scale(old_scale * factor);
        let ratio = new_scale / old_scale;

        self.x = center.x - (center.x - self.x) * ratio;
        self.y = center.y - (center.y - self.y) * ratio;
        self.scale = new_scale;
    }
}

/// Clamp a scale into [`MIN_SCALE`, `MAX_SCALE`].
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}
