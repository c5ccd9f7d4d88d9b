//! Cubic Bézier curves between node positions.

use glam::DVec2;

use crate::{MIN_TENSION, TENSION_DIVISOR};

/// A cubic Bézier curve in graph space.
///
/// `p0` and `p3` are the endpoints, `p1` and `p2` the control points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezier {
    pub p0: DVec2,
    pub p1: DVec2,
    pub p2: DVec2,
    pub p3: DVec2,
}

impl CubicBezier {
    /// Create a curve from its four control points.
    pub const fn new(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Point on the curve at parameter `t` (0.0 = start, 1.0 = end).
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec2 {
        evaluate_bezier(self.p0, self.p1, self.p2, self.p3, t)
    }

    /// Vertical offset of the source control point from the source node.
    pub fn source_offset(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    /// Vertical offset of the target node from its control point.
    pub fn target_offset(&self) -> f64 {
        self.p3.y - self.p2.y
    }

    /// SVG path data (`M … C …`) for this curve.
    pub fn svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }
}

/// Control-point offset for a vertical distance `dy` between endpoints.
///
/// Never less than [`MIN_TENSION`], so coincident or same-rank endpoints
/// still produce a curved path.
#[inline]
pub fn tension(dy: f64) -> f64 {
    (dy.abs() / TENSION_DIVISOR).max(MIN_TENSION)
}

/// Compute the edge curve from `source` to `target`.
///
/// The source control point sits below the source, the target control point
/// above the target, so edges flow downward regardless of horizontal offset.
pub fn edge_path(source: DVec2, target: DVec2) -> CubicBezier {
    let offset = tension(target.y - source.y);
    CubicBezier {
        p0: source,
        p1: DVec2::new(source.x, source.y + offset),
        p2: DVec2::new(target.x, target.y - offset),
        p3: target,
    }
}

/// Evaluate a cubic Bézier at `t` using the Bernstein basis.
///
/// B(t) = (1-t)³·p0 + 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³·p3
#[inline]
pub fn evaluate_bezier(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;

    p0 * mt3 + p1 * (3.0 * mt2 * t) + p2 * (3.0 * mt * t2) + p3 * t3
}
