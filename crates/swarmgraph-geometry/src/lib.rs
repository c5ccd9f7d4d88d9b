//! Swarmgraph Edge Geometry
//!
//! Edges between graph nodes are drawn as cubic Bézier curves that leave the
//! source node heading down and enter the target node from above. Signals in
//! flight carry only an abstract progress value; renderers map that value to
//! a point on the curve with [`CubicBezier::point_at`].
//!
//! # Tension
//!
//! Control points are offset vertically by
//! `tension(dy) = max(|dy| / 1.5, 50)`. The floor keeps sibling nodes at the
//! same vertical rank connected by a visibly curved edge instead of a flat
//! line, and longer hops spread their control points proportionally.

mod bezier;

pub use bezier::{CubicBezier, edge_path, evaluate_bezier, tension};

pub use glam::DVec2;

/// Divisor applied to the vertical distance between endpoints.
pub const TENSION_DIVISOR: f64 = 1.5;

/// Lower bound for the control-point offset.
pub const MIN_TENSION: f64 = 50.0;
