//! Swarmgraph Viewport
//!
//! Pointer and touch input → pan/zoom transform for the graph canvas.
//!
//! - One pointer drags the view by its per-event movement delta.
//! - Two pointers pinch-zoom about their midpoint, which stays fixed on screen.
//! - The scale is clamped to [`MIN_SCALE`, `MAX_SCALE`].
//!
//! All handlers are synchronous and run inside the host's pointer callbacks.

mod controller;
mod viewport;

pub use controller::{PointerEvent, PointerId, ViewportController};
pub use viewport::{clamp_scale, Viewport};

/// Smallest allowed zoom factor.
pub const MIN_SCALE: f64 = 0.2;

/// Largest allowed zoom factor.
pub const MAX_SCALE: f64 = 3.0;
