//! Pointer gesture state machine.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::viewport::Viewport;

/// Host-assigned pointer identifier (mouse, pen or touch contact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u64);

/// Normalized pointer input in client (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PointerEvent {
    /// A pointer was pressed on the canvas
    Down { id: PointerId, x: f64, y: f64 },
    /// A tracked pointer moved
    Move { id: PointerId, x: f64, y: f64 },
    /// A pointer was released
    Up { id: PointerId },
    /// The host cancelled a pointer (e.g. the touch left the window)
    Cancel { id: PointerId },
}

impl PointerEvent {
    /// Pointer this event belongs to.
    pub fn id(&self) -> PointerId {
        match self {
            PointerEvent::Down { id, .. }
            | PointerEvent::Move { id, .. }
            | PointerEvent::Up { id }
            | PointerEvent::Cancel { id } => *id,
        }
    }
}

/// Turns pointer events into viewport pans and pinch zooms.
///
/// Pointers are kept in press order; a pinch uses the first two.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    viewport: Viewport,
    pointers: Vec<(PointerId, DVec2)>,
    last_pinch_distance: Option<f64>,
}

impl ViewportController {
    /// Create a controller starting from the given view.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    /// Current transform.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the transform and drop any gesture in progress.
    pub fn reset(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.pointers.clear();
        self.last_pinch_distance = None;
    }

    /// Number of pointers currently pressed.
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// Whether a two-pointer gesture has a distance baseline.
    pub fn is_pinching(&self) -> bool {
        self.last_pinch_distance.is_some()
    }

    /// Dispatch a pointer event.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { id, x, y } => self.pointer_down(id, DVec2::new(x, y)),
            PointerEvent::Move { id, x, y } => self.pointer_move(id, DVec2::new(x, y)),
            PointerEvent::Up { id } | PointerEvent::Cancel { id } => self.pointer_up(id),
        }
    }

    /// Start tracking a pointer.
    pub fn pointer_down(&mut self, id: PointerId, position: DVec2) {
        match self.slot(id) {
            Some(index) => self.pointers[index].1 = position,
            None => self.pointers.push((id, position)),
        }
        tracing::trace!(pointer = id.0, active = self.pointers.len(), "pointer down");
    }

    /// Apply a move of a tracked pointer.
    pub fn pointer_move(&mut self, id: PointerId, position: DVec2) {
        let Some(index) = self.slot(id) else {
            return;
        };
        let last = std::mem::replace(&mut self.pointers[index].1, position);

        match self.pointers.len() {
            1 => {
                self.viewport.pan(position - last);
                self.last_pinch_distance = None;
            }
            2 => self.pinch(),
            _ => {}
        }
    }

    /// Stop tracking a pointer.
    pub fn pointer_up(&mut self, id: PointerId) {
        self.pointers.retain(|(tracked, _)| *tracked != id);
        if self.pointers.len() < 2 {
            self.last_pinch_distance = None;
        }
        tracing::trace!(pointer = id.0, active = self.pointers.len(), "pointer up");
    }

    fn slot(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|(tracked, _)| *tracked == id)
    }

    fn pinch(&mut self) {
        let a = self.pointers[0].1;
        let b = self.pointers[1].1;
        let distance = a.distance(b);
        let center = (a + b) * 0.5;

        // First two-pointer frame only records the baseline.
        if let Some(last) = self.last_pinch_distance {
            if last > 0.0 {
                self.viewport.zoom_about(center, distance / last);
            }
        }
        self.last_pinch_distance = Some(distance);
    }
}
