//! Pointer events delivered by the windowing backend.

use trellis_core::{Delta, Position};

/// A pointer location relative to the receiving object.
///
/// Unlike object geometry, event positions may be negative when the pointer
/// has left the object during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointEvent {
    pub position: Position,
}

impl PointEvent {
    pub fn new(position: Position) -> Self {
        PointEvent { position }
    }
}

/// One frame of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragEvent {
    pub point: PointEvent,
    /// Movement since the previous frame.
    pub dragged: Delta,
}

impl DragEvent {
    pub fn new(position: Position, dragged: Delta) -> Self {
        DragEvent {
            point: PointEvent::new(position),
            dragged,
        }
    }

    /// A drag frame with no pointer position, only movement.
    pub fn delta(dx: f32, dy: f32) -> Self {
        DragEvent::new(Position::ZERO, Delta::new(dx, dy))
    }

    pub fn position(&self) -> Position {
        self.point.position
    }
}
