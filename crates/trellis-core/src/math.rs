//! Vector math re-exported from [`glam`].
//!
//! Pointer positions and drag deltas arrive from input backends as
//! [`Vec2`]; geometry types convert from them directly.

pub use glam::{Vec2, vec2};
