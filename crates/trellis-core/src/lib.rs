//! Trellis Core
//!
//! Shared building blocks for the Trellis widget toolkit: geometry and colour
//! value types, hash collections, logging and profiling setup, and runtime
//! settings.

pub mod alloc;
pub mod color;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;

pub use color::Color;
pub use config::{Settings, ThemeVariant};
pub use geometry::{Delta, Position, Rect, Size};
