//! Dirty tracking for incremental repaint.
//!
//! Objects accumulate [`DirtyFlags`] as they are mutated; the paint driver
//! reads and clears them once per frame. Widget properties carry a
//! [`Versioned`] counter so renderers can tell what changed since their last
//! refresh.

mod flags;
pub mod versioned;

pub use flags::DirtyFlags;
pub use versioned::Versioned;
