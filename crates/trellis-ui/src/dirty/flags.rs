//! Dirty flag bits carried by every canvas object.

use bitflags::bitflags;

bitflags! {
    /// What changed on an object since the last paint.
    ///
    /// Structural changes mark `CHILDREN` and require a relayout of the
    /// object that owns the children.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        /// Nothing changed.
        const NONE       = 0b0000_0000;

        /// Size changed or a relayout was requested.
        const LAYOUT     = 0b0000_0001;

        /// The cached minimum size is stale.
        const MIN_SIZE   = 0b0000_0010;

        /// Visual-only change (color, text, resource, position).
        const PAINT      = 0b0000_0100;

        /// Children were added, removed, replaced or reordered.
        const CHILDREN   = 0b0000_1000;

        /// Shown or hidden.
        const VISIBILITY = 0b0001_0000;

        /// Theme values must be re-read.
        const THEME      = 0b0010_0000;
    }
}

impl DirtyFlags {
    /// Returns true if a layout pass is needed.
    #[inline]
    pub fn needs_layout(&self) -> bool {
        self.intersects(Self::LAYOUT | Self::CHILDREN | Self::VISIBILITY | Self::THEME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_flags() {
        assert!(DirtyFlags::LAYOUT.needs_layout());
        assert!(DirtyFlags::CHILDREN.needs_layout());
        assert!(DirtyFlags::VISIBILITY.needs_layout());
        assert!(!DirtyFlags::PAINT.needs_layout());
        assert!(!DirtyFlags::NONE.needs_layout());
    }
}
