//! The canvas object model.
//!
//! Every node in the scene graph implements [`CanvasObject`]. Geometry is
//! relative to the parent and is always non-negative. Hidden objects keep
//! their geometry but are skipped by layouts and by paint traversal.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use trellis_core::{Position, Size};

use crate::canvas::PrimitiveKind;
use crate::dirty::DirtyFlags;
use crate::theme::ThemeProvider;
use crate::widget::Widget;

/// Process-unique identity of a canvas object or widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

impl ObjectId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A positioned, sized, showable node in the scene graph.
pub trait CanvasObject: Any + Send + Sync {
    fn id(&self) -> ObjectId;

    fn position(&self) -> Position;

    /// Move relative to the parent. Negative coordinates clamp to zero.
    fn move_to(&mut self, position: Position);

    fn size(&self) -> Size;

    /// Resize the object. Resizing to the current size does nothing.
    fn resize(&mut self, size: Size);

    fn min_size(&self) -> Size;

    fn visible(&self) -> bool;

    fn show(&mut self);

    fn hide(&mut self);

    /// Paint order among siblings; higher paints later.
    fn z_index(&self) -> i32 {
        0
    }

    /// Recompute cached visual state.
    fn refresh(&mut self) {}

    fn apply_theme(&mut self, _theme: &dyn ThemeProvider) {}

    fn dirty_flags(&self) -> DirtyFlags {
        DirtyFlags::NONE
    }

    fn clear_dirty(&mut self) {}

    fn children(&self) -> &[Box<dyn CanvasObject>] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Box<dyn CanvasObject>] {
        &mut []
    }

    /// Drawable description for leaf primitives.
    fn primitive(&self) -> Option<PrimitiveKind> {
        None
    }

    /// The widget behind this node, if it is a widget adapter.
    fn as_widget(&self) -> Option<&Arc<dyn Widget>> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn CanvasObject {
    pub fn downcast_ref<T: CanvasObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: CanvasObject>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Depth-first search for `id` in this subtree.
    pub fn find(&self, id: ObjectId) -> Option<&(dyn CanvasObject + 'static)> {
        if self.id() == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: ObjectId) -> Option<&mut (dyn CanvasObject + 'static)> {
        if self.id() == id {
            return Some(self);
        }
        self.children_mut()
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }
}

/// Geometry and dirty state shared by the concrete object types.
#[derive(Debug, Clone)]
pub struct BaseObject {
    id: ObjectId,
    position: Position,
    size: Size,
    visible: bool,
    z_index: i32,
    dirty: DirtyFlags,
}

impl BaseObject {
    pub fn new() -> Self {
        BaseObject {
            id: ObjectId::next(),
            position: Position::ZERO,
            size: Size::ZERO,
            visible: true,
            z_index: 0,
            dirty: DirtyFlags::PAINT,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn move_to(&mut self, position: Position) -> bool {
        let position = position.non_negative();
        if position == self.position {
            return false;
        }
        self.position = position;
        self.dirty |= DirtyFlags::PAINT;
        true
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns `true` when the size actually changed.
    pub fn resize(&mut self, size: Size) -> bool {
        let size = size.non_negative();
        if size == self.size {
            return false;
        }
        self.size = size;
        self.dirty |= DirtyFlags::LAYOUT | DirtyFlags::PAINT;
        true
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        self.dirty |= DirtyFlags::VISIBILITY;
        true
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
        self.dirty |= DirtyFlags::PAINT;
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}

impl Default for BaseObject {
    fn default() -> Self {
        Self::new()
    }
}

/// Implements the geometry half of [`CanvasObject`] by delegating to a
/// `base: BaseObject` field.
macro_rules! impl_base_object {
    () => {
        fn id(&self) -> $crate::object::ObjectId {
            self.base.id()
        }

        fn position(&self) -> trellis_core::Position {
            self.base.position()
        }

        fn move_to(&mut self, position: trellis_core::Position) {
            self.base.move_to(position);
        }

        fn size(&self) -> trellis_core::Size {
            self.base.size()
        }

        fn resize(&mut self, size: trellis_core::Size) {
            self.base.resize(size);
        }

        fn visible(&self) -> bool {
            self.base.visible()
        }

        fn show(&mut self) {
            self.base.set_visible(true);
        }

        fn hide(&mut self) {
            self.base.set_visible(false);
        }

        fn z_index(&self) -> i32 {
            self.base.z_index()
        }

        fn dirty_flags(&self) -> $crate::dirty::DirtyFlags {
            self.base.dirty()
        }

        fn clear_dirty(&mut self) {
            self.base.clear_dirty();
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

pub(crate) use impl_base_object;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = ObjectId::next();
        let b = ObjectId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_geometry_clamps_negative() {
        let mut base = BaseObject::new();
        base.move_to(Position::new(-5.0, 3.0));
        base.resize(Size::new(10.0, -1.0));
        assert_eq!(base.position(), Position::new(0.0, 3.0));
        assert_eq!(base.size(), Size::new(10.0, 0.0));
    }

    #[test]
    fn test_resize_reports_change() {
        let mut base = BaseObject::new();
        base.clear_dirty();
        assert!(base.resize(Size::new(4.0, 4.0)));
        assert!(base.dirty().contains(DirtyFlags::LAYOUT));
        base.clear_dirty();
        assert!(!base.resize(Size::new(4.0, 4.0)));
        assert!(base.dirty().is_empty());
    }

    #[test]
    fn test_hidden_keeps_geometry() {
        let mut base = BaseObject::new();
        base.resize(Size::new(8.0, 9.0));
        assert!(base.set_visible(false));
        assert!(!base.visible());
        assert_eq!(base.size(), Size::new(8.0, 9.0));
        assert!(!base.set_visible(false));
    }
}
