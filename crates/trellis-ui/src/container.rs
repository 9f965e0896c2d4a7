//! Ordered groups of canvas objects with an optional layout.

use parking_lot::Mutex;
use trellis_core::profiling::profile_function;
use trellis_core::{Position, Size};

use crate::dirty::DirtyFlags;
use crate::layout::{max_min_size, Layout};
use crate::object::{BaseObject, CanvasObject, ObjectId};
use crate::theme::ThemeProvider;

/// A canvas object holding ordered children.
///
/// Child order is paint order and is significant for order-sensitive
/// layouts. Structural changes invalidate the cached minimum size and flag
/// a relayout that runs on the next [`CanvasObject::refresh`].
pub struct Container {
    base: BaseObject,
    objects: Vec<Box<dyn CanvasObject>>,
    layout: Option<Box<dyn Layout>>,
    min_cache: Mutex<Option<Size>>,
    layout_passes: usize,
}

impl Container {
    pub fn new(layout: impl Layout + 'static) -> Self {
        Self::build(Some(Box::new(layout)))
    }

    /// A container that leaves child geometry alone.
    pub fn without_layout() -> Self {
        Self::build(None)
    }

    fn build(layout: Option<Box<dyn Layout>>) -> Self {
        Container {
            base: BaseObject::new(),
            objects: Vec::new(),
            layout,
            min_cache: Mutex::new(None),
            layout_passes: 0,
        }
    }

    pub fn with_object(mut self, object: impl CanvasObject) -> Self {
        self.add(Box::new(object));
        self
    }

    pub fn with_objects(mut self, objects: impl IntoIterator<Item = Box<dyn CanvasObject>>) -> Self {
        for object in objects {
            self.add(object);
        }
        self
    }

    pub fn add(&mut self, object: Box<dyn CanvasObject>) {
        self.objects.push(object);
        self.structure_changed();
    }

    /// Insert at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, object: Box<dyn CanvasObject>) {
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        self.structure_changed();
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Box<dyn CanvasObject>> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        let removed = self.objects.remove(index);
        self.structure_changed();
        Some(removed)
    }

    /// Replace the child at `index`, returning the previous one.
    pub fn replace(
        &mut self,
        index: usize,
        object: Box<dyn CanvasObject>,
    ) -> Option<Box<dyn CanvasObject>> {
        let slot = self.objects.get_mut(index)?;
        let previous = std::mem::replace(slot, object);
        self.structure_changed();
        Some(previous)
    }

    pub fn clear(&mut self) {
        if !self.objects.is_empty() {
            self.objects.clear();
            self.structure_changed();
        }
    }

    pub fn objects(&self) -> &[Box<dyn CanvasObject>] {
        &self.objects
    }

    /// Mutable access to the children. Flags a relayout since geometry or
    /// visibility may change.
    pub fn objects_mut(&mut self) -> &mut [Box<dyn CanvasObject>] {
        self.structure_changed();
        &mut self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Find a direct or nested child.
    pub fn find(&self, id: ObjectId) -> Option<&(dyn CanvasObject + 'static)> {
        self.objects.iter().find_map(|o| o.find(id))
    }

    pub fn set_layout(&mut self, layout: impl Layout + 'static) {
        self.layout = Some(Box::new(layout));
        self.structure_changed();
    }

    /// Number of layout passes run so far.
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    pub fn invalidate_min_size(&mut self) {
        *self.min_cache.get_mut() = None;
        self.base.mark_dirty(DirtyFlags::MIN_SIZE);
    }

    fn structure_changed(&mut self) {
        *self.min_cache.get_mut() = None;
        self.base.mark_dirty(DirtyFlags::CHILDREN);
    }

    fn run_layout(&mut self) {
        profile_function!();
        let size = self.base.size();
        if let Some(layout) = self.layout.as_mut() {
            layout.layout(&mut self.objects, size);
            tracing::trace!(
                "Laid out container {} ({} children) at {:?}",
                self.base.id(),
                self.objects.len(),
                size
            );
        }
        self.layout_passes += 1;
        // Grid-wrap min size depends on the last pass.
        *self.min_cache.get_mut() = None;
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::without_layout()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.base.id())
            .field("size", &self.base.size())
            .field("children", &self.objects.len())
            .field("has_layout", &self.layout.is_some())
            .finish()
    }
}

impl CanvasObject for Container {
    fn id(&self) -> ObjectId {
        self.base.id()
    }

    fn position(&self) -> Position {
        self.base.position()
    }

    fn move_to(&mut self, position: Position) {
        self.base.move_to(position);
    }

    fn size(&self) -> Size {
        self.base.size()
    }

    fn resize(&mut self, size: Size) {
        if self.base.resize(size) {
            self.run_layout();
        }
    }

    fn min_size(&self) -> Size {
        let mut cache = self.min_cache.lock();
        if let Some(min) = *cache {
            return min;
        }
        let min = match &self.layout {
            Some(layout) => layout.min_size(&self.objects),
            None => max_min_size(&self.objects),
        };
        *cache = Some(min);
        min
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

    fn refresh(&mut self) {
        self.invalidate_min_size();
        self.run_layout();
        self.base.clear_dirty();
    }

    fn apply_theme(&mut self, theme: &dyn ThemeProvider) {
        if let Some(layout) = self.layout.as_mut() {
            layout.apply_theme(theme);
        }
        for child in &mut self.objects {
            child.apply_theme(theme);
        }
        self.invalidate_min_size();
        self.base.mark_dirty(DirtyFlags::THEME);
    }

    fn dirty_flags(&self) -> DirtyFlags {
        self.base.dirty()
    }

    fn clear_dirty(&mut self) {
        self.base.clear_dirty();
    }

    fn children(&self) -> &[Box<dyn CanvasObject>] {
        &self.objects
    }

    fn children_mut(&mut self) -> &mut [Box<dyn CanvasObject>] {
        &mut self.objects
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Rectangle;
    use crate::layout::StackLayout;
    use trellis_core::Color;

    fn rect(min: f32) -> Box<dyn CanvasObject> {
        Box::new(Rectangle::new(Color::WHITE).with_min_size(Size::square(min)))
    }

    #[test]
    fn test_mutations_flag_relayout() {
        let mut container = Container::new(StackLayout::new());
        container.clear_dirty();

        container.add(rect(10.0));
        assert!(container.dirty_flags().contains(DirtyFlags::CHILDREN));
        assert_eq!(container.min_size(), Size::square(10.0));

        container.refresh();
        assert!(container.dirty_flags().is_empty());

        container.insert(0, rect(20.0));
        assert_eq!(container.min_size(), Size::square(20.0));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn test_remove_and_replace() {
        let a = rect(5.0);
        let a_id = a.id();
        let mut container = Container::without_layout().with_objects([a, rect(8.0)]);

        assert!(container.find(a_id).is_some());
        assert_eq!(container.min_size(), Size::square(8.0));

        let removed = container.remove(a_id).map(|o| o.id());
        assert_eq!(removed, Some(a_id));
        assert!(container.find(a_id).is_none());

        assert!(container.replace(5, rect(1.0)).is_none());
        assert!(container.replace(0, rect(3.0)).is_some());
        assert_eq!(container.min_size(), Size::square(3.0));
    }

    #[test]
    fn test_no_visible_children_is_zero() {
        let mut container = Container::without_layout().with_objects([rect(5.0)]);
        container.objects_mut()[0].hide();
        assert_eq!(container.min_size(), Size::ZERO);
    }
}
