use trellis_core::{Position, Size};

use super::{max_min_size, visible_objects_mut, Layout};
use crate::object::CanvasObject;

/// Every visible child fills the whole area, later children on top.
#[derive(Debug, Clone, Default)]
pub struct StackLayout;

impl StackLayout {
    pub fn new() -> Self {
        StackLayout
    }
}

impl Layout for StackLayout {
    fn layout(&mut self, objects: &mut [Box<dyn CanvasObject>], size: Size) {
        for child in visible_objects_mut(objects) {
            child.move_to(Position::ZERO);
            child.resize(size);
        }
    }

    fn min_size(&self, objects: &[Box<dyn CanvasObject>]) -> Size {
        max_min_size(objects)
    }
}
