use trellis_core::{Position, Size};

use super::{max_min_size, visible_objects_mut, Layout, Padding};
use crate::object::CanvasObject;
use crate::theme::ThemeProvider;

/// Insets every visible child by the padding on all four sides.
#[derive(Debug, Clone)]
pub struct PaddedLayout {
    padding: Padding,
}

impl PaddedLayout {
    pub fn new(padding: f32) -> Self {
        PaddedLayout {
            padding: Padding::Fixed(padding),
        }
    }

    pub fn themed(theme: &dyn ThemeProvider) -> Self {
        PaddedLayout {
            padding: Padding::themed(theme),
        }
    }
}

impl Layout for PaddedLayout {
    fn layout(&mut self, objects: &mut [Box<dyn CanvasObject>], size: Size) {
        let pad = self.padding.get();
        let inner = size.subtract_width_height(pad * 2.0, pad * 2.0).non_negative();
        for child in visible_objects_mut(objects) {
            child.move_to(Position::new(pad, pad));
            child.resize(inner);
        }
    }

    fn min_size(&self, objects: &[Box<dyn CanvasObject>]) -> Size {
        let pad = self.padding.get();
        max_min_size(objects).add_width_height(pad * 2.0, pad * 2.0)
    }

    fn apply_theme(&mut self, theme: &dyn ThemeProvider) {
        self.padding.apply_theme(theme);
    }
}
