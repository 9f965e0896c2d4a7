use trellis_core::{Delta, Position, Size};

use super::{visible_objects, visible_objects_mut, Layout, Padding};
use crate::object::CanvasObject;
use crate::theme::ThemeProvider;

/// Direction of sequential placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    #[inline]
    pub fn along(&self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    #[inline]
    pub fn across(&self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    /// Build a size from lengths along and across this axis.
    #[inline]
    pub fn size(&self, along: f32, across: f32) -> Size {
        match self {
            Axis::Horizontal => Size::new(along, across),
            Axis::Vertical => Size::new(across, along),
        }
    }

    #[inline]
    pub fn position(&self, along: f32, across: f32) -> Position {
        match self {
            Axis::Horizontal => Position::new(along, across),
            Axis::Vertical => Position::new(across, along),
        }
    }

    #[inline]
    pub fn along_position(&self, position: Position) -> f32 {
        match self {
            Axis::Horizontal => position.x,
            Axis::Vertical => position.y,
        }
    }

    #[inline]
    pub fn along_delta(&self, delta: Delta) -> f32 {
        match self {
            Axis::Horizontal => delta.dx,
            Axis::Vertical => delta.dy,
        }
    }
}

/// Places visible children one after another along an axis.
///
/// Each child gets its minimum length along the axis and fills the cross
/// axis. Padding separates consecutive visible children.
#[derive(Debug, Clone)]
pub struct BoxLayout {
    axis: Axis,
    padding: Padding,
}

impl BoxLayout {
    pub fn horizontal(padding: f32) -> Self {
        BoxLayout {
            axis: Axis::Horizontal,
            padding: Padding::Fixed(padding),
        }
    }

    pub fn vertical(padding: f32) -> Self {
        BoxLayout {
            axis: Axis::Vertical,
            padding: Padding::Fixed(padding),
        }
    }

    pub fn themed(axis: Axis, theme: &dyn ThemeProvider) -> Self {
        BoxLayout {
            axis,
            padding: Padding::themed(theme),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }
}

impl Layout for BoxLayout {
    fn layout(&mut self, objects: &mut [Box<dyn CanvasObject>], size: Size) {
        let pad = self.padding.get();
        let across = self.axis.across(size);
        let mut offset = 0.0;
        for child in visible_objects_mut(objects) {
            let length = self.axis.along(child.min_size());
            child.move_to(self.axis.position(offset, 0.0));
            child.resize(self.axis.size(length, across));
            offset += length + pad;
        }
    }

    fn min_size(&self, objects: &[Box<dyn CanvasObject>]) -> Size {
        let pad = self.padding.get();
        let mut along = 0.0;
        let mut across: f32 = 0.0;
        let mut count = 0;
        for child in visible_objects(objects) {
            let min = child.min_size();
            along += self.axis.along(min);
            across = across.max(self.axis.across(min));
            count += 1;
        }
        if count > 1 {
            along += pad * (count - 1) as f32;
        }
        self.axis.size(along, across)
    }

    fn apply_theme(&mut self, theme: &dyn ThemeProvider) {
        self.padding.apply_theme(theme);
    }
}
