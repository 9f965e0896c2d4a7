//! Layout policies.
//!
//! A layout is a pair of functions over a container's children: `layout`
//! positions and sizes every visible child inside the available size, and
//! `min_size` reports the smallest size that fits all visible children.
//! Hidden children are ignored by both. Layouts never fail and never
//! produce negative geometry.

mod boxes;
mod grid_wrap;
mod padded;
mod stack;

pub use boxes::{Axis, BoxLayout};
pub use grid_wrap::GridWrapLayout;
pub use padded::PaddedLayout;
pub use stack::StackLayout;

use trellis_core::Size;

use crate::object::CanvasObject;
use crate::theme::ThemeProvider;

/// A policy computing child geometry and minimum size.
pub trait Layout: Send + Sync {
    fn layout(&mut self, objects: &mut [Box<dyn CanvasObject>], size: Size);

    fn min_size(&self, objects: &[Box<dyn CanvasObject>]) -> Size;

    /// Re-read theme dependent values such as padding.
    fn apply_theme(&mut self, _theme: &dyn ThemeProvider) {}
}

/// Spacing used by a layout, either fixed or tracking the theme padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Padding {
    Fixed(f32),
    Theme(f32),
}

impl Padding {
    pub fn themed(theme: &dyn ThemeProvider) -> Self {
        Padding::Theme(theme.padding())
    }

    #[inline]
    pub fn get(&self) -> f32 {
        match *self {
            Padding::Fixed(p) | Padding::Theme(p) => p.max(0.0),
        }
    }

    pub fn apply_theme(&mut self, theme: &dyn ThemeProvider) {
        if let Padding::Theme(p) = self {
            *p = theme.padding();
        }
    }
}

pub(crate) fn visible_objects<'a>(
    objects: &'a [Box<dyn CanvasObject>],
) -> impl Iterator<Item = &'a Box<dyn CanvasObject>> + 'a {
    objects.iter().filter(|o| o.visible())
}

pub(crate) fn visible_objects_mut<'a>(
    objects: &'a mut [Box<dyn CanvasObject>],
) -> impl Iterator<Item = &'a mut Box<dyn CanvasObject>> + 'a {
    objects.iter_mut().filter(|o| o.visible())
}

/// Component-wise maximum of the visible children's minimum sizes.
pub fn max_min_size(objects: &[Box<dyn CanvasObject>]) -> Size {
    visible_objects(objects).fold(Size::ZERO, |acc, o| acc.max(o.min_size()))
}
