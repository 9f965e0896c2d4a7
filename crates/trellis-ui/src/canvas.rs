//! Leaf drawing primitives.
//!
//! These are the only objects that reach the rasterizer. Widgets describe
//! their appearance as a list of primitives through their renderer.

use trellis_core::{Color, Rect, Size};

use crate::dirty::DirtyFlags;
use crate::object::{impl_base_object, BaseObject, CanvasObject, ObjectId};
use crate::resource::Resource;

/// Average glyph advance as a fraction of the text size.
pub const TEXT_ADVANCE_RATIO: f32 = 0.6;
/// Line height as a fraction of the text size.
pub const TEXT_LINE_HEIGHT_RATIO: f32 = 1.2;

/// What a leaf primitive draws.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveKind {
    Rectangle {
        fill: Color,
        stroke: Color,
        stroke_width: f32,
        corner_radius: f32,
    },
    Text {
        text: String,
        color: Color,
        size: f32,
    },
    Circle {
        fill: Color,
        stroke: Color,
        stroke_width: f32,
    },
    Image {
        resource: Resource,
    },
}

/// A primitive with absolute geometry, ready for rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintPrimitive {
    pub object: ObjectId,
    pub rect: Rect,
    pub z_index: i32,
    pub kind: PrimitiveKind,
}

/// A filled, optionally stroked rectangle.
#[derive(Debug, Clone)]
pub struct Rectangle {
    base: BaseObject,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
    pub corner_radius: f32,
    min: Size,
}

impl Rectangle {
    pub fn new(fill: Color) -> Self {
        Rectangle {
            base: BaseObject::new(),
            fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            corner_radius: 0.0,
            min: Size::ZERO,
        }
    }

    pub fn with_stroke(mut self, stroke: Color, width: f32) -> Self {
        self.stroke = stroke;
        self.stroke_width = width.max(0.0);
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius.max(0.0);
        self
    }

    pub fn with_min_size(mut self, min: Size) -> Self {
        self.min = min.non_negative();
        self
    }

    pub fn set_min_size(&mut self, min: Size) {
        self.min = min.non_negative();
    }

    /// Paint above siblings with a lower z-index.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.base.set_z_index(z_index);
        self
    }

    pub fn set_fill(&mut self, fill: Color) {
        if self.fill != fill {
            self.fill = fill;
            self.base.mark_dirty(DirtyFlags::PAINT);
        }
    }
}

impl CanvasObject for Rectangle {
    impl_base_object!();

    fn min_size(&self) -> Size {
        self.min
    }

    fn primitive(&self) -> Option<PrimitiveKind> {
        Some(PrimitiveKind::Rectangle {
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            corner_radius: self.corner_radius,
        })
    }
}

/// A single line of text.
///
/// Text metrics are approximated from the text size; glyph shaping belongs
/// to the rasterizer.
#[derive(Debug, Clone)]
pub struct Text {
    base: BaseObject,
    text: String,
    pub color: Color,
    text_size: f32,
}

impl Text {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Text {
            base: BaseObject::new(),
            text: text.into(),
            color,
            text_size: 14.0,
        }
    }

    pub fn with_text_size(mut self, size: f32) -> Self {
        self.text_size = size.max(0.0);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
            self.base.mark_dirty(DirtyFlags::PAINT | DirtyFlags::MIN_SIZE);
        }
    }

    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    pub fn set_text_size(&mut self, size: f32) {
        self.text_size = size.max(0.0);
        self.base.mark_dirty(DirtyFlags::MIN_SIZE);
    }

    /// Approximate extent of `text` at `size`.
    pub fn measure(text: &str, size: f32) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let chars = text.chars().count() as f32;
        Size::new(chars * size * TEXT_ADVANCE_RATIO, size * TEXT_LINE_HEIGHT_RATIO)
    }
}

impl CanvasObject for Text {
    impl_base_object!();

    fn min_size(&self) -> Size {
        Text::measure(&self.text, self.text_size)
    }

    fn primitive(&self) -> Option<PrimitiveKind> {
        Some(PrimitiveKind::Text {
            text: self.text.clone(),
            color: self.color,
            size: self.text_size,
        })
    }
}

/// A circle inscribed in the object's bounds.
#[derive(Debug, Clone)]
pub struct Circle {
    base: BaseObject,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl Circle {
    pub fn new(fill: Color) -> Self {
        Circle {
            base: BaseObject::new(),
            fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
        }
    }
}

impl CanvasObject for Circle {
    impl_base_object!();

    fn min_size(&self) -> Size {
        Size::ZERO
    }

    fn primitive(&self) -> Option<PrimitiveKind> {
        Some(PrimitiveKind::Circle {
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
        })
    }
}

/// An image drawn from a named resource.
#[derive(Debug, Clone)]
pub struct Image {
    base: BaseObject,
    resource: Resource,
    min: Size,
}

impl Image {
    pub fn new(resource: Resource) -> Self {
        Image {
            base: BaseObject::new(),
            resource,
            min: Size::ZERO,
        }
    }

    pub fn with_min_size(mut self, min: Size) -> Self {
        self.min = min.non_negative();
        self
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn set_resource(&mut self, resource: Resource) {
        if self.resource != resource {
            self.resource = resource;
            self.base.mark_dirty(DirtyFlags::PAINT);
        }
    }
}

impl CanvasObject for Image {
    impl_base_object!();

    fn min_size(&self) -> Size {
        self.min
    }

    fn primitive(&self) -> Option<PrimitiveKind> {
        if self.resource.is_empty() {
            return None;
        }
        Some(PrimitiveKind::Image {
            resource: self.resource.clone(),
        })
    }
}
