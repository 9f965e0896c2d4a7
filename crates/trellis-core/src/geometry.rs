//! Logical-pixel geometry used by the scene graph and layouts.

use std::ops::{Add, Sub};

use crate::math::Vec2;

/// A width/height pair in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    pub const fn square(side: f32) -> Self {
        Size::new(side, side)
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    pub fn min(self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    pub fn add_width_height(self, dw: f32, dh: f32) -> Size {
        Size::new(self.width + dw, self.height + dh)
    }

    pub fn subtract_width_height(self, dw: f32, dh: f32) -> Size {
        Size::new(self.width - dw, self.height - dh)
    }

    /// Clamp both components to be non-negative. NaN becomes zero.
    pub fn non_negative(self) -> Size {
        Size::new(non_negative(self.width), non_negative(self.height))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for Size {
    type Output = Size;

    fn sub(self, rhs: Size) -> Size {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

/// A point relative to the parent object's origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ZERO: Position = Position::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }

    pub fn add_xy(self, dx: f32, dy: f32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn non_negative(self) -> Position {
        Position::new(non_negative(self.x), non_negative(self.y))
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add<Delta> for Position {
    type Output = Position;

    fn add(self, rhs: Delta) -> Position {
        Position::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl Sub<Delta> for Position {
    type Output = Position;

    fn sub(self, rhs: Delta) -> Position {
        Position::new(self.x - rhs.dx, self.y - rhs.dy)
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Position::new(v.x, v.y)
    }
}

/// A relative movement, typically a pointer drag between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delta {
    pub dx: f32,
    pub dy: f32,
}

impl Delta {
    pub const fn new(dx: f32, dy: f32) -> Self {
        Delta { dx, dy }
    }
}

impl From<Vec2> for Delta {
    fn from(v: Vec2) -> Self {
        Delta::new(v.x, v.y)
    }
}

/// An axis-aligned rectangle in absolute canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(position: Position, size: Size) -> Self {
        Rect {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

fn non_negative(v: f32) -> f32 {
    if v > 0.0 { v } else { 0.0 }
}
