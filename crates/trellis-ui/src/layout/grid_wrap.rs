use trellis_core::{Position, Size};

use super::{visible_objects_mut, Layout, Padding};
use crate::object::CanvasObject;
use crate::theme::ThemeProvider;

/// Fixed-size cells placed row-major, wrapping when the width runs out.
///
/// The column count is derived from the available width on every pass; the
/// row count of the last pass feeds `min_size`.
#[derive(Debug, Clone)]
pub struct GridWrapLayout {
    cell: Size,
    padding: Padding,
    columns: usize,
    rows: usize,
}

impl GridWrapLayout {
    pub fn new(cell: Size, padding: f32) -> Self {
        Self::with_padding(cell, Padding::Fixed(padding))
    }

    pub fn themed(cell: Size, theme: &dyn ThemeProvider) -> Self {
        Self::with_padding(cell, Padding::themed(theme))
    }

    fn with_padding(cell: Size, padding: Padding) -> Self {
        GridWrapLayout {
            cell: cell.non_negative(),
            padding,
            columns: 1,
            rows: 0,
        }
    }

    pub fn cell_size(&self) -> Size {
        self.cell
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Rows used by the last pass.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count for an available width.
    pub fn column_count(&self, width: f32) -> usize {
        let pad = self.padding.get();
        if width <= self.cell.width {
            return 1;
        }
        let stride = self.cell.width + pad;
        if stride <= 0.0 {
            return 1;
        }
        (((width + pad) / stride).floor() as usize).max(1)
    }
}

impl Layout for GridWrapLayout {
    fn layout(&mut self, objects: &mut [Box<dyn CanvasObject>], size: Size) {
        let pad = self.padding.get();
        self.columns = self.column_count(size.width);
        self.rows = 0;

        let (mut x, mut y) = (0.0, 0.0);
        for (i, child) in visible_objects_mut(objects).enumerate() {
            if i % self.columns == 0 {
                self.rows += 1;
            }

            child.move_to(Position::new(x, y));
            child.resize(self.cell);

            if (i + 1) % self.columns == 0 {
                x = 0.0;
                y += self.cell.height + pad;
            } else {
                x += self.cell.width + pad;
            }
        }
    }

    fn min_size(&self, _objects: &[Box<dyn CanvasObject>]) -> Size {
        let rows = self.rows.max(1) as f32;
        Size::new(
            self.cell.width,
            self.cell.height * rows + (rows - 1.0) * self.padding.get(),
        )
    }

    fn apply_theme(&mut self, theme: &dyn ThemeProvider) {
        self.padding.apply_theme(theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count() {
        let grid = GridWrapLayout::new(Size::new(50.0, 50.0), 4.0);
        assert_eq!(grid.column_count(125.0), 2);
        assert_eq!(grid.column_count(50.0), 1);
        assert_eq!(grid.column_count(10.0), 1);
        assert_eq!(grid.column_count(158.0), 3);
    }

    #[test]
    fn test_min_size_before_first_pass() {
        let grid = GridWrapLayout::new(Size::new(50.0, 30.0), 4.0);
        assert_eq!(grid.min_size(&[]), Size::new(50.0, 30.0));
    }

    #[test]
    fn test_zero_stride() {
        let grid = GridWrapLayout::new(Size::ZERO, 0.0);
        assert_eq!(grid.column_count(100.0), 1);
    }
}
