//! Layout behaviour through containers (no renderer required).

use trellis_ui::{
    BoxLayout, CanvasObject, Color, Container, GridWrapLayout, PaddedLayout, Position, Rectangle,
    Size, StackLayout, Theme,
};

fn rect(min: Size) -> Box<dyn CanvasObject> {
    Box::new(Rectangle::new(Color::WHITE).with_min_size(min))
}

fn positions(container: &Container) -> Vec<Position> {
    container.objects().iter().map(|o| o.position()).collect()
}

#[test]
fn test_grid_wrap_places_row_major() {
    let cell = Size::square(50.0);
    let mut grid = Container::new(GridWrapLayout::new(cell, 4.0)).with_objects([
        rect(Size::ZERO),
        rect(Size::ZERO),
        rect(Size::ZERO),
    ]);

    grid.resize(Size::new(125.0, 200.0));

    assert_eq!(
        positions(&grid),
        vec![
            Position::new(0.0, 0.0),
            Position::new(54.0, 0.0),
            Position::new(0.0, 54.0),
        ]
    );
    assert!(grid.objects().iter().all(|o| o.size() == cell));
    assert_eq!(grid.min_size(), Size::new(50.0, 104.0));
}

#[test]
fn test_grid_wrap_single_column_when_narrow() {
    let mut grid = Container::new(GridWrapLayout::new(Size::square(50.0), 4.0))
        .with_objects([rect(Size::ZERO), rect(Size::ZERO)]);

    grid.resize(Size::new(40.0, 200.0));

    assert_eq!(positions(&grid), vec![Position::new(0.0, 0.0), Position::new(0.0, 54.0)]);
}

#[test]
fn test_grid_wrap_skips_hidden_children() {
    let mut grid = Container::new(GridWrapLayout::new(Size::square(50.0), 4.0)).with_objects([
        rect(Size::ZERO),
        rect(Size::ZERO),
        rect(Size::ZERO),
    ]);
    grid.resize(Size::new(125.0, 200.0));

    grid.objects_mut()[1].hide();
    grid.refresh();

    let objects = grid.objects();
    assert_eq!(objects[0].position(), Position::new(0.0, 0.0));
    assert_eq!(objects[2].position(), Position::new(54.0, 0.0));
    assert_eq!(grid.min_size(), Size::new(50.0, 50.0));
}

#[test]
fn test_padded_insets_children() {
    let mut padded =
        Container::new(PaddedLayout::new(4.0)).with_objects([rect(Size::square(10.0))]);

    padded.resize(Size::square(100.0));

    let child = &padded.objects()[0];
    assert_eq!(child.position(), Position::new(4.0, 4.0));
    assert_eq!(child.size(), Size::square(92.0));
    assert_eq!(padded.min_size(), Size::square(18.0));
}

#[test]
fn test_themed_padding_follows_theme() {
    let light = Theme::light();
    let mut padded =
        Container::new(PaddedLayout::themed(&light)).with_objects([rect(Size::square(10.0))]);
    assert_eq!(padded.min_size(), Size::square(18.0));

    let large = Theme::light().scaled(2.0);
    padded.apply_theme(&large);
    padded.refresh();
    assert_eq!(padded.min_size(), Size::square(26.0));
}

#[test]
fn test_horizontal_box_uses_min_lengths() {
    let mut row = Container::new(BoxLayout::horizontal(4.0))
        .with_objects([rect(Size::square(10.0)), rect(Size::square(20.0))]);

    row.resize(Size::new(200.0, 30.0));

    let objects = row.objects();
    assert_eq!(objects[0].position(), Position::new(0.0, 0.0));
    assert_eq!(objects[0].size(), Size::new(10.0, 30.0));
    assert_eq!(objects[1].position(), Position::new(14.0, 0.0));
    assert_eq!(objects[1].size(), Size::new(20.0, 30.0));
    assert_eq!(row.min_size(), Size::new(34.0, 20.0));
}

#[test]
fn test_vertical_box_ignores_hidden() {
    let mut column = Container::new(BoxLayout::vertical(4.0)).with_objects([
        rect(Size::square(10.0)),
        rect(Size::square(10.0)),
        rect(Size::square(10.0)),
    ]);
    column.objects_mut()[1].hide();
    column.resize(Size::new(50.0, 100.0));

    let objects = column.objects();
    assert_eq!(objects[2].position(), Position::new(0.0, 14.0));
    assert_eq!(column.min_size(), Size::new(10.0, 24.0));
}

#[test]
fn test_stack_fills_container() {
    let mut stack = Container::new(StackLayout::new())
        .with_objects([rect(Size::square(5.0)), rect(Size::new(20.0, 3.0))]);

    stack.resize(Size::new(60.0, 40.0));

    assert!(stack.objects().iter().all(|o| o.size() == Size::new(60.0, 40.0)));
    assert_eq!(stack.min_size(), Size::new(20.0, 5.0));
}

#[test]
fn test_container_without_layout_reports_max_min() {
    let container = Container::without_layout()
        .with_objects([rect(Size::new(30.0, 5.0)), rect(Size::new(10.0, 12.0))]);
    assert_eq!(container.min_size(), Size::new(30.0, 12.0));
}

#[test]
fn test_resize_to_same_size_skips_layout() {
    let mut grid = Container::new(GridWrapLayout::new(Size::square(50.0), 4.0))
        .with_objects([rect(Size::ZERO)]);

    grid.resize(Size::new(125.0, 200.0));
    let passes = grid.layout_passes();

    grid.resize(Size::new(125.0, 200.0));
    assert_eq!(grid.layout_passes(), passes);

    grid.resize(Size::new(200.0, 200.0));
    assert_eq!(grid.layout_passes(), passes + 1);
}

#[test]
fn test_grid_wrap_all_hidden_reports_one_cell() {
    let cell = Size::square(50.0);
    let mut grid = Container::new(GridWrapLayout::new(cell, 4.0))
        .with_objects([rect(Size::ZERO), rect(Size::ZERO), rect(Size::ZERO)]);
    grid.resize(Size::new(125.0, 200.0));
    assert_eq!(grid.min_size(), Size::new(50.0, 104.0));

    for object in grid.objects_mut() {
        object.hide();
    }
    grid.refresh();

    assert_eq!(grid.min_size(), cell);
}

#[test]
fn test_box_all_hidden_has_zero_min() {
    let mut row = Container::new(BoxLayout::horizontal(4.0))
        .with_objects([rect(Size::square(10.0)), rect(Size::square(20.0))]);
    row.resize(Size::new(200.0, 30.0));

    for object in row.objects_mut() {
        object.hide();
    }
    row.refresh();

    assert_eq!(row.min_size(), Size::ZERO);
}

#[test]
fn test_padded_all_hidden_keeps_padding() {
    let mut padded =
        Container::new(PaddedLayout::new(4.0)).with_objects([rect(Size::square(10.0))]);
    padded.resize(Size::square(100.0));

    padded.objects_mut()[0].hide();
    padded.refresh();

    assert_eq!(padded.min_size(), Size::square(8.0));
}
