//! Frame driver: refresh coalescing, paint submission and theme switches.

use std::sync::Arc;

use trellis_ui::theme::names;
use trellis_ui::{
    BoxLayout, Button, CanvasObject, Check, Color, Container, Context, Driver, Label,
    PaddedLayout, Position, PrimitiveKind, Rect, RecordingBackend, Rectangle, Settings, Size,
    StackLayout, Theme, ThemeProvider, Widget, WidgetNode,
};

fn dark_context() -> Context {
    Context::with_theme(Settings::default(), Arc::new(Theme::dark()))
}

fn text_color(backend: &RecordingBackend, wanted: &str) -> Option<Color> {
    backend.last_frame()?.iter().find_map(|p| match &p.kind {
        PrimitiveKind::Text { text, color, .. } if text == wanted => Some(*color),
        _ => None,
    })
}

#[test]
fn test_clean_canvas_is_not_resubmitted() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::square(100.0));
    let content = Container::new(PaddedLayout::new(10.0))
        .with_object(Rectangle::new(Color::WHITE));
    driver.canvas_mut(id).unwrap().set_content(Box::new(content));

    let mut backend = RecordingBackend::new();
    let stats = driver.tick(0.016, &mut backend);
    assert!(stats[0].1.painted);
    assert_eq!(backend.frames.len(), 1);

    let stats = driver.tick(0.016, &mut backend);
    assert!(!stats[0].1.painted);
    assert_eq!(backend.frames.len(), 1);
}

#[test]
fn test_primitives_use_absolute_geometry() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::square(100.0));

    let inner = Container::new(PaddedLayout::new(5.0)).with_object(Rectangle::new(Color::WHITE));
    let content = Container::new(PaddedLayout::new(10.0)).with_object(inner);
    driver.canvas_mut(id).unwrap().set_content(Box::new(content));

    let mut backend = RecordingBackend::new();
    driver.tick(0.016, &mut backend);

    let frame = backend.last_frame().unwrap();
    assert_eq!(frame.len(), 1);
    assert_eq!(
        frame[0].rect,
        Rect::new(Position::new(15.0, 15.0), Size::square(70.0))
    );
}

#[test]
fn test_hidden_objects_are_not_painted() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::square(50.0));
    let content = Container::new(StackLayout::new()).with_objects([
        Box::new(Rectangle::new(Color::WHITE)) as Box<dyn CanvasObject>,
        Box::new(Rectangle::new(Color::BLACK)),
    ]);
    let canvas = driver.canvas_mut(id).unwrap();
    canvas.set_content(Box::new(content));
    canvas.content_mut().unwrap().children_mut()[1].hide();

    let mut backend = RecordingBackend::new();
    driver.tick(0.016, &mut backend);
    assert_eq!(backend.last_frame().unwrap().len(), 1);
}

#[test]
fn test_primitives_sorted_by_z_index() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::square(50.0));
    let top = Rectangle::new(Color::WHITE).with_z_index(1);
    let top_id = top.id();
    let content = Container::new(StackLayout::new()).with_objects([
        Box::new(top) as Box<dyn CanvasObject>,
        Box::new(Rectangle::new(Color::BLACK)),
        Box::new(Rectangle::new(Color::BLACK)),
    ]);
    driver.canvas_mut(id).unwrap().set_content(Box::new(content));

    let mut backend = RecordingBackend::new();
    driver.tick(0.016, &mut backend);

    let frame = backend.last_frame().unwrap();
    assert_eq!(frame.len(), 3);
    assert_eq!(frame[2].object, top_id);
}

#[test]
fn test_refresh_requests_are_coalesced() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::new(300.0, 200.0));

    let check = Arc::new(Check::new("Agree"));
    let label = Arc::new(Label::new("Status"));
    let content = Container::new(BoxLayout::vertical(4.0)).with_objects([
        WidgetNode::boxed(&check, &ctx),
        WidgetNode::boxed(&label, &ctx),
    ]);
    driver.canvas_mut(id).unwrap().set_content(Box::new(content));

    let mut backend = RecordingBackend::new();
    driver.tick(0.016, &mut backend);

    check.set_text("I agree");
    check.set_checked(true);
    check.set_text("I fully agree");
    label.set_text("Done");

    let stats = driver.tick(0.016, &mut backend)[0].1;
    assert_eq!(stats.drained, 4);
    assert_eq!(stats.coalesced, 2);
    assert_eq!(stats.refreshed, 2);
    assert!(stats.painted);
    assert!(text_color(&backend, "I fully agree").is_some());
    assert!(text_color(&backend, "Done").is_some());
    assert!(text_color(&backend, "I agree").is_none());
}

#[test]
fn test_refresh_by_id() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::square(100.0));
    let content = Container::new(PaddedLayout::new(10.0))
        .with_object(Rectangle::new(Color::WHITE));
    let content_id = content.id();
    driver.canvas_mut(id).unwrap().set_content(Box::new(content));

    let mut backend = RecordingBackend::new();
    driver.tick(0.016, &mut backend);

    assert_eq!(driver.canvas_for_object(content_id), Some(id));
    driver.canvas(id).unwrap().refresh(content_id);
    driver.canvas(id).unwrap().refresh(content_id);

    let stats = driver.tick(0.016, &mut backend)[0].1;
    assert_eq!((stats.drained, stats.coalesced, stats.refreshed), (2, 1, 1));
    assert!(stats.painted);
}

#[test]
fn test_theme_switch_rebuilds_renderers() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::new(300.0, 200.0));

    let check = Arc::new(Check::new("Agree"));
    let content = Container::new(BoxLayout::vertical(4.0))
        .with_objects([WidgetNode::boxed(&check, &ctx)]);
    driver.canvas_mut(id).unwrap().set_content(Box::new(content));

    let mut backend = RecordingBackend::new();
    driver.tick(0.016, &mut backend);
    let built = ctx.cache().construction_count();
    assert_eq!(
        text_color(&backend, "Agree"),
        Some(Theme::dark().color(names::COLOR_FOREGROUND))
    );

    driver.set_theme(Arc::new(Theme::light()));
    let stats = driver.tick(0.016, &mut backend)[0].1;

    assert!(stats.painted);
    assert_eq!(ctx.cache().construction_count(), built + 1);
    assert_eq!(
        text_color(&backend, "Agree"),
        Some(Theme::light().color(names::COLOR_FOREGROUND))
    );
}

#[test]
fn test_button_tap_animates_across_ticks() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::new(200.0, 100.0));

    let button = Arc::new(Button::new("Go"));
    let content = Container::new(PaddedLayout::new(0.0))
        .with_objects([WidgetNode::boxed(&button, &ctx)]);
    driver.canvas_mut(id).unwrap().set_content(Box::new(content));

    let mut backend = RecordingBackend::new();
    driver.tick(0.016, &mut backend);

    button.tapped();
    driver.tick(0.016, &mut backend);
    assert_eq!(ctx.animations().len(), 1);

    driver.tick(0.1, &mut backend);
    let progress = button.tap_progress().unwrap();
    assert!(progress > 0.0 && progress < 1.0);

    driver.tick(0.5, &mut backend);
    assert_eq!(button.tap_progress(), None);
    assert!(ctx.animations().is_empty());
}

#[test]
fn test_replacing_content_unbinds_old_widgets() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::square(100.0));

    let label = Arc::new(Label::new("Old"));
    let canvas = driver.canvas_mut(id).unwrap();
    canvas.set_content(WidgetNode::boxed(&label, &ctx));
    assert!(label.base().is_bound());

    canvas.set_content(Box::new(Container::without_layout()));
    assert!(!label.base().is_bound());
    assert_eq!(driver.canvas_for_object(label.id()), None);
}

#[test]
fn test_relayout_after_text_change_settles_in_one_frame() {
    let ctx = dark_context();
    let mut driver = Driver::new(ctx.clone());
    let id = driver.create_canvas(Size::new(400.0, 40.0));

    let label = Arc::new(Label::new("Hi"));
    let other = Arc::new(Label::new("World"));
    let content = Container::new(BoxLayout::horizontal(4.0))
        .with_objects([WidgetNode::boxed(&label, &ctx), WidgetNode::boxed(&other, &ctx)]);
    driver.canvas_mut(id).unwrap().set_content(Box::new(content));

    let mut backend = RecordingBackend::new();
    driver.tick(0.016, &mut backend);
    assert!(!driver.tick(0.016, &mut backend)[0].1.painted);

    label.set_text("Hello there");
    let painted: Vec<bool> = (0..4)
        .map(|_| driver.tick(0.016, &mut backend)[0].1.painted)
        .collect();
    assert_eq!(painted, vec![true, false, false, false]);
    assert!(text_color(&backend, "Hello there").is_some());
}
