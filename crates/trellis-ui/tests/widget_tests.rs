//! Widgets driven from several threads while renderers read them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use trellis_ui::{
    CanvasObject, Check, Context, Icon, Label, ObjectQueue, RefreshQueue, Renderable, Size, Text,
    Widget, WidgetNode,
};

const TEXTS: [&str; 3] = ["a", "a longer label", "the longest label of the three"];

fn label_text(renderer: &dyn trellis_ui::Renderer) -> String {
    renderer.objects()[3]
        .downcast_ref::<Text>()
        .map(|t| t.text().to_string())
        .unwrap_or_default()
}

#[test]
fn test_check_renderer_never_sees_torn_state() {
    let ctx = Context::default();

    // Expected min size for each text, from an undisturbed renderer.
    let expected: Vec<Size> = TEXTS
        .iter()
        .map(|text| Arc::new(Check::new(text)).create_renderer(&ctx).min_size())
        .collect();

    let check = Arc::new(Check::new(TEXTS[0]));
    let widget: Arc<dyn Widget> = check.clone();
    let stop = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..3)
        .map(|offset| {
            let check = check.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let mut i = offset;
                while !stop.load(Ordering::Relaxed) {
                    check.set_text(TEXTS[i % TEXTS.len()]);
                    check.set_checked(i % 2 == 0);
                    i += 1;
                }
            })
        })
        .collect();

    for _ in 0..2_000 {
        let handle = ctx.cache().get_or_create(&widget, &ctx);
        let mut renderer = handle.write();
        renderer.refresh(&ctx);

        let text = label_text(&**renderer);
        let index = TEXTS
            .iter()
            .position(|t| *t == text)
            .unwrap_or_else(|| panic!("unexpected label text {text:?}"));
        assert_eq!(renderer.min_size(), expected[index]);
    }

    stop.store(true, Ordering::Relaxed);
    for writer in writers {
        writer.join().unwrap();
    }
}

#[test]
fn test_bound_widget_posts_refresh() {
    let queue: RefreshQueue = Arc::new(ObjectQueue::new());
    let check = Arc::new(Check::new("Agree"));

    // Unbound widgets drop refresh requests.
    check.set_checked(true);
    assert!(queue.is_empty());

    check.base().bind(&queue);
    check.set_checked(false);
    check.set_text("Disagree");
    assert_eq!(queue.drain().collect::<Vec<_>>(), vec![check.id(), check.id()]);

    check.base().unbind();
    check.set_checked(true);
    assert!(queue.is_empty());
}

#[test]
fn test_label_renderer_tracks_text() {
    let ctx = Context::default();
    let label = Arc::new(Label::new("Hi"));
    let widget: Arc<dyn Widget> = label.clone();

    let handle = ctx.cache().get_or_create(&widget, &ctx);
    let short = handle.read().min_size();

    label.set_text("Hello there");
    handle.write().refresh(&ctx);
    let long = handle.read().min_size();

    assert!(long.width > short.width);
    assert_eq!(long.height, short.height);
}

#[test]
fn test_icon_without_resource_is_empty() {
    let ctx = Context::default();
    let icon = Arc::new(Icon::default());
    let widget: Arc<dyn Widget> = icon.clone();

    let handle = ctx.cache().get_or_create(&widget, &ctx);
    assert!(handle.read().objects().is_empty());

    icon.set_resource(Some(trellis_ui::Resource::new("star.svg", b"<svg/>".to_vec())));
    handle.write().refresh(&ctx);
    assert_eq!(handle.read().objects().len(), 1);
}

#[test]
fn test_hidden_check_loses_focus() {
    let check = Check::new("Agree");
    check.focus_gained();
    assert!(check.props().focused);
    check.hide();
    assert!(!check.props().focused);
    assert!(!check.base().visible());
    check.show();
    assert!(check.base().visible());
}

#[test]
fn test_hiding_tree_node_drops_check_focus() {
    let ctx = Context::default();
    let check = Arc::new(Check::new("Agree"));
    check.focus_gained();

    let mut node = WidgetNode::boxed(&check, &ctx);
    node.hide();
    assert!(!node.visible());
    assert!(!check.props().focused);

    node.show();
    assert!(node.visible());
    assert!(check.base().visible());
}
