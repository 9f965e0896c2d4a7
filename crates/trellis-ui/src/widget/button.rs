use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use trellis_core::{Color, Position, Size};

use super::{Renderable, Widget, WidgetBase};
use crate::animation::{Animation, AnimationCurve, AnimationHandle};
use crate::canvas::{Image, Rectangle, Text};
use crate::context::Context;
use crate::dirty::Versioned;
use crate::object::CanvasObject;
use crate::renderer::{BaseRenderer, Renderer};
use crate::resource::Resource;
use crate::theme::{names, ThemeProvider};

/// Length of the tap ripple.
pub const TAP_ANIMATION_DURATION: Duration = Duration::from_millis(300);

type TappedFn = Arc<dyn Fn() + Send + Sync>;

/// Visual weight of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonImportance {
    #[default]
    Medium,
    High,
    Low,
}

#[derive(Debug, Clone, Default)]
struct ButtonProps {
    text: Versioned<String>,
    icon: Option<Resource>,
    importance: ButtonImportance,
    disabled: bool,
    hovered: bool,
    focused: bool,
    /// Progress of the running tap animation.
    tap_progress: Option<f32>,
}

/// A push button with optional icon.
pub struct Button {
    base: WidgetBase,
    props: RwLock<ButtonProps>,
    on_tapped: RwLock<Option<TappedFn>>,
    tap_pending: AtomicBool,
    tap_animation: Mutex<Option<AnimationHandle>>,
}

impl Button {
    pub fn new(text: &str) -> Self {
        Button {
            base: WidgetBase::new(),
            props: RwLock::new(ButtonProps {
                text: Versioned::from(text),
                ..ButtonProps::default()
            }),
            on_tapped: RwLock::new(None),
            tap_pending: AtomicBool::new(false),
            tap_animation: Mutex::new(None),
        }
    }

    pub fn with_icon(self, icon: Resource) -> Self {
        self.props.write().icon = Some(icon);
        self
    }

    pub fn with_importance(self, importance: ButtonImportance) -> Self {
        self.props.write().importance = importance;
        self
    }

    pub fn with_on_tapped(self, f: impl Fn() + Send + Sync + 'static) -> Self {
        *self.on_tapped.write() = Some(Arc::new(f));
        self
    }

    pub fn text(&self) -> String {
        self.props.read().text.get().clone()
    }

    pub fn set_text(&self, text: &str) {
        if self.props.write().text.set(text.to_string()) {
            self.base.request_refresh();
        }
    }

    pub fn icon(&self) -> Option<Resource> {
        self.props.read().icon.clone()
    }

    pub fn set_icon(&self, icon: Option<Resource>) {
        self.props.write().icon = icon;
        self.base.request_refresh();
    }

    pub fn importance(&self) -> ButtonImportance {
        self.props.read().importance
    }

    pub fn set_importance(&self, importance: ButtonImportance) {
        self.update(|p| std::mem::replace(&mut p.importance, importance) != importance);
    }

    pub fn disabled(&self) -> bool {
        self.props.read().disabled
    }

    pub fn enable(&self) {
        self.update(|p| std::mem::replace(&mut p.disabled, false));
    }

    pub fn disable(&self) {
        self.update(|p| !std::mem::replace(&mut p.disabled, true));
    }

    pub fn mouse_in(&self) {
        self.update(|p| !std::mem::replace(&mut p.hovered, true));
    }

    pub fn mouse_out(&self) {
        self.update(|p| std::mem::replace(&mut p.hovered, false));
    }

    pub fn focus_gained(&self) {
        self.update(|p| !std::mem::replace(&mut p.focused, true));
    }

    pub fn focus_lost(&self) {
        self.update(|p| std::mem::replace(&mut p.focused, false));
    }

    /// Run the tap action. The ripple starts on the next renderer refresh.
    pub fn tapped(&self) {
        if self.disabled() {
            return;
        }
        self.tap_pending.store(true, Ordering::Release);
        self.base.request_refresh();

        let callback = self.on_tapped.read().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Current tap ripple progress, if one is running.
    pub fn tap_progress(&self) -> Option<f32> {
        self.props.read().tap_progress
    }

    fn set_tap_progress(&self, done: f32) {
        self.props.write().tap_progress = if done >= 1.0 { None } else { Some(done) };
        self.base.request_refresh();
    }

    fn start_tap_animation(self: &Arc<Self>, ctx: &Context) {
        let mut running = self.tap_animation.lock();
        if let Some(handle) = running.take() {
            ctx.animations().stop(handle);
        }
        if !ctx.settings().show_animations {
            return;
        }

        let button: Weak<Button> = Arc::downgrade(self);
        let animation = Animation::new(TAP_ANIMATION_DURATION, move |done| {
            if let Some(button) = button.upgrade() {
                button.set_tap_progress(done);
            }
        })
        .curve(AnimationCurve::EaseOut);
        *running = Some(ctx.animations().start(animation));
        self.props.write().tap_progress = Some(0.0);
    }

    fn update(&self, f: impl FnOnce(&mut ButtonProps) -> bool) {
        let changed = f(&mut self.props.write());
        if changed {
            self.base.request_refresh();
        }
    }

    fn background_color(props: &ButtonProps, theme: &dyn ThemeProvider) -> Color {
        let base = match props.importance {
            ButtonImportance::High => theme.color(names::COLOR_PRIMARY),
            ButtonImportance::Low => Color::TRANSPARENT,
            ButtonImportance::Medium => theme.color(names::COLOR_BUTTON),
        };
        if props.disabled {
            if props.importance == ButtonImportance::Low {
                return Color::TRANSPARENT;
            }
            return theme.color(names::COLOR_DISABLED_BUTTON);
        }
        if props.focused {
            base.blend(theme.color(names::COLOR_FOCUS))
        } else if props.hovered {
            base.blend(theme.color(names::COLOR_HOVER))
        } else {
            base
        }
    }
}

impl Renderable for Button {
    fn create_renderer(self: Arc<Self>, ctx: &Context) -> Box<dyn Renderer> {
        let objects: Vec<Box<dyn CanvasObject>> = vec![
            Box::new(Rectangle::new(Color::TRANSPARENT)),
            Box::new(Rectangle::new(Color::TRANSPARENT)),
            Box::new(Text::new("", Color::TRANSPARENT)),
            Box::new(Image::new(Resource::empty())),
        ];
        let size = self.base.size();
        let mut renderer = ButtonRenderer {
            base: BaseRenderer::new(objects),
            button: self,
            metrics: ButtonMetrics::default(),
            tap_progress: None,
            pressed: Color::TRANSPARENT,
        };
        renderer.refresh(ctx);
        renderer.layout(size);
        Box::new(renderer)
    }
}

impl Widget for Button {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("base", &self.base)
            .field("props", &*self.props.read())
            .finish()
    }
}

const BACKGROUND: usize = 0;
const TAP_BACKGROUND: usize = 1;
const LABEL: usize = 2;
const ICON: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
struct ButtonMetrics {
    padding: f32,
    inner_padding: f32,
    icon_inline: f32,
}

struct ButtonRenderer {
    base: BaseRenderer,
    button: Arc<Button>,
    metrics: ButtonMetrics,
    tap_progress: Option<f32>,
    pressed: Color,
}

impl ButtonRenderer {
    fn has_label(&self) -> bool {
        self.base.get::<Text>(LABEL).is_some_and(|l| !l.text().is_empty())
    }

    fn has_icon(&self) -> bool {
        self.base.objects().get(ICON).is_some_and(|i| i.visible())
    }

    fn label_min(&self) -> Size {
        self.base.get::<Text>(LABEL).map(|l| l.min_size()).unwrap_or_default()
    }

    /// Space around the content.
    fn padding(&self) -> Size {
        Size::square(self.metrics.inner_padding * 2.0)
    }
}

impl Renderer for ButtonRenderer {
    fn layout(&mut self, size: Size) {
        if let Some(background) = self.base.objects_mut().get_mut(BACKGROUND) {
            background.move_to(Position::ZERO);
            background.resize(size);
        }

        let progress = self.tap_progress;
        let pressed = self.pressed;
        if let Some(tap) = self.base.get_mut::<Rectangle>(TAP_BACKGROUND) {
            match progress {
                Some(done) => {
                    let mid = size.width / 2.0;
                    let half = mid * done;
                    tap.resize(Size::new(half * 2.0, size.height));
                    tap.move_to(Position::new(mid - half, 0.0));
                    tap.set_fill(pressed.with_alpha(pressed.a * (1.0 - done)));
                }
                None => {
                    tap.resize(size);
                    tap.set_fill(Color::TRANSPARENT);
                }
            }
        }

        let has_label = self.has_label();
        let has_icon = self.has_icon();
        if !has_label && !has_icon {
            return;
        }

        let m = self.metrics;
        let label = self.label_min();
        let icon = Size::square(m.icon_inline);
        let content = match (has_label, has_icon) {
            (true, true) => Size::new(icon.width + m.padding + label.width, label.height.max(icon.height)),
            (true, false) => label,
            _ => icon,
        };
        let origin = Position::new(
            (size.width - content.width) / 2.0,
            (size.height - content.height) / 2.0,
        );

        let mut label_x = origin.x;
        if has_icon {
            if let Some(image) = self.base.objects_mut().get_mut(ICON) {
                image.move_to(Position::new(origin.x, origin.y + (content.height - icon.height) / 2.0));
                image.resize(icon);
            }
            label_x += icon.width + m.padding;
        }
        if has_label {
            if let Some(text) = self.base.objects_mut().get_mut(LABEL) {
                text.move_to(Position::new(label_x, origin.y + (content.height - label.height) / 2.0));
                text.resize(label);
            }
        }
    }

    fn min_size(&self) -> Size {
        let has_label = self.has_label();
        let label = self.label_min();
        let icon = Size::square(self.metrics.icon_inline);

        let mut width = if has_label { label.width } else { 0.0 };
        if self.has_icon() {
            if has_label {
                width += self.metrics.padding;
            }
            width += icon.width;
        }
        Size::new(width, label.height.max(icon.height)) + self.padding()
    }

    fn refresh(&mut self, ctx: &Context) {
        if self.button.tap_pending.swap(false, Ordering::AcqRel) {
            self.button.start_tap_animation(ctx);
        }

        let theme = ctx.theme();
        self.metrics = ButtonMetrics {
            padding: theme.padding(),
            inner_padding: theme.inner_padding(),
            icon_inline: theme.size(names::SIZE_INLINE_ICON),
        };
        self.pressed = theme.color(names::COLOR_PRESSED);

        let props = self.button.props.read();
        let background = Button::background_color(&props, theme.as_ref());
        let label_color = match (props.disabled, props.importance) {
            (true, _) => theme.color(names::COLOR_DISABLED),
            (false, ButtonImportance::High) if !props.focused => theme.color(names::COLOR_BACKGROUND),
            _ => theme.color(names::COLOR_FOREGROUND),
        };
        let text = props.text.get().clone();
        let icon = props.icon.clone();
        self.tap_progress = props.tap_progress;
        drop(props);

        if let Some(rect) = self.base.get_mut::<Rectangle>(BACKGROUND) {
            rect.set_fill(background);
        }
        if let Some(label) = self.base.get_mut::<Text>(LABEL) {
            label.set_text(&text);
            label.color = label_color;
            label.set_text_size(theme.size(names::SIZE_TEXT));
        }
        if let Some(image) = self.base.objects_mut().get_mut(ICON) {
            match &icon {
                Some(_) => image.show(),
                None => image.hide(),
            }
        }
        if let (Some(resource), Some(image)) = (icon, self.base.get_mut::<Image>(ICON)) {
            image.set_resource(resource);
        }
        if let Some(text) = self.base.objects_mut().get_mut(LABEL) {
            if text.min_size().is_empty() {
                text.hide();
            } else {
                text.show();
            }
        }
    }

    fn objects(&self) -> &[Box<dyn CanvasObject>] {
        self.base.objects()
    }

    fn objects_mut(&mut self) -> &mut [Box<dyn CanvasObject>] {
        self.base.objects_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_min_size_with_icon() {
        let ctx = Context::default();
        let theme = ctx.theme();
        let button = Arc::new(Button::new("OK").with_icon(Resource::named("ok")));
        let renderer = button.clone().create_renderer(&ctx);

        let label = Text::measure("OK", theme.size(names::SIZE_TEXT));
        let icon = theme.size(names::SIZE_INLINE_ICON);
        let pad = theme.inner_padding() * 2.0;
        let expected = Size::new(label.width + theme.padding() + icon, label.height.max(icon))
            + Size::square(pad);
        assert_eq!(renderer.min_size(), expected);
    }

    #[test]
    fn test_disabled_button_ignores_tap() {
        let taps = Arc::new(AtomicUsize::new(0));
        let seen = taps.clone();
        let button = Button::new("Go").with_on_tapped(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        button.disable();
        button.tapped();
        assert_eq!(taps.load(Ordering::SeqCst), 0);
        button.enable();
        button.tapped();
        assert_eq!(taps.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tap_animation_runs_on_refresh() {
        let ctx = Context::default();
        let button = Arc::new(Button::new("Go"));
        let mut renderer = button.clone().create_renderer(&ctx);

        button.tapped();
        renderer.refresh(&ctx);
        assert_eq!(ctx.animations().len(), 1);
        assert_eq!(button.tap_progress(), Some(0.0));

        ctx.animations().step(TAP_ANIMATION_DURATION.as_secs_f32());
        assert!(ctx.animations().is_empty());
        assert_eq!(button.tap_progress(), None);
    }

    #[test]
    fn test_no_tap_animation_when_disabled_in_settings() {
        let ctx = Context::default();
        ctx.update_settings(|s| s.show_animations = false);
        let button = Arc::new(Button::new("Go"));
        let mut renderer = button.clone().create_renderer(&ctx);

        button.tapped();
        renderer.refresh(&ctx);
        assert!(ctx.animations().is_empty());
    }
}
