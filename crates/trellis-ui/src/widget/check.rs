use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use trellis_core::{Color, Position, Size};

use super::{Renderable, Widget, WidgetBase};
use crate::canvas::{Circle, Image, Text};
use crate::context::Context;
use crate::dirty::Versioned;
use crate::object::CanvasObject;
use crate::renderer::{BaseRenderer, Renderer};
use crate::resource::Resource;
use crate::theme::{names, ThemeProvider};

type ChangedFn = Arc<dyn Fn(bool) + Send + Sync>;

/// State read by the check renderer, guarded by the property lock.
#[derive(Debug, Clone, Default)]
pub struct CheckProps {
    pub text: Versioned<String>,
    pub checked: bool,
    pub disabled: bool,
    pub focused: bool,
    pub hovered: bool,
}

/// A labelled checkbox.
pub struct Check {
    base: WidgetBase,
    props: RwLock<CheckProps>,
    on_changed: RwLock<Option<ChangedFn>>,
}

impl Check {
    pub fn new(text: &str) -> Self {
        Check {
            base: WidgetBase::new(),
            props: RwLock::new(CheckProps {
                text: Versioned::from(text),
                ..CheckProps::default()
            }),
            on_changed: RwLock::new(None),
        }
    }

    /// Called with the new state whenever the checked state changes.
    pub fn with_on_changed(self, f: impl Fn(bool) + Send + Sync + 'static) -> Self {
        *self.on_changed.write() = Some(Arc::new(f));
        self
    }

    pub fn set_on_changed(&self, f: Option<ChangedFn>) {
        *self.on_changed.write() = f;
    }

    /// Snapshot of the current state.
    pub fn props(&self) -> CheckProps {
        self.props.read().clone()
    }

    pub fn checked(&self) -> bool {
        self.props.read().checked
    }

    pub fn text(&self) -> String {
        self.props.read().text.get().clone()
    }

    pub fn set_checked(&self, checked: bool) {
        {
            let mut props = self.props.write();
            if props.checked == checked {
                return;
            }
            props.checked = checked;
        }

        let callback = self.on_changed.read().clone();
        if let Some(callback) = callback {
            callback(checked);
        }
        self.base.request_refresh();
    }

    pub fn set_text(&self, text: &str) {
        let changed = self.props.write().text.set(text.to_string());
        if changed {
            self.base.request_refresh();
        }
    }

    /// Toggle unless disabled.
    pub fn tapped(&self) {
        let checked = {
            let props = self.props.read();
            if props.disabled {
                return;
            }
            props.checked
        };
        self.set_checked(!checked);
    }

    /// Space toggles the check.
    pub fn typed_rune(&self, rune: char) {
        if rune == ' ' {
            self.tapped();
        }
    }

    pub fn mouse_in(&self) {
        self.update(|p| {
            if p.disabled || p.hovered {
                return false;
            }
            p.hovered = true;
            true
        });
    }

    pub fn mouse_out(&self) {
        self.update(|p| std::mem::replace(&mut p.hovered, false));
    }

    pub fn focus_gained(&self) {
        self.update(|p| {
            if p.disabled || p.focused {
                return false;
            }
            p.focused = true;
            true
        });
    }

    pub fn focus_lost(&self) {
        self.update(|p| std::mem::replace(&mut p.focused, false));
    }

    pub fn enable(&self) {
        self.update(|p| std::mem::replace(&mut p.disabled, false));
    }

    pub fn disable(&self) {
        self.update(|p| !std::mem::replace(&mut p.disabled, true));
    }

    pub fn disabled(&self) -> bool {
        self.props.read().disabled
    }

    fn update(&self, f: impl FnOnce(&mut CheckProps) -> bool) {
        let changed = f(&mut self.props.write());
        if changed {
            self.base.request_refresh();
        }
    }
}

impl Renderable for Check {
    fn create_renderer(self: Arc<Self>, ctx: &Context) -> Box<dyn Renderer> {
        let objects: Vec<Box<dyn CanvasObject>> = vec![
            Box::new(Circle::new(Color::TRANSPARENT)),
            Box::new(Image::new(Resource::empty())),
            Box::new(Image::new(Resource::empty())),
            Box::new(Text::new("", Color::TRANSPARENT)),
        ];
        let mut renderer = CheckRenderer {
            base: BaseRenderer::new(objects),
            check: self,
            metrics: CheckMetrics::default(),
            text_version: None,
        };
        let size = renderer.check.base.size();
        renderer.refresh(ctx);
        renderer.layout(size);
        Box::new(renderer)
    }
}

impl Widget for Check {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    /// Hiding drops keyboard focus.
    fn hide(&self) {
        self.focus_lost();
        self.base.set_visible(false);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check")
            .field("base", &self.base)
            .field("props", &*self.props.read())
            .finish()
    }
}

const FOCUS: usize = 0;
const BACKGROUND: usize = 1;
const ICON: usize = 2;
const LABEL: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
struct CheckMetrics {
    padding: f32,
    inner_padding: f32,
    icon_inline: f32,
    input_border: f32,
}

impl CheckMetrics {
    fn read(theme: &dyn ThemeProvider) -> Self {
        CheckMetrics {
            padding: theme.padding(),
            inner_padding: theme.inner_padding(),
            icon_inline: theme.size(names::SIZE_INLINE_ICON),
            input_border: theme.size(names::SIZE_INPUT_BORDER),
        }
    }
}

/// Focus circle, check background, check icon and label.
struct CheckRenderer {
    base: BaseRenderer,
    check: Arc<Check>,
    metrics: CheckMetrics,
    text_version: Option<u32>,
}

impl CheckRenderer {
    fn label(&self) -> Option<&Text> {
        self.base.get::<Text>(LABEL)
    }
}

impl Renderer for CheckRenderer {
    fn layout(&mut self, size: Size) {
        let m = self.metrics;
        let focus_size = Size::square(m.icon_inline + m.inner_padding);
        if let Some(focus) = self.base.objects_mut().get_mut(FOCUS) {
            focus.resize(focus_size);
            focus.move_to(Position::new(m.input_border, (size.height - focus_size.height) / 2.0));
        }

        let x_offset = focus_size.width + m.input_border * 2.0;
        if let Some(label) = self.base.objects_mut().get_mut(LABEL) {
            label.resize(size.subtract_width_height(x_offset, 0.0));
            label.move_to(Position::new(x_offset, 0.0));
        }

        let icon_pos = Position::new(
            m.inner_padding / 2.0 + m.input_border,
            (size.height - m.icon_inline) / 2.0,
        );
        let icon_size = Size::square(m.icon_inline);
        for index in [BACKGROUND, ICON] {
            if let Some(object) = self.base.objects_mut().get_mut(index) {
                object.move_to(icon_pos);
                object.resize(icon_size);
            }
        }
    }

    fn min_size(&self) -> Size {
        let m = self.metrics;
        let pad2 = m.inner_padding * 2.0;
        let label = self.label().map(|l| l.min_size()).unwrap_or_default();
        let mut min = label.add_width_height(m.icon_inline + pad2, pad2);
        if self.label().is_some_and(|l| !l.text().is_empty()) {
            min = min.add_width_height(m.padding, 0.0);
        }
        min
    }

    fn refresh(&mut self, ctx: &Context) {
        let theme = ctx.theme();
        self.metrics = CheckMetrics::read(theme.as_ref());

        let props = self.check.props.read();

        let icon = if props.checked {
            names::ICON_CHECK_BUTTON_CHECKED
        } else {
            names::ICON_CHECK_BUTTON
        };
        let focus_fill = if props.disabled {
            Color::TRANSPARENT
        } else if props.focused {
            theme.color(names::COLOR_FOCUS)
        } else if props.hovered {
            theme.color(names::COLOR_HOVER)
        } else {
            Color::TRANSPARENT
        };
        let label_color = if props.disabled {
            theme.color(names::COLOR_DISABLED)
        } else {
            theme.color(names::COLOR_FOREGROUND)
        };
        let text_changed = self
            .text_version
            .is_none_or(|seen| props.text.is_newer_than(seen));

        if let Some(label) = self.base.get_mut::<Text>(LABEL) {
            label.color = label_color;
            label.set_text_size(theme.size(names::SIZE_TEXT));
            if text_changed {
                label.set_text(props.text.as_str());
            }
        }
        self.text_version = Some(props.text.version());
        drop(props);

        if let Some(image) = self.base.get_mut::<Image>(ICON) {
            image.set_resource(theme.icon(icon));
        }
        if let Some(image) = self.base.get_mut::<Image>(BACKGROUND) {
            image.set_resource(theme.icon(names::ICON_CHECK_BUTTON_FILL));
        }
        if let Some(circle) = self.base.get_mut::<Circle>(FOCUS) {
            circle.fill = focus_fill;
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
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_set_checked_fires_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let check = Check::new("Agree").with_on_changed(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        check.set_checked(true);
        check.set_checked(true);
        check.tapped();
        assert!(!check.checked());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disabled_ignores_taps() {
        let check = Check::new("Agree");
        check.disable();
        check.tapped();
        check.typed_rune(' ');
        check.mouse_in();
        assert!(!check.checked());
        assert!(!check.props().hovered);
        check.enable();
        check.typed_rune(' ');
        assert!(check.checked());
    }

    #[test]
    fn test_callback_may_reenter() {
        let check = Arc::new(Check::new("Agree"));
        let weak = Arc::downgrade(&check);
        check.set_on_changed(Some(Arc::new(move |checked| {
            if let Some(check) = weak.upgrade() {
                check.set_text(if checked { "On" } else { "Off" });
            }
        })));
        check.set_checked(true);
        assert_eq!(check.text(), "On");
    }

    #[test]
    fn test_renderer_min_size() {
        let ctx = Context::default();
        let check = Arc::new(Check::new("ab"));
        let renderer = check.clone().create_renderer(&ctx);
        let theme = ctx.theme();
        let text = Text::measure("ab", theme.size(names::SIZE_TEXT));
        let inner = theme.inner_padding();
        let expected = text
            .add_width_height(theme.size(names::SIZE_INLINE_ICON) + inner * 2.0, inner * 2.0)
            .add_width_height(theme.padding(), 0.0);
        assert_eq!(renderer.min_size(), expected);
        assert_eq!(renderer.objects().len(), 4);
    }
}
