use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use trellis_core::{Color, Position, Size};

use super::{Renderable, Widget, WidgetBase};
use crate::canvas::Text;
use crate::context::Context;
use crate::dirty::Versioned;
use crate::object::CanvasObject;
use crate::renderer::{BaseRenderer, Renderer};
use crate::theme::names;

/// A single line of read-only text.
pub struct Label {
    base: WidgetBase,
    text: RwLock<Versioned<String>>,
}

impl Label {
    pub fn new(text: &str) -> Self {
        Label {
            base: WidgetBase::new(),
            text: RwLock::new(Versioned::from(text)),
        }
    }

    pub fn text(&self) -> String {
        self.text.read().get().clone()
    }

    pub fn set_text(&self, text: &str) {
        if self.text.write().set(text.to_string()) {
            self.base.request_refresh();
        }
    }
}

impl Renderable for Label {
    fn create_renderer(self: Arc<Self>, ctx: &Context) -> Box<dyn Renderer> {
        let size = self.base.size();
        let text: Box<dyn CanvasObject> = Box::new(Text::new("", Color::TRANSPARENT));
        let mut renderer = LabelRenderer {
            base: BaseRenderer::new(vec![text]),
            label: self,
            inset: 0.0,
            version: None,
        };
        renderer.refresh(ctx);
        renderer.layout(size);
        Box::new(renderer)
    }
}

impl Widget for Label {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Label")
            .field("base", &self.base)
            .field("text", self.text.read().get())
            .finish()
    }
}

struct LabelRenderer {
    base: BaseRenderer,
    label: Arc<Label>,
    inset: f32,
    version: Option<u32>,
}

impl Renderer for LabelRenderer {
    fn layout(&mut self, size: Size) {
        let inset = self.inset;
        if let Some(text) = self.base.objects_mut().first_mut() {
            text.move_to(Position::new(inset, inset));
            text.resize(size.subtract_width_height(inset * 2.0, inset * 2.0));
        }
    }

    fn min_size(&self) -> Size {
        let text = self.base.get::<Text>(0).map(|t| t.min_size()).unwrap_or_default();
        text.add_width_height(self.inset * 2.0, self.inset * 2.0)
    }

    fn refresh(&mut self, ctx: &Context) {
        let theme = ctx.theme();
        self.inset = theme.inner_padding();

        let text = self.label.text.read();
        let changed = self.version.is_none_or(|seen| text.is_newer_than(seen));
        if let Some(object) = self.base.get_mut::<Text>(0) {
            object.color = theme.color(names::COLOR_FOREGROUND);
            object.set_text_size(theme.size(names::SIZE_TEXT));
            if changed {
                object.set_text(text.as_str());
            }
        }
        self.version = Some(text.version());
    }

    fn objects(&self) -> &[Box<dyn CanvasObject>] {
        self.base.objects()
    }

    fn objects_mut(&mut self) -> &mut [Box<dyn CanvasObject>] {
        self.base.objects_mut()
    }
}
