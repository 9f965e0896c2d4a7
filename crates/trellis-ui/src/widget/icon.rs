use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use trellis_core::{Position, Size};

use super::{Renderable, Widget, WidgetBase};
use crate::canvas::Image;
use crate::context::Context;
use crate::object::CanvasObject;
use crate::renderer::{BaseRenderer, Renderer};
use crate::resource::Resource;
use crate::theme::names;

/// Displays a resource at inline icon size.
///
/// An icon without a resource renders nothing.
pub struct Icon {
    base: WidgetBase,
    resource: RwLock<Option<Resource>>,
}

impl Icon {
    pub fn new(resource: Option<Resource>) -> Self {
        Icon {
            base: WidgetBase::new(),
            resource: RwLock::new(resource),
        }
    }

    pub fn resource(&self) -> Option<Resource> {
        self.resource.read().clone()
    }

    pub fn set_resource(&self, resource: Option<Resource>) {
        *self.resource.write() = resource;
        self.base.request_refresh();
    }
}

impl Default for Icon {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Renderable for Icon {
    fn create_renderer(self: Arc<Self>, ctx: &Context) -> Box<dyn Renderer> {
        let size = self.base.size();
        let mut renderer = IconRenderer {
            base: BaseRenderer::default(),
            icon: self,
            min: Size::ZERO,
        };
        renderer.refresh(ctx);
        renderer.layout(size);
        Box::new(renderer)
    }
}

impl Widget for Icon {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Icon")
            .field("base", &self.base)
            .field("resource", &*self.resource.read())
            .finish()
    }
}

struct IconRenderer {
    base: BaseRenderer,
    icon: Arc<Icon>,
    min: Size,
}

impl Renderer for IconRenderer {
    fn layout(&mut self, size: Size) {
        for object in self.base.objects_mut() {
            object.move_to(Position::ZERO);
            object.resize(size);
        }
    }

    fn min_size(&self) -> Size {
        self.min
    }

    fn refresh(&mut self, ctx: &Context) {
        self.min = Size::square(ctx.theme().size(names::SIZE_INLINE_ICON));

        match self.icon.resource() {
            Some(resource) => {
                if let Some(image) = self.base.get_mut::<Image>(0) {
                    image.set_resource(resource);
                } else {
                    let image: Box<dyn CanvasObject> = Box::new(Image::new(resource));
                    self.base = BaseRenderer::new(vec![image]);
                    let size = self.icon.base.size();
                    self.layout(size);
                }
            }
            None => self.base = BaseRenderer::default(),
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

    #[test]
    fn test_no_resource_renders_nothing() {
        let ctx = Context::default();
        let icon = Arc::new(Icon::default());
        let mut renderer = icon.clone().create_renderer(&ctx);
        assert!(renderer.objects().is_empty());

        icon.set_resource(Some(Resource::named("computer")));
        renderer.refresh(&ctx);
        assert_eq!(renderer.objects().len(), 1);

        icon.set_resource(None);
        renderer.refresh(&ctx);
        assert!(renderer.objects().is_empty());
    }
}
