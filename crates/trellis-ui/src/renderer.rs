//! Widget renderers.
//!
//! A renderer owns the primitive objects that draw one widget and knows how
//! to lay them out and bring them up to date with the widget state. Renderers
//! are owned by the [`RendererCache`](crate::cache::RendererCache), never by
//! the widget.

use std::sync::Arc;

use parking_lot::RwLock;
use trellis_core::Size;

use crate::context::Context;
use crate::object::CanvasObject;

/// The render tree of a widget.
pub trait Renderer: Send + Sync {
    /// Position and size the objects for a widget of `size`.
    fn layout(&mut self, size: Size);

    fn min_size(&self) -> Size;

    /// Re-read widget state and theme values into the objects.
    fn refresh(&mut self, ctx: &Context);

    fn objects(&self) -> &[Box<dyn CanvasObject>];

    fn objects_mut(&mut self) -> &mut [Box<dyn CanvasObject>];

    /// Release resources. Called when the cache drops the renderer.
    fn destroy(&mut self) {}
}

/// Shared handle to a cached renderer.
pub type RendererHandle = Arc<RwLock<Box<dyn Renderer>>>;

pub(crate) fn handle(renderer: Box<dyn Renderer>) -> RendererHandle {
    Arc::new(RwLock::new(renderer))
}

/// A valid renderer that draws nothing.
#[derive(Debug, Default)]
pub struct EmptyRenderer;

impl EmptyRenderer {
    pub fn new() -> Self {
        EmptyRenderer
    }
}

impl Renderer for EmptyRenderer {
    fn layout(&mut self, _size: Size) {}

    fn min_size(&self) -> Size {
        Size::ZERO
    }

    fn refresh(&mut self, _ctx: &Context) {}

    fn objects(&self) -> &[Box<dyn CanvasObject>] {
        &[]
    }

    fn objects_mut(&mut self) -> &mut [Box<dyn CanvasObject>] {
        &mut []
    }
}

/// Object storage shared by the built-in renderers, with typed access by
/// index.
#[derive(Default)]
pub struct BaseRenderer {
    objects: Vec<Box<dyn CanvasObject>>,
}

impl BaseRenderer {
    pub fn new(objects: Vec<Box<dyn CanvasObject>>) -> Self {
        BaseRenderer { objects }
    }

    pub fn objects(&self) -> &[Box<dyn CanvasObject>] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [Box<dyn CanvasObject>] {
        &mut self.objects
    }

    pub fn get<T: CanvasObject>(&self, index: usize) -> Option<&T> {
        self.objects.get(index)?.downcast_ref()
    }

    pub fn get_mut<T: CanvasObject>(&mut self, index: usize) -> Option<&mut T> {
        self.objects.get_mut(index)?.downcast_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
