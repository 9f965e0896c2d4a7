//! Stateful widgets.
//!
//! A widget holds application state and never draws directly. Its
//! appearance is produced by a [`Renderer`] that the renderer cache builds
//! on demand through the [`Renderable`] capability. Widgets are shared as
//! `Arc<dyn Widget>` so application threads can mutate them while the paint
//! thread reads them; each widget guards the fields its renderer reads with
//! its own property lock.

mod button;
mod check;
mod icon;
mod label;

pub use button::{Button, ButtonImportance};
pub use check::Check;
pub use icon::Icon;
pub use label::Label;

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use trellis_core::{Position, Size};

use crate::context::{Context, WeakContext};
use crate::dirty::DirtyFlags;
use crate::object::{BaseObject, CanvasObject, ObjectId};
use crate::queue::ObjectQueue;
use crate::renderer::Renderer;
use crate::theme::ThemeProvider;

/// Queue a widget posts its id to when it needs repainting.
pub type RefreshQueue = Arc<ObjectQueue<ObjectId>>;

/// Builds the render tree for a widget.
///
/// The cache calls this at most once per cache entry. Implementations must
/// not call back into the renderer cache.
pub trait Renderable: Send + Sync {
    fn create_renderer(self: Arc<Self>, ctx: &Context) -> Box<dyn Renderer>;
}

/// A stateful UI element drawn through a renderer.
///
/// Extending a widget means wrapping it in a new type that implements
/// [`Renderable`] itself and returns the inner widget's [`WidgetBase`]; the
/// wrapper then shares the inner widget's identity.
pub trait Widget: Renderable + Any {
    fn base(&self) -> &WidgetBase;

    fn id(&self) -> ObjectId {
        self.base().id()
    }

    /// Ask the owning canvas to repaint this widget.
    fn refresh(&self) {
        self.base().request_refresh();
    }

    fn show(&self) {
        self.base().set_visible(true);
    }

    fn hide(&self) {
        self.base().set_visible(false);
    }

    fn as_any(&self) -> &dyn Any;
}

impl dyn Widget {
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }
}

/// Identity, geometry and refresh binding shared by all widgets.
pub struct WidgetBase {
    id: ObjectId,
    geometry: Mutex<BaseObject>,
    destroyed: AtomicBool,
    binding: Mutex<Option<RefreshQueue>>,
}

impl WidgetBase {
    pub fn new() -> Self {
        let geometry = BaseObject::new();
        WidgetBase {
            id: geometry.id(),
            geometry: Mutex::new(geometry),
            destroyed: AtomicBool::new(false),
            binding: Mutex::new(None),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.geometry.lock().position()
    }

    pub fn move_to(&self, position: Position) {
        self.geometry.lock().move_to(position);
    }

    pub fn size(&self) -> Size {
        self.geometry.lock().size()
    }

    /// Returns true when the size changed.
    pub fn resize(&self, size: Size) -> bool {
        self.geometry.lock().resize(size)
    }

    pub fn visible(&self) -> bool {
        self.geometry.lock().visible()
    }

    pub fn set_visible(&self, visible: bool) {
        if self.geometry.lock().set_visible(visible) {
            self.request_refresh();
        }
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.geometry.lock().dirty()
    }

    pub fn clear_dirty(&self) {
        self.geometry.lock().clear_dirty();
    }

    /// Attach to a canvas refresh queue. Rebinding to the same queue is a
    /// no-op.
    pub fn bind(&self, queue: &RefreshQueue) {
        let mut binding = self.binding.lock();
        if binding.as_ref().is_some_and(|q| Arc::ptr_eq(q, queue)) {
            return;
        }
        *binding = Some(queue.clone());
    }

    pub fn unbind(&self) {
        self.binding.lock().take();
    }

    pub fn is_bound(&self) -> bool {
        self.binding.lock().is_some()
    }

    /// Post this widget to its canvas queue. Does nothing when unbound.
    pub fn request_refresh(&self) {
        let queue = self.binding.lock().clone();
        if let Some(queue) = queue {
            queue.push(self.id);
        }
    }

    /// Mark the widget as destroyed; it will only get empty renderers.
    pub fn mark_destroyed(&self) {
        self.destroyed.store(true, Ordering::Release);
        self.unbind();
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBase")
            .field("id", &self.id)
            .field("destroyed", &self.is_destroyed())
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Places a widget in the object tree.
///
/// The node's geometry is the widget's geometry. Min size and layout are
/// delegated to the widget's cached renderer.
pub struct WidgetNode {
    widget: Arc<dyn Widget>,
    ctx: WeakContext,
}

impl WidgetNode {
    pub fn new(widget: Arc<dyn Widget>, ctx: &Context) -> Self {
        WidgetNode {
            widget,
            ctx: ctx.downgrade(),
        }
    }

    pub fn boxed<W: Widget>(widget: &Arc<W>, ctx: &Context) -> Box<dyn CanvasObject> {
        let widget: Arc<dyn Widget> = widget.clone();
        Box::new(WidgetNode::new(widget, ctx))
    }

    pub fn widget(&self) -> &Arc<dyn Widget> {
        &self.widget
    }

    fn layout_renderer(&self) {
        let Some(ctx) = self.ctx.upgrade() else {
            return;
        };
        let renderer = ctx.cache().get_or_create(&self.widget, &ctx);
        renderer.write().layout(self.widget.base().size());
    }
}

impl CanvasObject for WidgetNode {
    fn id(&self) -> ObjectId {
        self.widget.id()
    }

    fn position(&self) -> Position {
        self.widget.base().position()
    }

    fn move_to(&mut self, position: Position) {
        self.widget.base().move_to(position);
    }

    fn size(&self) -> Size {
        self.widget.base().size()
    }

    fn resize(&mut self, size: Size) {
        if self.widget.base().resize(size) {
            self.layout_renderer();
        }
    }

    fn min_size(&self) -> Size {
        match self.ctx.upgrade() {
            Some(ctx) => ctx.cache().get_or_create(&self.widget, &ctx).read().min_size(),
            None => Size::ZERO,
        }
    }

    fn visible(&self) -> bool {
        self.widget.base().visible()
    }

    fn show(&mut self) {
        self.widget.show();
    }

    fn hide(&mut self) {
        self.widget.hide();
    }

    fn refresh(&mut self) {
        self.widget.refresh();
    }

    fn apply_theme(&mut self, _theme: &dyn ThemeProvider) {
        // Renderers re-read the theme when rebuilt.
        self.widget.refresh();
    }

    fn dirty_flags(&self) -> DirtyFlags {
        self.widget.base().dirty()
    }

    fn clear_dirty(&mut self) {
        self.widget.base().clear_dirty();
    }

    fn as_widget(&self) -> Option<&Arc<dyn Widget>> {
        Some(&self.widget)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
