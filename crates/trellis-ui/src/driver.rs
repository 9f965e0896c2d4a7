//! Paint and refresh driver.
//!
//! Each [`Canvas`] owns an object tree and a refresh queue. Once per frame
//! the [`Driver`] steps animations and paints every canvas: the queue is
//! drained and coalesced, affected renderers are refreshed, dirty containers
//! are laid out again and the visible primitives are handed to the
//! [`RenderBackend`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use trellis_core::alloc::IndexSet;
use trellis_core::profiling::{self, profile_function, profile_scope};
use trellis_core::{Position, Rect, Size};

use crate::canvas::PaintPrimitive;
use crate::context::Context;
use crate::dirty::DirtyFlags;
use crate::object::{CanvasObject, ObjectId};
use crate::queue::ObjectQueue;
use crate::theme::ThemeProvider;
use crate::widget::RefreshQueue;

/// Frames between sweeps of expired renderers.
pub const CACHE_SWEEP_INTERVAL: u64 = 120;

/// Identifies a canvas, typically one per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasId(u32);

static NEXT_CANVAS_ID: AtomicU32 = AtomicU32::new(1);

impl CanvasId {
    fn next() -> Self {
        CanvasId(NEXT_CANVAS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Rasterizer provided by the windowing backend.
pub trait RenderBackend {
    fn rasterize(&mut self, canvas: CanvasId, primitives: &[PaintPrimitive]);
}

/// Backend that stores submitted frames, for headless use and tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub frames: Vec<(CanvasId, Vec<PaintPrimitive>)>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&[PaintPrimitive]> {
        self.frames.last().map(|(_, p)| p.as_slice())
    }
}

impl RenderBackend for RecordingBackend {
    fn rasterize(&mut self, canvas: CanvasId, primitives: &[PaintPrimitive]) {
        self.frames.push((canvas, primitives.to_vec()));
    }
}

/// What a paint pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Ids taken from the refresh queue.
    pub drained: usize,
    /// Duplicate ids merged away.
    pub coalesced: usize,
    /// Objects whose renderer or layout was refreshed by request.
    pub refreshed: usize,
    /// Primitives submitted.
    pub primitives: usize,
    /// Whether anything was submitted.
    pub painted: bool,
}

/// A drawing surface with its own object tree and refresh queue.
pub struct Canvas {
    id: CanvasId,
    ctx: Context,
    content: Option<Box<dyn CanvasObject>>,
    queue: RefreshQueue,
    size: Size,
    full_repaint: bool,
}

impl Canvas {
    pub fn new(ctx: &Context, size: Size) -> Self {
        Canvas {
            id: CanvasId::next(),
            ctx: ctx.clone(),
            content: None,
            queue: Arc::new(ObjectQueue::new()),
            size: size.non_negative(),
            full_repaint: true,
        }
    }

    pub fn id(&self) -> CanvasId {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size) {
        let size = size.non_negative();
        if size == self.size {
            return;
        }
        self.size = size;
        if let Some(content) = self.content.as_mut() {
            content.resize(size);
        }
        self.full_repaint = true;
    }

    /// Replace the root object. Widgets in the tree are bound to this
    /// canvas's refresh queue.
    pub fn set_content(&mut self, mut content: Box<dyn CanvasObject>) -> Option<Box<dyn CanvasObject>> {
        bind_widgets(content.as_ref(), &self.queue);
        content.move_to(Position::ZERO);
        content.resize(self.size);
        self.full_repaint = true;
        let previous = self.content.replace(content);
        if let Some(previous) = previous.as_deref() {
            unbind_widgets(previous);
        }
        previous
    }

    pub fn content(&self) -> Option<&(dyn CanvasObject + 'static)> {
        self.content.as_deref()
    }

    /// Mutable access to the root. Newly added widgets are bound on the
    /// next paint.
    pub fn content_mut(&mut self) -> Option<&mut (dyn CanvasObject + 'static)> {
        self.content.as_deref_mut()
    }

    pub fn refresh_queue(&self) -> &RefreshQueue {
        &self.queue
    }

    /// Schedule `id` for repaint. Repeated requests before the next paint
    /// are merged.
    pub fn refresh(&self, id: ObjectId) {
        self.queue.push(id);
    }

    pub fn request_full_repaint(&mut self) {
        self.full_repaint = true;
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.content().is_some_and(|c| c.find(id).is_some())
    }

    pub fn apply_theme(&mut self, theme: &dyn ThemeProvider) {
        if let Some(content) = self.content.as_mut() {
            content.apply_theme(theme);
        }
        self.full_repaint = true;
    }

    /// Run one paint pass.
    pub fn paint(&mut self, backend: &mut dyn RenderBackend) -> FrameStats {
        profile_function!();
        let mut stats = FrameStats::default();

        let mut pending: IndexSet<ObjectId> = IndexSet::default();
        for id in self.queue.drain() {
            stats.drained += 1;
            pending.insert(id);
        }
        stats.coalesced = stats.drained - pending.len();

        let Some(content) = self.content.as_mut() else {
            return stats;
        };

        let mut pass = UpdatePass {
            ctx: &self.ctx,
            queue: &self.queue,
            pending: &pending,
            force: self.full_repaint,
            refreshed: 0,
        };
        let changed = {
            profile_scope!("update");
            pass.update(content.as_mut())
        };
        stats.refreshed = pass.refreshed;

        if !changed && !self.full_repaint && pending.is_empty() {
            tracing::trace!("Canvas {:?} clean, nothing to paint", self.id);
            return stats;
        }

        let mut primitives = Vec::new();
        {
            profile_scope!("collect");
            collect(content.as_ref(), Position::ZERO, &self.ctx, &mut primitives);
            primitives.sort_by_key(|p| p.z_index);
        }

        stats.primitives = primitives.len();
        backend.rasterize(self.id, &primitives);
        stats.painted = true;
        self.full_repaint = false;

        tracing::trace!(
            "Painted canvas {:?}: {} drained, {} coalesced, {} refreshed, {} primitives",
            self.id,
            stats.drained,
            stats.coalesced,
            stats.refreshed,
            stats.primitives
        );
        stats
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("queued", &self.queue.len())
            .field("full_repaint", &self.full_repaint)
            .finish()
    }
}

fn bind_widgets(object: &dyn CanvasObject, queue: &RefreshQueue) {
    if let Some(widget) = object.as_widget() {
        widget.base().bind(queue);
    }
    for child in object.children() {
        bind_widgets(child.as_ref(), queue);
    }
}

fn unbind_widgets(object: &dyn CanvasObject) {
    if let Some(widget) = object.as_widget() {
        widget.base().unbind();
    }
    for child in object.children() {
        unbind_widgets(child.as_ref());
    }
}

struct UpdatePass<'a> {
    ctx: &'a Context,
    queue: &'a RefreshQueue,
    pending: &'a IndexSet<ObjectId>,
    force: bool,
    refreshed: usize,
}

impl UpdatePass<'_> {
    /// Bring `object` and its subtree up to date. Returns true if anything
    /// in the subtree changed.
    fn update(&mut self, object: &mut dyn CanvasObject) -> bool {
        let requested = self.pending.contains(&object.id());

        if let Some(widget) = object.as_widget() {
            widget.base().bind(self.queue);
            let mut changed = !object.dirty_flags().is_empty();
            if requested || self.force {
                let renderer = self.ctx.cache().get_or_create(widget, self.ctx);
                let mut renderer = renderer.write();
                renderer.refresh(self.ctx);
                renderer.layout(widget.base().size());
                self.refreshed += usize::from(requested);
                changed = true;
            }
            object.clear_dirty();
            return changed;
        }

        let mut children_changed = false;
        for child in object.children_mut() {
            children_changed |= self.update(child.as_mut());
        }

        let flags = object.dirty_flags();
        let relayout = requested
            || self.force
            || flags.needs_layout()
            || flags.contains(DirtyFlags::MIN_SIZE)
            || (children_changed && !object.children().is_empty());
        if relayout {
            object.refresh();
            // Geometry the relayout just assigned is painted this frame.
            for child in object.children_mut() {
                clear_subtree(child.as_mut());
            }
            self.refreshed += usize::from(requested);
        }
        let changed = relayout || children_changed || !flags.is_empty();
        object.clear_dirty();
        changed
    }
}

fn clear_subtree(object: &mut dyn CanvasObject) {
    object.clear_dirty();
    for child in object.children_mut() {
        clear_subtree(child.as_mut());
    }
}

fn collect(
    object: &dyn CanvasObject,
    origin: Position,
    ctx: &Context,
    out: &mut Vec<PaintPrimitive>,
) {
    if !object.visible() {
        return;
    }
    let position = origin + object.position();

    if let Some(kind) = object.primitive() {
        out.push(PaintPrimitive {
            object: object.id(),
            rect: Rect::new(position, object.size()),
            z_index: object.z_index(),
            kind,
        });
    }

    if let Some(widget) = object.as_widget() {
        let renderer = ctx.cache().get_or_create(widget, ctx);
        let renderer = renderer.read();
        for child in renderer.objects() {
            collect(child.as_ref(), position, ctx, out);
        }
        return;
    }

    for child in object.children() {
        collect(child.as_ref(), position, ctx, out);
    }
}

/// Owns the canvases of an application and drives their frames.
pub struct Driver {
    ctx: Context,
    canvases: Vec<Canvas>,
    frame: u64,
}

impl Driver {
    pub fn new(ctx: Context) -> Self {
        Driver {
            ctx,
            canvases: Vec::new(),
            frame: 0,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn create_canvas(&mut self, size: Size) -> CanvasId {
        let canvas = Canvas::new(&self.ctx, size);
        let id = canvas.id();
        self.canvases.push(canvas);
        tracing::debug!("Created canvas {:?} at {:?}", id, size);
        id
    }

    pub fn remove_canvas(&mut self, id: CanvasId) -> Option<Canvas> {
        let index = self.canvases.iter().position(|c| c.id() == id)?;
        Some(self.canvases.remove(index))
    }

    pub fn canvas(&self, id: CanvasId) -> Option<&Canvas> {
        self.canvases.iter().find(|c| c.id() == id)
    }

    pub fn canvas_mut(&mut self, id: CanvasId) -> Option<&mut Canvas> {
        self.canvases.iter_mut().find(|c| c.id() == id)
    }

    pub fn canvases(&self) -> &[Canvas] {
        &self.canvases
    }

    /// The canvas whose tree contains `id`.
    pub fn canvas_for_object(&self, id: ObjectId) -> Option<CanvasId> {
        self.canvases.iter().find(|c| c.contains(id)).map(Canvas::id)
    }

    /// Advance animations by `delta_time` seconds and paint every canvas.
    pub fn tick(&mut self, delta_time: f32, backend: &mut dyn RenderBackend) -> Vec<(CanvasId, FrameStats)> {
        profile_function!();
        self.ctx.animations().step(delta_time);

        let stats = self
            .canvases
            .iter_mut()
            .map(|canvas| (canvas.id(), canvas.paint(backend)))
            .collect();

        self.frame += 1;
        if self.frame % CACHE_SWEEP_INTERVAL == 0 {
            self.sweep_cache(Instant::now());
        }
        profiling::new_frame();
        stats
    }

    /// Destroy renderers unused for longer than the configured expiry.
    pub fn sweep_cache(&self, now: Instant) -> usize {
        let expiry = self.ctx.settings().cache_expiry;
        self.ctx.cache().destroy_expired(now, expiry)
    }

    /// Switch theme: every renderer is rebuilt and every canvas repainted.
    pub fn set_theme(&mut self, theme: Arc<dyn ThemeProvider>) {
        tracing::debug!("Switching theme");
        self.ctx.set_theme(theme.clone());
        self.ctx.cache().invalidate_all();
        for canvas in &mut self.canvases {
            canvas.apply_theme(theme.as_ref());
        }
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("canvases", &self.canvases)
            .field("frame", &self.frame)
            .finish()
    }
}
