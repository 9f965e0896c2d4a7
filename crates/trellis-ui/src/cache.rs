//! Renderer cache.
//!
//! Maps a widget id to the renderer built for it. The map is guarded by a
//! read-write lock: lookups from the paint pass share the read lock, while
//! constructing a renderer holds the write lock so each live widget gets
//! exactly one renderer. Renderer construction must not re-enter the cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use trellis_core::alloc::HashMap;
use trellis_core::profiling::profile_scope;

use crate::context::Context;
use crate::object::ObjectId;
use crate::renderer::{self, EmptyRenderer, RendererHandle};
use crate::widget::Widget;

struct Entry {
    renderer: RendererHandle,
    last_used: RwLock<Instant>,
    stale: bool,
}

impl Entry {
    fn touch(&self) {
        *self.last_used.write() = Instant::now();
    }
}

/// Widget to renderer mapping with lazy construction and explicit
/// invalidation.
#[derive(Default)]
pub struct RendererCache {
    entries: RwLock<HashMap<ObjectId, Entry>>,
    constructions: AtomicUsize,
}

impl RendererCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the widget's renderer, building it if there is none or the
    /// entry was invalidated.
    ///
    /// Destroyed widgets get a fresh [`EmptyRenderer`] that is not cached.
    pub fn get_or_create(&self, widget: &Arc<dyn Widget>, ctx: &Context) -> RendererHandle {
        if widget.base().is_destroyed() {
            return renderer::handle(Box::new(EmptyRenderer::new()));
        }
        let id = widget.id();

        {
            let entries = self.entries.read();
            if let Some(entry) = entries.get(&id).filter(|e| !e.stale) {
                entry.touch();
                return entry.renderer.clone();
            }
        }

        let mut entries = self.entries.write();
        // Another thread may have built it while we waited for the lock.
        if let Some(entry) = entries.get(&id).filter(|e| !e.stale) {
            entry.touch();
            return entry.renderer.clone();
        }

        let built = {
            profile_scope!("create_renderer");
            renderer::handle(widget.clone().create_renderer(ctx))
        };
        self.constructions.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Built renderer for widget {}", id);

        let previous = entries.insert(
            id,
            Entry {
                renderer: built.clone(),
                last_used: RwLock::new(Instant::now()),
                stale: false,
            },
        );
        drop(entries);

        if let Some(previous) = previous {
            previous.renderer.write().destroy();
        }
        built
    }

    /// The cached renderer, without building one.
    pub fn get(&self, id: ObjectId) -> Option<RendererHandle> {
        let entries = self.entries.read();
        let entry = entries.get(&id).filter(|e| !e.stale)?;
        entry.touch();
        Some(entry.renderer.clone())
    }

    /// Force the next [`get_or_create`](Self::get_or_create) to rebuild.
    pub fn invalidate(&self, id: ObjectId) -> bool {
        match self.entries.write().get_mut(&id) {
            Some(entry) => {
                entry.stale = true;
                tracing::debug!("Invalidated renderer for widget {}", id);
                true
            }
            None => false,
        }
    }

    /// Invalidate every renderer, e.g. after a theme change.
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write();
        for entry in entries.values_mut() {
            entry.stale = true;
        }
        tracing::debug!("Invalidated {} renderers", entries.len());
    }

    /// Drop the widget's entry and destroy its renderer.
    pub fn destroy(&self, id: ObjectId) -> bool {
        let removed = self.entries.write().remove(&id);
        match removed {
            Some(entry) => {
                entry.renderer.write().destroy();
                tracing::debug!("Destroyed renderer for widget {}", id);
                true
            }
            None => false,
        }
    }

    /// Destroy renderers not used within `expiry` of `now`.
    ///
    /// Returns the number of entries dropped.
    pub fn destroy_expired(&self, now: Instant, expiry: Duration) -> usize {
        let expired: Vec<Entry> = {
            let mut entries = self.entries.write();
            let ids: Vec<ObjectId> = entries
                .iter()
                .filter(|(_, e)| now.saturating_duration_since(*e.last_used.read()) >= expiry)
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| entries.remove(id)).collect()
        };
        for entry in &expired {
            entry.renderer.write().destroy();
        }
        if !expired.is_empty() {
            tracing::debug!("Destroyed {} expired renderers", expired.len());
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Total renderer constructions so far.
    pub fn construction_count(&self) -> usize {
        self.constructions.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for RendererCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererCache")
            .field("entries", &self.len())
            .field("constructions", &self.construction_count())
            .finish()
    }
}
