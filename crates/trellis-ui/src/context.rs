//! Explicit application context.
//!
//! Theme, settings, the renderer cache and the animation runner travel
//! together in a [`Context`] that is passed to whatever needs them.
//! `Context::default()` is meant for application entry points only.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use trellis_core::Settings;

use crate::animation::AnimationRunner;
use crate::cache::RendererCache;
use crate::theme::{Theme, ThemeProvider};

struct ContextInner {
    theme: RwLock<Arc<dyn ThemeProvider>>,
    settings: RwLock<Settings>,
    cache: RendererCache,
    animations: AnimationRunner,
}

/// Shared handle to the application context. Cloning is cheap.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    pub fn new(settings: Settings) -> Self {
        let theme: Arc<dyn ThemeProvider> = Arc::new(Theme::for_settings(&settings));
        Self::with_theme(settings, theme)
    }

    pub fn with_theme(settings: Settings, theme: Arc<dyn ThemeProvider>) -> Self {
        Context {
            inner: Arc::new(ContextInner {
                theme: RwLock::new(theme),
                settings: RwLock::new(settings),
                cache: RendererCache::new(),
                animations: AnimationRunner::new(),
            }),
        }
    }

    /// Context configured from `TRELLIS_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(Settings::from_env())
    }

    pub fn theme(&self) -> Arc<dyn ThemeProvider> {
        self.inner.theme.read().clone()
    }

    /// Swap the theme. Callers normally go through
    /// [`Driver::set_theme`](crate::driver::Driver::set_theme), which also
    /// invalidates renderers and repaints.
    pub fn set_theme(&self, theme: Arc<dyn ThemeProvider>) {
        *self.inner.theme.write() = theme;
    }

    pub fn settings(&self) -> Settings {
        self.inner.settings.read().clone()
    }

    pub fn update_settings(&self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.inner.settings.write());
    }

    pub fn cache(&self) -> &RendererCache {
        &self.inner.cache
    }

    pub fn animations(&self) -> &AnimationRunner {
        &self.inner.animations
    }

    pub fn downgrade(&self) -> WeakContext {
        WeakContext {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &*self.inner.settings.read())
            .field("cache", &self.inner.cache)
            .field("animations", &self.inner.animations)
            .finish()
    }
}

/// Non-owning context handle held by tree nodes.
#[derive(Clone, Default)]
pub struct WeakContext {
    inner: Weak<ContextInner>,
}

impl WeakContext {
    pub fn upgrade(&self) -> Option<Context> {
        self.inner.upgrade().map(|inner| Context { inner })
    }
}
