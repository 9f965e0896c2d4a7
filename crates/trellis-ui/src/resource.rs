//! Named binary resources (icons, images).

use std::fmt;
use std::sync::Arc;

/// An immutable, cheaply clonable named resource.
///
/// Decoding is the rasterizer's job; the scene graph only carries the name
/// and bytes through to the backend.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    name: Arc<str>,
    content: Arc<[u8]>,
}

impl Resource {
    pub fn new(name: impl Into<Arc<str>>, content: impl Into<Arc<[u8]>>) -> Self {
        Resource {
            name: name.into(),
            content: content.into(),
        }
    }

    /// A resource identified by name only.
    pub fn named(name: &str) -> Self {
        Resource::new(name, Vec::new())
    }

    /// The fallback returned for unknown icons.
    pub fn empty() -> Self {
        Resource::named("")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.content.is_empty()
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("bytes", &self.content.len())
            .finish()
    }
}
