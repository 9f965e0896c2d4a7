//! Trellis UI - retained-mode widget toolkit core
//!
//! This crate provides the parts of a widget toolkit that sit between
//! application code and a rasterizer:
//! - A canvas object model of positioned, sized primitives and containers
//! - Stateful widgets whose appearance is built by cached renderers
//! - Grid-wrap, split, padded and box layouts
//! - A lock-free refresh queue and a per-frame paint driver
//! - Themes and frame-driven animations
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use trellis_core::Size;
//! use trellis_ui::{
//!     BoxLayout, Check, Container, Context, Driver, Label, RecordingBackend, WidgetNode,
//! };
//!
//! let ctx = Context::default();
//! let mut driver = Driver::new(ctx.clone());
//! let canvas = driver.create_canvas(Size::new(320.0, 240.0));
//!
//! let label = Arc::new(Label::new("Hello"));
//! let check = Arc::new(Check::new("Enabled"));
//! let content = Container::new(BoxLayout::vertical(4.0)).with_objects([
//!     WidgetNode::boxed(&label, &ctx),
//!     WidgetNode::boxed(&check, &ctx),
//! ]);
//!
//! if let Some(canvas) = driver.canvas_mut(canvas) {
//!     canvas.set_content(Box::new(content));
//! }
//!
//! let mut backend = RecordingBackend::new();
//! driver.tick(1.0 / 60.0, &mut backend);
//! assert_eq!(backend.frames.len(), 1);
//!
//! check.set_checked(true);
//! driver.tick(1.0 / 60.0, &mut backend);
//! assert_eq!(backend.frames.len(), 2);
//! ```

pub mod animation;
pub mod cache;
pub mod canvas;
pub mod container;
pub mod context;
pub mod dirty;
pub mod driver;
pub mod event;
pub mod layout;
pub mod object;
pub mod queue;
pub mod renderer;
pub mod resource;
pub mod split;
pub mod theme;
pub mod widget;

pub use animation::{Animation, AnimationCurve, AnimationHandle, AnimationRunner, RepeatCount};
pub use cache::RendererCache;
pub use canvas::{Circle, Image, PaintPrimitive, PrimitiveKind, Rectangle, Text};
pub use container::Container;
pub use context::{Context, WeakContext};
pub use dirty::{DirtyFlags, Versioned};
pub use driver::{Canvas, CanvasId, Driver, FrameStats, RecordingBackend, RenderBackend};
pub use event::{DragEvent, PointEvent};
pub use layout::{Axis, BoxLayout, GridWrapLayout, Layout, PaddedLayout, Padding, StackLayout};
pub use object::{BaseObject, CanvasObject, ObjectId};
pub use queue::ObjectQueue;
pub use renderer::{BaseRenderer, EmptyRenderer, Renderer, RendererHandle};
pub use resource::Resource;
pub use split::{Divider, Split};
pub use theme::{Theme, ThemeError, ThemeProvider, ThemeResult};
pub use widget::{
    Button, ButtonImportance, Check, Icon, Label, RefreshQueue, Renderable, Widget, WidgetBase,
    WidgetNode,
};

pub use trellis_core::{Color, Delta, Position, Rect, Settings, Size, ThemeVariant};
