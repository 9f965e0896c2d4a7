//! Two panes separated by a draggable divider.

use parking_lot::Mutex;
use trellis_core::profiling::profile_function;
use trellis_core::{Color, Position, Size};

use crate::canvas::PrimitiveKind;
use crate::dirty::DirtyFlags;
use crate::event::DragEvent;
use crate::layout::Axis;
use crate::object::{impl_base_object, BaseObject, CanvasObject, ObjectId};
use crate::theme::{names, ThemeProvider};

const LEADING: usize = 0;
const DIVIDER: usize = 1;
const TRAILING: usize = 2;

/// Lengths of the leading and trailing panes along the split axis.
///
/// `total` includes the divider. When both minimums fit, `offset` is clamped
/// so neither pane drops below its minimum. Otherwise the usable space is
/// shared in proportion to the minimums. The two lengths always sum to the
/// usable length and are never negative.
pub fn split_lengths(
    total: f32,
    leading_min: f32,
    trailing_min: f32,
    offset: f64,
    thickness: f32,
) -> (f32, f32) {
    let available = total - thickness;
    if available <= 0.0 {
        return (0.0, 0.0);
    }
    let offset = clamp_offset(
        offset,
        leading_min as f64,
        trailing_min as f64,
        available as f64,
    );
    let leading = (offset * available as f64) as f32;
    (leading, available - leading)
}

fn offset_range(leading_min: f64, trailing_min: f64, available: f64) -> (f64, f64) {
    (leading_min / available, 1.0 - trailing_min / available)
}

fn clamp_offset(offset: f64, leading_min: f64, trailing_min: f64, available: f64) -> f64 {
    let (min, max) = offset_range(leading_min, trailing_min, available);
    if min <= max {
        offset.clamp(min, max)
    } else {
        let sum = leading_min + trailing_min;
        if sum <= 0.0 { 0.5 } else { leading_min / sum }
    }
}

/// The bar between the two panes.
#[derive(Debug, Clone)]
pub struct Divider {
    base: BaseObject,
    axis: Axis,
    thickness: f32,
    length: f32,
    hovered: bool,
    color: Color,
    hover_color: Color,
}

impl Divider {
    fn new(axis: Axis, theme: &dyn ThemeProvider) -> Self {
        let mut divider = Divider {
            base: BaseObject::new(),
            axis,
            thickness: 0.0,
            length: 0.0,
            hovered: false,
            color: Color::TRANSPARENT,
            hover_color: Color::TRANSPARENT,
        };
        divider.read_theme(theme);
        divider
    }

    fn read_theme(&mut self, theme: &dyn ThemeProvider) {
        let padding = theme.padding();
        self.thickness = padding * 2.0;
        self.length = padding * 6.0;
        self.color = theme.color(names::COLOR_SHADOW);
        self.hover_color = theme.color(names::COLOR_HOVER);
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    pub fn mouse_in(&mut self) {
        self.set_hovered(true);
    }

    pub fn mouse_out(&mut self) {
        self.set_hovered(false);
    }

    fn set_hovered(&mut self, hovered: bool) {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.base.mark_dirty(DirtyFlags::PAINT);
        }
    }
}

impl CanvasObject for Divider {
    impl_base_object!();

    fn min_size(&self) -> Size {
        self.axis.size(self.thickness, self.length)
    }

    fn apply_theme(&mut self, theme: &dyn ThemeProvider) {
        self.read_theme(theme);
        self.base.mark_dirty(DirtyFlags::THEME);
    }

    fn primitive(&self) -> Option<PrimitiveKind> {
        Some(PrimitiveKind::Rectangle {
            fill: if self.hovered { self.hover_color } else { self.color },
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
            corner_radius: 0.0,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    /// Pointer position along the axis, relative to the split.
    current: f32,
    /// Pointer offset inside the divider when the drag started.
    start: f32,
    /// Offset of the most recent frame whose unclamped value was valid.
    last_valid: f64,
    /// Whether the most recent frame was within range before clamping.
    in_range: bool,
}

/// A container showing two panes side by side or stacked, split at an
/// adjustable offset.
///
/// The offset is the leading pane's share of the usable length (the total
/// minus the divider). Dragging the divider moves the offset but always
/// keeps both panes at or above their minimum size; releasing a drag whose
/// pointer ended outside the valid range restores the last valid offset.
pub struct Split {
    base: BaseObject,
    axis: Axis,
    offset: f64,
    objects: Vec<Box<dyn CanvasObject>>,
    drag: Option<DragState>,
    min_cache: Mutex<Option<Size>>,
}

impl Split {
    pub fn new_horizontal(
        leading: Box<dyn CanvasObject>,
        trailing: Box<dyn CanvasObject>,
        theme: &dyn ThemeProvider,
    ) -> Self {
        Self::new(Axis::Horizontal, leading, trailing, theme)
    }

    pub fn new_vertical(
        leading: Box<dyn CanvasObject>,
        trailing: Box<dyn CanvasObject>,
        theme: &dyn ThemeProvider,
    ) -> Self {
        Self::new(Axis::Vertical, leading, trailing, theme)
    }

    fn new(
        axis: Axis,
        leading: Box<dyn CanvasObject>,
        trailing: Box<dyn CanvasObject>,
        theme: &dyn ThemeProvider,
    ) -> Self {
        let divider: Box<dyn CanvasObject> = Box::new(Divider::new(axis, theme));
        Split {
            base: BaseObject::new(),
            axis,
            offset: 0.5,
            objects: vec![leading, divider, trailing],
            drag: None,
            min_cache: Mutex::new(None),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Set the divider offset. Values outside `[0, 1]` are clamped.
    pub fn set_offset(&mut self, offset: f64) {
        let clamped = if offset.is_nan() { 0.5 } else { offset.clamp(0.0, 1.0) };
        if clamped != offset {
            tracing::warn!("Split offset {} out of range, clamped to {}", offset, clamped);
        }
        if clamped == self.offset {
            return;
        }
        self.offset = clamped;
        self.relayout();
    }

    pub fn leading(&self) -> &dyn CanvasObject {
        self.objects[LEADING].as_ref()
    }

    pub fn trailing(&self) -> &dyn CanvasObject {
        self.objects[TRAILING].as_ref()
    }

    pub fn leading_mut(&mut self) -> &mut dyn CanvasObject {
        self.objects[LEADING].as_mut()
    }

    pub fn trailing_mut(&mut self) -> &mut dyn CanvasObject {
        self.objects[TRAILING].as_mut()
    }

    pub fn divider(&self) -> Option<&Divider> {
        self.objects[DIVIDER].downcast_ref()
    }

    pub fn divider_mut(&mut self) -> Option<&mut Divider> {
        self.objects[DIVIDER].downcast_mut()
    }

    /// Replace the leading pane, returning the old one.
    pub fn set_leading(&mut self, leading: Box<dyn CanvasObject>) -> Box<dyn CanvasObject> {
        let old = std::mem::replace(&mut self.objects[LEADING], leading);
        self.panes_changed();
        old
    }

    /// Replace the trailing pane, returning the old one.
    pub fn set_trailing(&mut self, trailing: Box<dyn CanvasObject>) -> Box<dyn CanvasObject> {
        let old = std::mem::replace(&mut self.objects[TRAILING], trailing);
        self.panes_changed();
        old
    }

    /// Divider thickness along the axis.
    pub fn divider_thickness(&self) -> f32 {
        self.divider().map(Divider::thickness).unwrap_or(0.0)
    }

    fn divider_length(&self) -> f32 {
        self.divider().map(Divider::length).unwrap_or(0.0)
    }

    fn pane_min(&self, index: usize) -> f32 {
        let pane = &self.objects[index];
        if pane.visible() {
            self.axis.along(pane.min_size())
        } else {
            0.0
        }
    }

    fn available(&self) -> f32 {
        self.axis.along(self.base.size()) - self.divider_thickness()
    }

    /// Feed one frame of a divider drag.
    ///
    /// `event.position` is relative to the divider and `event.dragged` is the
    /// movement since the previous frame.
    pub fn drag(&mut self, event: DragEvent) {
        let available = self.available() as f64;
        if available <= 0.0 {
            return;
        }
        let position = self.axis.along_position(event.position());
        let dragged = self.axis.along_delta(event.dragged);

        let mut state = match self.drag {
            Some(mut state) => {
                state.current += dragged;
                state
            }
            None => {
                let divider_at = self.axis.along_position(self.objects[DIVIDER].position());
                DragState {
                    current: divider_at + position,
                    start: position - dragged,
                    last_valid: divider_at as f64 / available,
                    in_range: true,
                }
            }
        };

        let raw = (state.current - state.start) as f64 / available;
        let (min, max) = offset_range(
            self.pane_min(LEADING) as f64,
            self.pane_min(TRAILING) as f64,
            available,
        );
        state.in_range = (min..=max).contains(&raw);
        if state.in_range {
            state.last_valid = raw;
        }
        let offset = if min <= max { raw.clamp(min, max) } else { raw.clamp(0.0, 1.0) };
        self.drag = Some(state);

        tracing::trace!("Split {} drag raw offset {:.3} -> {:.3}", self.base.id(), raw, offset);
        self.offset = offset;
        self.relayout();
    }

    /// Finish the current drag, snapping back if it ended out of range.
    pub fn drag_end(&mut self) {
        let Some(state) = self.drag.take() else {
            return;
        };
        if !state.in_range {
            tracing::debug!(
                "Split {} drag released out of range, restoring offset {:.3}",
                self.base.id(),
                state.last_valid
            );
            self.offset = state.last_valid;
            self.relayout();
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Update the divider hover state.
    pub fn hover(&mut self, hovered: bool) {
        if let Some(divider) = self.divider_mut() {
            if hovered {
                divider.mouse_in();
            } else {
                divider.mouse_out();
            }
        }
    }

    fn panes_changed(&mut self) {
        *self.min_cache.get_mut() = None;
        self.base.mark_dirty(DirtyFlags::CHILDREN);
        self.relayout();
    }

    fn relayout(&mut self) {
        profile_function!();
        let size = self.base.size();
        let thickness = self.divider_thickness();
        let (leading, trailing) = split_lengths(
            self.axis.along(size),
            self.pane_min(LEADING),
            self.pane_min(TRAILING),
            self.offset,
            thickness,
        );
        let across = self.axis.across(size);
        let axis = self.axis;

        let placements = [
            (LEADING, 0.0, leading),
            (DIVIDER, leading, thickness),
            (TRAILING, leading + thickness, trailing),
        ];
        for (index, at, length) in placements {
            let object = &mut self.objects[index];
            if !object.visible() {
                continue;
            }
            object.move_to(axis.position(at, 0.0));
            object.resize(axis.size(length, across));
        }
        self.base.mark_dirty(DirtyFlags::PAINT);
    }
}

impl std::fmt::Debug for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Split")
            .field("id", &self.base.id())
            .field("axis", &self.axis)
            .field("offset", &self.offset)
            .field("dragging", &self.drag.is_some())
            .finish()
    }
}

impl CanvasObject for Split {
    fn id(&self) -> ObjectId {
        self.base.id()
    }

    fn position(&self) -> Position {
        self.base.position()
    }

    fn move_to(&mut self, position: Position) {
        self.base.move_to(position);
    }

    fn size(&self) -> Size {
        self.base.size()
    }

    fn resize(&mut self, size: Size) {
        if self.base.resize(size) {
            self.relayout();
        }
    }

    fn min_size(&self) -> Size {
        let mut cache = self.min_cache.lock();
        if let Some(min) = *cache {
            return min;
        }
        let leading = self.objects[LEADING].as_ref();
        let trailing = self.objects[TRAILING].as_ref();
        let visible_min = |o: &dyn CanvasObject| {
            if o.visible() { o.min_size() } else { Size::ZERO }
        };
        let (lead, trail) = (visible_min(leading), visible_min(trailing));

        let along = self.axis.along(lead) + self.axis.along(trail) + self.divider_thickness();
        let across = self
            .axis
            .across(lead)
            .max(self.axis.across(trail))
            .max(self.divider_length());
        let min = self.axis.size(along, across);
        *cache = Some(min);
        min
    }

    fn visible(&self) -> bool {
        self.base.visible()
    }

    fn show(&mut self) {
        self.base.set_visible(true);
    }

    fn hide(&mut self) {
        self.base.set_visible(false);
    }

    fn z_index(&self) -> i32 {
        self.base.z_index()
    }

    fn refresh(&mut self) {
        *self.min_cache.get_mut() = None;
        self.relayout();
        self.base.clear_dirty();
    }

    fn apply_theme(&mut self, theme: &dyn ThemeProvider) {
        for object in &mut self.objects {
            object.apply_theme(theme);
        }
        *self.min_cache.get_mut() = None;
        self.base.mark_dirty(DirtyFlags::THEME);
    }

    fn dirty_flags(&self) -> DirtyFlags {
        self.base.dirty()
    }

    fn clear_dirty(&mut self) {
        self.base.clear_dirty();
    }

    fn children(&self) -> &[Box<dyn CanvasObject>] {
        &self.objects
    }

    fn children_mut(&mut self) -> &mut [Box<dyn CanvasObject>] {
        &mut self.objects
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_clamp_to_minimums() {
        assert_eq!(split_lengths(108.0, 10.0, 10.0, 0.5, 8.0), (50.0, 50.0));
        assert_eq!(split_lengths(108.0, 10.0, 10.0, 0.0, 8.0), (10.0, 90.0));
        assert_eq!(split_lengths(108.0, 10.0, 10.0, 1.0, 8.0), (90.0, 10.0));
    }

    #[test]
    fn test_lengths_proportional_when_short() {
        let (leading, trailing) = split_lengths(20.0, 10.0, 30.0, 0.5, 8.0);
        assert_eq!(leading, 3.0);
        assert_eq!(trailing, 9.0);
        assert_eq!(leading + trailing + 8.0, 20.0);
    }

    #[test]
    fn test_lengths_degenerate() {
        assert_eq!(split_lengths(0.0, 10.0, 30.0, 0.5, 8.0), (0.0, 0.0));
        assert_eq!(split_lengths(8.0, 0.0, 0.0, 0.5, 8.0), (0.0, 0.0));
    }
}
