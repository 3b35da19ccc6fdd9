#![forbid(unsafe_code)]

//! Frame = Buffer + hit grid for a render pass.
//!
//! The `Frame` is the render target that `Model::view()` writes to. Widgets
//! draw into [`Frame::buffer`] and register clickable regions in the hit
//! grid; the runtime keeps the last frame around so a pointer press can be
//! turned into an [`Activation`] for the control under it.
//!
//! ```
//! use duocount_core::geometry::Rect;
//! use duocount_render::frame::{Frame, HitId, HitRegion};
//!
//! let mut frame = Frame::with_hit_grid(20, 2);
//! frame.register_hit(Rect::new(2, 0, 6, 1), HitId::new(7), HitRegion::Button, 0);
//! assert_eq!(frame.hit_test(3, 0).map(|(id, _, _)| id), Some(HitId::new(7)));
//! assert!(frame.hit_test(1, 0).is_none());
//! ```

use duocount_core::event::Activation;
use duocount_core::geometry::Rect;

use crate::buffer::Buffer;

/// Identifier for a clickable region in the hit grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HitId(pub u32);

impl HitId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Opaque payload stored with a hit region.
pub type HitData = u64;

/// What part of a widget a hit cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitRegion {
    #[default]
    None,
    Content,
    Button,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct HitCell {
    widget_id: Option<HitId>,
    region: HitRegion,
    data: HitData,
}

/// Maps cell positions to the control registered there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<HitCell>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![HitCell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Register `rect` for `widget_id`; later registrations win on overlap.
    pub fn register(&mut self, rect: Rect, widget_id: HitId, region: HitRegion, data: HitData) {
        let Some(rect) = rect.intersection(&Rect::from_size(self.width, self.height)) else {
            return;
        };
        let hit = HitCell {
            widget_id: Some(widget_id),
            region,
            data,
        };
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(i) = self.index(x, y) {
                    self.cells[i] = hit;
                }
            }
        }
    }

    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitRegion, HitData)> {
        let cell = self.cells[self.index(x, y)?];
        cell.widget_id.map(|id| (id, cell.region, cell.data))
    }

    /// Distinct ids registered anywhere in the grid, in first-seen order.
    pub fn registered_ids(&self) -> Vec<HitId> {
        let mut ids: Vec<HitId> = Vec::new();
        for id in self.cells.iter().filter_map(|c| c.widget_id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Bounding box of every cell registered for `id`.
    pub fn bounds_of(&self, id: HitId) -> Option<Rect> {
        let mut found: Option<(u16, u16, u16, u16)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let Some(i) = self.index(x, y) else { continue };
                if self.cells[i].widget_id != Some(id) {
                    continue;
                }
                found = Some(match found {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        found.map(|(x0, y0, x1, y1)| Rect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }

    pub fn clear(&mut self) {
        self.cells.fill(HitCell::default());
    }
}

/// A single render pass: the cell grid plus optional hit testing.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The cell grid for this render pass.
    pub buffer: Buffer,

    /// When `Some`, widgets can register clickable regions.
    pub hit_grid: Option<HitGrid>,
}

impl Frame {
    /// Create a frame without hit testing.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: None,
        }
    }

    pub fn with_hit_grid(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: Some(HitGrid::new(width, height)),
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.buffer.bounds()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        if let Some(grid) = self.hit_grid.as_mut() {
            grid.clear();
        }
    }

    /// Register a hit region. Returns `false` when hit testing is disabled.
    pub fn register_hit(&mut self, rect: Rect, id: HitId, region: HitRegion, data: HitData) -> bool {
        match self.hit_grid.as_mut() {
            Some(grid) => {
                grid.register(rect, id, region, data);
                true
            }
            None => false,
        }
    }

    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitRegion, HitData)> {
        self.hit_grid.as_ref().and_then(|grid| grid.hit_test(x, y))
    }

    /// Resolve a pointer position to the activation of the control under it.
    pub fn activation_at(&self, x: u16, y: u16) -> Option<Activation> {
        self.hit_test(x, y)
            .map(|(id, _, data)| Activation::new(id.id()).with_data(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_without_grid_rejects_hits() {
        let mut frame = Frame::new(4, 1);
        assert!(!frame.register_hit(Rect::new(0, 0, 2, 1), HitId::new(1), HitRegion::Button, 0));
        assert!(frame.hit_test(0, 0).is_none());
    }

    #[test]
    fn later_registration_wins() {
        let mut grid = HitGrid::new(6, 1);
        grid.register(Rect::new(0, 0, 4, 1), HitId::new(1), HitRegion::Button, 0);
        grid.register(Rect::new(2, 0, 4, 1), HitId::new(2), HitRegion::Link, 9);
        assert_eq!(grid.hit_test(1, 0), Some((HitId::new(1), HitRegion::Button, 0)));
        assert_eq!(grid.hit_test(3, 0), Some((HitId::new(2), HitRegion::Link, 9)));
    }

    #[test]
    fn registration_is_clipped() {
        let mut grid = HitGrid::new(3, 3);
        grid.register(Rect::new(2, 2, 10, 10), HitId::new(5), HitRegion::Content, 0);
        assert_eq!(grid.bounds_of(HitId::new(5)), Some(Rect::new(2, 2, 1, 1)));
        assert!(grid.hit_test(3, 3).is_none());
    }

    #[test]
    fn registered_ids_in_first_seen_order() {
        let mut grid = HitGrid::new(8, 2);
        grid.register(Rect::new(4, 0, 2, 1), HitId::new(9), HitRegion::Button, 0);
        grid.register(Rect::new(0, 1, 2, 1), HitId::new(3), HitRegion::Button, 0);
        assert_eq!(grid.registered_ids(), vec![HitId::new(9), HitId::new(3)]);
    }

    #[test]
    fn activation_at_carries_id_and_data() {
        let mut frame = Frame::with_hit_grid(5, 1);
        frame.register_hit(Rect::new(0, 0, 5, 1), HitId::new(4), HitRegion::Button, 11);
        assert_eq!(frame.activation_at(2, 0), Some(Activation::new(4).with_data(11)));
        assert_eq!(frame.activation_at(5, 0), None);
    }

    #[test]
    fn clear_resets_hits() {
        let mut frame = Frame::with_hit_grid(2, 1);
        frame.register_hit(Rect::new(0, 0, 2, 1), HitId::new(1), HitRegion::Button, 0);
        frame.clear();
        assert!(frame.hit_test(0, 0).is_none());
    }
}
