#![forbid(unsafe_code)]

//! Clickable button.
//!
//! Drawn as `[ label ]`. The drawn cells, and only those, are registered as
//! a [`HitRegion::Button`] so a press anywhere on the brackets or the label
//! activates it.

use duocount_core::geometry::Rect;
use duocount_render::cell::CellFlags;
use duocount_render::frame::{Frame, HitData, HitId, HitRegion};

use crate::{Widget, text_width};

#[derive(Debug, Clone)]
pub struct Button<'a> {
    label: &'a str,
    id: HitId,
    data: HitData,
    flags: CellFlags,
}

impl<'a> Button<'a> {
    pub fn new(label: &'a str, id: HitId) -> Self {
        Self {
            label,
            id,
            data: 0,
            flags: CellFlags::BOLD,
        }
    }

    #[must_use]
    pub fn data(mut self, data: HitData) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: CellFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Cells the button occupies when not clipped.
    pub fn width(&self) -> u16 {
        text_width(self.label).saturating_add(4)
    }
}

impl Widget for Button<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Button",
            id = self.id.id(),
            x = area.x,
            y = area.y,
            w = area.width
        )
        .entered();

        if area.is_empty() {
            return;
        }
        let buf = &mut frame.buffer;
        let mut x = buf.set_string(area.x, area.y, "[ ", CellFlags::empty(), area.right());
        x = buf.set_string(x, area.y, self.label, self.flags, area.right());
        x = buf.set_string(x, area.y, " ]", CellFlags::empty(), area.right());

        let drawn = Rect::new(area.x, area.y, x - area.x, 1);
        frame.register_hit(drawn, self.id, HitRegion::Button, self.data);
    }
}
