#![forbid(unsafe_code)]

//! Title plus the change-language link.

use duocount_core::geometry::Rect;
use duocount_render::cell::CellFlags;
use duocount_render::frame::{Frame, HitId, HitRegion};

use crate::Widget;

/// Two rows: the bold title, then the underlined link that toggles language.
#[derive(Debug, Clone)]
pub struct Header<'a> {
    title: &'a str,
    change_language: &'a str,
    link_id: HitId,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, change_language: &'a str, link_id: HitId) -> Self {
        Self {
            title,
            change_language,
            link_id,
        }
    }

    /// Rows the header needs.
    pub const fn height(&self) -> u16 {
        2
    }
}

impl Widget for Header<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Header",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        frame
            .buffer
            .set_string(area.x, area.y, self.title, CellFlags::BOLD, area.right());

        let link_row = area.row(1);
        if link_row.is_empty() {
            return;
        }
        let end = frame.buffer.set_string(
            link_row.x,
            link_row.y,
            self.change_language,
            CellFlags::UNDERLINE,
            link_row.right(),
        );
        let link = Rect::new(link_row.x, link_row.y, end - link_row.x, 1);
        frame.register_hit(link, self.link_id, HitRegion::Link, 0);
    }
}
