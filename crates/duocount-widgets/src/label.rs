#![forbid(unsafe_code)]

//! Single-line text.

use duocount_core::geometry::Rect;
use duocount_render::cell::CellFlags;
use duocount_render::frame::Frame;

use crate::{Widget, text_width};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Default)]
pub struct Label<'a> {
    text: &'a str,
    flags: CellFlags,
    alignment: Alignment,
}

impl<'a> Label<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            flags: CellFlags::empty(),
            alignment: Alignment::Left,
        }
    }

    #[must_use]
    pub fn flags(mut self, flags: CellFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Widget for Label<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        let x = match self.alignment {
            Alignment::Left => area.x,
            Alignment::Center => {
                let slack = area.width.saturating_sub(text_width(self.text));
                area.x + slack / 2
            }
        };
        frame
            .buffer
            .set_string(x, area.y, self.text, self.flags, area.right());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_aligned_by_default() {
        let mut frame = Frame::new(12, 1);
        Label::new("Loading...").render(frame.bounds(), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "Loading...");
    }

    #[test]
    fn centered_text() {
        let mut frame = Frame::new(8, 1);
        Label::new("ab")
            .alignment(Alignment::Center)
            .render(frame.bounds(), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "   ab");
    }

    #[test]
    fn clipped_to_area() {
        let mut frame = Frame::new(10, 2);
        Label::new("Loading...").render(Rect::new(2, 1, 4, 1), &mut frame);
        assert_eq!(frame.buffer.to_lines(), vec!["".to_owned(), "  Load".to_owned()]);
    }

    #[test]
    fn empty_area_draws_nothing() {
        let mut frame = Frame::new(4, 1);
        Label::new("x").render(Rect::new(0, 0, 0, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "");
    }
}
