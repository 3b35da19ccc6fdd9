#![forbid(unsafe_code)]

//! Read-only numeric display.

use duocount_core::geometry::Rect;
use duocount_render::cell::CellFlags;
use duocount_render::frame::Frame;

use crate::{Widget, text_width};

/// Shows a value centered in a reverse-video box, like a read-only input.
#[derive(Debug, Clone, Copy)]
pub struct CounterField {
    value: i64,
    min_width: u16,
}

impl CounterField {
    pub const DEFAULT_WIDTH: u16 = 8;

    pub const fn new(value: i64) -> Self {
        Self {
            value,
            min_width: Self::DEFAULT_WIDTH,
        }
    }

    #[must_use]
    pub const fn min_width(mut self, width: u16) -> Self {
        self.min_width = width;
        self
    }

    /// Box width: the configured minimum, grown to fit the value plus padding.
    pub fn width(&self) -> u16 {
        let digits = text_width(&self.value.to_string());
        digits.saturating_add(2).max(self.min_width)
    }
}

impl Widget for CounterField {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        let text = self.value.to_string();
        let boxed = Rect::new(area.x, area.y, self.width().min(area.width), 1);
        let slack = boxed.width.saturating_sub(text_width(&text));
        frame
            .buffer
            .set_string(boxed.x + slack / 2, boxed.y, &text, CellFlags::empty(), boxed.right());
        frame.buffer.set_flags_area(boxed, CellFlags::REVERSE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_centered() {
        let mut frame = Frame::new(10, 1);
        CounterField::new(6).render(frame.bounds(), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "   6");
    }

    #[test]
    fn negative_values_render_sign() {
        let mut frame = Frame::new(10, 1);
        CounterField::new(-42).render(frame.bounds(), &mut frame);
        assert_eq!(frame.buffer.row_text(0).trim(), "-42");
    }

    #[test]
    fn grows_for_wide_values() {
        let field = CounterField::new(i64::MIN);
        assert_eq!(field.width(), 22);
        assert_eq!(CounterField::new(0).width(), CounterField::DEFAULT_WIDTH);
    }

    #[test]
    fn box_is_reverse_video() {
        let mut frame = Frame::new(10, 1);
        CounterField::new(0).render(frame.bounds(), &mut frame);
        let reversed = |x| {
            frame
                .buffer
                .get(x, 0)
                .is_some_and(|c| c.flags.contains(CellFlags::REVERSE))
        };
        assert!(reversed(0));
        assert!(reversed(7));
        assert!(!reversed(8));
    }
}
