#![forbid(unsafe_code)]

//! Stateless view components for duocount.
//!
//! Every widget is a pure function of its inputs: it draws into the frame's
//! buffer and, for clickable widgets, registers a hit region under a
//! caller-supplied [`HitId`]. The runtime turns presses on those regions into
//! activations; widgets never hold callbacks or state.

pub mod button;
pub mod counter_field;
pub mod header;
pub mod label;

pub use button::Button;
pub use counter_field::CounterField;
pub use header::Header;
pub use label::{Alignment, Label};

use duocount_core::geometry::Rect;
use duocount_render::frame::Frame;
#[doc(no_inline)]
pub use duocount_render::frame::HitId;
use unicode_width::UnicodeWidthStr;

/// A renderable component.
pub trait Widget {
    /// Render the widget into `frame` within `area`.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// Display width of `text` in cells, saturated to `u16`.
pub(crate) fn text_width(text: &str) -> u16 {
    u16::try_from(text.width()).unwrap_or(u16::MAX)
}
